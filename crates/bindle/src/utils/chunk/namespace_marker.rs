use bindle_common::NormalizedOutputOptions;
use bindle_utils::concat_string;

/// Markers stamped onto an entry chunk's `exports` object so consumers can
/// tell a transpiled ES namespace from hand-written CommonJS: `__esModule`
/// whenever the chunk carries a default export, plus the `Symbol.toStringTag`
/// brand when `namespace_to_string_tag` asks for it. Returns `None` when the
/// `es_module` option suppresses markers or nothing applies.
pub fn render_namespace_markers(
  options: &NormalizedOutputOptions,
  has_default_export: bool,
) -> Option<String> {
  if !options.es_module {
    return None;
  }

  // (key for defineProperty, key for a defineProperties object, descriptor)
  let mut markers: Vec<(&str, &str, &str)> = Vec::new();
  if has_default_export {
    markers.push(("'__esModule'", "__esModule", "{ value: true }"));
  }
  if options.namespace_to_string_tag {
    markers.push(("Symbol.toStringTag", "[Symbol.toStringTag]", "{ value: 'Module' }"));
  }

  match markers.as_slice() {
    [] => None,
    [(key, _, descriptor)] => {
      Some(concat_string!("Object.defineProperty(exports, ", key, ", ", descriptor, ");"))
    }
    _ => {
      let properties = markers
        .iter()
        .map(|(_, key, descriptor)| concat_string!(key, ": ", descriptor))
        .collect::<Vec<_>>()
        .join(", ");
      Some(concat_string!("Object.defineProperties(exports, { ", properties, " });"))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::utils::normalize_options::normalize_options;
  use bindle_common::OutputOptions;

  #[test]
  fn default_export_gets_es_module_marker() {
    let options = normalize_options(OutputOptions::default());
    assert_eq!(
      render_namespace_markers(&options, true).as_deref(),
      Some("Object.defineProperty(exports, '__esModule', { value: true });")
    );
    assert_eq!(render_namespace_markers(&options, false), None);
  }

  #[test]
  fn es_module_option_suppresses_markers() {
    let options =
      normalize_options(OutputOptions { es_module: Some(false), ..OutputOptions::default() });
    assert_eq!(render_namespace_markers(&options, true), None);
  }

  #[test]
  fn string_tag_combines_into_define_properties() {
    let options = normalize_options(OutputOptions {
      namespace_to_string_tag: Some(true),
      ..OutputOptions::default()
    });
    assert_eq!(
      render_namespace_markers(&options, true).as_deref(),
      Some(
        "Object.defineProperties(exports, { __esModule: { value: true }, [Symbol.toStringTag]: { value: 'Module' } });"
      )
    );
  }
}
