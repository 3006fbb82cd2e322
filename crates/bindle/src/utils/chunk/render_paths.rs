use std::path::{Path, PathBuf};

use bindle_common::{Module, ModuleTable};
use bindle_utils::path_ext::relative_import_path;
use sugar_path::SugarPath;

/// The common ancestor directory of all absolute module ids; relative output
/// paths in preserve-modules mode and renormalised external paths are
/// computed against it.
pub fn compute_input_base(module_table: &ModuleTable) -> PathBuf {
  let mut base: Option<PathBuf> = None;
  for module in module_table.iter() {
    let Module::Normal(module) = module else { continue };
    let path = module.id.as_path();
    if !path.is_absolute() {
      continue;
    }
    let dir = path.parent().unwrap_or(path).to_path_buf();
    base = Some(match base {
      None => dir,
      Some(prev) => common_ancestor(&prev, &dir),
    });
  }
  base.unwrap_or_default()
}

fn common_ancestor(a: &Path, b: &Path) -> PathBuf {
  let mut ret = PathBuf::new();
  for (left, right) in a.components().zip(b.components()) {
    if left == right {
      ret.push(left);
    } else {
      break;
    }
  }
  ret
}

/// Relative path written into import statements of `importer_id` referring to
/// `dep_id`, both being output-relative filenames. AMD wants the `.js`
/// extension stripped.
pub fn get_import_path(importer_id: &str, dep_id: &str, strip_js_extension: bool) -> String {
  let mut path = relative_import_path(Path::new(importer_id), Path::new(dep_id));
  if strip_js_extension {
    if let Some(stripped) = path.strip_suffix(".js") {
      path = stripped.to_string();
    }
  }
  path
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn import_path_is_dot_prefixed() {
    assert_eq!(get_import_path("main.js", "chunks/dep.js", false), "./chunks/dep.js");
  }

  #[test]
  fn amd_strips_js_extension() {
    assert_eq!(get_import_path("main.js", "dep.js", true), "./dep");
  }
}
