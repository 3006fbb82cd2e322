mod amd;
mod cjs;
mod esm;
mod iife;
mod system;
mod umd;

use bindle_common::{
  Chunk, ChunkDependency, ChunkDependencyDeclaration, NormalizedAddons, NormalizedOutputOptions,
  INTEROP_DEFAULT_HELPER, INTEROP_NAMESPACE_HELPER, OutputFormat,
};
use bindle_error::BuildResult;
use bindle_sourcemap::{Source, SourceJoiner, SourceMapSource, SourceOrigin};
use bindle_utils::{concat_string, indexmap::FxIndexSet, rstr::Rstr};

use crate::{graph::ChunkGraph, types::link_output::LinkOutput};

/// One piece of a chunk body: a module source that maps back to its original
/// file, or injected text that maps to nothing.
pub enum BodySource {
  Mapped(SourceMapSource),
  Plain(String),
}

impl Source for BodySource {
  fn content(&self) -> &str {
    match self {
      Self::Mapped(source) => source.content(),
      Self::Plain(source) => source.content(),
    }
  }

  fn origin(&self) -> Option<&SourceOrigin> {
    match self {
      Self::Mapped(source) => source.origin(),
      Self::Plain(_) => None,
    }
  }
}

/// The argument record every format finaliser receives.
pub struct FinalizerContext<'a> {
  pub options: &'a NormalizedOutputOptions,
  pub addons: &'a NormalizedAddons,
  pub chunk: &'a Chunk,
  pub chunk_graph: &'a ChunkGraph,
  pub link_output: &'a LinkOutput,
  pub has_exports: bool,
  pub is_entry_module_facade: bool,
  pub named_exports_mode: bool,
  pub uses_top_level_await: bool,
  /// Per-format runtime globals the chunk's modules declared they touch.
  pub accessed_globals: &'a FxIndexSet<Rstr>,
}

impl FinalizerContext<'_> {
  pub fn separator(&self) -> &'static str {
    if self.options.compact { "" } else { "\n\n" }
  }

  /// The filled-in relative path of a rendered dependency.
  pub fn dependency_id<'d>(&self, declaration: &'d ChunkDependencyDeclaration) -> &'d str {
    declaration.id.as_deref().expect("dependency ids are filled before finalising")
  }

  pub fn external_binding_name(&self, dep: ChunkDependency) -> Option<String> {
    let external_idx = dep.as_external()?;
    let external = self.link_output.module_table[external_idx].as_external()?;
    Some(
      self
        .link_output
        .symbol_db
        .canonical_name_for(external.namespace_ref, &self.chunk.canonical_names)
        .to_string(),
    )
  }

  pub fn chunk_binding_name(&self, dep: ChunkDependency) -> Option<&str> {
    self.chunk.render.require_binding_names.get(&dep).map(String::as_str)
  }
}

/// Dispatch to the finaliser for the requested output format.
pub fn finalize_chunk(
  ctx: &mut FinalizerContext<'_>,
  body: Vec<BodySource>,
) -> BuildResult<SourceJoiner<'static>> {
  let mut joiner = match ctx.options.format {
    OutputFormat::Esm => esm::render_esm(ctx, body),
    OutputFormat::Cjs => cjs::render_cjs(ctx, body),
    OutputFormat::Amd => amd::render_amd(ctx, body),
    OutputFormat::Umd => umd::render_umd(ctx, body)?,
    OutputFormat::Iife => iife::render_iife(ctx, body)?,
    OutputFormat::System => system::render_system(ctx, body),
  };

  if let Some(banner) = &ctx.addons.banner {
    joiner.prepend_source(banner.clone());
  }
  if let Some(footer) = &ctx.addons.footer {
    joiner.append_source(footer.clone());
  }

  Ok(joiner)
}

pub(super) fn binding_name_for_dep(
  ctx: &FinalizerContext<'_>,
  dep: ChunkDependency,
) -> Option<String> {
  match dep {
    ChunkDependency::Chunk(_) => ctx.chunk_binding_name(dep).map(str::to_string),
    ChunkDependency::External(_) => ctx.external_binding_name(dep),
  }
}

/// Reexport statements against an `exports` object, for every format that
/// carries one. Bindings come from `require` results or wrapper parameters.
pub(super) fn render_reexports_for_exports_object(ctx: &FinalizerContext<'_>) -> String {
  use bindle_utils::ecmascript::property_access_str;

  let mut s = String::new();
  for (dep, declaration) in &ctx.chunk.render.rendered_dependencies {
    if declaration.reexports.is_empty() {
      continue;
    }
    let Some(binding) = binding_name_for_dep(ctx, *dep) else { continue };

    for reexport in &declaration.reexports {
      if reexport.imported == "*" {
        s.push_str(
          &"Object.keys($NAME).forEach(function (k) {\n\tif (k !== 'default' && !Object.prototype.hasOwnProperty.call(exports, k)) Object.defineProperty(exports, k, {\n\t\tenumerable: true,\n\t\tget: () => $NAME[k]\n\t});\n});\n"
            .replace("$NAME", &binding),
        );
      } else {
        let value = property_access_str(&binding, &reexport.imported);
        if reexport.needs_live_binding {
          s.push_str(&concat_string!(
            "Object.defineProperty(exports, '",
            reexport.reexported,
            "', { enumerable: true, get: () => ",
            value,
            " });\n"
          ));
        } else {
          s.push_str(&concat_string!(
            property_access_str("exports", &reexport.reexported),
            " = ",
            value,
            ";\n"
          ));
        }
      }
    }
  }
  s
}

/// Export assignments against an `exports` object; `default` export mode
/// collapses to a single `module.exports`-style value handled per format.
pub(super) fn render_exports_for_exports_object(ctx: &FinalizerContext<'_>) -> Option<String> {
  use bindle_utils::ecmascript::property_access_str;

  let exports = &ctx.chunk.render.rendered_exports;
  if exports.is_empty() {
    return None;
  }

  let rendered = exports
    .iter()
    .map(|declaration| {
      let value: &str = declaration.expression.as_deref().unwrap_or(&declaration.local);
      if declaration.needs_live_binding {
        concat_string!(
          "Object.defineProperty(exports, '",
          declaration.exported,
          "', { enumerable: true, get: () => ",
          value,
          " });"
        )
      } else {
        concat_string!(property_access_str("exports", &declaration.exported), " = ", value, ";")
      }
    })
    .collect::<Vec<_>>();

  Some(rendered.join("\n"))
}

pub(super) fn interop_default_helper() -> String {
  concat_string!(
    "function ",
    INTEROP_DEFAULT_HELPER,
    " (e) { return e && e.__esModule ? e : { default: e }; }"
  )
}

pub(super) fn interop_namespace_helper() -> String {
  concat_string!(
    "function ",
    INTEROP_NAMESPACE_HELPER,
    " (e) {\n\tif (e && e.__esModule) return e;\n\tvar n = Object.create(null);\n\tif (e) {\n\t\tObject.keys(e).forEach(function (k) {\n\t\t\tn[k] = e[k];\n\t\t});\n\t}\n\tn.default = e;\n\treturn Object.freeze(n);\n}"
  )
}
