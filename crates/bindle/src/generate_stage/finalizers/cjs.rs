use bindle_common::{ChunkDependency, ExportMode};
use bindle_sourcemap::SourceJoiner;
use bindle_utils::concat_string;

use crate::utils::chunk::namespace_marker::render_namespace_markers;

use super::{
  interop_default_helper, interop_namespace_helper, render_exports_for_exports_object,
  render_reexports_for_exports_object, BodySource, FinalizerContext,
};

pub fn render_cjs(ctx: &FinalizerContext<'_>, body: Vec<BodySource>) -> SourceJoiner<'static> {
  let mut source_joiner = SourceJoiner::with_separator(ctx.separator());

  source_joiner.append_source("\"use strict\";".to_string());

  if ctx.is_entry_module_facade && ctx.named_exports_mode {
    let has_default_export =
      ctx.chunk.render.rendered_exports.iter().any(|decl| decl.exported == "default");
    if let Some(markers) = render_namespace_markers(ctx.options, has_default_export) {
      source_joiner.append_source(markers);
    }
  }

  if let Some(intro) = &ctx.addons.intro {
    source_joiner.append_source(intro.clone());
  }

  if !ctx.chunk.render.interop_default_binding_names.is_empty() {
    source_joiner.append_source(interop_default_helper());
  }
  if ctx.chunk.render.needs_interop_namespace {
    source_joiner.append_source(interop_namespace_helper());
  }

  let mut import_block = render_cjs_chunk_imports(ctx);
  import_block.push_str(&render_reexports_for_exports_object(ctx));
  if !import_block.is_empty() {
    source_joiner.append_source(import_block);
  }

  for source in body {
    source_joiner.append_source(source);
  }

  if let Some(exports) = render_cjs_exports(ctx) {
    source_joiner.append_source(exports);
  }

  if let Some(outro) = &ctx.addons.outro {
    source_joiner.append_source(outro.clone());
  }

  source_joiner
}

// The generated `require` statements keep live bindings: imported values are
// only ever read through the binding's properties.
fn render_cjs_chunk_imports(ctx: &FinalizerContext<'_>) -> String {
  let mut s = String::new();
  let keyword = ctx.options.declaration_keyword();

  for (dep, declaration) in &ctx.chunk.render.rendered_dependencies {
    let require_path = concat_string!(
      "require(",
      serde_json::to_string(ctx.dependency_id(declaration)).unwrap(),
      ")"
    );
    let is_bare = declaration.import_specifiers.is_empty() && declaration.reexports.is_empty();

    match dep {
      ChunkDependency::Chunk(_) => {
        if is_bare {
          s.push_str(&concat_string!(require_path, ";\n"));
        } else if let Some(binding) = ctx.chunk_binding_name(*dep) {
          s.push_str(&concat_string!(keyword, " ", binding, " = ", require_path, ";\n"));
        }
      }
      ChunkDependency::External(external_idx) => {
        let Some(binding) = ctx.external_binding_name(*dep) else { continue };
        let side_effects_only = is_bare
          && ctx.link_output.module_table[*external_idx]
            .as_external()
            .is_some_and(|external| external.side_effects);
        if side_effects_only {
          s.push_str(&concat_string!(require_path, ";\n"));
          continue;
        }
        if is_bare {
          continue;
        }
        s.push_str(&concat_string!(keyword, " ", binding, " = ", require_path, ";\n"));
        if let Some(interop_binding) =
          ctx.chunk.render.interop_default_binding_names.get(external_idx)
        {
          s.push_str(&concat_string!(
            keyword,
            " ",
            interop_binding,
            " = /*#__PURE__*/_interopDefault(",
            binding,
            ");\n"
          ));
        }
      }
    }
  }

  s
}

fn render_cjs_exports(ctx: &FinalizerContext<'_>) -> Option<String> {
  if ctx.chunk.export_mode == ExportMode::Default {
    let declaration = ctx.chunk.render.rendered_exports.first()?;
    return Some(concat_string!("module.exports = ", declaration.local, ";"));
  }
  render_exports_for_exports_object(ctx)
}
