use bindle_sourcemap::SourceJoiner;
use bindle_utils::concat_string;

use crate::utils::chunk::namespace_marker::render_namespace_markers;

use super::{
  binding_name_for_dep, interop_default_helper, interop_namespace_helper,
  render_exports_for_exports_object, render_reexports_for_exports_object, BodySource,
  FinalizerContext,
};

pub fn render_amd(ctx: &FinalizerContext<'_>, body: Vec<BodySource>) -> SourceJoiner<'static> {
  let mut source_joiner = SourceJoiner::with_separator(ctx.separator());

  let mut dep_ids = Vec::new();
  let mut params = Vec::new();
  if ctx.has_exports && ctx.named_exports_mode {
    dep_ids.push("'exports'".to_string());
    params.push("exports".to_string());
  }
  for (dep, declaration) in &ctx.chunk.render.rendered_dependencies {
    dep_ids.push(concat_string!("'", ctx.dependency_id(declaration), "'"));
    params.push(binding_name_for_dep(ctx, *dep).unwrap_or_else(|| "_unused".to_string()));
  }

  let amd_id = ctx
    .options
    .amd_id
    .as_ref()
    .map_or_else(String::new, |id| concat_string!("'", id, "', "));

  source_joiner.append_source(concat_string!(
    "define(",
    amd_id,
    "[",
    dep_ids.join(", "),
    "], (function (",
    params.join(", "),
    ") { 'use strict';"
  ));

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
    for (external_idx, interop_binding) in &ctx.chunk.render.interop_default_binding_names {
      if let Some(binding) =
        ctx.external_binding_name(bindle_common::ChunkDependency::External(*external_idx))
      {
        source_joiner.append_source(concat_string!(
          ctx.options.declaration_keyword(),
          " ",
          interop_binding,
          " = /*#__PURE__*/_interopDefault(",
          binding,
          ");"
        ));
      }
    }
  }
  if ctx.chunk.render.needs_interop_namespace {
    source_joiner.append_source(interop_namespace_helper());
  }

  let reexports = render_reexports_for_exports_object(ctx);
  if !reexports.is_empty() {
    source_joiner.append_source(reexports);
  }

  for source in body {
    source_joiner.append_source(source);
  }

  if let Some(exports) = render_amd_exports(ctx) {
    source_joiner.append_source(exports);
  }

  if let Some(outro) = &ctx.addons.outro {
    source_joiner.append_source(outro.clone());
  }

  source_joiner.append_source("}));".to_string());

  source_joiner
}

fn render_amd_exports(ctx: &FinalizerContext<'_>) -> Option<String> {
  if ctx.chunk.export_mode == bindle_common::ExportMode::Default {
    let declaration = ctx.chunk.render.rendered_exports.first()?;
    return Some(concat_string!("return ", declaration.local, ";"));
  }
  render_exports_for_exports_object(ctx)
}
