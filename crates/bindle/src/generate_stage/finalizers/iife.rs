use bindle_common::ExportMode;
use bindle_error::BuildResult;
use bindle_sourcemap::SourceJoiner;
use bindle_utils::concat_string;

use super::{
  binding_name_for_dep, interop_default_helper, interop_namespace_helper,
  render_exports_for_exports_object, render_reexports_for_exports_object, BodySource,
  FinalizerContext,
};

pub fn render_iife(
  ctx: &FinalizerContext<'_>,
  body: Vec<BodySource>,
) -> BuildResult<SourceJoiner<'static>> {
  let mut source_joiner = SourceJoiner::with_separator(ctx.separator());

  let named_exports = ctx.has_exports && ctx.named_exports_mode;
  let mut params = Vec::new();
  let mut args = Vec::new();
  if named_exports {
    params.push("exports".to_string());
    args.push("{}".to_string());
  }
  for (dep, declaration) in &ctx.chunk.render.rendered_dependencies {
    let Some(binding) = binding_name_for_dep(ctx, *dep) else { continue };
    let global = declaration
      .global_name
      .as_ref()
      .map_or_else(|| binding.clone(), ToString::to_string);
    params.push(binding);
    args.push(global);
  }

  let name = ctx.options.name.clone().unwrap_or_else(|| ctx.chunk.variable_name.clone());
  if name.is_empty() && ctx.has_exports {
    Err(anyhow::anyhow!(
      "You must supply \"output.name\" for IIFE bundles that have exports."
    ))?;
  }

  let assignment =
    if ctx.has_exports { concat_string!("var ", name, " = ") } else { String::new() };

  source_joiner.append_source(concat_string!(
    assignment,
    "(function (",
    params.join(", "),
    ") { 'use strict';"
  ));

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

  if named_exports {
    let reexports = render_reexports_for_exports_object(ctx);
    if !reexports.is_empty() {
      source_joiner.append_source(reexports);
    }
  }

  for source in body {
    source_joiner.append_source(source);
  }

  match ctx.chunk.export_mode {
    ExportMode::Default => {
      if let Some(declaration) = ctx.chunk.render.rendered_exports.first() {
        source_joiner.append_source(concat_string!("return ", declaration.local, ";"));
      }
    }
    ExportMode::Named => {
      if let Some(exports) = render_exports_for_exports_object(ctx) {
        source_joiner.append_source(exports);
      }
      if ctx.has_exports {
        source_joiner.append_source("return exports;".to_string());
      }
    }
    ExportMode::None => {}
  }

  if let Some(outro) = &ctx.addons.outro {
    source_joiner.append_source(outro.clone());
  }

  source_joiner.append_source(concat_string!("})(", args.join(", "), ");"));

  Ok(source_joiner)
}
