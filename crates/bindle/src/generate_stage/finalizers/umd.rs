use bindle_common::ExportMode;
use bindle_error::BuildResult;
use bindle_sourcemap::SourceJoiner;
use bindle_utils::{concat_string, ecmascript::property_access_str};

use crate::utils::chunk::namespace_marker::render_namespace_markers;

use super::{
  binding_name_for_dep, interop_default_helper, interop_namespace_helper,
  render_exports_for_exports_object, render_reexports_for_exports_object, BodySource,
  FinalizerContext,
};

/// The universal wrapper probes CommonJS, then AMD, then falls back to
/// attaching the bundle to the global object.
pub fn render_umd(
  ctx: &FinalizerContext<'_>,
  body: Vec<BodySource>,
) -> BuildResult<SourceJoiner<'static>> {
  let mut source_joiner = SourceJoiner::with_separator(ctx.separator());

  let named_exports = ctx.has_exports && ctx.named_exports_mode;

  let mut params = Vec::new();
  let mut cjs_args = Vec::new();
  let mut amd_args = Vec::new();
  let mut global_args = Vec::new();
  if named_exports {
    params.push("exports".to_string());
    cjs_args.push("exports".to_string());
    amd_args.push("'exports'".to_string());
  }
  for (dep, declaration) in &ctx.chunk.render.rendered_dependencies {
    let Some(binding) = binding_name_for_dep(ctx, *dep) else { continue };
    let id = ctx.dependency_id(declaration);
    cjs_args.push(concat_string!("require('", id, "')"));
    amd_args.push(concat_string!("'", id, "'"));
    let global = declaration
      .global_name
      .as_ref()
      .map_or_else(|| binding.clone(), ToString::to_string);
    global_args.push(property_access_str("global", &global));
    params.push(binding);
  }

  let name = ctx.options.name.clone().unwrap_or_else(|| ctx.chunk.variable_name.clone());
  if name.is_empty() && ctx.has_exports {
    Err(anyhow::anyhow!(
      "You must supply \"output.name\" for UMD bundles that have exports."
    ))?;
  }

  let global_factory_args = if named_exports {
    let mut args = vec![concat_string!(property_access_str("global", &name), " = {}")];
    args.extend(global_args);
    args.join(", ")
  } else {
    global_args.join(", ")
  };

  let cjs_call = concat_string!("factory(", cjs_args.join(", "), ")");
  let cjs_branch = if ctx.chunk.export_mode == ExportMode::Default && ctx.has_exports {
    concat_string!("module.exports = ", cjs_call)
  } else {
    cjs_call
  };
  let global_call = if ctx.chunk.export_mode == ExportMode::Default && ctx.has_exports {
    concat_string!(property_access_str("global", &name), " = factory(", global_factory_args, ")")
  } else {
    concat_string!("factory(", global_factory_args, ")")
  };

  source_joiner.append_source(concat_string!(
    "(function (global, factory) {\n",
    "\ttypeof exports === 'object' && typeof module !== 'undefined' ? ",
    cjs_branch,
    " :\n",
    "\ttypeof define === 'function' && define.amd ? define([",
    amd_args.join(", "),
    "], factory) :\n",
    "\t(global = typeof globalThis !== 'undefined' ? globalThis : global || self, ",
    global_call,
    ");\n",
    "})(this, (function (",
    params.join(", "),
    ") { 'use strict';"
  ));

  if ctx.is_entry_module_facade && named_exports {
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
    }
    ExportMode::None => {}
  }

  if let Some(outro) = &ctx.addons.outro {
    source_joiner.append_source(outro.clone());
  }

  source_joiner.append_source("}));".to_string());

  Ok(source_joiner)
}
