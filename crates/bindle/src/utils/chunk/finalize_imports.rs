use bindle_common::{
  ChunkDependency, ChunkIdx, DynamicImportMode, ExportMode, ImportKind, Module, ModuleIdx,
  OutputFormat, Span,
};
use bindle_utils::{concat_string, option_ext::OptionExt};

use crate::{graph::ChunkGraph, types::link_output::LinkOutput, utils::chunk::render_paths::get_import_path};

/// Fill every rendered dependency's `id` with the final relative path and
/// refresh `named_exports_mode` from the dependency chunk's live export mode.
pub fn fill_dependency_ids(
  chunk_graph: &mut ChunkGraph,
  chunk_idx: ChunkIdx,
  link_output: &LinkOutput,
  strip_js_extension: bool,
) {
  let importer_id = chunk_graph.chunk_table[chunk_idx].id.clone().unpack();

  let mut rendered_dependencies =
    std::mem::take(&mut chunk_graph.chunk_table[chunk_idx].render.rendered_dependencies);

  for (dep, declaration) in rendered_dependencies.iter_mut() {
    match dep {
      ChunkDependency::Chunk(dep_idx) => {
        let dep_chunk = &chunk_graph.chunk_table[*dep_idx];
        let dep_id = dep_chunk.id.as_deref().unpack();
        declaration.id = Some(get_import_path(&importer_id, dep_id, strip_js_extension));
        declaration.named_exports_mode = dep_chunk.export_mode != ExportMode::Default;
      }
      ChunkDependency::External(external_idx) => {
        let external =
          link_output.module_table[*external_idx].as_external().expect("dependency must be external");
        declaration.id = Some(external.render_path().to_string());
      }
    }
  }

  chunk_graph.chunk_table[chunk_idx].render.rendered_dependencies = rendered_dependencies;
}

struct SourceEdit {
  module_idx: ModuleIdx,
  span: Span,
  content: String,
}

/// Rewrite every dynamic-import site in the chunk's rendered sources to the
/// target's final path, lowered to the output format's loading primitive.
/// Unresolved arguments pass through untouched.
pub fn finalise_dynamic_imports(
  chunk_graph: &mut ChunkGraph,
  chunk_idx: ChunkIdx,
  link_output: &LinkOutput,
  options: &bindle_common::NormalizedOutputOptions,
) {
  let format = options.format;
  let strip_js_extension = format.strips_js_extension();
  let importer_id = chunk_graph.chunk_table[chunk_idx].id.clone().unpack();
  let chunk = &chunk_graph.chunk_table[chunk_idx];
  let symbol_db = &link_output.symbol_db;

  let mut edits: Vec<SourceEdit> = Vec::new();
  let mut needs_interop_namespace = false;

  for module_idx in chunk.modules.iter().copied() {
    let Some(module) = link_output.module_table[module_idx].as_normal() else { continue };
    if !module.is_included() {
      continue;
    }

    for (record_idx, record) in module.import_records.iter_enumerated() {
      if record.kind != ImportKind::DynamicImport {
        continue;
      }
      let (Some(expr_span), Some(argument_span)) = (record.import_expr_span, record.argument_span)
      else {
        continue;
      };
      let mode = chunk
        .render
        .dynamic_import_modes
        .get(&(module_idx, record_idx))
        .copied()
        .unwrap_or(DynamicImportMode::Auto);

      match record.resolved_module() {
        Some(importee_idx) => match &link_output.module_table[importee_idx] {
          Module::Normal(importee) if importee.chunk == Some(chunk_idx) => {
            // Resolution mode `named` against the in-chunk namespace.
            let ns_name = symbol_db
              .canonical_name_for(importee.namespace_object_ref, &chunk.canonical_names);
            edits.push(SourceEdit {
              module_idx,
              span: expr_span,
              content: concat_string!(
                "Promise.resolve().then(function () { return ",
                ns_name,
                "; })"
              ),
            });
          }
          Module::Normal(importee) => {
            let importee_chunk =
              importee.chunk.expect("included module must be assigned to a chunk");
            let dep_id = chunk_graph.chunk_table[importee_chunk].id.as_deref().unpack();
            let path = get_import_path(&importer_id, dep_id, strip_js_extension);
            // A default-mode target exposes a bare value; non-ES loaders wrap
            // it back into namespace shape.
            let wrap_interop = options.interop
              && !format.keeps_symbol_bindings()
              && mode == DynamicImportMode::Default;
            needs_interop_namespace |= wrap_interop;
            if let Some(edit) =
              lower_dynamic_import(module_idx, expr_span, &path, wrap_interop, options)
            {
              edits.push(edit);
            }
          }
          Module::External(external) => {
            let wrap_interop = options.interop
              && !format.keeps_symbol_bindings()
              && mode == DynamicImportMode::Auto;
            needs_interop_namespace |= wrap_interop
              && matches!(format, OutputFormat::Cjs | OutputFormat::Amd | OutputFormat::Umd);
            if let Some(edit) = lower_dynamic_import(
              module_idx,
              expr_span,
              external.render_path(),
              wrap_interop,
              options,
            ) {
              edits.push(edit);
            }
          }
        },
        None => {
          // Preserve the original argument; only a custom import function can
          // change the call site.
          if format.is_esm() {
            if let Some(function) = &options.dynamic_import_function {
              edits.push(SourceEdit {
                module_idx,
                span: Span::new(expr_span.start, argument_span.start),
                content: concat_string!(function, "("),
              });
            }
          }
        }
      }
    }
  }

  let chunk = &mut chunk_graph.chunk_table[chunk_idx];
  chunk.render.needs_interop_namespace |= needs_interop_namespace;
  for edit in edits {
    if let Some(source) = chunk.render.rendered_module_sources.get_mut(&edit.module_idx) {
      source.update(edit.span.start as usize, edit.span.end as usize, edit.content);
    }
  }
}

fn lower_dynamic_import(
  module_idx: ModuleIdx,
  expr_span: Span,
  path: &str,
  wrap_interop: bool,
  options: &bindle_common::NormalizedOutputOptions,
) -> Option<SourceEdit> {
  let quoted = concat_string!("'", path, "'");
  let content = match options.format {
    OutputFormat::Esm => match &options.dynamic_import_function {
      Some(function) => concat_string!(function, "(", quoted, ")"),
      None => concat_string!("import(", quoted, ")"),
    },
    OutputFormat::Cjs => {
      let required = if wrap_interop {
        concat_string!("/*#__PURE__*/_interopNamespace(require(", quoted, "))")
      } else {
        concat_string!("require(", quoted, ")")
      };
      concat_string!("Promise.resolve().then(function () { return ", required, "; })")
    }
    OutputFormat::Amd => {
      if wrap_interop {
        concat_string!(
          "new Promise(function (resolve, reject) { require([",
          quoted,
          "], function (m) { resolve(/*#__PURE__*/_interopNamespace(m)); }, reject); })"
        )
      } else {
        concat_string!(
          "new Promise(function (resolve, reject) { require([",
          quoted,
          "], resolve, reject); })"
        )
      }
    }
    OutputFormat::System => concat_string!("module.import(", quoted, ")"),
    // Single-file formats cannot load other chunks at runtime; the site is
    // left as written.
    OutputFormat::Umd | OutputFormat::Iife => return None,
  };
  Some(SourceEdit { module_idx, span: expr_span, content })
}

/// Rewrite `import.meta` occurrences to the output format's convention.
pub fn finalise_import_metas(
  chunk_graph: &mut ChunkGraph,
  chunk_idx: ChunkIdx,
  link_output: &LinkOutput,
  options: &bindle_common::NormalizedOutputOptions,
) {
  let format = options.format;
  if format.is_esm() {
    return;
  }

  let chunk = &chunk_graph.chunk_table[chunk_idx];
  let chunk_id = chunk.id.clone().unpack();
  let mut edits: Vec<SourceEdit> = Vec::new();

  for module_idx in chunk.modules.iter().copied() {
    let Some(module) = link_output.module_table[module_idx].as_normal() else { continue };
    if !module.is_included() {
      continue;
    }
    for meta_ref in &module.import_meta_refs {
      let content = match format {
        OutputFormat::System => match &meta_ref.property {
          Some(property) => concat_string!("module.meta.", property),
          None => "module.meta".to_string(),
        },
        OutputFormat::Cjs => match meta_ref.property.as_deref() {
          Some("url") => concat_string!(
            "(typeof document === 'undefined' ? new (require('url').URL)('file:' + __filename).href : (document.currentScript && document.currentScript.src || new URL('",
            chunk_id,
            "', document.baseURI).href))"
          ),
          Some(_) => "undefined".to_string(),
          None => "({})".to_string(),
        },
        OutputFormat::Amd | OutputFormat::Umd | OutputFormat::Iife => {
          match meta_ref.property.as_deref() {
            Some("url") => concat_string!(
              "(document.currentScript && document.currentScript.src || new URL('",
              chunk_id,
              "', document.baseURI).href)"
            ),
            Some(_) => "undefined".to_string(),
            None => "({})".to_string(),
          }
        }
        OutputFormat::Esm => unreachable!("es output keeps import.meta"),
      };
      edits.push(SourceEdit { module_idx, span: meta_ref.span, content });
    }
  }

  let chunk = &mut chunk_graph.chunk_table[chunk_idx];
  for edit in edits {
    if let Some(source) = chunk.render.rendered_module_sources.get_mut(&edit.module_idx) {
      source.update(edit.span.start as usize, edit.span.end as usize, edit.content);
    }
  }
}
