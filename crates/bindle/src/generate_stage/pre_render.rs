use arcstr::ArcStr;
use bindle_common::{
  ChunkDependency, ChunkIdx, DynamicImportMode, ExportMode, ImportKind, Module, ModuleId,
  ModuleIdx, ModuleRenderContext, NormalModule, RenderedModule, SymbolKind,
  MISSING_EXPORT_SHIM_NAME,
};
use bindle_error::{BuildDiagnostic, BuildResult};
use bindle_utils::{concat_string, indexmap::FxIndexSet};
use rustc_hash::FxHashMap;
use string_wizard::MagicString;

use crate::{
  graph::ChunkGraph,
  utils::chunk::{
    chunk_dependency_declarations::compute_chunk_declarations,
    deconflict_chunk_symbols::deconflict_chunk_symbols,
    render_module_namespace::render_module_namespace_block,
  },
};

use super::GenerateStage;

impl GenerateStage<'_> {
  /// Concatenate every chunk's module sources into editable buffers, resolve
  /// identifier render names, and compute the renderable dependency/export
  /// records. Filenames do not exist yet; anything path-shaped stays a
  /// placeholder.
  pub fn pre_render_chunks(&mut self, chunk_graph: &mut ChunkGraph) -> BuildResult<()> {
    self.hoist_transitive_imports(chunk_graph);
    self.sort_chunk_dependencies(chunk_graph);
    self.prepare_dynamic_imports(chunk_graph);
    self.set_external_render_paths();

    let chunk_names: FxHashMap<ChunkIdx, ArcStr> = chunk_graph
      .chunk_table
      .iter_enumerated()
      .map(|(idx, chunk)| (idx, chunk.name.clone().unwrap_or_else(|| ArcStr::from("chunk"))))
      .collect();

    for chunk_idx in chunk_graph.sorted_chunk_idx_vec.clone() {
      self.pre_render_chunk(chunk_graph, chunk_idx, &chunk_names);
    }

    // Dependency declarations read export aliases across chunk boundaries, so
    // they run only after every chunk settled its names.
    for chunk_idx in chunk_graph.sorted_chunk_idx_vec.clone() {
      let declarations =
        compute_chunk_declarations(chunk_idx, chunk_graph, self.link_output, self.options, &mut self.warnings);
      let chunk = &mut chunk_graph.chunk_table[chunk_idx];
      chunk.render.rendered_dependencies = declarations.dependencies;
      chunk.render.rendered_exports = declarations.exports;
    }

    Ok(())
  }

  /// Roll the transitive dependency closure of every facade-bearing chunk
  /// into its direct dependencies, so entry points do not chain-await
  /// sub-chunks at runtime. Circularity is impossible by construction.
  fn hoist_transitive_imports(&mut self, chunk_graph: &mut ChunkGraph) {
    if !self.options.hoist_transitive_imports || self.options.preserve_modules {
      return;
    }

    let snapshots: Vec<Vec<ChunkDependency>> = chunk_graph
      .chunk_table
      .iter()
      .map(|chunk| chunk.dependencies.iter().copied().collect())
      .collect();

    for chunk_idx in chunk_graph.chunk_table.indices().collect::<Vec<_>>() {
      if chunk_graph.chunk_table[chunk_idx].facade_module.is_none() {
        continue;
      }

      let mut closure = FxIndexSet::default();
      let mut queue: Vec<ChunkIdx> = snapshots[chunk_idx.index()]
        .iter()
        .filter_map(ChunkDependency::as_chunk)
        .collect();
      while let Some(dep_idx) = queue.pop() {
        for dep in &snapshots[dep_idx.index()] {
          if closure.insert(*dep) {
            if let ChunkDependency::Chunk(transitive) = dep {
              queue.push(*transitive);
            }
          }
        }
      }

      let chunk = &mut chunk_graph.chunk_table[chunk_idx];
      for dep in closure {
        if dep.as_chunk() != Some(chunk_idx) {
          chunk.dependencies.insert(dep);
        }
      }
    }
  }

  fn sort_chunk_dependencies(&mut self, chunk_graph: &mut ChunkGraph) {
    let exec_order_of = |dep: &ChunkDependency, chunk_graph: &ChunkGraph| match dep {
      ChunkDependency::Chunk(idx) => chunk_graph.chunk_table[*idx].exec_order,
      ChunkDependency::External(idx) => self.link_output.module_table[*idx].exec_order(),
    };

    for chunk_idx in chunk_graph.chunk_table.indices().collect::<Vec<_>>() {
      let mut deps: Vec<ChunkDependency> =
        chunk_graph.chunk_table[chunk_idx].dependencies.iter().copied().collect();
      deps.sort_by_key(|dep| exec_order_of(dep, chunk_graph));
      chunk_graph.chunk_table[chunk_idx].dependencies = deps.into_iter().collect();

      let mut dynamic_deps: Vec<ChunkDependency> =
        chunk_graph.chunk_table[chunk_idx].dynamic_dependencies.iter().copied().collect();
      dynamic_deps.sort_by_key(|dep| exec_order_of(dep, chunk_graph));
      chunk_graph.chunk_table[chunk_idx].dynamic_dependencies = dynamic_deps.into_iter().collect();
    }
  }

  /// Decide how each dynamic import site resolves: to a namespace within its
  /// own chunk, to another chunk with that chunk's export mode, or to an
  /// external/unresolved target that passes through untouched.
  fn prepare_dynamic_imports(&mut self, chunk_graph: &mut ChunkGraph) {
    let export_modes: Vec<ExportMode> =
      chunk_graph.chunk_table.iter().map(|chunk| chunk.export_mode).collect();

    for (chunk_idx, chunk) in chunk_graph.chunk_table.iter_mut_enumerated() {
      let mut modes = FxHashMap::default();
      for module_idx in chunk.modules.iter().copied() {
        let Some(module) = self.link_output.module_table[module_idx].as_normal() else {
          continue;
        };
        if !module.is_included() {
          continue;
        }
        for (record_idx, record) in module.import_records.iter_enumerated() {
          if record.kind != ImportKind::DynamicImport {
            continue;
          }
          let mode = match record.resolved_module() {
            Some(importee_idx) => match &self.link_output.module_table[importee_idx] {
              Module::Normal(importee) => {
                if importee.chunk == Some(chunk_idx) {
                  DynamicImportMode::Named
                } else {
                  let importee_chunk =
                    importee.chunk.expect("included module must be assigned to a chunk");
                  match export_modes[importee_chunk.index()] {
                    ExportMode::None => DynamicImportMode::None,
                    ExportMode::Named => DynamicImportMode::Named,
                    ExportMode::Default => DynamicImportMode::Default,
                  }
                }
              }
              Module::External(_) => DynamicImportMode::Auto,
            },
            None => DynamicImportMode::Auto,
          };
          modes.insert((module_idx, record_idx), mode);
        }
      }
      chunk.render.dynamic_import_modes = modes;
    }
  }

  fn set_external_render_paths(&mut self) {
    let input_base = self.input_base.clone();
    for module in self.link_output.module_table.iter_mut() {
      if let Module::External(external) = module {
        external.set_render_path(&input_base);
      }
    }
  }

  fn pre_render_chunk(
    &mut self,
    chunk_graph: &mut ChunkGraph,
    chunk_idx: ChunkIdx,
    chunk_names: &FxHashMap<ChunkIdx, ArcStr>,
  ) {
    let symbol_db = &self.link_output.symbol_db;

    // Identifier render resolutions: exports backed by a shim binding force
    // the shim declaration into the bundle.
    let chunk = &chunk_graph.chunk_table[chunk_idx];
    let needs_exports_shim = chunk.exports_by_name.values().any(|symbol| {
      symbol_db.get(symbol_db.canonical_ref_for(*symbol)).kind == SymbolKind::ExportShim
    });
    let accessed_globals: FxIndexSet<_> = chunk
      .modules
      .iter()
      .filter_map(|idx| self.link_output.module_table[*idx].as_normal())
      .flat_map(|module| module.accessed_globals.iter().cloned())
      .collect();

    {
      let chunk = &mut chunk_graph.chunk_table[chunk_idx];
      chunk.needs_exports_shim = needs_exports_shim;
      chunk.render.accessed_globals = accessed_globals;
    }

    deconflict_chunk_symbols(chunk_graph, chunk_idx, self.link_output, self.options, chunk_names);

    // Module concatenation.
    let chunk = &chunk_graph.chunk_table[chunk_idx];
    let render_ctx =
      ModuleRenderContext { symbol_db, canonical_names: &chunk.canonical_names };

    let mut rendered_sources: Vec<(ModuleIdx, ModuleId, MagicString<'static>, u32)> = Vec::new();
    let mut hoisted_namespace_blocks = Vec::new();

    for module_idx in chunk.modules.iter().copied() {
      let Some(module) = self.link_output.module_table[module_idx].as_normal() else {
        continue;
      };
      if !module.is_included() {
        continue;
      }

      let mut source = module.render(&render_ctx);
      if self.options.compact && last_line_contains_comment(module) {
        // A trailing line comment would swallow the next module in compact
        // output.
        source.append("\n");
      }

      if symbol_db.get(module.namespace_object_ref).included {
        let block =
          render_module_namespace_block(module, symbol_db, &chunk.canonical_names, self.options);
        if module.namespace_hoisted {
          hoisted_namespace_blocks.push(block);
        } else {
          source.append(concat_string!("\n", block));
        }
      }

      rendered_sources.push((module_idx, module.id.clone(), source, module.exec_order));
    }

    let separator = if self.options.compact { "" } else { "\n\n" };
    let mut snapshot_parts: Vec<String> = Vec::new();
    if needs_exports_shim {
      snapshot_parts.push(exports_shim_declaration(self.options.declaration_keyword()));
    }
    snapshot_parts.extend(hoisted_namespace_blocks.iter().cloned());
    snapshot_parts.extend(rendered_sources.iter().map(|(_, _, source, _)| source.to_string()));
    let mut snapshot = snapshot_parts.join(separator);
    if !self.options.compact {
      snapshot = snapshot.trim().to_string();
    }

    let chunk = &mut chunk_graph.chunk_table[chunk_idx];
    if chunk.is_empty && chunk.exports_by_name.is_empty() && chunk.dependencies.is_empty() {
      let name = chunk.name.clone().unwrap_or_else(|| ArcStr::from("chunk"));
      self.warnings.push(BuildDiagnostic::empty_bundle(&name));
    }

    chunk.render.hoisted_namespace_blocks = hoisted_namespace_blocks;
    chunk.render.used_modules =
      rendered_sources.iter().map(|(module_idx, ..)| *module_idx).collect();
    chunk.render.rendered_modules = rendered_sources
      .iter()
      .map(|(module_idx, id, source, exec_order)| {
        let original_length = self.link_output.module_table[*module_idx]
          .as_normal()
          .map_or(0, |module| module.source.len() as u32);
        (
          id.clone(),
          RenderedModule {
            rendered_length: source.len() as u32,
            original_length,
            exec_order: *exec_order,
          },
        )
      })
      .collect();
    chunk.render.rendered_module_sources =
      rendered_sources.into_iter().map(|(module_idx, _, source, _)| (module_idx, source)).collect();
    chunk.render.rendered_source_text = Some(snapshot);
    chunk.render.rendered_hash = None;
  }
}

pub(super) fn exports_shim_declaration(keyword: &str) -> String {
  concat_string!(keyword, " ", MISSING_EXPORT_SHIM_NAME, " = void 0;")
}

fn last_line_contains_comment(module: &NormalModule) -> bool {
  module.source.lines().last().is_some_and(|line| line.contains("//"))
}
