use bindle_common::{
  ChunkDependency, ChunkIdx, ImportKind, Module, SymbolKind, SymbolRef,
};

use crate::graph::ChunkGraph;

use super::GenerateStage;

impl GenerateStage<'_> {
  /// The `link` phase: union module dependencies that cross chunk boundaries
  /// into chunk dependencies, then wire the cross-chunk import/export sets so
  /// every symbol referenced by rendered code resolves through them.
  pub fn compute_cross_chunk_links(&mut self, chunk_graph: &mut ChunkGraph) {
    self.collect_chunk_dependency_edges(chunk_graph);
    self.set_up_chunk_imports_and_exports(chunk_graph);
  }

  fn collect_chunk_dependency_edges(&mut self, chunk_graph: &mut ChunkGraph) {
    let mut namespaces_to_include: Vec<SymbolRef> = Vec::new();

    for (chunk_idx, chunk) in chunk_graph.chunk_table.iter_mut_enumerated() {
      for module_idx in chunk.modules.iter().copied() {
        let Some(module) = self.link_output.module_table[module_idx].as_normal() else {
          continue;
        };
        if !module.is_included() {
          continue;
        }

        for record in module.import_records.iter() {
          // Unresolved specifiers pass through to the output untouched.
          let Some(importee_idx) = record.resolved_module() else { continue };

          match &self.link_output.module_table[importee_idx] {
            Module::Normal(importee) => {
              if !importee.is_included() {
                continue;
              }
              let importee_chunk =
                importee.chunk.expect("included module must be assigned to a chunk");
              match record.kind {
                ImportKind::Import => {
                  if importee_chunk != chunk_idx {
                    chunk.dependencies.insert(ChunkDependency::Chunk(importee_chunk));
                  }
                }
                ImportKind::DynamicImport => {
                  if importee_chunk == chunk_idx {
                    // The target executes in the same scope, so its namespace
                    // object is the value the import resolves to.
                    namespaces_to_include.push(importee.namespace_object_ref);
                  } else {
                    chunk.dynamic_dependencies.insert(ChunkDependency::Chunk(importee_chunk));
                  }
                }
              }
            }
            Module::External(external) => match record.kind {
              ImportKind::Import => {
                chunk.dependencies.insert(ChunkDependency::External(external.idx));
              }
              ImportKind::DynamicImport => {
                chunk.dynamic_dependencies.insert(ChunkDependency::External(external.idx));
              }
            },
          }
        }
      }
    }

    for namespace_ref in namespaces_to_include {
      self.link_output.symbol_db.get_mut(namespace_ref).included = true;
    }
  }

  fn set_up_chunk_imports_and_exports(&mut self, chunk_graph: &mut ChunkGraph) {
    let mut chunk_imports: Vec<(ChunkIdx, SymbolRef)> = Vec::new();
    let mut chunk_exports: Vec<(ChunkIdx, SymbolRef)> = Vec::new();
    let mut dep_edges: Vec<(ChunkIdx, ChunkDependency)> = Vec::new();

    for (chunk_idx, chunk) in chunk_graph.chunk_table.iter_enumerated() {
      for module_idx in chunk.modules.iter().copied() {
        let Some(module) = self.link_output.module_table[module_idx].as_normal() else {
          continue;
        };
        if !module.is_included() {
          continue;
        }
        let symbol_db = &self.link_output.symbol_db;

        // Imports whose origin lives in a different chunk, with synthetic
        // named exports dereferenced to their backing namespace.
        for local in module.named_imports.keys() {
          let canonical = symbol_db.canonical_ref_for(*local);
          let data = symbol_db.get(canonical);
          let target = match (&data.kind, &data.namespace_alias) {
            (SymbolKind::SyntheticNamedExport, Some(alias)) => {
              symbol_db.canonical_ref_for(alias.namespace_ref)
            }
            _ => canonical,
          };

          match &self.link_output.module_table[target.owner] {
            Module::Normal(origin) => {
              if self.options.preserve_modules
                && symbol_db.get(target).kind == SymbolKind::Namespace
              {
                continue;
              }
              let origin_chunk = origin.chunk.expect("origin module must be assigned to a chunk");
              if origin_chunk != chunk_idx {
                chunk_imports.push((chunk_idx, target));
                chunk_exports.push((origin_chunk, target));
              }
            }
            Module::External(_) => {
              chunk_imports.push((chunk_idx, target));
            }
          }
        }

        // Modules that must expose their signature register every export on
        // the chunk, whether it originates here or gets reexported.
        let must_expose = (module.is_entry_point
          && !self.module_preserve_signature(module).is_disabled())
          || chunk_graph.dynamically_imported_from_outside.contains(&module_idx);
        if must_expose {
          for symbol in module.named_exports.values() {
            let canonical = symbol_db.canonical_ref_for(*symbol);
            chunk_exports.push((chunk_idx, canonical));

            let data = symbol_db.get(canonical);
            if let (SymbolKind::SyntheticNamedExport, Some(alias)) =
              (&data.kind, &data.namespace_alias)
            {
              let ns = symbol_db.canonical_ref_for(alias.namespace_ref);
              chunk_imports.push((chunk_idx, ns));
              if let Module::Normal(origin) = &self.link_output.module_table[ns.owner] {
                if origin.chunk != Some(chunk_idx) {
                  let origin_chunk = origin.chunk.expect("origin must be assigned to a chunk");
                  chunk_exports.push((origin_chunk, ns));
                  dep_edges.push((chunk_idx, ChunkDependency::Chunk(origin_chunk)));
                }
              }
            }

            // Reexports still need an edge to their origin so the renderer
            // can emit the reexport statement against a real dependency.
            match &self.link_output.module_table[canonical.owner] {
              Module::Normal(origin) => {
                let origin_chunk = origin.chunk.expect("origin must be assigned to a chunk");
                if origin_chunk != chunk_idx {
                  chunk_exports.push((origin_chunk, canonical));
                  dep_edges.push((chunk_idx, ChunkDependency::Chunk(origin_chunk)));
                }
              }
              Module::External(external) => {
                dep_edges.push((chunk_idx, ChunkDependency::External(external.idx)));
              }
            }
          }
        }

        // A live namespace object closes over every export of its module;
        // members owned by other chunks must flow through the import sets.
        if symbol_db.get(module.namespace_object_ref).included {
          for (name, symbol) in &module.named_exports {
            if name.starts_with('*') {
              continue;
            }
            let canonical = symbol_db.canonical_ref_for(*symbol);
            if let Module::Normal(origin) = &self.link_output.module_table[canonical.owner] {
              let origin_chunk = origin.chunk.expect("origin must be assigned to a chunk");
              if origin_chunk != chunk_idx {
                chunk_imports.push((chunk_idx, canonical));
                chunk_exports.push((origin_chunk, canonical));
                dep_edges.push((chunk_idx, ChunkDependency::Chunk(origin_chunk)));
              }
            }
          }
        }
      }
    }

    for (chunk_idx, symbol) in chunk_imports {
      chunk_graph.chunk_table[chunk_idx].imports.insert(symbol);
    }
    for (chunk_idx, symbol) in chunk_exports {
      chunk_graph.chunk_table[chunk_idx].exports.insert(symbol);
    }
    for (chunk_idx, dep) in dep_edges {
      let chunk = &mut chunk_graph.chunk_table[chunk_idx];
      // A chunk never depends on itself.
      if dep.as_chunk() != Some(chunk_idx) {
        chunk.dependencies.insert(dep);
      }
    }
  }
}
