use arcstr::ArcStr;
use bindle_common::{ImportKind, Module, PreserveEntrySignatures};
use bindle_utils::{ecmascript::legitimize_identifier_name, path_ext::PathExt};
use sugar_path::SugarPath;

use crate::graph::ChunkGraph;

use super::GenerateStage;

impl GenerateStage<'_> {
  /// Finish chunk construction: back-link modules, compute execution order
  /// and emptiness, find entry modules and derive each chunk's variable name.
  pub fn initialize_chunks(&mut self, chunk_graph: &mut ChunkGraph) {
    // Back-link first so cross-chunk queries below can resolve owners.
    for (chunk_idx, chunk) in chunk_graph.chunk_table.iter_enumerated() {
      for module_idx in &chunk.modules {
        chunk_graph.module_to_chunk[*module_idx] = Some(chunk_idx);
        if let Some(module) = self.link_output.module_table[*module_idx].as_normal_mut() {
          module.chunk = Some(chunk_idx);
        }
      }
    }

    // A module is dynamically imported "from outside" when at least one
    // dynamic import of it originates in a different chunk.
    for module in self.link_output.module_table.iter() {
      let Module::Normal(module) = module else { continue };
      if !module.is_included() {
        continue;
      }
      for record in module.import_records.iter() {
        if record.kind != ImportKind::DynamicImport {
          continue;
        }
        let Some(importee_idx) = record.resolved_module() else { continue };
        let Some(importee) = self.link_output.module_table[importee_idx].as_normal() else {
          continue;
        };
        if !importee.is_included() {
          continue;
        }
        if module.chunk != importee.chunk {
          chunk_graph.dynamically_imported_from_outside.insert(importee_idx);
        }
      }
    }

    for (chunk_idx, chunk) in chunk_graph.chunk_table.iter_mut_enumerated() {
      let modules = &self.link_output.module_table;

      chunk.exec_order = chunk
        .modules
        .first()
        .map_or(u32::MAX, |first| modules[*first].exec_order());

      chunk.is_empty = !chunk
        .modules
        .iter()
        .any(|idx| modules[*idx].as_normal().is_some_and(|module| module.is_included()));

      chunk.manual_chunk_alias = chunk.modules.iter().find_map(|idx| {
        modules[*idx].as_normal().and_then(|module| module.manual_chunk_alias.clone())
      });

      chunk.entry_modules = chunk
        .modules
        .iter()
        .copied()
        .filter(|idx| {
          modules[*idx].as_normal().is_some_and(|module| {
            module.is_entry_point || chunk_graph.dynamically_imported_from_outside.contains(idx)
          })
        })
        .collect();

      for entry_idx in &chunk.entry_modules {
        chunk_graph.entry_module_to_entry_chunk.insert(*entry_idx, chunk_idx);
      }

      let name_source = chunk.entry_modules.first().or(chunk.modules.last()).copied();
      if let Some(module) = name_source.and_then(|idx| modules[idx].as_normal()) {
        let base: ArcStr = module
          .user_chunk_names
          .first()
          .cloned()
          .or_else(|| module.manual_chunk_alias.clone())
          .or_else(|| chunk.manual_chunk_alias.clone())
          .unwrap_or_else(|| {
            ArcStr::from(module.id.as_path().representative_file_name().into_owned())
          });
        chunk.variable_name = legitimize_identifier_name(&base);
      } else {
        chunk.variable_name = "chunk".to_string();
      }
    }
  }

  pub(super) fn module_preserve_signature(
    &self,
    module: &bindle_common::NormalModule,
  ) -> PreserveEntrySignatures {
    module.preserve_signature.unwrap_or(self.options.preserve_entry_signatures)
  }
}
