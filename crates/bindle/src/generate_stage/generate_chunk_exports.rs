use arcstr::ArcStr;
use bindle_common::{ChunkIdx, ExportMode, SymbolRef};
use bindle_error::BuildResult;
use bindle_utils::{
  ecmascript::{is_reserved_word, number_to_identifier},
  indexmap::FxIndexSet,
  rstr::{Rstr, ToRstr},
};

use crate::{graph::ChunkGraph, utils::chunk::determine_export_mode::determine_export_mode};

use super::GenerateStage;

impl GenerateStage<'_> {
  /// Assign an external name to every exported binding. A facade's original
  /// public names are installed first and never renamed; everything else gets
  /// mangled or readable names depending on the output options.
  pub fn generate_chunk_exports(&mut self, chunk_graph: &mut ChunkGraph) -> BuildResult<()> {
    for chunk_idx in chunk_graph.chunk_table.indices().collect::<Vec<_>>() {
      self.generate_exports_for_chunk(chunk_graph, chunk_idx)?;
    }
    Ok(())
  }

  pub(super) fn generate_exports_for_chunk(
    &mut self,
    chunk_graph: &mut ChunkGraph,
    chunk_idx: ChunkIdx,
  ) -> BuildResult<()> {
    let symbol_db = &self.link_output.symbol_db;
    let facade_module_idx = chunk_graph.chunk_table[chunk_idx].facade_module;

    let mut exports_by_name: Vec<(Rstr, SymbolRef)> = Vec::new();
    let mut remaining: FxIndexSet<SymbolRef> = chunk_graph.chunk_table[chunk_idx]
      .exports
      .iter()
      .map(|symbol| symbol_db.canonical_ref_for(*symbol))
      .collect();

    if let Some(facade_idx) = facade_module_idx {
      let facade = self.link_output.module_table[facade_idx]
        .as_normal()
        .expect("facade module must be a normal module");
      let exposes_signature = !self.module_preserve_signature(facade).is_disabled()
        || chunk_graph.dynamically_imported_from_outside.contains(&facade_idx);
      if exposes_signature {
        for (name, symbol) in &facade.named_exports {
          let canonical = symbol_db.canonical_ref_for(*symbol);
          exports_by_name.push((name.clone(), canonical));
          remaining.shift_remove(&canonical);
        }
      }
    }

    let taken =
      |list: &[(Rstr, SymbolRef)], candidate: &str| list.iter().any(|(name, _)| name == candidate);

    if self.options.should_minify_internal_exports() {
      let mut ordinal = 0u32;
      for symbol in remaining {
        let name = loop {
          let candidate = number_to_identifier(ordinal);
          ordinal += 1;
          if !is_reserved_word(&candidate) && !taken(&exports_by_name, &candidate) {
            break candidate;
          }
        };
        exports_by_name.push((Rstr::from(name), symbol));
      }
    } else {
      for symbol in remaining {
        let base = symbol.name(symbol_db).to_rstr();
        let mut candidate = base.clone();
        let mut count = 0u32;
        while taken(&exports_by_name, &candidate) {
          count += 1;
          candidate = Rstr::from(format!("{base}${count}"));
        }
        exports_by_name.push((candidate, symbol));
      }
    }

    let export_mode = match facade_module_idx {
      Some(facade_idx) => {
        let facade = self.link_output.module_table[facade_idx]
          .as_normal()
          .expect("facade module must be a normal module");
        let is_entry = facade.is_entry_point
          || chunk_graph.dynamically_imported_from_outside.contains(&facade_idx);
        if is_entry {
          let export_names = exports_by_name.iter().map(|(name, _)| name.clone()).collect::<Vec<_>>();
          let chunk_name = chunk_graph.chunk_table[chunk_idx]
            .name
            .clone()
            .unwrap_or_else(|| ArcStr::from("chunk"));
          determine_export_mode(&mut self.warnings, self.options.exports, &chunk_name, facade, &export_names)?
        } else {
          ExportMode::Named
        }
      }
      None => ExportMode::Named,
    };

    let chunk = &mut chunk_graph.chunk_table[chunk_idx];
    chunk.exports_by_name = exports_by_name.into_iter().collect();
    chunk.invalidate_sorted_export_names();
    chunk.sorted_export_names();
    chunk.export_mode = export_mode;
    Ok(())
  }
}
