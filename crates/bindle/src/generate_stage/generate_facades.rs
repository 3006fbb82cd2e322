use arcstr::ArcStr;
use bindle_common::{Chunk, ChunkDependency, ChunkIdx, ModuleIdx, NormalModule};
use bindle_error::{BuildDiagnostic, BuildResult};
use bindle_utils::ecmascript::legitimize_identifier_name;

use crate::graph::ChunkGraph;

use super::GenerateStage;

struct FacadePlan {
  code_chunk: ChunkIdx,
  module: ModuleIdx,
  name: Option<ArcStr>,
  file_name: Option<ArcStr>,
}

impl GenerateStage<'_> {
  /// Give every entry module the output files its configuration asks for: the
  /// code chunk itself when it can host the signature, signature-preserving
  /// facade chunks otherwise.
  pub fn generate_facades(&mut self, chunk_graph: &mut ChunkGraph) -> BuildResult<()> {
    // Per-module output keeps a one-to-one module/file mapping; every chunk
    // simply fronts its own entry module.
    if self.options.preserve_modules {
      for chunk_idx in chunk_graph.chunk_table.indices().collect::<Vec<_>>() {
        let entry = chunk_graph.chunk_table[chunk_idx].entry_modules.first().copied();
        if let Some(entry_idx) = entry {
          chunk_graph.chunk_table[chunk_idx].facade_module = Some(entry_idx);
          if let Some(module) = self.link_output.module_table[entry_idx].as_normal_mut() {
            module.facade_chunk = Some(chunk_idx);
          }
          self.generate_exports_for_chunk(chunk_graph, chunk_idx)?;
        }
      }
      return Ok(());
    }

    let mut plans: Vec<FacadePlan> = Vec::new();
    let mut elected: Vec<(ChunkIdx, ModuleIdx, Option<ArcStr>, Option<ArcStr>)> = Vec::new();

    for (chunk_idx, chunk) in chunk_graph.chunk_table.iter_enumerated() {
      let mut facade_module = chunk.facade_module;
      for entry_idx in chunk.entry_modules.iter().copied() {
        let module = self.link_output.module_table[entry_idx]
          .as_normal()
          .expect("entry module must be a normal module");

        let mut required: Vec<(Option<ArcStr>, Option<ArcStr>)> = Vec::new();
        for name in &module.user_chunk_names {
          required.push((Some(name.clone()), None));
        }
        if module.is_user_defined_entry && module.user_chunk_names.is_empty() {
          required.push((None, None));
        }
        for file_name in &module.chunk_filenames {
          required.push((None, Some(file_name.clone())));
        }
        if required.is_empty() {
          required.push((None, None));
        }

        let mut required = required.into_iter();
        if facade_module.is_none() {
          if self.can_module_be_facade(chunk, module) {
            let (name, file_name) = required.next().expect("at least one facade is required");
            facade_module = Some(entry_idx);
            elected.push((chunk_idx, entry_idx, name, file_name));
          } else if module.is_user_defined_entry
            && !self.module_preserve_signature(module).is_disabled()
          {
            self.warnings.push(BuildDiagnostic::empty_facade(&module.id));
          }
        }

        for (name, file_name) in required {
          plans.push(FacadePlan { code_chunk: chunk_idx, module: entry_idx, name, file_name });
        }
      }
    }

    let mut chunks_to_regenerate = Vec::new();

    for (chunk_idx, entry_idx, name, file_name) in elected {
      let chunk = &mut chunk_graph.chunk_table[chunk_idx];
      chunk.facade_module = Some(entry_idx);
      if chunk.name.is_none() {
        chunk.name = name;
      }
      if chunk.file_name.is_none() {
        chunk.file_name = file_name;
      }
      if let Some(module) = self.link_output.module_table[entry_idx].as_normal_mut() {
        module.facade_chunk = Some(chunk_idx);
      }
      chunks_to_regenerate.push(chunk_idx);
    }

    for plan in plans {
      let module = self.link_output.module_table[plan.module]
        .as_normal()
        .expect("facade target must be a normal module");
      let mut facade = Chunk::new(Vec::new());
      facade.facade_module = Some(plan.module);
      facade.entry_modules = vec![plan.module];
      facade.name = plan.name;
      facade.file_name = plan.file_name;
      facade.exec_order = chunk_graph.chunk_table[plan.code_chunk].exec_order;
      facade.variable_name = legitimize_identifier_name(&module.repr_name);
      facade.dependencies.insert(ChunkDependency::Chunk(plan.code_chunk));

      let facade_idx = chunk_graph.add_chunk(facade);
      if let Some(module) = self.link_output.module_table[plan.module].as_normal_mut() {
        if module.facade_chunk.is_none() {
          module.facade_chunk = Some(facade_idx);
        }
      }
      chunks_to_regenerate.push(facade_idx);
    }

    for chunk_idx in chunks_to_regenerate {
      self.generate_exports_for_chunk(chunk_graph, chunk_idx)?;
    }

    Ok(())
  }

  /// A module can lend its chunk its public signature iff every binding the
  /// chunk exposes appears in the module's own export-name map.
  pub fn can_module_be_facade(&self, chunk: &Chunk, module: &NormalModule) -> bool {
    let symbol_db = &self.link_output.symbol_db;
    let module_exports = module
      .named_exports
      .values()
      .map(|symbol| symbol_db.canonical_ref_for(*symbol))
      .collect::<rustc_hash::FxHashSet<_>>();

    chunk
      .exports
      .iter()
      .map(|symbol| symbol_db.canonical_ref_for(*symbol))
      .all(|exposed| module_exports.contains(&exposed))
  }
}
