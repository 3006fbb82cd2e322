use arcstr::ArcStr;
use bindle_common::{Chunk, ChunkDependency, ChunkIdx, ChunkTable, ModuleIdx, ModuleTable};
use oxc_index::{index_vec, IndexVec};
use rustc_hash::{FxHashMap, FxHashSet};

/// The chunk layout the graph layer hands to the generate stage: every
/// included module is pre-assigned to exactly one chunk, in execution order.
#[derive(Debug, Default)]
pub struct ChunkGraph {
  pub chunk_table: ChunkTable,
  pub sorted_chunk_idx_vec: Vec<ChunkIdx>,
  pub module_to_chunk: IndexVec<ModuleIdx, Option<ChunkIdx>>,
  pub entry_module_to_entry_chunk: FxHashMap<ModuleIdx, ChunkIdx>,
  /// Modules dynamically imported by at least one module outside their chunk.
  pub dynamically_imported_from_outside: FxHashSet<ModuleIdx>,
}

impl ChunkGraph {
  pub fn new(module_count: usize) -> Self {
    Self { module_to_chunk: index_vec![None; module_count], ..Self::default() }
  }

  pub fn add_chunk(&mut self, chunk: Chunk) -> ChunkIdx {
    self.chunk_table.push(chunk)
  }

  pub fn add_module_to_chunk(&mut self, module_idx: ModuleIdx, chunk_idx: ChunkIdx) {
    self.chunk_table[chunk_idx].modules.push(module_idx);
    self.module_to_chunk[module_idx] = Some(chunk_idx);
  }

  fn dependency_ids<'a>(
    &'a self,
    deps: impl Iterator<Item = &'a ChunkDependency> + 'a,
    module_table: &'a ModuleTable,
  ) -> Vec<ArcStr> {
    deps
      .filter_map(|dep| match dep {
        ChunkDependency::Chunk(idx) => self.chunk_table[*idx].id.clone(),
        ChunkDependency::External(idx) => {
          module_table[*idx].as_external().map(|external| ArcStr::from(external.render_path()))
        }
      })
      .collect()
  }

  /// Filenames this chunk statically imports. Meaningful once ids exist.
  pub fn chunk_import_ids(&self, chunk_idx: ChunkIdx, module_table: &ModuleTable) -> Vec<ArcStr> {
    self.dependency_ids(self.chunk_table[chunk_idx].dependencies.iter(), module_table)
  }

  /// Filenames this chunk imports at runtime through `import()`.
  pub fn chunk_dynamic_import_ids(
    &self,
    chunk_idx: ChunkIdx,
    module_table: &ModuleTable,
  ) -> Vec<ArcStr> {
    self.dependency_ids(self.chunk_table[chunk_idx].dynamic_dependencies.iter(), module_table)
  }
}
