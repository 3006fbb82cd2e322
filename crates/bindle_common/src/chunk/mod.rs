pub mod chunk_table;
pub mod types;

use arcstr::ArcStr;
use bindle_utils::{
  indexmap::{FxIndexMap, FxIndexSet},
  rstr::Rstr,
};
use rustc_hash::FxHashMap;
use string_wizard::MagicString;

use crate::{
  ChunkDependency, ChunkDependencyDeclaration, ChunkExportDeclaration, DynamicImportMode,
  ExportMode, ImportRecordIdx, ModuleId, ModuleIdx, RenderedModule, SymbolRef,
};

/// Mutable state produced by `pre_render` and consumed by hashing, id
/// generation and the format finaliser. Exclusively owned by its chunk.
#[derive(Default)]
pub struct ChunkRenderState {
  pub used_modules: Vec<ModuleIdx>,
  pub rendered_module_sources: FxIndexMap<ModuleIdx, MagicString<'static>>,
  pub rendered_modules: FxIndexMap<ModuleId, RenderedModule>,
  /// Snapshot of the concatenated body taken at the end of `pre_render`,
  /// before dynamic-import sites learn their final paths. Hash input.
  pub rendered_source_text: Option<String>,
  pub rendered_dependencies: FxIndexMap<ChunkDependency, ChunkDependencyDeclaration>,
  pub rendered_exports: Vec<ChunkExportDeclaration>,
  /// Memoised content fingerprint of this chunk alone.
  pub rendered_hash: Option<String>,
  pub dynamic_import_modes: FxHashMap<(ModuleIdx, ImportRecordIdx), DynamicImportMode>,
  /// Per-format runtime globals the chunk's modules rely on, aggregated for
  /// the finaliser.
  pub accessed_globals: FxIndexSet<Rstr>,
  // Only meaningful for require-based formats
  pub require_binding_names: FxHashMap<ChunkDependency, String>,
  pub interop_default_binding_names: FxHashMap<ModuleIdx, String>,
  /// A lowered dynamic import wraps its `require` in the namespace helper.
  pub needs_interop_namespace: bool,
  /// Namespace blocks hoisted above all module bodies.
  pub hoisted_namespace_blocks: Vec<String>,
}

impl std::fmt::Debug for ChunkRenderState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ChunkRenderState")
      .field("used_modules", &self.used_modules)
      .field("rendered_hash", &self.rendered_hash)
      .finish_non_exhaustive()
  }
}

#[derive(Debug, Default)]
pub struct Chunk {
  pub exec_order: u32,
  /// Execution-ordered modules assigned to this chunk. Empty for facades.
  pub modules: Vec<ModuleIdx>,
  /// Modules that are entry points or dynamically imported from outside.
  pub entry_modules: Vec<ModuleIdx>,
  /// The module whose public signature this chunk exposes.
  pub facade_module: Option<ModuleIdx>,
  /// Final filename; `None` until id generation.
  pub id: Option<ArcStr>,
  pub name: Option<ArcStr>,
  /// Fixed output filename requested by the user, bypassing patterns.
  pub file_name: Option<ArcStr>,
  pub variable_name: String,
  pub manual_chunk_alias: Option<ArcStr>,
  /// No included module.
  pub is_empty: bool,
  pub dependencies: FxIndexSet<ChunkDependency>,
  pub dynamic_dependencies: FxIndexSet<ChunkDependency>,
  pub imports: FxIndexSet<SymbolRef>,
  pub exports: FxIndexSet<SymbolRef>,
  pub exports_by_name: FxIndexMap<Rstr, SymbolRef>,
  sorted_export_names: Option<Vec<Rstr>>,
  pub export_mode: ExportMode,
  pub needs_exports_shim: bool,
  pub canonical_names: FxHashMap<SymbolRef, Rstr>,
  pub render: ChunkRenderState,
}

impl Chunk {
  pub fn new(modules: Vec<ModuleIdx>) -> Self {
    Self { exec_order: u32::MAX, modules, ..Self::default() }
  }

  pub fn is_facade(&self) -> bool {
    self.modules.is_empty() && self.facade_module.is_some()
  }

  /// Names under which this chunk exports, sorted and cached. The cache is
  /// invalidated whenever `exports_by_name` changes.
  pub fn sorted_export_names(&mut self) -> &[Rstr] {
    self.sorted_export_names.get_or_insert_with(|| {
      let mut names = self.exports_by_name.keys().cloned().collect::<Vec<_>>();
      names.sort_unstable();
      names
    })
  }

  pub fn get_export_names(&self) -> Vec<Rstr> {
    match &self.sorted_export_names {
      Some(cached) => cached.clone(),
      None => {
        let mut names = self.exports_by_name.keys().cloned().collect::<Vec<_>>();
        names.sort_unstable();
        names
      }
    }
  }

  pub fn invalidate_sorted_export_names(&mut self) {
    self.sorted_export_names = None;
  }

  /// The external name assigned to `variable`, if it is exported here.
  pub fn get_variable_export_name(&self, variable: SymbolRef) -> Option<&Rstr> {
    self.exports_by_name.iter().find_map(|(name, v)| (*v == variable).then_some(name))
  }

  pub fn has_exports(&self) -> bool {
    !self.exports_by_name.is_empty()
  }
}
