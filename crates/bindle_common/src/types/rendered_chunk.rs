use arcstr::ArcStr;
use bindle_utils::rstr::Rstr;
use rustc_hash::FxHashMap;

use crate::{ModuleId, RenderedModule};

/// Chunk description handed to `augmentChunkHash`, before filenames exist.
#[derive(Debug, Clone)]
pub struct PreRenderedChunk {
  pub name: ArcStr,
  pub is_entry: bool,
  pub is_dynamic_entry: bool,
  pub facade_module_id: Option<ModuleId>,
  pub module_ids: Vec<ModuleId>,
  pub exports: Vec<Rstr>,
}

/// Chunk description handed to `renderChunk`.
#[derive(Debug, Clone)]
pub struct RenderedChunk {
  pub name: ArcStr,
  pub is_entry: bool,
  pub is_dynamic_entry: bool,
  pub facade_module_id: Option<ModuleId>,
  pub module_ids: Vec<ModuleId>,
  pub exports: Vec<Rstr>,
  pub filename: ArcStr,
  pub modules: FxHashMap<ModuleId, RenderedModule>,
  pub imports: Vec<ArcStr>,
  pub dynamic_imports: Vec<ArcStr>,
}
