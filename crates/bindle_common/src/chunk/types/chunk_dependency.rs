use crate::{ChunkIdx, ModuleIdx};

/// A dependency edge of a chunk: another chunk or an external module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkDependency {
  Chunk(ChunkIdx),
  External(ModuleIdx),
}

impl ChunkDependency {
  pub fn as_chunk(&self) -> Option<ChunkIdx> {
    match self {
      Self::Chunk(idx) => Some(*idx),
      Self::External(_) => None,
    }
  }

  pub fn as_external(&self) -> Option<ModuleIdx> {
    match self {
      Self::External(idx) => Some(*idx),
      Self::Chunk(_) => None,
    }
  }
}
