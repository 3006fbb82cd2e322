use oxc_index::IndexVec;

use crate::{Module, ModuleIdx};

pub type IndexModules = IndexVec<ModuleIdx, Module>;

#[derive(Debug, Default)]
pub struct ModuleTable {
  pub modules: IndexModules,
}

impl std::ops::Deref for ModuleTable {
  type Target = IndexModules;

  fn deref(&self) -> &Self::Target {
    &self.modules
  }
}

impl std::ops::DerefMut for ModuleTable {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.modules
  }
}
