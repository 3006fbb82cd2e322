use std::ops::{Index, IndexMut};

use bindle_utils::{
  indexmap::FxIndexSet,
  option_ext::OptionExt,
  rstr::{Rstr, ToRstr},
};
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;

use crate::{ChunkIdx, ModuleIdx, SymbolIdx, SymbolRef};

use super::namespace_alias::NamespaceAlias;

bitflags::bitflags! {
  #[derive(Debug, Default, Clone, Copy)]
  pub struct SymbolRefFlags: u8 {
    const IS_NOT_REASSIGNED = 1;
    /// If this symbol is declared by `const`. Eg. `const a = 1;`
    const IS_CONST = 1 << 1;
    /// Declared by a function declaration, so its binding is hoisted.
    const IS_FUNCTION_DECL = 1 << 2;
    /// Initialised to the undefined sentinel.
    const IS_UNINITIALIZED = 1 << 3;
  }
}

/// What kind of binding a symbol stands for. The render pipeline treats most
/// of them alike; the exceptions are documented on each variant.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
  #[default]
  Local,
  /// `export default <expr>`; linked to its local binding when one exists.
  ExportDefault,
  /// The module namespace object.
  Namespace,
  /// A named export materialised from a default export; its
  /// `namespace_alias` points at the synthetic namespace binding.
  SyntheticNamedExport,
  /// Stand-in for a missing named export.
  ExportShim,
  /// Declared by an external module.
  External,
}

#[derive(Debug, Default, Clone)]
pub struct SymbolRefData {
  pub name: Rstr,
  pub kind: SymbolKind,
  /// If set, references to this symbol render as a property access instead of
  /// an identifier.
  pub namespace_alias: Option<NamespaceAlias>,
  /// The symbol that this symbol is linked to.
  pub link: Option<SymbolRef>,
  /// The chunk that this symbol is defined in.
  pub chunk_id: Option<ChunkIdx>,
  pub flags: SymbolRefFlags,
  /// Whether the binding survived tree-shaking. Only meaningful for
  /// namespace symbols, which may be forced live by dynamic imports.
  pub included: bool,
}

#[derive(Debug, Default)]
pub struct SymbolRefDbForModule {
  pub owner: ModuleIdx,
  pub symbols: IndexVec<SymbolIdx, SymbolRefData>,
  /// Names of non-root bindings that render verbatim; renamed root bindings
  /// must not collide with them.
  pub non_root_names: FxIndexSet<Rstr>,
  /// Global names the module's source references.
  pub unresolved_references: FxIndexSet<Rstr>,
}

impl SymbolRefDbForModule {
  pub fn new(owner: ModuleIdx) -> Self {
    Self { owner, ..Self::default() }
  }

  pub fn create_symbol(&mut self, name: &str, kind: SymbolKind) -> SymbolRef {
    let symbol = self.symbols.push(SymbolRefData {
      name: name.to_rstr(),
      kind,
      included: true,
      ..SymbolRefData::default()
    });
    SymbolRef::from((self.owner, symbol))
  }

  // The `facade` means the symbol does not correspond to source text.
  pub fn create_facade_root_symbol_ref(&mut self, name: &str) -> SymbolRef {
    self.create_symbol(name, SymbolKind::Local)
  }
}

// Information about symbols for all modules
#[derive(Debug, Default)]
pub struct SymbolRefDb {
  inner: IndexVec<ModuleIdx, Option<SymbolRefDbForModule>>,
}

impl Index<ModuleIdx> for SymbolRefDb {
  type Output = Option<SymbolRefDbForModule>;

  fn index(&self, index: ModuleIdx) -> &Self::Output {
    self.inner.index(index)
  }
}

impl IndexMut<ModuleIdx> for SymbolRefDb {
  fn index_mut(&mut self, index: ModuleIdx) -> &mut Self::Output {
    self.inner.index_mut(index)
  }
}

impl SymbolRefDb {
  fn ensure_exact_capacity(&mut self, module_idx: ModuleIdx) {
    let new_len = module_idx.index() + 1;
    if self.inner.len() < new_len {
      self.inner.resize_with(new_len, || None);
    }
  }

  pub fn store_local_db(&mut self, idx: ModuleIdx, local_db: SymbolRefDbForModule) {
    self.ensure_exact_capacity(idx);
    self.inner[idx] = Some(local_db);
  }

  pub fn local_db(&self, owner: ModuleIdx) -> &SymbolRefDbForModule {
    self.inner[owner].unpack_ref()
  }

  pub fn local_db_mut(&mut self, owner: ModuleIdx) -> &mut SymbolRefDbForModule {
    self.inner[owner].unpack_ref_mut()
  }

  pub fn create_facade_root_symbol_ref(&mut self, owner: ModuleIdx, name: &str) -> SymbolRef {
    self.ensure_exact_capacity(owner);
    self.inner[owner].unpack_ref_mut().create_facade_root_symbol_ref(name)
  }

  /// Make `base` point to `target`
  pub fn link(&mut self, base: SymbolRef, target: SymbolRef) {
    let base_root = self.find_mut(base);
    let target_root = self.find_mut(target);
    if base_root == target_root {
      // already linked
      return;
    }
    self.get_mut(base_root).link = Some(target_root);
  }

  pub fn canonical_name_for<'a>(
    &'a self,
    refer: SymbolRef,
    canonical_names: &'a FxHashMap<SymbolRef, Rstr>,
  ) -> &'a str {
    let canonical_ref = self.canonical_ref_for(refer);
    canonical_names.get(&canonical_ref).map_or_else(move || refer.name(self), Rstr::as_str)
  }

  pub fn get(&self, refer: SymbolRef) -> &SymbolRefData {
    &self.inner[refer.owner].unpack_ref().symbols[refer.symbol]
  }

  pub fn get_mut(&mut self, refer: SymbolRef) -> &mut SymbolRefData {
    &mut self.inner[refer.owner].unpack_ref_mut().symbols[refer.symbol]
  }

  /// <https://en.wikipedia.org/wiki/Disjoint-set_data_structure>
  /// See Path halving
  pub fn find_mut(&mut self, target: SymbolRef) -> SymbolRef {
    let mut canonical = target;
    while let Some(parent) = self.get_mut(canonical).link {
      self.get_mut(canonical).link = self.get_mut(parent).link;
      canonical = parent;
    }

    canonical
  }

  // Used for the situation where rust require `&self`
  pub fn canonical_ref_for(&self, target: SymbolRef) -> SymbolRef {
    let mut canonical = target;
    while let Some(founded) = self.get(canonical).link {
      debug_assert!(founded != target);
      canonical = founded;
    }
    canonical
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn canonical_ref_follows_links() {
    let mut db = SymbolRefDb::default();
    db.store_local_db(ModuleIdx::from_raw(0), SymbolRefDbForModule::new(ModuleIdx::from_raw(0)));
    db.store_local_db(ModuleIdx::from_raw(1), SymbolRefDbForModule::new(ModuleIdx::from_raw(1)));

    let a = db.create_facade_root_symbol_ref(ModuleIdx::from_raw(0), "a");
    let b = db.create_facade_root_symbol_ref(ModuleIdx::from_raw(1), "b");

    db.link(a, b);
    assert_eq!(db.canonical_ref_for(a), b);
    assert_eq!(db.canonical_ref_for(b), b);
  }
}
