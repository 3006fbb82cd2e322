use crate::{ModuleIdx, SymbolIdx, SymbolRefDb, SymbolRefFlags};

/// `SymbolRef` is used to represent a binding in a module when there are
/// multiple modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolRef {
  pub owner: ModuleIdx,
  pub symbol: SymbolIdx,
}

impl Default for SymbolRef {
  fn default() -> Self {
    Self { owner: ModuleIdx::from_raw(0), symbol: SymbolIdx::from_raw(0) }
  }
}

impl From<(ModuleIdx, SymbolIdx)> for SymbolRef {
  fn from(value: (ModuleIdx, SymbolIdx)) -> Self {
    Self { owner: value.0, symbol: value.1 }
  }
}

impl SymbolRef {
  pub fn name<'db>(&self, db: &'db SymbolRefDb) -> &'db str {
    db.get(*self).name.as_str()
  }

  pub fn flags(&self, db: &SymbolRefDb) -> SymbolRefFlags {
    db.get(*self).flags
  }

  // `None` means we don't know if it's declared by `const`.
  pub fn is_declared_by_const(&self, db: &SymbolRefDb) -> Option<bool> {
    let flags = self.flags(db);
    // Not having this flag means we don't know instead of it's not declared by `const`.
    flags.contains(SymbolRefFlags::IS_CONST).then_some(true)
  }

  /// `None` means we don't know if it gets reassigned.
  pub fn is_not_reassigned(&self, db: &SymbolRefDb) -> Option<bool> {
    let flags = self.flags(db);
    flags.contains(SymbolRefFlags::IS_NOT_REASSIGNED).then_some(true)
  }

  #[must_use]
  pub fn canonical_ref(&self, db: &SymbolRefDb) -> Self {
    db.canonical_ref_for(*self)
  }
}
