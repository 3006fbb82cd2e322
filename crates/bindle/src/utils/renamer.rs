use std::collections::hash_map::Entry;

use bindle_common::{OutputFormat, SymbolRef, SymbolRefDb, INTEROP_DEFAULT_HELPER, MISSING_EXPORT_SHIM_NAME};
use bindle_utils::concat_string;
use bindle_utils::ecmascript::{GLOBAL_OBJECTS, RESERVED_KEYWORDS};
use bindle_utils::rstr::{Rstr, ToRstr};
use rustc_hash::{FxHashMap, FxHashSet};

/// Manages symbol renaming across the modules of one chunk to prevent name
/// collisions. It tracks used names and generates unique names for symbols.
#[derive(Debug)]
pub struct Renamer<'name> {
  // Maps canonical base names to the next available suffix index
  // (e.g., `a` -> 0 means try `a`, then `a$1`).
  used_canonical_names: FxHashMap<Rstr, u32>,

  // Maps canonical SymbolRefs to their final, deconflicted names.
  canonical_names: FxHashMap<SymbolRef, Rstr>,

  /// Shared symbol database for looking up symbol information.
  symbol_db: &'name SymbolRefDb,

  // Tracks all final generated names to ensure uniqueness across the chunk.
  used_names: FxHashSet<Rstr>,
}

impl<'name> Renamer<'name> {
  pub fn new(symbol_db: &'name SymbolRefDb, format: OutputFormat) -> Self {
    let manual_reserved: &[&str] = match format {
      OutputFormat::Cjs | OutputFormat::Umd => {
        &["module", "require", "__filename", "__dirname", "exports", INTEROP_DEFAULT_HELPER]
      }
      OutputFormat::Amd | OutputFormat::Iife => &["exports", INTEROP_DEFAULT_HELPER],
      OutputFormat::Esm | OutputFormat::System => &[],
    };

    let used_canonical_names = manual_reserved
      .iter()
      .chain(std::iter::once(&MISSING_EXPORT_SHIM_NAME))
      .chain(RESERVED_KEYWORDS.iter())
      .chain(GLOBAL_OBJECTS.iter())
      .map(|s| (Rstr::new(s), 0))
      .collect();

    Self {
      used_canonical_names,
      canonical_names: FxHashMap::default(),
      symbol_db,
      used_names: FxHashSet::default(),
    }
  }

  pub fn reserve(&mut self, name: Rstr) {
    self.used_canonical_names.insert(name, 0);
  }

  pub fn add_symbol_in_root_scope(&mut self, symbol_ref: SymbolRef) {
    let canonical_ref = symbol_ref.canonical_ref(self.symbol_db);
    let original_name = canonical_ref.name(self.symbol_db);

    if self.canonical_names.contains_key(&canonical_ref) {
      return;
    }

    let (mut candidate_name, count) = match self.used_canonical_names.entry(original_name.to_rstr())
    {
      Entry::Occupied(o) => {
        let count = o.into_mut();
        *count += 1;
        (Self::generate_candidate_name(original_name, *count), count)
      }
      Entry::Vacant(v) => (original_name.to_rstr(), v.insert(0)),
    };

    loop {
      let non_root_conflict = self
        .symbol_db
        .local_db(canonical_ref.owner)
        .non_root_names
        .contains(candidate_name.as_str());

      if !non_root_conflict && !self.used_names.contains(&candidate_name) {
        self.used_names.insert(candidate_name.clone());
        self.canonical_names.insert(canonical_ref, candidate_name);
        return;
      }

      *count += 1;
      candidate_name = Self::generate_candidate_name(original_name, *count);
    }
  }

  fn generate_candidate_name(original_name: &str, count: u32) -> Rstr {
    concat_string!(original_name, "$", itoa::Buffer::new().format(count)).into()
  }

  pub fn create_conflictless_name(&mut self, hint: &str) -> String {
    let hint = Rstr::new(hint);
    let mut conflictless_name = hint.clone();
    loop {
      match self.used_canonical_names.entry(conflictless_name.clone()) {
        Entry::Occupied(mut occ) => {
          let next_conflict_index = *occ.get() + 1;
          *occ.get_mut() = next_conflict_index;
          conflictless_name =
            concat_string!(hint, "$", itoa::Buffer::new().format(next_conflict_index)).into();
        }
        Entry::Vacant(vac) => {
          vac.insert(0);
          break;
        }
      }
    }
    self.used_names.insert(conflictless_name.clone());
    conflictless_name.to_string()
  }

  /// Chunk-local render name overrides, e.g. property accesses for imports in
  /// `require`-based formats.
  pub fn set_canonical_name(&mut self, symbol_ref: SymbolRef, name: Rstr) {
    let canonical_ref = symbol_ref.canonical_ref(self.symbol_db);
    self.canonical_names.insert(canonical_ref, name);
  }

  pub fn canonical_names(&self) -> &FxHashMap<SymbolRef, Rstr> {
    &self.canonical_names
  }

  pub fn into_canonical_names(self) -> FxHashMap<SymbolRef, Rstr> {
    self.canonical_names
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use bindle_common::{ModuleIdx, SymbolKind, SymbolRefDbForModule};

  fn db_with_symbols(names: &[&str]) -> (SymbolRefDb, Vec<SymbolRef>) {
    let mut db = SymbolRefDb::default();
    let owner = ModuleIdx::from_raw(0);
    db.store_local_db(owner, SymbolRefDbForModule::new(owner));
    let refs =
      names.iter().map(|name| db.local_db_mut(owner).create_symbol(name, SymbolKind::Local)).collect();
    (db, refs)
  }

  #[test]
  fn colliding_symbols_get_numeric_suffixes() {
    let (db, refs) = db_with_symbols(&["foo", "foo", "foo"]);
    let mut renamer = Renamer::new(&db, OutputFormat::Esm);
    for r in &refs {
      renamer.add_symbol_in_root_scope(*r);
    }
    let names = renamer.into_canonical_names();
    assert_eq!(names[&refs[0]], "foo");
    assert_eq!(names[&refs[1]], "foo$1");
    assert_eq!(names[&refs[2]], "foo$2");
  }

  #[test]
  fn reserved_names_are_never_produced() {
    let (db, refs) = db_with_symbols(&["exports"]);
    let mut renamer = Renamer::new(&db, OutputFormat::Cjs);
    renamer.add_symbol_in_root_scope(refs[0]);
    let names = renamer.into_canonical_names();
    assert_eq!(names[&refs[0]], "exports$1");
  }

  #[test]
  fn conflictless_names_count_up() {
    let (db, _) = db_with_symbols(&[]);
    let mut renamer = Renamer::new(&db, OutputFormat::Cjs);
    assert_eq!(renamer.create_conflictless_name("require_dep"), "require_dep");
    assert_eq!(renamer.create_conflictless_name("require_dep"), "require_dep$1");
  }
}
