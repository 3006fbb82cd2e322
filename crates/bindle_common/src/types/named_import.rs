use bindle_utils::rstr::Rstr;

use crate::{ImportRecordIdx, SymbolRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Specifier {
  Star,
  Literal(Rstr),
}

impl Specifier {
  pub fn literal(name: &str) -> Self {
    Self::Literal(Rstr::new(name))
  }
}

#[derive(Debug, Clone)]
pub struct NamedImport {
  pub imported: Specifier,
  /// The local binding created for the import.
  pub imported_as: SymbolRef,
  pub record_idx: ImportRecordIdx,
}
