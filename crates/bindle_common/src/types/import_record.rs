use bindle_utils::rstr::Rstr;

use crate::{ModuleIdx, Span, SymbolRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
  Import,
  DynamicImport,
}

bitflags::bitflags! {
  #[derive(Debug, Clone, Copy)]
  pub struct ImportRecordMeta: u8 {
    /// If it is `import {} from '...'` or `import '...'`
    const IS_PLAIN_IMPORT = 1;
    /// `export * from 'mod'` only
    const IS_EXPORT_STAR = 1 << 1;
  }
}

/// Where an import specifier landed after resolution. Unresolved dynamic
/// imports keep their original argument text at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportRecordResolution {
  Resolved(ModuleIdx),
  Unresolved,
}

#[derive(Debug)]
pub struct ImportRecord {
  pub resolution: ImportRecordResolution,
  /// `./lib.js` in `import { foo } from './lib.js';`
  pub specifier: Rstr,
  pub kind: ImportKind,
  pub meta: ImportRecordMeta,
  pub namespace_ref: Option<SymbolRef>,
  /// For dynamic imports: the span of the call argument, rewritten by the
  /// finaliser once final filenames exist.
  pub argument_span: Option<Span>,
  /// For dynamic imports: the span of the whole `import(...)` expression, for
  /// formats that must lower the call itself.
  pub import_expr_span: Option<Span>,
}

impl ImportRecord {
  pub fn new(specifier: Rstr, kind: ImportKind, resolution: ImportRecordResolution) -> Self {
    Self {
      resolution,
      specifier,
      kind,
      meta: ImportRecordMeta::empty(),
      namespace_ref: None,
      argument_span: None,
      import_expr_span: None,
    }
  }

  pub fn with_meta(mut self, meta: ImportRecordMeta) -> Self {
    self.meta = meta;
    self
  }

  pub fn with_namespace_ref(mut self, namespace_ref: SymbolRef) -> Self {
    self.namespace_ref = Some(namespace_ref);
    self
  }

  pub fn with_argument_span(mut self, span: Span) -> Self {
    self.argument_span = Some(span);
    self
  }

  pub fn with_import_expr_span(mut self, span: Span) -> Self {
    self.import_expr_span = Some(span);
    self
  }

  pub fn resolved_module(&self) -> Option<ModuleIdx> {
    match self.resolution {
      ImportRecordResolution::Resolved(idx) => Some(idx),
      ImportRecordResolution::Unresolved => None,
    }
  }
}
