use arcstr::ArcStr;
use bindle_utils::{
  ecmascript::property_access_str,
  indexmap::FxIndexMap,
  rstr::Rstr,
};
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;
use string_wizard::MagicString;

use crate::{
  ChunkIdx, ImportRecord, ImportRecordIdx, ModuleId, ModuleIdx, NamedImport,
  PreserveEntrySignatures, Span, SymbolRef, SymbolRefDb,
};

/// One identifier occurrence in the source text and the binding it resolves
/// to. The graph layer computes these; rendering rewrites them in place.
#[derive(Debug, Clone, Copy)]
pub struct IdentRef {
  pub span: Span,
  pub symbol: SymbolRef,
}

/// An `import.meta` occurrence. `property` is `Some("url")` for
/// `import.meta.url`, `None` for the bare meta object.
#[derive(Debug, Clone)]
pub struct ImportMetaRef {
  pub span: Span,
  pub property: Option<Rstr>,
}

pub struct ModuleRenderContext<'a> {
  pub symbol_db: &'a SymbolRefDb,
  pub canonical_names: &'a FxHashMap<SymbolRef, Rstr>,
}

#[derive(Debug)]
pub struct NormalModule {
  pub idx: ModuleIdx,
  pub exec_order: u32,
  pub id: ModuleId,
  /// `stable_id` is calculated based on `id` to be stable across machine and os.
  pub stable_id: String,
  pub repr_name: String,
  pub source: ArcStr,
  pub is_user_defined_entry: bool,
  pub is_entry_point: bool,
  pub preserve_signature: Option<PreserveEntrySignatures>,
  pub manual_chunk_alias: Option<ArcStr>,
  /// Names requested for this entry through emitted-chunk options.
  pub user_chunk_names: Vec<ArcStr>,
  /// Fixed output filenames requested for this entry.
  pub chunk_filenames: Vec<ArcStr>,
  pub is_included: bool,
  pub import_records: IndexVec<ImportRecordIdx, ImportRecord>,
  /// Bindings this module reads from other modules, keyed by the local symbol.
  pub named_imports: FxIndexMap<SymbolRef, NamedImport>,
  /// Exported name to the resolved binding. Star reexports of external
  /// modules use a `*`-prefixed name mapped to the external namespace.
  pub named_exports: FxIndexMap<Rstr, SymbolRef>,
  pub namespace_object_ref: SymbolRef,
  /// Namespace block renders above all module bodies instead of in place.
  pub namespace_hoisted: bool,
  pub ident_refs: Vec<IdentRef>,
  pub import_meta_refs: Vec<ImportMetaRef>,
  pub uses_top_level_await: bool,
  /// Runtime globals the rendered body relies on, per format.
  pub accessed_globals: Vec<Rstr>,
  /// The owning chunk, assigned once at chunk construction.
  pub chunk: Option<ChunkIdx>,
  /// The chunk serving as this module's public facade, if any.
  pub facade_chunk: Option<ChunkIdx>,
}

impl NormalModule {
  pub fn is_included(&self) -> bool {
    self.is_included
  }

  /// Invert `named_exports`: the names under which each binding is exported.
  pub fn export_names_by_variable(&self) -> FxIndexMap<SymbolRef, Vec<Rstr>> {
    let mut ret: FxIndexMap<SymbolRef, Vec<Rstr>> = FxIndexMap::default();
    for (name, symbol) in &self.named_exports {
      if name.starts_with('*') {
        continue;
      }
      ret.entry(*symbol).or_default().push(name.clone());
    }
    ret
  }

  pub fn has_default_export(&self) -> bool {
    self.named_exports.contains_key("default")
  }

  pub fn star_reexported_externals(&self) -> impl Iterator<Item = (&Rstr, SymbolRef)> {
    self.named_exports.iter().filter(|(name, _)| name.starts_with('*')).map(|(n, s)| (n, *s))
  }

  // Modules with ids starting `\0` come from virtual sources and never map
  // back to a real file.
  pub fn is_virtual(&self) -> bool {
    self.id.starts_with('\0')
  }

  /// Render the module body into an editable buffer, applying canonical names
  /// to every identifier occurrence. Dynamic-import and `import.meta` sites
  /// stay untouched; the finaliser rewrites them once filenames exist.
  pub fn render(&self, ctx: &ModuleRenderContext) -> MagicString<'static> {
    let mut source = MagicString::new(self.source.to_string());

    for ident in &self.ident_refs {
      let canonical_ref = ctx.symbol_db.canonical_ref_for(ident.symbol);
      let symbol = ctx.symbol_db.get(canonical_ref);
      let start = ident.span.start as usize;
      let end = ident.span.end as usize;

      if let Some(ns_alias) = &symbol.namespace_alias {
        let ns_name = ctx.symbol_db.canonical_name_for(ns_alias.namespace_ref, ctx.canonical_names);
        source.update(start, end, property_access_str(ns_name, &ns_alias.property_name));
      } else {
        let name = ctx.symbol_db.canonical_name_for(canonical_ref, ctx.canonical_names);
        if name != &self.source[start..end] {
          source.update(start, end, name.to_string());
        }
      }
    }

    source
  }
}
