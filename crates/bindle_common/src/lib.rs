mod bundler_options;
mod chunk;
mod module;
mod types;

pub use bundler_options::{
  addons::NormalizedAddons,
  filename_template::{FileNameRenderOptions, FilenameTemplate},
  normalized_output_options::{NormalizedOutputOptions, SourcemapPathTransform},
  output_exports::OutputExports,
  output_format::OutputFormat,
  preserve_entry_signatures::PreserveEntrySignatures,
  OutputOptions,
};

// We don't want internal position adjustment of files affect users, so all items are exported in
// the root.
pub use crate::{
  chunk::{
    chunk_table::ChunkTable, types::chunk_dependency::ChunkDependency,
    types::export_mode::ExportMode, Chunk, ChunkRenderState,
  },
  module::{
    external_module::ExternalModule,
    normal_module::{IdentRef, ImportMetaRef, ModuleRenderContext, NormalModule},
    Module,
  },
  types::{
    dependency_declaration::{
      ChunkDependencyDeclaration, ChunkExportDeclaration, DynamicImportMode, ImportSpecifier,
      ReexportSpecifier,
    },
    import_record::{ImportKind, ImportRecord, ImportRecordMeta, ImportRecordResolution},
    module_id::ModuleId,
    module_table::{IndexModules, ModuleTable},
    named_import::{NamedImport, Specifier},
    namespace_alias::NamespaceAlias,
    output_chunk::OutputChunk,
    raw_idx::{ChunkIdx, ImportRecordIdx, ModuleIdx, RawIdx, SymbolIdx},
    rendered_chunk::{PreRenderedChunk, RenderedChunk},
    rendered_module::RenderedModule,
    span::Span,
    symbol_ref::SymbolRef,
    symbol_ref_db::{SymbolKind, SymbolRefData, SymbolRefDb, SymbolRefDbForModule, SymbolRefFlags},
  },
};

/// Stand-in binding for a named export the graph could not resolve.
pub const MISSING_EXPORT_SHIM_NAME: &str = "_missingExportShim";

/// Helper imported by non-ES formats when `interop` is enabled.
pub const INTEROP_DEFAULT_HELPER: &str = "_interopDefault";

/// Helper wrapping `require` results for dynamic imports in non-ES formats.
pub const INTEROP_NAMESPACE_HELPER: &str = "_interopNamespace";
