use std::{path::PathBuf, sync::Arc};

use rustc_hash::FxHashMap;

use crate::{OutputExports, OutputFormat, PreserveEntrySignatures};

pub type SourcemapPathTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

pub struct NormalizedOutputOptions {
  // --- Output
  pub format: OutputFormat,
  pub exports: OutputExports,
  pub entry_filenames: String,
  pub chunk_filenames: String,
  pub dir: String,
  pub cwd: PathBuf,
  pub file: Option<String>,
  /// Global variable name exposed by `umd`/`iife` bundles.
  pub name: Option<String>,
  /// Explicit AMD module id for the entry chunk.
  pub amd_id: Option<String>,

  // --- Rendering
  pub compact: bool,
  pub minify_internal_exports: Option<bool>,
  pub prefer_const: bool,
  pub freeze: bool,
  pub es_module: bool,
  pub namespace_to_string_tag: bool,
  pub hoist_transitive_imports: bool,
  pub external_live_bindings: bool,
  pub interop: bool,
  pub dynamic_import_function: Option<String>,
  pub globals: FxHashMap<String, String>,
  pub indent: bool,

  // --- Source maps
  pub sourcemap: bool,
  pub sourcemap_file: Option<String>,
  pub sourcemap_exclude_sources: bool,
  pub sourcemap_path_transform: Option<SourcemapPathTransform>,

  // --- Graph-level
  pub preserve_modules: bool,
  pub preserve_entry_signatures: PreserveEntrySignatures,
}

impl std::fmt::Debug for NormalizedOutputOptions {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NormalizedOutputOptions")
      .field("format", &self.format)
      .field("dir", &self.dir)
      .field("compact", &self.compact)
      .finish_non_exhaustive()
  }
}

impl NormalizedOutputOptions {
  /// Whether internal export names get mangled: forced by the dedicated
  /// option, otherwise on for scope-bound formats and compact output.
  pub fn should_minify_internal_exports(&self) -> bool {
    match self.minify_internal_exports {
      Some(minify) => minify,
      None => self.compact || matches!(self.format, OutputFormat::Esm | OutputFormat::System),
    }
  }

  pub fn declaration_keyword(&self) -> &'static str {
    if self.prefer_const { "const" } else { "var" }
  }

  pub fn indent_string(&self) -> &'static str {
    if self.compact || !self.indent { "" } else { "\t" }
  }

  pub fn newline(&self) -> &'static str {
    if self.compact { "" } else { "\n" }
  }
}
