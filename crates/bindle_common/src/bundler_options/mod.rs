pub mod addons;
pub mod filename_template;
pub mod normalized_output_options;
pub mod output_exports;
pub mod output_format;
pub mod preserve_entry_signatures;

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::{OutputExports, OutputFormat, PreserveEntrySignatures};

use self::normalized_output_options::SourcemapPathTransform;

/// Raw, user-facing output options. Normalisation fills defaults and
/// validates combinations.
#[derive(Default)]
pub struct OutputOptions {
  // --- Output
  pub format: Option<OutputFormat>,
  pub exports: Option<OutputExports>,
  pub entry_filenames: Option<String>,
  pub chunk_filenames: Option<String>,
  pub dir: Option<String>,
  pub cwd: Option<PathBuf>,
  pub file: Option<String>,
  pub name: Option<String>,
  pub amd_id: Option<String>,

  // --- Rendering
  pub compact: Option<bool>,
  pub minify_internal_exports: Option<bool>,
  pub prefer_const: Option<bool>,
  pub freeze: Option<bool>,
  pub es_module: Option<bool>,
  pub namespace_to_string_tag: Option<bool>,
  pub hoist_transitive_imports: Option<bool>,
  pub external_live_bindings: Option<bool>,
  pub interop: Option<bool>,
  pub dynamic_import_function: Option<String>,
  pub globals: Option<FxHashMap<String, String>>,
  pub indent: Option<bool>,

  // --- Source maps
  pub sourcemap: Option<bool>,
  pub sourcemap_file: Option<String>,
  pub sourcemap_exclude_sources: Option<bool>,
  pub sourcemap_path_transform: Option<SourcemapPathTransform>,

  // --- Graph-level
  pub preserve_modules: Option<bool>,
  pub preserve_entry_signatures: Option<PreserveEntrySignatures>,
}
