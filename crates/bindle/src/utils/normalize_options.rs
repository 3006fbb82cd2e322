use bindle_common::{NormalizedOutputOptions, OutputOptions};

/// Fill defaults the way the documented option surface promises them.
pub fn normalize_options(options: OutputOptions) -> NormalizedOutputOptions {
  NormalizedOutputOptions {
    format: options.format.unwrap_or_default(),
    exports: options.exports.unwrap_or_default(),
    entry_filenames: options.entry_filenames.unwrap_or_else(|| "[name].js".to_string()),
    chunk_filenames: options.chunk_filenames.unwrap_or_else(|| "[name]-[hash].js".to_string()),
    dir: options.dir.unwrap_or_else(|| "dist".to_string()),
    cwd: options.cwd.unwrap_or_else(|| std::env::current_dir().unwrap_or_default()),
    file: options.file,
    name: options.name,
    amd_id: options.amd_id,
    compact: options.compact.unwrap_or(false),
    minify_internal_exports: options.minify_internal_exports,
    prefer_const: options.prefer_const.unwrap_or(false),
    freeze: options.freeze.unwrap_or(true),
    es_module: options.es_module.unwrap_or(true),
    namespace_to_string_tag: options.namespace_to_string_tag.unwrap_or(false),
    hoist_transitive_imports: options.hoist_transitive_imports.unwrap_or(true),
    external_live_bindings: options.external_live_bindings.unwrap_or(true),
    interop: options.interop.unwrap_or(true),
    dynamic_import_function: options.dynamic_import_function,
    globals: options.globals.unwrap_or_default(),
    indent: options.indent.unwrap_or(true),
    sourcemap: options.sourcemap.unwrap_or(false),
    sourcemap_file: options.sourcemap_file,
    sourcemap_exclude_sources: options.sourcemap_exclude_sources.unwrap_or(false),
    sourcemap_path_transform: options.sourcemap_path_transform,
    preserve_modules: options.preserve_modules.unwrap_or(false),
    preserve_entry_signatures: options.preserve_entry_signatures.unwrap_or_default(),
  }
}
