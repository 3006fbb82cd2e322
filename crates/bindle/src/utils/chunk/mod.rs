pub mod chunk_dependency_declarations;
pub mod compute_content_hash;
pub mod deconflict_chunk_symbols;
pub mod determine_export_mode;
pub mod finalize_imports;
pub mod generate_rendered_chunk;
pub mod namespace_marker;
pub mod render_module_namespace;
pub mod render_paths;
pub mod validate_options_for_multi_chunk_output;
