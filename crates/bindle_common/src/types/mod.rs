pub mod dependency_declaration;
pub mod import_record;
pub mod module_id;
pub mod module_table;
pub mod named_import;
pub mod namespace_alias;
pub mod output_chunk;
pub mod raw_idx;
pub mod rendered_chunk;
pub mod rendered_module;
pub mod span;
pub mod symbol_ref;
pub mod symbol_ref_db;
