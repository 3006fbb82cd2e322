use arcstr::ArcStr;
use bindle_common::{
  ChunkDependency, ChunkIdx, NormalizedOutputOptions, SymbolKind, MISSING_EXPORT_SHIM_NAME,
};
use bindle_utils::{
  concat_string,
  ecmascript::{legitimize_identifier_name, property_access_str},
  rstr::{Rstr, ToRstr},
};
use rustc_hash::FxHashMap;

use crate::{graph::ChunkGraph, types::link_output::LinkOutput, utils::renamer::Renamer};

/// Rename every binding that surfaces in the concatenated chunk scope so that
/// no two rendered identifiers collide and reserved names stay untouched.
/// Must run after export names exist on all chunks: `require`-based formats
/// rewrite cross-chunk imports into property accesses on the exporter's
/// export alias.
pub fn deconflict_chunk_symbols(
  chunk_graph: &mut ChunkGraph,
  chunk_idx: ChunkIdx,
  link_output: &LinkOutput,
  options: &NormalizedOutputOptions,
  chunk_names: &FxHashMap<ChunkIdx, ArcStr>,
) {
  let format = options.format;
  let symbol_db = &link_output.symbol_db;
  let mut renamer = Renamer::new(symbol_db, format);

  let chunk = &chunk_graph.chunk_table[chunk_idx];

  // Global names referenced anywhere in the chunk must never be shadowed.
  chunk
    .modules
    .iter()
    .copied()
    .filter_map(|idx| link_output.module_table[idx].as_normal())
    .for_each(|module| {
      for name in &symbol_db.local_db(module.idx).unresolved_references {
        renamer.reserve(name.clone());
      }
      for name in &module.accessed_globals {
        renamer.reserve(name.clone());
      }
    });

  // External modules bind to a namespace object in formats that go through
  // `require` or wrapper parameters.
  if !format.keeps_symbol_bindings() {
    chunk
      .dependencies
      .iter()
      .filter_map(ChunkDependency::as_external)
      .filter_map(|idx| link_output.module_table[idx].as_external())
      .for_each(|external| {
        renamer.add_symbol_in_root_scope(external.namespace_ref);
      });
  }

  // Symbols imported from other chunks behave as if declared here: the
  // import statements of this chunk bind them in its scope.
  for symbol_ref in &chunk.imports {
    renamer.add_symbol_in_root_scope(*symbol_ref);
  }

  // Exported bindings and the namespaces synthetic exports read from.
  for symbol_ref in &chunk.exports {
    let canonical = symbol_ref.canonical_ref(symbol_db);
    renamer.add_symbol_in_root_scope(canonical);
    if let Some(alias) = &symbol_db.get(canonical).namespace_alias {
      renamer.add_symbol_in_root_scope(alias.namespace_ref);
    }
  }

  let require_binding_names = if format.keeps_symbol_bindings() {
    FxHashMap::default()
  } else {
    chunk
      .dependencies
      .iter()
      .filter_map(ChunkDependency::as_chunk)
      .map(|dep_idx| {
        let name = chunk_names.get(&dep_idx).map_or("chunk", |name| name.as_str());
        (
          ChunkDependency::Chunk(dep_idx),
          renamer
            .create_conflictless_name(&legitimize_identifier_name(&concat_string!("require_", name))),
        )
      })
      .collect()
  };

  // Starts with the last executed module so entry-adjacent code keeps its
  // original names where possible.
  chunk
    .modules
    .iter()
    .copied()
    .rev()
    .filter_map(|idx| link_output.module_table[idx].as_normal())
    .for_each(|module| {
      let local_db = symbol_db.local_db(module.idx);
      for (symbol_idx, data) in local_db.symbols.iter_enumerated() {
        let symbol_ref = (module.idx, symbol_idx).into();
        match data.kind {
          SymbolKind::ExportShim => {
            renamer.set_canonical_name(symbol_ref, MISSING_EXPORT_SHIM_NAME.to_rstr());
          }
          SymbolKind::Namespace if !data.included => {}
          SymbolKind::External => {}
          _ => {
            if data.link.is_none() {
              renamer.add_symbol_in_root_scope(symbol_ref);
            }
          }
        }
      }
    });

  // In `require`-based formats, imports resolve to property accesses on the
  // dependency's binding instead of named import bindings.
  let mut interop_default_binding_names = FxHashMap::default();
  if !format.keeps_symbol_bindings() {
    let import_rewrites = chunk
      .imports
      .iter()
      .filter_map(|symbol_ref| {
        let canonical = symbol_ref.canonical_ref(symbol_db);
        let owner_module = &link_output.module_table[canonical.owner];
        match owner_module {
          bindle_common::Module::External(external) => {
            if canonical == external.namespace_ref {
              // Star import: the binding itself is the namespace.
              return None;
            }
            let imported = canonical.name(symbol_db).to_rstr();
            Some((canonical, ChunkDependency::External(external.idx), imported))
          }
          bindle_common::Module::Normal(module) => {
            let owner_chunk = module.chunk?;
            if owner_chunk == chunk_idx {
              return None;
            }
            let exporter = &chunk_graph.chunk_table[owner_chunk];
            let alias = exporter.get_variable_export_name(canonical)?.clone();
            Some((canonical, ChunkDependency::Chunk(owner_chunk), alias))
          }
        }
      })
      .collect::<Vec<_>>();

    for (canonical, dep, imported) in import_rewrites {
      let binding: String = match dep {
        ChunkDependency::Chunk(_) => match require_binding_names.get(&dep) {
          Some(name) => name.clone(),
          None => continue,
        },
        ChunkDependency::External(external_idx) => {
          let external = link_output.module_table[external_idx]
            .as_external()
            .expect("dependency must be external");
          let namespace_binding = symbol_db
            .canonical_name_for(external.namespace_ref, renamer.canonical_names())
            .to_string();
          if options.interop && imported == "default" && external.exports_names {
            let hint = concat_string!(namespace_binding, "__default");
            interop_default_binding_names
              .entry(external_idx)
              .or_insert_with(|| renamer.create_conflictless_name(&hint))
              .clone()
          } else {
            namespace_binding
          }
        }
      };
      renamer.set_canonical_name(canonical, Rstr::from(property_access_str(&binding, &imported)));
    }
  }

  let chunk = &mut chunk_graph.chunk_table[chunk_idx];
  chunk.render.require_binding_names = require_binding_names;
  chunk.render.interop_default_binding_names = interop_default_binding_names;
  chunk.canonical_names = renamer.into_canonical_names();
}
