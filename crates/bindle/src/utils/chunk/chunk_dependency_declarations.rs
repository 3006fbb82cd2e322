use bindle_common::{
  ChunkDependency, ChunkDependencyDeclaration, ChunkExportDeclaration, ChunkIdx, ExportMode,
  ImportSpecifier, Module, NormalizedOutputOptions, ReexportSpecifier, SymbolKind, SymbolRefFlags,
};
use bindle_error::BuildDiagnostic;
use bindle_utils::{
  ecmascript::{legitimize_identifier_name, property_access_str},
  indexmap::{FxIndexMap, FxIndexSet},
  rstr::{Rstr, ToRstr},
};

use crate::{graph::ChunkGraph, types::link_output::LinkOutput};

pub struct ChunkDeclarations {
  pub dependencies: FxIndexMap<ChunkDependency, ChunkDependencyDeclaration>,
  pub exports: Vec<ChunkExportDeclaration>,
}

/// Compute the renderable import/reexport records for every dependency edge
/// of `chunk_idx`, plus its own export declarations. Filenames are left as
/// placeholders; the finaliser fills them once ids exist.
pub fn compute_chunk_declarations(
  chunk_idx: ChunkIdx,
  chunk_graph: &ChunkGraph,
  link_output: &LinkOutput,
  options: &NormalizedOutputOptions,
  warnings: &mut Vec<BuildDiagnostic>,
) -> ChunkDeclarations {
  let chunk = &chunk_graph.chunk_table[chunk_idx];
  let symbol_db = &link_output.symbol_db;

  let mut dependencies: FxIndexMap<ChunkDependency, ChunkDependencyDeclaration> = chunk
    .dependencies
    .iter()
    .map(|dep| (*dep, empty_declaration_for(*dep, chunk_graph, link_output, options, warnings)))
    .collect();

  // Reexports pass: exports whose origin lives elsewhere surface as
  // reexport records on the owning dependency.
  for export_name in chunk.get_export_names() {
    let symbol = chunk.exports_by_name[&export_name];

    if export_name.starts_with('*') {
      let dep = ChunkDependency::External(symbol.owner);
      dependencies
        .entry(dep)
        .or_insert_with(|| empty_declaration_for(dep, chunk_graph, link_output, options, warnings))
        .reexports
        .push(ReexportSpecifier {
          imported: "*".to_rstr(),
          reexported: "*".to_rstr(),
          needs_live_binding: options.external_live_bindings,
        });
      continue;
    }

    let canonical = symbol.canonical_ref(symbol_db);
    if symbol_db.get(canonical).kind == SymbolKind::SyntheticNamedExport {
      // Declared locally, never reexported.
      continue;
    }

    match &link_output.module_table[canonical.owner] {
      Module::Normal(module) => {
        let Some(owner_chunk) = module.chunk else { continue };
        if owner_chunk == chunk_idx {
          continue;
        }
        let exporter = &chunk_graph.chunk_table[owner_chunk];
        let imported = exporter
          .get_variable_export_name(canonical)
          .unwrap_or_else(|| {
            panic!(
              "Internal error: chunk {owner_chunk:?} has no export name for a reexported binding"
            )
          })
          .clone();
        let needs_live_binding =
          !symbol_db.get(canonical).flags.contains(SymbolRefFlags::IS_NOT_REASSIGNED);
        let dep = ChunkDependency::Chunk(owner_chunk);
        dependencies
          .entry(dep)
          .or_insert_with(|| {
            empty_declaration_for(dep, chunk_graph, link_output, options, warnings)
          })
          .reexports
          .push(ReexportSpecifier { imported, reexported: export_name, needs_live_binding });
      }
      Module::External(external) => {
        let dep = ChunkDependency::External(external.idx);
        dependencies
          .entry(dep)
          .or_insert_with(|| {
            empty_declaration_for(dep, chunk_graph, link_output, options, warnings)
          })
          .reexports
          .push(ReexportSpecifier {
            imported: canonical.name(symbol_db).to_rstr(),
            reexported: export_name,
            needs_live_binding: options.external_live_bindings,
          });
      }
    }
  }

  // Imports pass: each unique underlying binding contributes one specifier on
  // the dependency it comes from.
  let mut seen = FxIndexSet::default();
  for symbol in &chunk.imports {
    let canonical = symbol.canonical_ref(symbol_db);
    if !seen.insert(canonical) {
      continue;
    }
    let local = symbol_db.canonical_name_for(canonical, &chunk.canonical_names).to_rstr();

    match &link_output.module_table[canonical.owner] {
      Module::Normal(module) => {
        let Some(owner_chunk) = module.chunk else { continue };
        if owner_chunk == chunk_idx {
          continue;
        }
        let exporter = &chunk_graph.chunk_table[owner_chunk];
        let Some(imported) = exporter.get_variable_export_name(canonical) else { continue };
        let dep = ChunkDependency::Chunk(owner_chunk);
        if let Some(declaration) = dependencies.get_mut(&dep) {
          declaration.import_specifiers.push(ImportSpecifier { imported: imported.clone(), local });
        }
      }
      Module::External(external) => {
        let dep = ChunkDependency::External(external.idx);
        let imported = if canonical == symbol_db.canonical_ref_for(external.namespace_ref) {
          "*".to_rstr()
        } else {
          canonical.name(symbol_db).to_rstr()
        };
        if let Some(declaration) = dependencies.get_mut(&dep) {
          declaration.import_specifiers.push(ImportSpecifier { imported, local });
        }
      }
    }
  }

  let exports = compute_chunk_export_declarations(chunk_idx, chunk_graph, link_output);

  ChunkDeclarations { dependencies, exports }
}

fn empty_declaration_for(
  dep: ChunkDependency,
  chunk_graph: &ChunkGraph,
  link_output: &LinkOutput,
  options: &NormalizedOutputOptions,
  warnings: &mut Vec<BuildDiagnostic>,
) -> ChunkDependencyDeclaration {
  match dep {
    ChunkDependency::Chunk(dep_idx) => {
      let dep_chunk = &chunk_graph.chunk_table[dep_idx];
      ChunkDependencyDeclaration {
        id: None,
        global_name: None,
        import_specifiers: Vec::new(),
        reexports: Vec::new(),
        exports_names: true,
        exports_default: false,
        named_exports_mode: dep_chunk.export_mode != ExportMode::Default,
      }
    }
    ChunkDependency::External(external_idx) => {
      let external =
        link_output.module_table[external_idx].as_external().expect("dependency must be external");
      let global_name = options.format.uses_global_names().then(|| {
        match options.globals.get(external.id.as_ref()) {
          Some(name) => name.to_rstr(),
          None => {
            let guessed = legitimize_identifier_name(&external.variable_name);
            if external.exports_names || external.exports_namespace {
              warnings.push(BuildDiagnostic::missing_global_name(&external.id, &guessed));
            }
            Rstr::from(guessed)
          }
        }
      });
      ChunkDependencyDeclaration {
        id: None,
        global_name,
        import_specifiers: Vec::new(),
        reexports: Vec::new(),
        exports_names: external.exports_names || external.exports_namespace,
        exports_default: external.exports_default(),
        named_exports_mode: true,
      }
    }
  }
}

fn compute_chunk_export_declarations(
  chunk_idx: ChunkIdx,
  chunk_graph: &ChunkGraph,
  link_output: &LinkOutput,
) -> Vec<ChunkExportDeclaration> {
  let chunk = &chunk_graph.chunk_table[chunk_idx];
  let symbol_db = &link_output.symbol_db;
  let mut ret = Vec::new();

  for export_name in chunk.get_export_names() {
    if export_name.starts_with('*') {
      continue;
    }
    let symbol = chunk.exports_by_name[&export_name];
    let canonical = symbol.canonical_ref(symbol_db);
    let data = symbol_db.get(canonical);

    if data.kind == SymbolKind::SyntheticNamedExport {
      let alias = data.namespace_alias.as_ref().expect("synthetic export carries an alias");
      let ns_name = symbol_db.canonical_name_for(alias.namespace_ref, &chunk.canonical_names);
      ret.push(ChunkExportDeclaration {
        exported: export_name,
        local: symbol_db.canonical_name_for(canonical, &chunk.canonical_names).to_rstr(),
        expression: Some(Rstr::from(property_access_str(ns_name, &alias.property_name))),
        hoisted: false,
        uninitialized: false,
        needs_live_binding: false,
      });
      continue;
    }

    // Bindings owned by other chunks or externals surface as reexports.
    match &link_output.module_table[canonical.owner] {
      Module::Normal(module) => {
        if module.chunk != Some(chunk_idx) {
          continue;
        }
      }
      Module::External(_) => continue,
    }

    ret.push(ChunkExportDeclaration {
      exported: export_name,
      local: symbol_db.canonical_name_for(canonical, &chunk.canonical_names).to_rstr(),
      expression: None,
      hoisted: data.flags.contains(SymbolRefFlags::IS_FUNCTION_DECL),
      uninitialized: data.flags.contains(SymbolRefFlags::IS_UNINITIALIZED),
      needs_live_binding: !data.flags.contains(SymbolRefFlags::IS_NOT_REASSIGNED)
        && matches!(data.kind, SymbolKind::Local | SymbolKind::ExportDefault),
    })
  }

  ret
}
