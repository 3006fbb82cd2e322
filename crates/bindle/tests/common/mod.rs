// Each integration binary compiles this module separately and uses a
// different slice of it.
#![allow(dead_code)]

use arcstr::ArcStr;
use bindle::{
  normalize_options, BundleOutput, Chunk, ChunkGraph, ExternalModule, GenerateStage, IdentRef,
  ImportKind, ImportRecord, ImportRecordResolution, LinkOutput, Module, ModuleId, ModuleIdx,
  NamedImport, NormalizedAddons, NormalizedOutputOptions, NormalModule, OutputFormat,
  OutputOptions, PluginDriver, Span, Specifier, SymbolKind, SymbolRef, SymbolRefDbForModule,
  SymbolRefFlags,
};
use bindle_error::BuildResult;

/// Builds the module table and symbol database the graph layer would hand to
/// the generate stage, without involving a parser: identifier occurrences are
/// located by scanning the source for whole-word matches.
#[derive(Default)]
pub struct GraphFixture {
  pub link_output: LinkOutput,
}

fn is_ident_byte(byte: u8) -> bool {
  byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}

fn occurrences(source: &str, name: &str) -> Vec<Span> {
  let bytes = source.as_bytes();
  let mut ret = Vec::new();
  let mut cursor = 0;
  while let Some(pos) = source[cursor..].find(name) {
    let start = cursor + pos;
    let end = start + name.len();
    let boundary_before = start == 0 || !is_ident_byte(bytes[start - 1]);
    let boundary_after = end == source.len() || !is_ident_byte(bytes[end]);
    if boundary_before && boundary_after {
      ret.push(Span::new(start as u32, end as u32));
    }
    cursor = end;
  }
  ret
}

impl GraphFixture {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_module(&mut self, id: &str, source: &str) -> ModuleIdx {
    let idx = ModuleIdx::from_usize(self.link_output.module_table.len());
    let mut local_db = SymbolRefDbForModule::new(idx);

    let stem = id.rsplit(['/', '\\']).next().unwrap_or(id);
    let repr_name = stem.split('.').next().unwrap_or(stem).to_string();
    let namespace_object_ref = local_db.create_symbol(&format!("{repr_name}_ns"), SymbolKind::Namespace);
    local_db.symbols[namespace_object_ref.symbol].included = false;

    self.link_output.symbol_db.store_local_db(idx, local_db);
    self.link_output.module_table.push(Module::from(NormalModule {
      idx,
      exec_order: idx.index() as u32,
      id: ModuleId::new(id),
      stable_id: id.to_string(),
      repr_name,
      source: ArcStr::from(source),
      is_user_defined_entry: false,
      is_entry_point: false,
      preserve_signature: None,
      manual_chunk_alias: None,
      user_chunk_names: Vec::new(),
      chunk_filenames: Vec::new(),
      is_included: true,
      import_records: Default::default(),
      named_imports: Default::default(),
      named_exports: Default::default(),
      namespace_object_ref,
      namespace_hoisted: false,
      ident_refs: Vec::new(),
      import_meta_refs: Vec::new(),
      uses_top_level_await: false,
      accessed_globals: Vec::new(),
      chunk: None,
      facade_chunk: None,
    }));
    idx
  }

  pub fn add_external(&mut self, id: &str, declarations: &[&str]) -> ModuleIdx {
    let idx = ModuleIdx::from_usize(self.link_output.module_table.len());
    let mut local_db = SymbolRefDbForModule::new(idx);
    let variable_name =
      bindle_utils::ecmascript::legitimize_identifier_name(id.rsplit('/').next().unwrap_or(id));
    let namespace_ref = local_db.create_symbol(&variable_name, SymbolKind::External);
    for name in declarations {
      local_db.create_symbol(name, SymbolKind::External);
    }
    self.link_output.symbol_db.store_local_db(idx, local_db);
    self.link_output.module_table.push(Module::from(ExternalModule {
      idx,
      id: ModuleId::new(id),
      exec_order: idx.index() as u32,
      render_path: None,
      renormalize_render_path: false,
      variable_name,
      namespace_ref,
      exports_names: !declarations.is_empty(),
      exports_namespace: false,
      declarations: declarations.iter().map(|name| (*name).into()).collect(),
      side_effects: true,
    }));
    idx
  }

  pub fn external_symbol(&self, external: ModuleIdx, name: &str) -> SymbolRef {
    let db = self.link_output.symbol_db.local_db(external);
    db.symbols
      .iter_enumerated()
      .find_map(|(symbol, data)| (data.name == name).then_some(SymbolRef::from((external, symbol))))
      .expect("external declares the requested name")
  }

  pub fn mark_entry(&mut self, module: ModuleIdx) {
    let module = self.module_mut(module);
    module.is_entry_point = true;
    module.is_user_defined_entry = true;
  }

  /// Declare a root binding of the module and register every whole-word
  /// occurrence of its name as a rewritable identifier.
  pub fn declare(&mut self, module_idx: ModuleIdx, name: &str, flags: SymbolRefFlags) -> SymbolRef {
    let symbol =
      self.link_output.symbol_db.local_db_mut(module_idx).create_symbol(name, SymbolKind::Local);
    self.link_output.symbol_db.get_mut(symbol).flags = flags;

    let module = self.module_mut(module_idx);
    let spans = occurrences(&module.source, name);
    module.ident_refs.extend(spans.into_iter().map(|span| IdentRef { span, symbol }));
    symbol
  }

  pub fn export(&mut self, module_idx: ModuleIdx, exported: &str, symbol: SymbolRef) {
    self.module_mut(module_idx).named_exports.insert(exported.into(), symbol);
  }

  /// Wire `importer` to read `target_symbol` from `importee` under `local`,
  /// linking the local binding to the origin the way the graph layer does.
  pub fn import(
    &mut self,
    importer: ModuleIdx,
    importee: ModuleIdx,
    imported: &str,
    local: &str,
    target_symbol: SymbolRef,
  ) -> SymbolRef {
    let local_symbol =
      self.link_output.symbol_db.local_db_mut(importer).create_symbol(local, SymbolKind::Local);
    self.link_output.symbol_db.link(local_symbol, target_symbol);

    let specifier = self.link_output.module_table[importee].id().to_string();
    let module = self.module_mut(importer);
    let record_idx = module.import_records.push(ImportRecord::new(
      specifier.as_str().into(),
      ImportKind::Import,
      ImportRecordResolution::Resolved(importee),
    ));
    module.named_imports.insert(
      local_symbol,
      NamedImport { imported: Specifier::literal(imported), imported_as: local_symbol, record_idx },
    );

    let spans = occurrences(&module.source.clone(), local);
    let module = self.module_mut(importer);
    module.ident_refs.extend(spans.into_iter().map(|span| IdentRef { span, symbol: local_symbol }));
    local_symbol
  }

  /// Register the `import('<specifier>')` call in the importer's source as a
  /// dynamic import record with rewritable spans.
  pub fn dynamic_import(
    &mut self,
    importer: ModuleIdx,
    importee: Option<ModuleIdx>,
    specifier: &str,
  ) {
    let module = self.module_mut(importer);
    let call = format!("import('{specifier}')");
    let start = module.source.find(&call).expect("dynamic import call present in source") as u32;
    let expr_span = Span::new(start, start + call.len() as u32);
    let argument_span = Span::new(start + "import(".len() as u32, expr_span.end - 1);
    let resolution =
      importee.map_or(ImportRecordResolution::Unresolved, ImportRecordResolution::Resolved);
    module.import_records.push(
      ImportRecord::new(specifier.into(), ImportKind::DynamicImport, resolution)
        .with_argument_span(argument_span)
        .with_import_expr_span(expr_span),
    );
  }

  pub fn module_mut(&mut self, idx: ModuleIdx) -> &mut NormalModule {
    self.link_output.module_table[idx].as_normal_mut().expect("fixture module is normal")
  }
}

pub fn chunk_graph_of(link_output: &LinkOutput, chunks: Vec<Vec<ModuleIdx>>) -> ChunkGraph {
  let mut graph = ChunkGraph::new(link_output.module_table.len());
  for modules in chunks {
    graph.add_chunk(Chunk::new(modules));
  }
  graph
}

pub fn options_for(format: OutputFormat) -> NormalizedOutputOptions {
  normalize_options(OutputOptions { format: Some(format), ..Default::default() })
}

pub fn generate(
  link_output: &mut LinkOutput,
  chunk_graph: &mut ChunkGraph,
  options: &NormalizedOutputOptions,
) -> BuildResult<BundleOutput> {
  let plugin_driver = PluginDriver::default();
  let mut stage =
    GenerateStage::new(link_output, options, NormalizedAddons::default(), &plugin_driver);
  futures::executor::block_on(stage.generate(chunk_graph))
}
