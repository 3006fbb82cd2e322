mod common;

use bindle::{ChunkDependency, ChunkIdx, OutputFormat, SymbolRefFlags};
use common::{chunk_graph_of, generate, options_for, GraphFixture};

fn dynamic_fixture() -> (GraphFixture, Vec<Vec<bindle::ModuleIdx>>) {
  let mut fixture = GraphFixture::new();
  let main = fixture.add_module("main.js", "import('./dep.js');");
  fixture.mark_entry(main);

  let dep = fixture.add_module("dep.js", "const d = 1;");
  let d = fixture.declare(dep, "d", SymbolRefFlags::IS_NOT_REASSIGNED | SymbolRefFlags::IS_CONST);
  fixture.export(dep, "d", d);

  fixture.dynamic_import(main, Some(dep), "./dep.js");
  (fixture, vec![vec![main], vec![dep]])
}

#[test]
fn es_dynamic_import_points_at_the_target_chunk() {
  let (mut fixture, layout) = dynamic_fixture();
  let options = options_for(OutputFormat::Esm);
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, layout);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  let entry = output.assets.iter().find(|asset| asset.filename.as_str() == "main.js").unwrap();
  assert!(entry.code.contains("import('./dep-"), "rewritten to the final path: {}", entry.code);

  let entry_chunk = &chunk_graph.chunk_table[ChunkIdx::from_usize(0)];
  assert!(entry_chunk
    .dynamic_dependencies
    .contains(&ChunkDependency::Chunk(ChunkIdx::from_usize(1))));
  assert!(
    entry_chunk.dependencies.is_empty(),
    "a purely dynamic target is not a static dependency"
  );

  let dynamic_ids = chunk_graph
    .chunk_dynamic_import_ids(ChunkIdx::from_usize(0), &fixture.link_output.module_table);
  assert_eq!(dynamic_ids.len(), 1);
  assert!(dynamic_ids[0].starts_with("dep-"));
  assert!(chunk_graph
    .chunk_import_ids(ChunkIdx::from_usize(0), &fixture.link_output.module_table)
    .is_empty());
}

#[test]
fn cjs_dynamic_import_lowers_to_require_promise() {
  let (mut fixture, layout) = dynamic_fixture();
  let options = options_for(OutputFormat::Cjs);
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, layout);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  let entry = output.assets.iter().find(|asset| asset.filename.as_str() == "main.js").unwrap();
  assert!(
    entry.code.contains("Promise.resolve().then(function () { return require('./dep-"),
    "lowered to a promise over require: {}",
    entry.code
  );
}

#[test]
fn unresolved_dynamic_import_keeps_its_argument() {
  let mut fixture = GraphFixture::new();
  let main = fixture.add_module("main.js", "import('virtual-runtime');");
  fixture.mark_entry(main);
  fixture.dynamic_import(main, None, "virtual-runtime");

  let options = options_for(OutputFormat::Esm);
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![main]]);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  assert!(
    output.assets[0].code.contains("import('virtual-runtime')"),
    "unresolved specifiers pass through untouched: {}",
    output.assets[0].code
  );
}

#[test]
fn dynamic_import_function_rewrites_the_call_site() {
  let mut fixture = GraphFixture::new();
  let main = fixture.add_module("main.js", "import('virtual-runtime');");
  fixture.mark_entry(main);
  fixture.dynamic_import(main, None, "virtual-runtime");

  let mut options = options_for(OutputFormat::Esm);
  options.dynamic_import_function = Some("__import__".to_string());
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![main]]);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  assert!(
    output.assets[0].code.contains("__import__('virtual-runtime')"),
    "custom import function substitutes the callee: {}",
    output.assets[0].code
  );
}
