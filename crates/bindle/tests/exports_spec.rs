mod common;

use bindle::{ChunkIdx, OutputFormat, SymbolRefFlags};
use bindle_error::EventKind;
use common::{chunk_graph_of, generate, options_for, GraphFixture};

#[test]
fn export_names_are_sorted_and_unique() {
  let mut fixture = GraphFixture::new();
  let a = fixture.add_module("a.js", "const zeta = 1;\nconst alpha = 2;\nconst mid = 3;");
  fixture.mark_entry(a);
  for name in ["zeta", "alpha", "mid"] {
    let symbol =
      fixture.declare(a, name, SymbolRefFlags::IS_NOT_REASSIGNED | SymbolRefFlags::IS_CONST);
    fixture.export(a, name, symbol);
  }

  let options = options_for(OutputFormat::Cjs);
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![a]]);
  generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  let chunk = &chunk_graph.chunk_table[ChunkIdx::from_usize(0)];
  let names = chunk.get_export_names();
  assert_eq!(names.len(), chunk.exports_by_name.len());
  let mut sorted = names.clone();
  sorted.sort();
  sorted.dedup();
  assert_eq!(names, sorted, "sorted with no duplicates");

  for (name, symbol) in &chunk.exports_by_name {
    assert_eq!(chunk.get_variable_export_name(*symbol), Some(name));
  }
}

#[test]
fn tree_shaken_away_chunk_warns_empty_bundle_once() {
  let mut fixture = GraphFixture::new();
  let a = fixture.add_module("dead.js", "");
  fixture.module_mut(a).is_included = false;

  let options = options_for(OutputFormat::Esm);
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![a]]);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  let empty_bundle_warnings = output
    .warnings
    .iter()
    .filter(|warning| warning.kind == EventKind::EmptyBundle)
    .count();
  assert_eq!(empty_bundle_warnings, 1);
}

#[test]
fn mangled_export_names_for_compact_cjs() {
  let mut fixture = GraphFixture::new();
  let b = fixture.add_module("b.js", "const value = 1;");
  let value =
    fixture.declare(b, "value", SymbolRefFlags::IS_NOT_REASSIGNED | SymbolRefFlags::IS_CONST);
  fixture.export(b, "value", value);

  let a = fixture.add_module("a.js", "console.log(value);");
  fixture.mark_entry(a);
  fixture.import(a, b, "value", "value", value);

  let mut options = options_for(OutputFormat::Cjs);
  options.compact = true;
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![b], vec![a]]);
  generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  // The dependency chunk has no facade, so its internal export name is fair
  // game for mangling.
  let dep_chunk = &chunk_graph.chunk_table[ChunkIdx::from_usize(0)];
  let names = dep_chunk.get_export_names();
  assert_eq!(names.len(), 1);
  assert_eq!(names[0].as_str(), "a");
}

#[test]
fn facade_names_survive_mangling() {
  let mut fixture = GraphFixture::new();
  let a = fixture.add_module("a.js", "const keepMe = 1;");
  fixture.mark_entry(a);
  let keep =
    fixture.declare(a, "keepMe", SymbolRefFlags::IS_NOT_REASSIGNED | SymbolRefFlags::IS_CONST);
  fixture.export(a, "keepMe", keep);

  let mut options = options_for(OutputFormat::Esm);
  options.minify_internal_exports = Some(true);
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![a]]);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  assert!(
    output.assets[0].code.contains("export { keepMe };"),
    "a facade's public names are never mangled: {}",
    output.assets[0].code
  );
}
