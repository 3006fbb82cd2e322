mod common;

use bindle::{ChunkIdx, OutputFormat, SymbolRefFlags};
use common::{chunk_graph_of, generate, options_for, GraphFixture};

fn two_chunk_fixture(dep_source: &str) -> (GraphFixture, Vec<Vec<bindle::ModuleIdx>>) {
  let mut fixture = GraphFixture::new();
  let b = fixture.add_module("b.js", dep_source);
  let v = fixture.declare(b, "v", SymbolRefFlags::IS_NOT_REASSIGNED | SymbolRefFlags::IS_CONST);
  fixture.export(b, "v", v);

  let a = fixture.add_module("a.js", "console.log(v);");
  fixture.mark_entry(a);
  fixture.import(a, b, "v", "v", v);

  let layout = vec![vec![b], vec![a]];
  (fixture, layout)
}

fn hashed_options() -> bindle::NormalizedOutputOptions {
  let mut options = options_for(OutputFormat::Esm);
  options.entry_filenames = "[name]-[hash].js".to_string();
  options.chunk_filenames = "[name]-[hash].js".to_string();
  options
}

#[test]
fn hashing_is_deterministic_across_builds() {
  let options = hashed_options();

  let (mut first, layout) = two_chunk_fixture("const v = 1;");
  let mut first_graph = chunk_graph_of(&first.link_output, layout);
  generate(&mut first.link_output, &mut first_graph, &options).unwrap();

  let (mut second, layout) = two_chunk_fixture("const v = 1;");
  let mut second_graph = chunk_graph_of(&second.link_output, layout);
  generate(&mut second.link_output, &mut second_graph, &options).unwrap();

  for (left, right) in first_graph.chunk_table.iter().zip(second_graph.chunk_table.iter()) {
    assert_eq!(left.id, right.id, "identical inputs produce identical filenames");
    assert_eq!(left.render.rendered_hash, right.render.rendered_hash);
  }
}

// Changing a dependency changes the dependent chunk's filename through the
// transitive closure, while the dependent's own fingerprint stays put.
#[test]
fn dependency_edit_renames_importer_but_keeps_its_rendered_hash() {
  let options = hashed_options();

  let (mut first, layout) = two_chunk_fixture("const v = 1;");
  let mut first_graph = chunk_graph_of(&first.link_output, layout);
  generate(&mut first.link_output, &mut first_graph, &options).unwrap();

  let (mut second, layout) = two_chunk_fixture("const v = 1000;");
  let mut second_graph = chunk_graph_of(&second.link_output, layout);
  generate(&mut second.link_output, &mut second_graph, &options).unwrap();

  let entry = ChunkIdx::from_usize(1);
  assert_eq!(
    first_graph.chunk_table[entry].render.rendered_hash,
    second_graph.chunk_table[entry].render.rendered_hash,
    "the entry chunk's own content did not change"
  );
  assert_ne!(
    first_graph.chunk_table[entry].id, second_graph.chunk_table[entry].id,
    "the entry filename absorbs the dependency's content"
  );

  let dep = ChunkIdx::from_usize(0);
  assert_ne!(first_graph.chunk_table[dep].id, second_graph.chunk_table[dep].id);
}
