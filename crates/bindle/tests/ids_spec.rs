mod common;

use bindle::{OutputFormat, SymbolRefFlags};
use common::{chunk_graph_of, generate, options_for, GraphFixture};

#[test]
fn preserve_modules_virtual_id_lands_under_virtual_dir() {
  let mut fixture = GraphFixture::new();
  let a = fixture.add_module("\0virtual:foo", "const n = 1;");
  fixture.mark_entry(a);
  let n = fixture.declare(a, "n", SymbolRefFlags::IS_NOT_REASSIGNED | SymbolRefFlags::IS_CONST);
  fixture.export(a, "n", n);

  let mut options = options_for(OutputFormat::Esm);
  options.preserve_modules = true;
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![a]]);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  assert_eq!(output.assets[0].filename.as_str(), "_virtual/foo");
}

#[test]
fn colliding_filenames_are_uniquified() {
  let mut fixture = GraphFixture::new();
  let a = fixture.add_module("src/main.js", "const a = 1;");
  fixture.mark_entry(a);
  let b = fixture.add_module("lib/main.js", "const b = 1;");
  fixture.mark_entry(b);

  let options = options_for(OutputFormat::Esm);
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![a], vec![b]]);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  let mut filenames =
    output.assets.iter().map(|asset| asset.filename.to_string()).collect::<Vec<_>>();
  filenames.sort();
  assert_eq!(filenames, vec!["main.js".to_string(), "main2.js".to_string()]);
}

#[test]
fn format_placeholder_is_substituted() {
  let mut fixture = GraphFixture::new();
  let a = fixture.add_module("app.js", "const a = 1;");
  fixture.mark_entry(a);

  let mut options = options_for(OutputFormat::Cjs);
  options.entry_filenames = "[name].[format].js".to_string();
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![a]]);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  assert_eq!(output.assets[0].filename.as_str(), "app.cjs.js");
}
