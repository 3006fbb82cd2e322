mod common;

use bindle::{OutputFormat, SymbolRefFlags};
use bindle_error::EventKind;
use common::{chunk_graph_of, generate, options_for, GraphFixture};

// An entry whose chunk exposes more than the entry's own signature cannot
// host it; a reexport-only facade chunk takes over.
#[test]
fn strict_entry_with_foreign_exposure_gets_a_facade_chunk() {
  let mut fixture = GraphFixture::new();

  let shared = fixture.add_module("shared.js", "const s = 1;");
  let s = fixture.declare(shared, "s", SymbolRefFlags::IS_NOT_REASSIGNED | SymbolRefFlags::IS_CONST);
  fixture.export(shared, "s", s);

  let entry = fixture.add_module("entry.js", "const foo = 2;");
  fixture.mark_entry(entry);
  let foo =
    fixture.declare(entry, "foo", SymbolRefFlags::IS_NOT_REASSIGNED | SymbolRefFlags::IS_CONST);
  fixture.export(entry, "foo", foo);

  let app = fixture.add_module("app.js", "console.log(s);");
  fixture.mark_entry(app);
  fixture.import(app, shared, "s", "s", s);

  let options = options_for(OutputFormat::Esm);
  // `shared` and `entry` share a code chunk; `app` imports from it, so the
  // code chunk must expose `s`, which `entry` does not export.
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![shared, entry], vec![app]]);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  assert_eq!(output.assets.len(), 3, "code chunk, app chunk and a facade chunk");

  let code_chunk = &chunk_graph.chunk_table[bindle::ChunkIdx::from_usize(0)];
  assert!(code_chunk.facade_module.is_none(), "entry cannot host the widened signature");

  let facade = chunk_graph
    .chunk_table
    .iter()
    .find(|chunk| chunk.is_facade())
    .expect("a facade chunk was generated");
  assert!(facade.modules.is_empty());
  assert_eq!(facade.dependencies.len(), 1, "facade depends only on the code chunk");

  // Internal chunk exports are mangled for the es format, so the facade maps
  // the internal alias back onto the public name.
  let facade_asset = output
    .assets
    .iter()
    .find(|asset| asset.code.trim_start().starts_with("export {") && asset.code.contains(" as foo } from "))
    .expect("facade reexports the entry signature");
  assert!(!facade_asset.code.contains("const"), "facade carries no code of its own");

  assert!(
    output.warnings.iter().any(|warning| warning.kind == EventKind::EmptyFacade),
    "signature-preserving entry that could not reuse its chunk warns"
  );
}

#[test]
fn entry_that_matches_its_chunk_hosts_the_signature() {
  let mut fixture = GraphFixture::new();
  let entry = fixture.add_module("entry.js", "const foo = 2;");
  fixture.mark_entry(entry);
  let foo =
    fixture.declare(entry, "foo", SymbolRefFlags::IS_NOT_REASSIGNED | SymbolRefFlags::IS_CONST);
  fixture.export(entry, "foo", foo);

  let options = options_for(OutputFormat::Esm);
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![entry]]);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  assert_eq!(output.assets.len(), 1, "no facade chunk needed");
  let chunk = &chunk_graph.chunk_table[bindle::ChunkIdx::from_usize(0)];
  assert_eq!(chunk.facade_module, Some(bindle::ModuleIdx::from_usize(0)));
}
