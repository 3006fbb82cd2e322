mod common;

use bindle::{OutputFormat, SymbolRefFlags};
use common::{chunk_graph_of, generate, options_for, GraphFixture};

#[test]
fn single_entry_es_module() {
  let mut fixture = GraphFixture::new();
  let a = fixture.add_module("a.js", "const x = 1;");
  fixture.mark_entry(a);
  let x = fixture.declare(a, "x", SymbolRefFlags::IS_NOT_REASSIGNED | SymbolRefFlags::IS_CONST);
  fixture.export(a, "x", x);

  let mut options = options_for(OutputFormat::Esm);
  options.sourcemap = true;
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![a]]);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  assert_eq!(output.assets.len(), 1);
  let asset = &output.assets[0];
  assert_eq!(asset.filename.as_str(), "a.js");
  assert!(asset.code.contains("const x = 1;"), "body survives: {}", asset.code);
  assert!(asset.code.contains("export { x };"), "exports rendered: {}", asset.code);
  assert!(!asset.code.contains("_missingExportShim"), "no shim for complete exports");

  let map = asset.map.as_ref().expect("sourcemap requested");
  assert_eq!(map.get_source(0), Some("a.js"));
}

#[test]
fn cjs_live_binding_across_chunks() {
  let mut fixture = GraphFixture::new();
  let b = fixture.add_module("b.js", "let y = 1;\ny = 2;");
  let y = fixture.declare(b, "y", SymbolRefFlags::empty());
  fixture.export(b, "y", y);

  let main = fixture.add_module("main.js", "console.log(y);");
  fixture.mark_entry(main);
  fixture.import(main, b, "y", "y", y);

  let options = options_for(OutputFormat::Cjs);
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![b], vec![main]]);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  assert_eq!(output.assets.len(), 2);
  let dep = output.assets.iter().find(|asset| asset.code.contains("let y = 1;")).unwrap();
  let entry = output.assets.iter().find(|asset| asset.filename.as_str() == "main.js").unwrap();

  assert!(
    dep.code.contains("Object.defineProperty(exports, 'y', { enumerable: true, get: () => y })"),
    "reassigned export keeps a live binding: {}",
    dep.code
  );
  assert!(entry.code.contains("require("), "entry requires the dep chunk: {}", entry.code);
  assert!(
    entry.code.contains(".y)"),
    "imported binding reads through the require binding: {}",
    entry.code
  );
  assert!(entry.code.contains("\"use strict\";"));
}

#[test]
fn top_level_await_rejects_cjs() {
  let mut fixture = GraphFixture::new();
  let a = fixture.add_module("a.js", "await init();");
  fixture.mark_entry(a);
  fixture.module_mut(a).uses_top_level_await = true;

  let options = options_for(OutputFormat::Cjs);
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![a]]);
  let err = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap_err();

  assert!(
    err[0].to_string().contains("INVALID_TLA_FORMAT"),
    "top-level await must be fatal outside es/system: {}",
    err[0]
  );
}

#[test]
fn top_level_await_allowed_in_system() {
  let mut fixture = GraphFixture::new();
  let a = fixture.add_module("a.js", "await init();");
  fixture.mark_entry(a);
  fixture.module_mut(a).uses_top_level_await = true;

  let options = options_for(OutputFormat::System);
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![a]]);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  let code = &output.assets[0].code;
  assert!(code.contains("System.register("), "system wrapper: {code}");
  assert!(code.contains("async function"), "async execute for TLA: {code}");
}

#[test]
fn iife_named_exports_return_exports_object() {
  let mut fixture = GraphFixture::new();
  let a = fixture.add_module("lib.js", "const answer = 42;");
  fixture.mark_entry(a);
  let answer =
    fixture.declare(a, "answer", SymbolRefFlags::IS_NOT_REASSIGNED | SymbolRefFlags::IS_CONST);
  fixture.export(a, "answer", answer);

  let mut options = options_for(OutputFormat::Iife);
  options.name = Some("lib".to_string());
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![a]]);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  let code = &output.assets[0].code;
  assert!(code.contains("var lib = (function (exports) { 'use strict';"), "wrapper: {code}");
  assert!(code.contains("exports.answer = answer;"), "export assignment: {code}");
  assert!(code.contains("return exports;"), "exports object returned: {code}");
}
