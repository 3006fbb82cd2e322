mod common;

use bindle::{OutputFormat, SymbolRefFlags};
use bindle_error::EventKind;
use common::{chunk_graph_of, generate, options_for, GraphFixture};

fn external_fixture() -> (GraphFixture, Vec<Vec<bindle::ModuleIdx>>) {
  let mut fixture = GraphFixture::new();
  let react = fixture.add_external("react", &["useState", "default"]);
  let main = fixture.add_module("main.js", "useState();");
  fixture.mark_entry(main);
  let use_state = fixture.external_symbol(react, "useState");
  fixture.import(main, react, "useState", "useState", use_state);
  (fixture, vec![vec![main]])
}

#[test]
fn es_external_import_statement() {
  let (mut fixture, layout) = external_fixture();
  let options = options_for(OutputFormat::Esm);
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, layout);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  let code = &output.assets[0].code;
  assert!(code.contains("import { useState } from \"react\";"), "named import: {code}");
  assert!(code.contains("useState();"), "call site untouched: {code}");
}

#[test]
fn cjs_external_import_becomes_require_with_property_access() {
  let (mut fixture, layout) = external_fixture();
  let options = options_for(OutputFormat::Cjs);
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, layout);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  let code = &output.assets[0].code;
  assert!(code.contains("var react = require(\"react\");"), "external require: {code}");
  assert!(code.contains("react.useState();"), "use site reads off the binding: {code}");
}

#[test]
fn cjs_default_import_goes_through_interop() {
  let mut fixture = GraphFixture::new();
  let react = fixture.add_external("react", &["useState", "default"]);
  let main = fixture.add_module("main.js", "React.render();");
  fixture.mark_entry(main);
  let default_symbol = fixture.external_symbol(react, "default");
  fixture.import(main, react, "default", "React", default_symbol);

  let options = options_for(OutputFormat::Cjs);
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, vec![vec![main]]);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  let code = &output.assets[0].code;
  assert!(code.contains("function _interopDefault"), "helper emitted: {code}");
  assert!(
    code.contains("var react__default = /*#__PURE__*/_interopDefault(react);"),
    "interop binding: {code}"
  );
  assert!(code.contains("react__default.default.render();"), "default read: {code}");
}

#[test]
fn iife_missing_global_name_warns_with_a_guess() {
  let (mut fixture, layout) = external_fixture();
  let mut options = options_for(OutputFormat::Iife);
  options.name = Some("app".to_string());
  let mut chunk_graph = chunk_graph_of(&fixture.link_output, layout);
  let output = generate(&mut fixture.link_output, &mut chunk_graph, &options).unwrap();

  assert!(
    output
      .warnings
      .iter()
      .any(|warning| warning.kind == EventKind::MissingGlobalName
        && warning.message.contains("react")),
    "umd/iife externals without a configured global warn: {:?}",
    output.warnings
  );
}
