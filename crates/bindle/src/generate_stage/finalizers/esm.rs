use bindle_sourcemap::SourceJoiner;
use bindle_utils::{concat_string, ecmascript::to_module_import_export_name};

use super::{BodySource, FinalizerContext};

pub fn render_esm(ctx: &FinalizerContext<'_>, body: Vec<BodySource>) -> SourceJoiner<'static> {
  let mut source_joiner = SourceJoiner::with_separator(ctx.separator());

  if let Some(intro) = &ctx.addons.intro {
    source_joiner.append_source(intro.clone());
  }

  let import_block = render_esm_import_block(ctx);
  if !import_block.is_empty() {
    source_joiner.append_source(import_block.join("\n"));
  }

  for source in body {
    source_joiner.append_source(source);
  }

  if let Some(exports) = render_esm_exports(ctx) {
    source_joiner.append_source(exports);
  }

  if let Some(outro) = &ctx.addons.outro {
    source_joiner.append_source(outro.clone());
  }

  source_joiner
}

fn render_esm_import_block(ctx: &FinalizerContext<'_>) -> Vec<String> {
  let mut block = Vec::new();

  for (_, declaration) in &ctx.chunk.render.rendered_dependencies {
    let id = serde_json::to_string(ctx.dependency_id(declaration)).unwrap();

    for reexport in &declaration.reexports {
      if reexport.imported == "*" {
        block.push(concat_string!("export * from ", id, ";"));
      } else if reexport.imported == reexport.reexported {
        block.push(concat_string!(
          "export { ",
          to_module_import_export_name(&reexport.imported),
          " } from ",
          id,
          ";"
        ));
      } else {
        block.push(concat_string!(
          "export { ",
          to_module_import_export_name(&reexport.imported),
          " as ",
          to_module_import_export_name(&reexport.reexported),
          " } from ",
          id,
          ";"
        ));
      }
    }

    let mut named = Vec::new();
    let mut star_local = None;
    let mut default_local = None;
    for specifier in &declaration.import_specifiers {
      if specifier.imported == "*" {
        star_local = Some(specifier.local.clone());
      } else if specifier.imported == "default" {
        default_local = Some(specifier.local.clone());
      } else if specifier.imported == specifier.local {
        named.push(specifier.imported.to_string());
      } else {
        named.push(concat_string!(
          to_module_import_export_name(&specifier.imported),
          " as ",
          specifier.local
        ));
      }
    }

    if let Some(local) = star_local {
      block.push(concat_string!("import * as ", local, " from ", id, ";"));
    }
    match (default_local, named.is_empty()) {
      (Some(default_local), true) => {
        block.push(concat_string!("import ", default_local, " from ", id, ";"));
      }
      (Some(default_local), false) => {
        block.push(concat_string!(
          "import ",
          default_local,
          ", { ",
          named.join(", "),
          " } from ",
          id,
          ";"
        ));
      }
      (None, false) => {
        block.push(concat_string!("import { ", named.join(", "), " } from ", id, ";"));
      }
      (None, true) => {
        if declaration.reexports.is_empty() {
          // Side-effect only.
          block.push(concat_string!("import ", id, ";"));
        }
      }
    }
  }

  block
}

fn render_esm_exports(ctx: &FinalizerContext<'_>) -> Option<String> {
  let exports = &ctx.chunk.render.rendered_exports;
  if exports.is_empty() {
    return None;
  }

  let mut s = String::new();
  let mut items = Vec::new();
  for declaration in exports {
    // Synthetic named exports read from their backing namespace through a
    // dedicated local binding.
    if let Some(expression) = &declaration.expression {
      s.push_str(&concat_string!(
        ctx.options.declaration_keyword(),
        " ",
        declaration.local,
        " = ",
        expression,
        ";\n"
      ));
    }

    if declaration.local == declaration.exported {
      items.push(declaration.local.to_string());
    } else {
      items.push(concat_string!(
        declaration.local,
        " as ",
        to_module_import_export_name(&declaration.exported)
      ));
    }
  }

  s.push_str(&concat_string!("export { ", items.join(", "), " };"));
  Some(s)
}
