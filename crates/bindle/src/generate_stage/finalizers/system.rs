use bindle_sourcemap::SourceJoiner;
use bindle_utils::{concat_string, ecmascript::property_access_str};

use super::{BodySource, FinalizerContext};

/// `System.register` wrapper: dependency values arrive through setters, the
/// body runs inside `execute`, and exports flow through the `exports`
/// callback.
pub fn render_system(ctx: &FinalizerContext<'_>, body: Vec<BodySource>) -> SourceJoiner<'static> {
  let mut source_joiner = SourceJoiner::with_separator(ctx.separator());

  let dep_ids = ctx
    .chunk
    .render
    .rendered_dependencies
    .values()
    .map(|declaration| concat_string!("'", ctx.dependency_id(declaration), "'"))
    .collect::<Vec<_>>();

  let register_name = ctx
    .options
    .name
    .as_ref()
    .map_or_else(String::new, |name| concat_string!("'", name, "', "));

  source_joiner.append_source(concat_string!(
    "System.register(",
    register_name,
    "[",
    dep_ids.join(", "),
    "], (function (exports, module) {\n\t'use strict';"
  ));

  let mut imported_locals = Vec::new();
  let mut setters = Vec::new();
  for declaration in ctx.chunk.render.rendered_dependencies.values() {
    let mut assignments = Vec::new();
    for specifier in &declaration.import_specifiers {
      imported_locals.push(specifier.local.to_string());
      if specifier.imported == "*" {
        assignments.push(concat_string!("\t\t\t", specifier.local, " = module;"));
      } else {
        assignments.push(concat_string!(
          "\t\t\t",
          specifier.local,
          " = ",
          property_access_str("module", &specifier.imported),
          ";"
        ));
      }
    }
    for reexport in &declaration.reexports {
      if reexport.imported == "*" {
        assignments.push(
          "\t\t\tObject.keys(module).forEach(function (k) {\n\t\t\t\tif (k !== 'default') exports(k, module[k]);\n\t\t\t});"
            .to_string(),
        );
      } else {
        assignments.push(concat_string!(
          "\t\t\texports('",
          reexport.reexported,
          "', ",
          property_access_str("module", &reexport.imported),
          ");"
        ));
      }
    }
    setters.push(concat_string!(
      "function (module) {\n",
      assignments.join("\n"),
      "\n\t\t}"
    ));
  }

  if !imported_locals.is_empty() {
    source_joiner.append_source(concat_string!("\tvar ", imported_locals.join(", "), ";"));
  }

  if let Some(intro) = &ctx.addons.intro {
    source_joiner.append_source(intro.clone());
  }

  let execute_keyword = if ctx.uses_top_level_await { "async function" } else { "function" };

  source_joiner.append_source(concat_string!(
    "\treturn {\n\t\tsetters: [",
    setters.join(", "),
    "],\n\t\texecute: (",
    execute_keyword,
    " () {"
  ));

  for source in body {
    source_joiner.append_source(source);
  }

  if let Some(exports) = render_system_exports(ctx) {
    source_joiner.append_source(exports);
  }

  if let Some(outro) = &ctx.addons.outro {
    source_joiner.append_source(outro.clone());
  }

  source_joiner.append_source("\t\t})\n\t};\n}));".to_string());

  source_joiner
}

fn render_system_exports(ctx: &FinalizerContext<'_>) -> Option<String> {
  let exports = &ctx.chunk.render.rendered_exports;
  if exports.is_empty() {
    return None;
  }

  let rendered = exports
    .iter()
    .map(|declaration| {
      let value: &str = declaration.expression.as_deref().unwrap_or(&declaration.local);
      concat_string!("exports('", declaration.exported, "', ", value, ");")
    })
    .collect::<Vec<_>>();

  Some(rendered.join("\n"))
}
