use bindle_common::{NormalModule, NormalizedOutputOptions, SymbolRef, SymbolRefDb, SymbolRefFlags};
use bindle_utils::{concat_string, ecmascript::is_validate_identifier_name, rstr::Rstr};
use rustc_hash::FxHashMap;

/// Render the namespace object block for a module whose namespace binding is
/// live. Reassigned members go through getters so the object observes later
/// writes; stable members are plain properties.
pub fn render_module_namespace_block(
  module: &NormalModule,
  symbol_db: &SymbolRefDb,
  canonical_names: &FxHashMap<SymbolRef, Rstr>,
  options: &NormalizedOutputOptions,
) -> String {
  let ns_name = symbol_db.canonical_name_for(module.namespace_object_ref, canonical_names);
  let n = options.newline();
  let indent = if options.compact { "" } else { "\t" };

  let mut members = Vec::new();
  members.push(concat_string!(indent, "__proto__: null"));
  for (name, symbol) in &module.named_exports {
    if name.starts_with('*') {
      continue;
    }
    let canonical = symbol.canonical_ref(symbol_db);
    let local = symbol_db.canonical_name_for(canonical, canonical_names);
    let key: String = if is_validate_identifier_name(name) {
      name.to_string()
    } else {
      serde_json::to_string(name.as_str()).unwrap()
    };
    let live = !symbol_db.get(canonical).flags.contains(SymbolRefFlags::IS_NOT_REASSIGNED);
    if live {
      members.push(concat_string!(indent, "get ", key, " () { return ", local, "; }"));
    } else if key == local {
      members.push(concat_string!(indent, key));
    } else {
      members.push(concat_string!(indent, key, ": ", local));
    }
  }

  let mut object = concat_string!("{", n, members.join(&concat_string!(",", n)), n, "}");
  if options.namespace_to_string_tag {
    object = concat_string!(
      "Object.defineProperty(",
      object,
      ", Symbol.toStringTag, { value: 'Module' })"
    );
  }
  if options.freeze {
    object = concat_string!("Object.freeze(", object, ")");
  }

  concat_string!(
    options.declaration_keyword(),
    " ",
    ns_name,
    " = /*#__PURE__*/",
    object,
    ";"
  )
}
