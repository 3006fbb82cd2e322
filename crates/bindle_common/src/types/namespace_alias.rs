use bindle_utils::rstr::Rstr;

use crate::SymbolRef;

/// For case `import { a } from 'foo.cjs'; console.log(a)`, the symbol `a` refers to
/// `module.exports.a` of `foo.cjs`, so references must be rewritten to a property access
/// `foo_ns.a`. Synthetic named exports use the same mechanism against their synthetic
/// namespace binding.
#[derive(Debug, Clone)]
pub struct NamespaceAlias {
  pub namespace_ref: SymbolRef,
  pub property_name: Rstr,
}
