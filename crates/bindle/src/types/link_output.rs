use bindle_common::{ModuleTable, SymbolRefDb};
use bindle_error::BuildDiagnostic;

/// Everything the graph layer computed before chunk assembly starts: the
/// module table (normal and external), the symbol database with import links
/// already bound, and warnings carried over from earlier stages.
#[derive(Debug, Default)]
pub struct LinkOutput {
  pub module_table: ModuleTable,
  pub symbol_db: SymbolRefDb,
  pub warnings: Vec<BuildDiagnostic>,
}
