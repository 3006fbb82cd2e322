use bindle_utils::rstr::Rstr;

/// How a dynamic import site resolves, decided during pre-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicImportMode {
  /// Target lives in the importing chunk; the site collapses to a resolved
  /// promise over the target's namespace.
  Named,
  /// Target chunk exposes a lone default export.
  Default,
  /// Target chunk exposes nothing.
  None,
  /// External or unresolved target; the argument is passed through.
  Auto,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpecifier {
  pub imported: Rstr,
  pub local: Rstr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReexportSpecifier {
  pub imported: Rstr,
  pub reexported: Rstr,
  pub needs_live_binding: bool,
}

/// One dependency edge of a chunk, in renderable form. `id` is a placeholder
/// until the finaliser fills in the final relative path.
#[derive(Debug)]
pub struct ChunkDependencyDeclaration {
  pub id: Option<String>,
  pub global_name: Option<Rstr>,
  pub import_specifiers: Vec<ImportSpecifier>,
  pub reexports: Vec<ReexportSpecifier>,
  pub exports_names: bool,
  pub exports_default: bool,
  pub named_exports_mode: bool,
}

/// One exported binding of a chunk, in renderable form.
#[derive(Debug, Clone)]
pub struct ChunkExportDeclaration {
  pub exported: Rstr,
  pub local: Rstr,
  /// For synthetic named exports: the expression the export reads from.
  pub expression: Option<Rstr>,
  pub hoisted: bool,
  pub uninitialized: bool,
  pub needs_live_binding: bool,
}
