use std::fmt;

use arcstr::ArcStr;

/// Stable diagnostic codes surfaced to users and plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
  MissingGlobalName,
  EmptyFacade,
  EmptyBundle,
  InvalidOption,
  InvalidTlaFormat,
  MixedExports,
}

impl EventKind {
  pub fn code(&self) -> &'static str {
    match self {
      Self::MissingGlobalName => "MISSING_GLOBAL_NAME",
      Self::EmptyFacade => "EMPTY_FACADE",
      Self::EmptyBundle => "EMPTY_BUNDLE",
      Self::InvalidOption => "INVALID_OPTION",
      Self::InvalidTlaFormat => "INVALID_TLA_FORMAT",
      Self::MixedExports => "MIXED_EXPORTS",
    }
  }
}

impl fmt::Display for EventKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

/// A build event: either a warning funneled to the caller's sink or, for the
/// fatal kinds, an error that aborts the pipeline.
#[derive(Debug, Clone)]
pub struct BuildDiagnostic {
  pub kind: EventKind,
  pub message: String,
}

impl BuildDiagnostic {
  pub fn new(kind: EventKind, message: String) -> Self {
    Self { kind, message }
  }

  pub fn missing_global_name(external_id: &str, guessed_name: &str) -> Self {
    Self::new(
      EventKind::MissingGlobalName,
      format!(
        "No name was provided for external module \"{external_id}\" in \"output.globals\" - guessing \"{guessed_name}\"."
      ),
    )
  }

  pub fn empty_facade(module_id: &str) -> Self {
    Self::new(
      EventKind::EmptyFacade,
      format!(
        "To preserve the export signature of the entry module \"{module_id}\", an empty facade chunk was generated."
      ),
    )
  }

  pub fn empty_bundle(chunk_name: &str) -> Self {
    Self::new(EventKind::EmptyBundle, format!("Generated an empty chunk: \"{chunk_name}\"."))
  }

  pub fn invalid_dynamic_import_function_option(format: &str) -> Self {
    Self::new(
      EventKind::InvalidOption,
      format!(
        "\"output.dynamicImportFunction\" is ignored for the \"{format}\" output format and only takes effect for ES output."
      ),
    )
  }

  pub fn invalid_tla_format(module_id: &str, format: &str) -> Self {
    Self::new(
      EventKind::InvalidTlaFormat,
      format!(
        "Module \"{module_id}\" uses top-level await, which is only supported for the \"es\" and \"system\" output formats, not \"{format}\"."
      ),
    )
  }

  pub fn mixed_exports(module_id: &str, chunk_name: &ArcStr, export_names: &[String]) -> Self {
    Self::new(
      EventKind::MixedExports,
      format!(
        "Entry module \"{module_id}\" is using named ({}) and default exports together. Consumers of your bundle will have to use `{chunk_name}.default` to access the default export, which may not be what you want. Use `output.exports: \"named\"` to disable this warning.",
        export_names.iter().map(|k| format!("\"{k}\"")).collect::<Vec<_>>().join(", ")
      ),
    )
  }

  pub fn into_anyhow(self) -> anyhow::Error {
    anyhow::anyhow!("[{}] {}", self.kind.code(), self.message)
  }
}

impl fmt::Display for BuildDiagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}] {}", self.kind.code(), self.message)
  }
}
