use std::fmt::Display;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
  #[default]
  Esm,
  Cjs,
  Amd,
  Umd,
  Iife,
  System,
}

impl OutputFormat {
  #[inline]
  pub fn is_esm(&self) -> bool {
    matches!(self, Self::Esm)
  }

  /// Formats whose module scope keeps live bindings without getter shims.
  #[inline]
  pub fn keeps_symbol_bindings(&self) -> bool {
    matches!(self, Self::Esm | Self::System)
  }

  /// Only `es` and `system` can represent top-level await.
  #[inline]
  pub fn supports_top_level_await(&self) -> bool {
    matches!(self, Self::Esm | Self::System)
  }

  /// Formats that attach external dependencies to global variables.
  #[inline]
  pub fn uses_global_names(&self) -> bool {
    matches!(self, Self::Umd | Self::Iife)
  }

  /// AMD resolves relative module ids without the `.js` extension.
  #[inline]
  pub fn strips_js_extension(&self) -> bool {
    matches!(self, Self::Amd)
  }
}

impl Display for OutputFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Esm => write!(f, "es"),
      Self::Cjs => write!(f, "cjs"),
      Self::Amd => write!(f, "amd"),
      Self::Umd => write!(f, "umd"),
      Self::Iife => write!(f, "iife"),
      Self::System => write!(f, "system"),
    }
  }
}
