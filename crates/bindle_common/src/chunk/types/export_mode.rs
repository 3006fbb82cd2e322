/// How a chunk exposes its exports to consumers of non-ES formats.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
  None,
  #[default]
  Named,
  Default,
}

impl ExportMode {
  #[inline]
  pub fn is_named(&self) -> bool {
    matches!(self, Self::Named)
  }
}
