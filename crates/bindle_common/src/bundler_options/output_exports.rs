#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputExports {
  #[default]
  Auto,
  Named,
  Default,
  None,
}
