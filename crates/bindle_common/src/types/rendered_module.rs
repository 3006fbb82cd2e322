/// Per-module summary exposed on the rendered chunk.
#[derive(Debug, Clone, Default)]
pub struct RenderedModule {
  pub rendered_length: u32,
  pub original_length: u32,
  pub exec_order: u32,
}
