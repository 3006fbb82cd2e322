use arcstr::ArcStr;
use bindle_sourcemap::SourceMap;

pub struct OutputChunk {
  pub filename: ArcStr,
  pub code: String,
  pub map: Option<SourceMap>,
}

impl std::fmt::Debug for OutputChunk {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("OutputChunk")
      .field("filename", &self.filename)
      .field("code", &self.code.len())
      .field("has_map", &self.map.is_some())
      .finish()
  }
}

impl OutputChunk {
  pub fn filename(&self) -> &str {
    &self.filename
  }

  pub fn content_as_bytes(&self) -> &[u8] {
    self.code.as_bytes()
  }
}
