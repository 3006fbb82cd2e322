use arcstr::ArcStr;

use crate::lines_count;

/// Where a rendered source came from, for source-map emission.
#[derive(Debug, Clone)]
pub struct SourceOrigin {
  /// Path recorded in the emitted map's `sources` array.
  pub filename: ArcStr,
  /// Original text recorded in `sourcesContent`.
  pub content: ArcStr,
}

pub trait Source {
  fn content(&self) -> &str;

  fn lines_count(&self) -> u32 {
    lines_count(self.content())
  }

  /// `None` for injected text such as import statements and format wrappers,
  /// which maps to nothing.
  fn origin(&self) -> Option<&SourceOrigin> {
    None
  }
}

impl Source for &str {
  fn content(&self) -> &str {
    self
  }
}

impl Source for String {
  fn content(&self) -> &str {
    self
  }
}

/// A rendered module body paired with its original file, contributing
/// line-for-line mappings to the chunk map.
#[derive(Debug)]
pub struct SourceMapSource {
  content: String,
  origin: SourceOrigin,
  pre_computed_lines_count: Option<u32>,
}

impl SourceMapSource {
  pub fn new(content: String, origin: SourceOrigin) -> Self {
    Self { content, origin, pre_computed_lines_count: None }
  }

  pub fn with_lines_count(mut self, count: u32) -> Self {
    self.pre_computed_lines_count = Some(count);
    self
  }
}

impl Source for SourceMapSource {
  fn content(&self) -> &str {
    &self.content
  }

  fn lines_count(&self) -> u32 {
    self.pre_computed_lines_count.unwrap_or_else(|| lines_count(&self.content))
  }

  fn origin(&self) -> Option<&SourceOrigin> {
    Some(&self.origin)
  }
}

impl Source for &Box<dyn Source + Send + Sync> {
  fn content(&self) -> &str {
    self.as_ref().content()
  }

  fn lines_count(&self) -> u32 {
    self.as_ref().lines_count()
  }

  fn origin(&self) -> Option<&SourceOrigin> {
    self.as_ref().origin()
  }
}
