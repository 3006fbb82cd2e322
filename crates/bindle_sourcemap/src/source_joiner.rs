use oxc_sourcemap::{SourceMap, SourceMapBuilder};

use crate::{lines_count, source::Source};

pub struct SourceJoiner<'source> {
  inner: Vec<Box<dyn Source + Send + 'source>>,
  prepend_source: Vec<Box<dyn Source + Send + 'source>>,
  separator: &'static str,
}

impl Default for SourceJoiner<'_> {
  fn default() -> Self {
    Self { inner: Vec::new(), prepend_source: Vec::new(), separator: "\n" }
  }
}

impl<'source> SourceJoiner<'source> {
  pub fn with_separator(separator: &'static str) -> Self {
    Self { separator, ..Self::default() }
  }

  pub fn append_source<T: Source + Send + 'source>(&mut self, source: T) {
    self.inner.push(Box::new(source));
  }

  pub fn prepend_source<T: Source + Send + 'source>(&mut self, source: T) {
    self.prepend_source.push(Box::new(source));
  }

  fn sources(&self) -> impl Iterator<Item = &Box<dyn Source + Send + 'source>> {
    self.prepend_source.iter().chain(self.inner.iter())
  }

  pub fn is_empty(&self) -> bool {
    self.prepend_source.is_empty() && self.inner.is_empty()
  }

  pub fn join(&self) -> String {
    let sources_len = self.prepend_source.len() + self.inner.len();
    if sources_len == 0 {
      return String::new();
    }

    let size_hint = self.sources().map(|source| source.content().len()).sum::<usize>()
      + self.separator.len() * (sources_len - 1);
    let mut ret_source = String::with_capacity(size_hint);

    for (index, source) in self.sources().enumerate() {
      ret_source.push_str(source.content());
      if index < sources_len - 1 {
        ret_source.push_str(self.separator);
      }
    }

    ret_source
  }

  /// Join all sources and emit a line-based map: every line of a source that
  /// carries an origin maps to the same line of its original file.
  pub fn join_with_source_map(&self, file: Option<&str>) -> (String, SourceMap) {
    let sources_len = self.prepend_source.len() + self.inner.len();
    let mut builder = SourceMapBuilder::default();
    if let Some(file) = file {
      builder.set_file(file);
    }

    let mut joined = String::new();
    let mut dst_line = 0u32;
    let separator_lines = lines_count(self.separator);

    for (index, source) in self.sources().enumerate() {
      if let Some(origin) = source.origin() {
        let source_id = builder.add_source_and_content(&origin.filename, &origin.content);
        for line in 0..=source.lines_count() {
          builder.add_token(dst_line + line, 0, line, 0, Some(source_id), None);
        }
      }
      joined.push_str(source.content());
      dst_line += source.lines_count();
      if index < sources_len - 1 {
        joined.push_str(self.separator);
        dst_line += separator_lines;
      }
    }

    (joined, builder.into_sourcemap())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn join_with_separator() {
    let mut joiner = SourceJoiner::with_separator("\n\n");
    joiner.append_source("const a = 1;".to_string());
    joiner.append_source("const b = 2;".to_string());
    assert_eq!(joiner.join(), "const a = 1;\n\nconst b = 2;");
  }

  #[test]
  fn prepended_sources_come_first() {
    let mut joiner = SourceJoiner::default();
    joiner.append_source("body".to_string());
    joiner.prepend_source("shim".to_string());
    assert_eq!(joiner.join(), "shim\nbody");
  }
}
