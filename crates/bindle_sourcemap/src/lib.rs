pub use oxc_sourcemap::{JSONSourceMap, SourceMap, SourceMapBuilder};

mod collapse_sourcemaps;
mod lines_count;
mod source;
mod source_joiner;

pub use collapse_sourcemaps::collapse_sourcemaps;
pub use lines_count::lines_count;
pub use source::{Source, SourceMapSource, SourceOrigin};
pub use source_joiner::SourceJoiner;
