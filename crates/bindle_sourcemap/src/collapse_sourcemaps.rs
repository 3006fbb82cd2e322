use oxc_sourcemap::{SourceMap, SourceMapBuilder};

/// Collapse a chain of source maps produced by successive transformations of
/// one chunk into a single map from final code back to the original sources.
///
/// `chain[0]` maps the first rendered code to the original module files; each
/// later map describes one plugin transformation of the previous code.
pub fn collapse_sourcemaps(chain: &[&SourceMap]) -> SourceMap {
  let mut builder = SourceMapBuilder::default();
  let Some((last, rest)) = chain.split_last() else {
    return builder.into_sourcemap();
  };

  let lookup_tables: Vec<_> = rest.iter().map(|map| map.generate_lookup_table()).collect();

  'tokens: for token in last.get_tokens() {
    let mut owner = *last;
    let mut src_line = token.get_src_line();
    let mut src_col = token.get_src_col();
    let mut source_id = token.get_source_id();
    let mut name_id = token.get_name_id();

    for (map, lookup_table) in rest.iter().zip(lookup_tables.iter()).rev() {
      let Some(previous) = map.lookup_token(lookup_table, src_line, src_col) else {
        continue 'tokens;
      };
      owner = map;
      src_line = previous.get_src_line();
      src_col = previous.get_src_col();
      source_id = previous.get_source_id();
      name_id = previous.get_name_id();
    }

    let final_source_id = source_id.and_then(|id| {
      let source = owner.get_source(id)?;
      let content = owner.get_source_content(id).unwrap_or_default();
      Some(builder.add_source_and_content(source, content))
    });
    let final_name_id = name_id.and_then(|id| owner.get_name(id)).map(|name| builder.add_name(name));

    builder.add_token(
      token.get_dst_line(),
      token.get_dst_col(),
      src_line,
      src_col,
      final_source_id,
      final_name_id,
    );
  }

  builder.into_sourcemap()
}
