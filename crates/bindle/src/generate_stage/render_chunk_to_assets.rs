use std::path::Path;

use bindle_common::{ChunkIdx, ExportMode, OutputChunk};
use bindle_error::{BuildDiagnostic, BuildResult};
use bindle_sourcemap::{collapse_sourcemaps, SourceMap, SourceMapBuilder, SourceMapSource, SourceOrigin};
use bindle_utils::option_ext::OptionExt;

use crate::{
  graph::ChunkGraph,
  types::bundle_output::BundleOutput,
  utils::chunk::{
    finalize_imports::{fill_dependency_ids, finalise_dynamic_imports, finalise_import_metas},
    generate_rendered_chunk::generate_rendered_chunk,
  },
};

use super::{
  finalizers::{finalize_chunk, BodySource, FinalizerContext},
  pre_render::exports_shim_declaration,
  GenerateStage,
};

impl GenerateStage<'_> {
  pub async fn render_chunks_to_assets(
    &mut self,
    chunk_graph: &mut ChunkGraph,
  ) -> BuildResult<BundleOutput> {
    if self.options.dynamic_import_function.is_some() && !self.options.format.is_esm() {
      self.warnings.push(BuildDiagnostic::invalid_dynamic_import_function_option(
        &self.options.format.to_string(),
      ));
    }

    let mut assets = Vec::with_capacity(chunk_graph.chunk_table.len());

    for chunk_idx in chunk_graph.sorted_chunk_idx_vec.clone() {
      fill_dependency_ids(
        chunk_graph,
        chunk_idx,
        self.link_output,
        self.options.format.strips_js_extension(),
      );
      finalise_dynamic_imports(chunk_graph, chunk_idx, self.link_output, self.options);
      finalise_import_metas(chunk_graph, chunk_idx, self.link_output, self.options);

      let uses_top_level_await = self.check_top_level_await(chunk_graph, chunk_idx)?;

      let (code, map) = self.render_chunk(chunk_graph, chunk_idx, uses_top_level_await).await?;
      let chunk = &chunk_graph.chunk_table[chunk_idx];
      assets.push(OutputChunk { filename: chunk.id.clone().unpack(), code, map });
    }

    let mut warnings = std::mem::take(&mut self.link_output.warnings);
    warnings.append(&mut self.warnings);
    Ok(BundleOutput { assets, warnings })
  }

  fn check_top_level_await(
    &self,
    chunk_graph: &ChunkGraph,
    chunk_idx: ChunkIdx,
  ) -> BuildResult<bool> {
    let chunk = &chunk_graph.chunk_table[chunk_idx];
    let tla_module = chunk.modules.iter().find_map(|idx| {
      self.link_output.module_table[*idx]
        .as_normal()
        .filter(|module| module.is_included() && module.uses_top_level_await)
    });
    match tla_module {
      Some(module) if !self.options.format.supports_top_level_await() => Err(
        BuildDiagnostic::invalid_tla_format(&module.id, &self.options.format.to_string()).into(),
      ),
      Some(_) => Ok(true),
      None => Ok(false),
    }
  }

  async fn render_chunk(
    &mut self,
    chunk_graph: &mut ChunkGraph,
    chunk_idx: ChunkIdx,
    uses_top_level_await: bool,
  ) -> BuildResult<(String, Option<SourceMap>)> {
    let rendered_sources =
      std::mem::take(&mut chunk_graph.chunk_table[chunk_idx].render.rendered_module_sources);

    let chunk = &chunk_graph.chunk_table[chunk_idx];

    let mut body: Vec<BodySource> = Vec::new();
    if chunk.needs_exports_shim {
      body.push(BodySource::Plain(exports_shim_declaration(self.options.declaration_keyword())));
    }
    for block in &chunk.render.hoisted_namespace_blocks {
      body.push(BodySource::Plain(block.clone()));
    }
    for (module_idx, source) in &rendered_sources {
      let content = source.to_string();
      let module = self.link_output.module_table[*module_idx].as_normal();
      match module {
        Some(module) if self.options.sourcemap && !module.is_virtual() => {
          body.push(BodySource::Mapped(SourceMapSource::new(
            content,
            SourceOrigin {
              filename: module.stable_id.clone().into(),
              content: module.source.clone(),
            },
          )));
        }
        _ => body.push(BodySource::Plain(content)),
      }
    }

    let has_exports = !chunk.render.rendered_exports.is_empty()
      || chunk.render.rendered_dependencies.values().any(|decl| !decl.reexports.is_empty());
    let is_entry_module_facade = chunk
      .facade_module
      .and_then(|idx| self.link_output.module_table[idx].as_normal())
      .is_some_and(|module| module.is_entry_point);

    let mut ctx = FinalizerContext {
      options: self.options,
      addons: &self.addons,
      chunk,
      chunk_graph,
      link_output: self.link_output,
      has_exports,
      is_entry_module_facade,
      named_exports_mode: chunk.export_mode != ExportMode::Default,
      uses_top_level_await,
      accessed_globals: &chunk.render.accessed_globals,
    };

    let joiner = finalize_chunk(&mut ctx, body)?;

    let chunk_id = chunk.id.clone().unpack();
    let (mut code, bundle_map) = if self.options.sourcemap {
      let (code, map) = joiner.join_with_source_map(Some(&chunk_id));
      (code, Some(map))
    } else {
      (joiner.join(), None)
    };

    let rendered_chunk = generate_rendered_chunk(chunk_idx, chunk_graph, self.link_output);
    let (transformed, sourcemap_chain) =
      self.plugin_driver.hook_render_chunk(code, &rendered_chunk, self.options).await?;
    code = transformed;

    let map = bundle_map.map(|bundle_map| {
      let final_map = if sourcemap_chain.is_empty() {
        bundle_map
      } else {
        let mut chain: Vec<&SourceMap> = vec![&bundle_map];
        chain.extend(sourcemap_chain.iter());
        collapse_sourcemaps(&chain)
      };
      finalize_source_map(&final_map, &chunk_id, self.options)
    });

    if !self.options.compact {
      code.push('\n');
    }

    Ok((code, map))
  }
}

/// Normalise source paths (optionally through the user transform), drop
/// source contents when excluded, and stamp the output filename.
fn finalize_source_map(
  map: &SourceMap,
  chunk_id: &str,
  options: &bindle_common::NormalizedOutputOptions,
) -> SourceMap {
  let mut builder = SourceMapBuilder::default();
  let file = options.sourcemap_file.clone().unwrap_or_else(|| {
    Path::new(chunk_id)
      .file_name()
      .map_or_else(|| chunk_id.to_string(), |name| name.to_string_lossy().into_owned())
  });
  builder.set_file(&file);

  for token in map.get_tokens() {
    let source_id = token.get_source_id().and_then(|id| {
      let source = map.get_source(id)?;
      let source = match &options.sourcemap_path_transform {
        Some(transform) => transform(source),
        None => source.to_string(),
      };
      let content = if options.sourcemap_exclude_sources {
        ""
      } else {
        map.get_source_content(id).unwrap_or_default()
      };
      Some(builder.add_source_and_content(&source, content))
    });
    let name_id = token.get_name_id().and_then(|id| map.get_name(id)).map(|name| builder.add_name(name));

    builder.add_token(
      token.get_dst_line(),
      token.get_dst_col(),
      token.get_src_line(),
      token.get_src_col(),
      source_id,
      name_id,
    );
  }

  builder.into_sourcemap()
}
