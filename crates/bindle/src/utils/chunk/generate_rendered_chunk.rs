use arcstr::ArcStr;
use bindle_common::{ChunkDependency, ChunkIdx, PreRenderedChunk, RenderedChunk};
use bindle_utils::option_ext::OptionExt;
use rustc_hash::FxHashMap;

use crate::{graph::ChunkGraph, types::link_output::LinkOutput};

pub fn generate_pre_rendered_chunk(
  chunk_idx: ChunkIdx,
  chunk_graph: &ChunkGraph,
  link_output: &LinkOutput,
) -> PreRenderedChunk {
  let chunk = &chunk_graph.chunk_table[chunk_idx];
  let facade_module =
    chunk.facade_module.and_then(|idx| link_output.module_table[idx].as_normal());

  PreRenderedChunk {
    name: chunk.name.clone().unwrap_or_else(|| ArcStr::from("chunk")),
    is_entry: facade_module.is_some_and(|module| module.is_user_defined_entry),
    is_dynamic_entry: chunk
      .facade_module
      .is_some_and(|idx| chunk_graph.dynamically_imported_from_outside.contains(&idx)),
    facade_module_id: facade_module.map(|module| module.id.clone()),
    module_ids: chunk
      .modules
      .iter()
      .filter_map(|idx| link_output.module_table[*idx].as_normal())
      .map(|module| module.id.clone())
      .collect(),
    exports: chunk.get_export_names(),
  }
}

pub fn generate_rendered_chunk(
  chunk_idx: ChunkIdx,
  chunk_graph: &ChunkGraph,
  link_output: &LinkOutput,
) -> RenderedChunk {
  let chunk = &chunk_graph.chunk_table[chunk_idx];
  let pre_rendered = generate_pre_rendered_chunk(chunk_idx, chunk_graph, link_output);

  let dependency_filename = |dep: &ChunkDependency| -> Option<ArcStr> {
    match dep {
      ChunkDependency::Chunk(idx) => chunk_graph.chunk_table[*idx].id.clone(),
      ChunkDependency::External(idx) => link_output.module_table[*idx]
        .as_external()
        .map(|external| ArcStr::from(external.render_path())),
    }
  };

  RenderedChunk {
    name: pre_rendered.name,
    is_entry: pre_rendered.is_entry,
    is_dynamic_entry: pre_rendered.is_dynamic_entry,
    facade_module_id: pre_rendered.facade_module_id,
    module_ids: pre_rendered.module_ids,
    exports: pre_rendered.exports,
    filename: chunk.id.clone().unpack(),
    modules: chunk
      .render
      .rendered_modules
      .iter()
      .map(|(id, rendered)| (id.clone(), rendered.clone()))
      .collect::<FxHashMap<_, _>>(),
    imports: chunk.dependencies.iter().filter_map(dependency_filename).collect(),
    dynamic_imports: chunk.dynamic_dependencies.iter().filter_map(dependency_filename).collect(),
  }
}
