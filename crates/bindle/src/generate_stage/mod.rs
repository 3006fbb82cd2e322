mod compute_cross_chunk_links;
mod generate_chunk_exports;
pub(crate) mod generate_chunk_ids;
mod generate_facades;
mod initialize_chunks;
mod pre_render;
mod render_chunk_to_assets;

pub mod finalizers;

use std::path::PathBuf;

use bindle_common::{NormalizedAddons, NormalizedOutputOptions};
use bindle_error::{BuildDiagnostic, BuildResult};

use crate::{
  graph::ChunkGraph,
  plugin::PluginDriver,
  types::{bundle_output::BundleOutput, link_output::LinkOutput},
  utils::chunk::{
    compute_content_hash::compute_rendered_hash, render_paths::compute_input_base,
    validate_options_for_multi_chunk_output::validate_options_for_multi_chunk_output,
  },
};

/// Drives one chunk layout through the render phases:
/// link -> exports -> facades -> pre-render -> ids -> render.
///
/// Phases across sibling chunks may interleave, but each chunk observes its
/// own phases strictly in order.
pub struct GenerateStage<'a> {
  options: &'a NormalizedOutputOptions,
  link_output: &'a mut LinkOutput,
  plugin_driver: &'a PluginDriver,
  addons: NormalizedAddons,
  input_base: PathBuf,
  warnings: Vec<BuildDiagnostic>,
}

impl<'a> GenerateStage<'a> {
  pub fn new(
    link_output: &'a mut LinkOutput,
    options: &'a NormalizedOutputOptions,
    addons: NormalizedAddons,
    plugin_driver: &'a PluginDriver,
  ) -> Self {
    let input_base = compute_input_base(&link_output.module_table);
    Self { options, link_output, plugin_driver, addons, input_base, warnings: Vec::new() }
  }

  pub async fn generate(&mut self, chunk_graph: &mut ChunkGraph) -> BuildResult<BundleOutput> {
    tracing::debug!(
      chunks = chunk_graph.chunk_table.len(),
      format = %self.options.format,
      "generate stage start"
    );

    if chunk_graph.chunk_table.len() > 1 {
      validate_options_for_multi_chunk_output(self.options)?;
    }

    self.initialize_chunks(chunk_graph);
    self.compute_cross_chunk_links(chunk_graph);
    self.generate_chunk_exports(chunk_graph)?;
    self.generate_facades(chunk_graph)?;
    self.sort_chunks(chunk_graph);
    self.assign_chunk_names(chunk_graph);
    self.pre_render_chunks(chunk_graph)?;
    self.compute_rendered_hashes(chunk_graph);
    self.generate_chunk_ids(chunk_graph)?;

    tracing::debug!("generate stage: rendering chunks to assets");
    self.render_chunks_to_assets(chunk_graph).await
  }

  fn sort_chunks(&mut self, chunk_graph: &mut ChunkGraph) {
    let mut sorted = chunk_graph.chunk_table.indices().collect::<Vec<_>>();
    sorted.sort_by_key(|idx| chunk_graph.chunk_table[*idx].exec_order);
    chunk_graph.sorted_chunk_idx_vec = sorted;
  }

  fn compute_rendered_hashes(&mut self, chunk_graph: &mut ChunkGraph) {
    for chunk_idx in chunk_graph.chunk_table.indices().collect::<Vec<_>>() {
      let hash =
        compute_rendered_hash(chunk_idx, chunk_graph, self.link_output, self.plugin_driver);
      chunk_graph.chunk_table[chunk_idx].render.rendered_hash = Some(hash);
    }
  }
}
