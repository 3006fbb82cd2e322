mod generate_stage;
mod graph;
mod plugin;
mod utils;

pub(crate) mod types;

pub use crate::{
  generate_stage::GenerateStage,
  graph::ChunkGraph,
  plugin::{OutputPlugin, PluginDriver, RenderChunkOutput},
  types::{bundle_output::BundleOutput, link_output::LinkOutput},
  utils::normalize_options::normalize_options,
};
pub use bindle_common::*;
