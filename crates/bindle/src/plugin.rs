use std::sync::Arc;

use bindle_common::{NormalizedOutputOptions, PreRenderedChunk, RenderedChunk};
use bindle_error::BuildResult;
use bindle_sourcemap::SourceMap;
use futures::future::BoxFuture;

pub struct RenderChunkOutput {
  pub code: String,
  pub map: Option<SourceMap>,
}

/// The narrow plugin surface the chunk core consumes: one synchronous hash
/// augmentation hook and one asynchronous chunk transformation hook.
pub trait OutputPlugin: Send + Sync {
  fn name(&self) -> &'static str;

  /// Extra bytes folded into the chunk's content fingerprint.
  fn augment_chunk_hash(&self, _chunk: &PreRenderedChunk) -> Option<String> {
    None
  }

  fn render_chunk<'a>(
    &'a self,
    _code: &'a str,
    _chunk: &'a RenderedChunk,
    _options: &'a NormalizedOutputOptions,
  ) -> BoxFuture<'a, BuildResult<Option<RenderChunkOutput>>> {
    Box::pin(async { Ok(None) })
  }
}

#[derive(Default)]
pub struct PluginDriver {
  plugins: Vec<Arc<dyn OutputPlugin>>,
}

impl PluginDriver {
  pub fn new(plugins: Vec<Arc<dyn OutputPlugin>>) -> Self {
    Self { plugins }
  }

  /// Reduce `augmentChunkHash` contributions into a single hash seed.
  pub fn hook_augment_chunk_hash(&self, chunk: &PreRenderedChunk) -> String {
    let mut seed = String::new();
    for plugin in &self.plugins {
      if let Some(augment) = plugin.augment_chunk_hash(chunk) {
        seed.push_str(&augment);
      }
    }
    seed
  }

  /// Run the `renderChunk` chain. Each plugin sees the previous plugin's
  /// output; maps are collected for later collapsing. A failing plugin
  /// surfaces with its name attached.
  pub async fn hook_render_chunk(
    &self,
    mut code: String,
    chunk: &RenderedChunk,
    options: &NormalizedOutputOptions,
  ) -> BuildResult<(String, Vec<SourceMap>)> {
    let mut sourcemap_chain = Vec::new();
    for plugin in &self.plugins {
      let ret = plugin.render_chunk(&code, chunk, options).await.map_err(|mut errs| {
        errs.0 = errs
          .0
          .into_iter()
          .map(|err| err.context(format!("plugin \"{}\" failed in renderChunk", plugin.name())))
          .collect();
        errs
      })?;
      if let Some(output) = ret {
        code = output.code;
        if let Some(map) = output.map {
          sourcemap_chain.push(map);
        }
      }
    }
    Ok((code, sourcemap_chain))
  }
}
