use bindle_common::{ChunkDependency, ChunkIdx, NormalizedAddons, NormalizedOutputOptions};
use bindle_utils::{concat_string, indexmap::FxIndexSet, xxhash::digest128_hex};
use xxhash_rust::xxh3::Xxh3;

use crate::{
  generate_stage::generate_chunk_ids::chunk_filename_without_hash,
  graph::ChunkGraph,
  plugin::PluginDriver,
  types::link_output::LinkOutput,
  utils::chunk::generate_rendered_chunk::generate_pre_rendered_chunk,
};

pub const HASH_LEN: usize = 8;

/// Fingerprint of one chunk alone: plugin augmentation, the pre-rendered
/// source, and the shape of its exports. Pure in its inputs, so it is
/// computed once after `pre_render` and memoised on the chunk.
pub fn compute_rendered_hash(
  chunk_idx: ChunkIdx,
  chunk_graph: &ChunkGraph,
  link_output: &LinkOutput,
  plugin_driver: &PluginDriver,
) -> String {
  let chunk = &chunk_graph.chunk_table[chunk_idx];
  let symbol_db = &link_output.symbol_db;
  let mut hasher = Xxh3::default();

  let pre_rendered_chunk = generate_pre_rendered_chunk(chunk_idx, chunk_graph, link_output);
  hasher.update(plugin_driver.hook_augment_chunk_hash(&pre_rendered_chunk).as_bytes());

  hasher.update(
    chunk.render.rendered_source_text.as_deref().expect("hash runs after pre_render").as_bytes(),
  );

  let export_fingerprint = chunk
    .get_export_names()
    .iter()
    .map(|name| {
      let symbol = chunk.exports_by_name[name];
      let canonical = symbol.canonical_ref(symbol_db);
      let owner = link_output.module_table[canonical.owner].stable_id();
      concat_string!(owner, ":", canonical.name(symbol_db), ":", name)
    })
    .collect::<Vec<_>>()
    .join(",");
  hasher.update(export_fingerprint.as_bytes());

  digest128_hex(hasher.digest128())
}

/// Content hash of a chunk including everything reachable through its
/// dependency edges, so a change anywhere downstream changes this chunk's
/// hashed filename. Dependency filenames are absorbed with their hash
/// pattern left in place to break the recursion.
pub fn content_hash_with_dependencies(
  chunk_idx: ChunkIdx,
  chunk_graph: &ChunkGraph,
  link_output: &LinkOutput,
  options: &NormalizedOutputOptions,
  addons: &NormalizedAddons,
) -> String {
  let mut hasher = Xxh3::default();
  hasher.update(addons.fingerprint().as_bytes());
  hasher.update(options.format.to_string().as_bytes());

  let mut visited_chunks = FxIndexSet::default();
  let mut visited_externals = FxIndexSet::default();
  visited_chunks.insert(chunk_idx);

  let mut cursor = 0;
  while cursor < visited_chunks.len() {
    let current_idx = *visited_chunks.get_index(cursor).expect("cursor is in bounds");
    cursor += 1;
    let current = &chunk_graph.chunk_table[current_idx];

    hasher.update(
      current.render.rendered_hash.as_deref().expect("hash runs after pre_render").as_bytes(),
    );
    hasher.update(
      chunk_filename_without_hash(current_idx, chunk_graph, link_output, options).as_bytes(),
    );

    for dep in current.dependencies.iter().chain(current.dynamic_dependencies.iter()) {
      match dep {
        ChunkDependency::Chunk(idx) => {
          visited_chunks.insert(*idx);
        }
        ChunkDependency::External(idx) => {
          if visited_externals.insert(*idx) {
            let external = link_output.module_table[*idx]
              .as_external()
              .expect("dependency must be external");
            hasher.update(concat_string!(":", external.render_path()).as_bytes());
          }
        }
      }
    }
  }

  let mut digest = digest128_hex(hasher.digest128());
  digest.truncate(HASH_LEN);
  digest
}
