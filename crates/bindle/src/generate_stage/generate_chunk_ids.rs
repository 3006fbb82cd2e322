use std::path::Path;

use arcstr::ArcStr;
use bindle_common::{
  ChunkIdx, FileNameRenderOptions, FilenameTemplate, NormalizedOutputOptions,
};
use bindle_error::BuildResult;
use bindle_utils::{concat_string, path_ext::PathExt, sanitize_file_name::sanitize_file_name};
use rustc_hash::FxHashSet;
use sugar_path::SugarPath;

use crate::{
  graph::ChunkGraph,
  types::link_output::LinkOutput,
  utils::chunk::compute_content_hash::content_hash_with_dependencies,
};

use super::GenerateStage;

const KNOWN_JS_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

impl GenerateStage<'_> {
  /// Give every chunk a stable, user-meaningful `[name]`. Chunk names may
  /// repeat; only filenames are deduplicated.
  pub fn assign_chunk_names(&mut self, chunk_graph: &mut ChunkGraph) {
    let modules = &self.link_output.module_table;

    for chunk in chunk_graph.chunk_table.iter_mut() {
      if chunk.name.is_some() {
        continue;
      }

      if let Some(alias) = &chunk.manual_chunk_alias {
        chunk.name = Some(alias.clone());
        continue;
      }

      let name_source = chunk.facade_module.or_else(|| chunk.entry_modules.first().copied());
      let generated = match name_source.and_then(|idx| modules[idx].as_normal()) {
        Some(module) => {
          let path = module.id.as_path();
          if module.is_user_defined_entry {
            path
              .file_stem()
              .and_then(|stem| stem.to_str())
              .map_or(arcstr::literal!("input"), |stem| ArcStr::from(sanitize_file_name(stem)))
          } else {
            ArcStr::from(sanitize_file_name(&path.representative_file_name()))
          }
        }
        None => {
          let last_module =
            chunk.modules.iter().rev().find_map(|idx| modules[*idx].as_normal());
          last_module.map_or(arcstr::literal!("chunk"), |module| {
            ArcStr::from(sanitize_file_name(&module.id.as_path().representative_file_name()))
          })
        }
      };
      chunk.name = Some(generated);
    }
  }

  /// Apply filename patterns, fold in the content hash where requested, and
  /// disambiguate collisions. Filenames must be stable across builds and os.
  pub fn generate_chunk_ids(&mut self, chunk_graph: &mut ChunkGraph) -> BuildResult<()> {
    let mut existing_names = FxHashSet::default();

    for chunk_idx in chunk_graph.sorted_chunk_idx_vec.clone() {
      if chunk_graph.chunk_table[chunk_idx].id.is_some() {
        continue;
      }

      let id = if self.options.preserve_modules {
        self.generate_id_preserve_modules(chunk_graph, chunk_idx, &mut existing_names)
      } else {
        self.generate_id(chunk_graph, chunk_idx, &mut existing_names, true)
      };
      chunk_graph.chunk_table[chunk_idx].id = Some(ArcStr::from(id));
    }

    Ok(())
  }

  fn generate_id(
    &self,
    chunk_graph: &ChunkGraph,
    chunk_idx: ChunkIdx,
    existing_names: &mut FxHashSet<String>,
    include_hash: bool,
  ) -> String {
    let chunk = &chunk_graph.chunk_table[chunk_idx];
    if let Some(file_name) = &chunk.file_name {
      existing_names.insert(file_name.to_string());
      return file_name.to_string();
    }

    let template = FilenameTemplate::new(chunk_pattern(chunk_graph, chunk_idx, self.link_output, self.options));
    let hash = (include_hash && template.has_hash_pattern()).then(|| {
      content_hash_with_dependencies(
        chunk_idx,
        chunk_graph,
        self.link_output,
        self.options,
        &self.addons,
      )
    });

    let rendered = template.render(&FileNameRenderOptions {
      name: chunk.name.as_deref(),
      hash: hash.as_deref(),
      format: Some(&self.options.format.to_string()),
      ..FileNameRenderOptions::default()
    });

    make_unique(rendered, existing_names)
  }

  /// Derive the filename from the module's own path so the on-disk layout
  /// mirrors the input tree. Virtual modules land under `_virtual/`.
  fn generate_id_preserve_modules(
    &self,
    chunk_graph: &ChunkGraph,
    chunk_idx: ChunkIdx,
    existing_names: &mut FxHashSet<String>,
  ) -> String {
    let chunk = &chunk_graph.chunk_table[chunk_idx];
    let module = chunk
      .modules
      .first()
      .and_then(|idx| self.link_output.module_table[*idx].as_normal())
      .expect("preserve-modules chunk holds exactly one module");

    let path = module.id.as_path();
    let candidate = if path.is_absolute() {
      let ext = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
      let extname = if ext.is_empty() { String::new() } else { concat_string!(".", ext) };
      let pattern = if KNOWN_JS_EXTENSIONS.contains(&ext)
        || self.options.entry_filenames != "[name].js"
      {
        self.options.entry_filenames.clone()
      } else {
        "[name][extname].js".to_string()
      };
      let stem = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("input");
      let rendered = FilenameTemplate::new(pattern).render(&FileNameRenderOptions {
        name: Some(stem),
        ext: Some(ext),
        extname: Some(&extname),
        format: Some(&self.options.format.to_string()),
        ..FileNameRenderOptions::default()
      });
      let dir = path.parent().unwrap_or(path);
      let relative_dir = dir.relative(&self.input_base);
      if relative_dir.as_os_str().is_empty() {
        rendered
      } else {
        relative_dir.join(rendered).as_path().expect_to_slash()
      }
    } else {
      concat_string!("_virtual/", sanitize_file_name(virtual_basename(&module.id)))
    };

    make_unique(candidate, existing_names)
  }
}

/// The stem of a virtual id: `\0virtual:foo` keeps only `foo`.
fn virtual_basename(id: &str) -> &str {
  let trimmed = id.trim_start_matches('\0');
  trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed)
}

fn chunk_pattern(
  chunk_graph: &ChunkGraph,
  chunk_idx: ChunkIdx,
  link_output: &LinkOutput,
  options: &NormalizedOutputOptions,
) -> String {
  let chunk = &chunk_graph.chunk_table[chunk_idx];
  let is_user_entry_facade = chunk
    .facade_module
    .and_then(|idx| link_output.module_table[idx].as_normal())
    .is_some_and(|module| module.is_user_defined_entry);
  if is_user_entry_facade {
    options.entry_filenames.clone()
  } else {
    options.chunk_filenames.clone()
  }
}

/// The filename a chunk would get with its `[hash]` pattern left in place.
/// Hashing dependencies by this name breaks the hash/filename cycle.
pub fn chunk_filename_without_hash(
  chunk_idx: ChunkIdx,
  chunk_graph: &ChunkGraph,
  link_output: &LinkOutput,
  options: &NormalizedOutputOptions,
) -> String {
  let chunk = &chunk_graph.chunk_table[chunk_idx];
  if let Some(file_name) = &chunk.file_name {
    return file_name.to_string();
  }
  FilenameTemplate::new(chunk_pattern(chunk_graph, chunk_idx, link_output, options)).render(
    &FileNameRenderOptions {
      name: chunk.name.as_deref(),
      hash: None,
      format: Some(&options.format.to_string()),
      ..FileNameRenderOptions::default()
    },
  )
}

fn make_unique(candidate: String, existing_names: &mut FxHashSet<String>) -> String {
  if existing_names.insert(candidate.clone()) {
    return candidate;
  }
  let path = Path::new(&candidate);
  let stem = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or(&candidate);
  let ext = path.extension().and_then(|ext| ext.to_str()).map(|ext| concat_string!(".", ext));
  let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());

  let mut counter = 2u32;
  loop {
    let mut next = concat_string!(stem, itoa::Buffer::new().format(counter));
    if let Some(ext) = &ext {
      next.push_str(ext);
    }
    let next = match parent {
      Some(parent) => parent.join(next).as_path().expect_to_slash(),
      None => next,
    };
    if existing_names.insert(next.clone()) {
      return next;
    }
    counter += 1;
  }
}
