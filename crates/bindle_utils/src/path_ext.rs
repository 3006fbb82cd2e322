use std::{borrow::Cow, path::Path};

use sugar_path::SugarPath;

pub trait PathExt {
  /// Slash-form rendering for paths that land in emitted import statements
  /// and source maps. Output must not vary with the host separator, or
  /// filename hashes stop being machine-independent.
  fn expect_to_slash(&self) -> String;

  /// The stem a chunk's `[name]` derives from. Directory-entry files
  /// (`index`, `mod`) name their directory instead, so `vue/index.js` yields
  /// `vue` rather than a bundle full of `index-*.js` chunks.
  fn representative_file_name(&self) -> Cow<str>;
}

impl PathExt for Path {
  fn expect_to_slash(&self) -> String {
    match self.to_slash() {
      Some(slashed) => slashed.into_owned(),
      None => panic!("emitted path {:?} is not valid utf8", self.display()),
    }
  }

  fn representative_file_name(&self) -> Cow<str> {
    let stem = match self.file_stem() {
      Some(stem) => stem.to_string_lossy(),
      None => return self.to_string_lossy(),
    };
    if !matches!(&*stem, "index" | "mod") {
      return stem;
    }
    self.parent().and_then(Path::file_stem).map_or(stem, |dir| dir.to_string_lossy())
  }
}

/// Compute the `./`-prefixed relative path from the directory of `importer`
/// to `target`, in slash form. Both paths must live under a common base.
pub fn relative_import_path(importer: &Path, target: &Path) -> String {
  let importer_dir = importer.parent().unwrap_or_else(|| Path::new("."));
  let relative = target.relative(importer_dir);
  let relative = relative.as_path().expect_to_slash();
  if relative.starts_with('.') { relative } else { format!("./{relative}") }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::Path;

  #[test]
  fn representative_name_prefers_the_stem() {
    assert_eq!(Path::new("project/src/vue.js").representative_file_name(), "vue");
  }

  #[test]
  fn directory_entry_files_name_their_directory() {
    assert_eq!(Path::new("project/vue/index.js").representative_file_name(), "vue");
    assert_eq!(Path::new("project/vue/mod.ts").representative_file_name(), "vue");
  }

  #[test]
  fn test_relative_import_path() {
    assert_eq!(
      relative_import_path(Path::new("dist/main.js"), Path::new("dist/chunks/dep.js")),
      "./chunks/dep.js"
    );
    assert_eq!(
      relative_import_path(Path::new("dist/chunks/dep.js"), Path::new("dist/main.js")),
      "../main.js"
    );
  }
}
