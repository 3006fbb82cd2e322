use std::path::Path;

use arcstr::ArcStr;
use bindle_utils::{indexmap::FxIndexSet, path_ext::PathExt, rstr::Rstr};
use sugar_path::SugarPath;

use crate::{ModuleId, ModuleIdx, SymbolRef};

#[derive(Debug)]
pub struct ExternalModule {
  pub idx: ModuleIdx,
  pub id: ModuleId,
  pub exec_order: u32,
  /// Path written into import statements. Defaults to `id` until
  /// `set_render_path` runs.
  pub render_path: Option<ArcStr>,
  /// Absolute external ids are rewritten relative to the input base so output
  /// stays machine-independent.
  pub renormalize_render_path: bool,
  /// Legal identifier used when the module is bound to a namespace object.
  pub variable_name: String,
  pub namespace_ref: SymbolRef,
  pub exports_names: bool,
  pub exports_namespace: bool,
  /// Names the module is known to expose.
  pub declarations: FxIndexSet<Rstr>,
  pub side_effects: bool,
}

impl ExternalModule {
  pub fn set_render_path(&mut self, input_base: &Path) {
    if self.renormalize_render_path && self.id.as_path().is_absolute() {
      self.render_path = Some(self.id.as_path().relative(input_base).expect_to_slash().into());
    }
  }

  pub fn render_path(&self) -> &str {
    self.render_path.as_deref().unwrap_or(&self.id)
  }

  pub fn exports_default(&self) -> bool {
    self.declarations.contains("default")
  }
}
