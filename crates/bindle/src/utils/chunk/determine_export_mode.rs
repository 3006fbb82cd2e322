use arcstr::ArcStr;
use bindle_common::{ExportMode, NormalModule, OutputExports};
use bindle_error::{BuildDiagnostic, BuildResult};
use bindle_utils::rstr::Rstr;

/// Pick how an entry chunk exposes its exports, honoring the user's
/// `exports` option and warning on mixed default/named entry signatures.
pub fn determine_export_mode(
  warnings: &mut Vec<BuildDiagnostic>,
  exports_option: OutputExports,
  chunk_name: &ArcStr,
  module: &NormalModule,
  export_names: &[Rstr],
) -> BuildResult<ExportMode> {
  match exports_option {
    OutputExports::Named => Ok(ExportMode::Named),
    OutputExports::Default => {
      if export_names.len() != 1 || export_names[0].as_str() != "default" {
        Err(anyhow::anyhow!(
          r#""default" was specified for "output.exports", but entry module "{}" has the following exports: {}."#,
          module.stable_id.as_str(),
          export_names.iter().map(|k| format!(r#""{k}""#)).collect::<Vec<_>>().join(", ")
        ))?;
      }
      Ok(ExportMode::Default)
    }
    OutputExports::None => {
      if !export_names.is_empty() {
        Err(anyhow::anyhow!(
          r#""none" was specified for "output.exports", but entry module "{}" has the following exports: {}."#,
          module.stable_id.as_str(),
          export_names.iter().map(|k| format!(r#""{k}""#)).collect::<Vec<_>>().join(", ")
        ))?;
      }
      Ok(ExportMode::None)
    }
    OutputExports::Auto => {
      if export_names.is_empty() {
        Ok(ExportMode::None)
      } else if export_names.len() == 1 && export_names[0].as_str() == "default" {
        Ok(ExportMode::Default)
      } else {
        if export_names.iter().any(|name| name.as_str() == "default") {
          warnings.push(BuildDiagnostic::mixed_exports(
            module.stable_id.as_str(),
            chunk_name,
            &export_names.iter().map(ToString::to_string).collect::<Vec<_>>(),
          ));
        }
        Ok(ExportMode::Named)
      }
    }
  }
}
