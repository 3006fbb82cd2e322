use bindle_common::NormalizedOutputOptions;
use bindle_error::BuildResult;

/// Options that pin a single output file make no sense once the graph splits
/// into several chunks; reject them before any rendering work happens.
pub fn validate_options_for_multi_chunk_output(
  options: &NormalizedOutputOptions,
) -> BuildResult<()> {
  if options.file.is_some() {
    Err(anyhow::anyhow!(
      "Invalid value for option \"output.file\" - When building multiple chunks, the \"output.dir\" option must be used, not \"output.file\"."
    ))?;
  }
  if options.sourcemap_file.is_some() {
    Err(anyhow::anyhow!(
      "Invalid value for option \"output.sourcemapFile\" - \"output.sourcemapFile\" is only supported for single-file builds."
    ))?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::utils::normalize_options::normalize_options;
  use bindle_common::OutputOptions;

  #[test]
  fn dir_based_output_passes() {
    let options = normalize_options(OutputOptions::default());
    assert!(validate_options_for_multi_chunk_output(&options).is_ok());
  }

  #[test]
  fn file_option_is_rejected() {
    let options = normalize_options(OutputOptions {
      file: Some("bundle.js".to_string()),
      ..OutputOptions::default()
    });
    let err = validate_options_for_multi_chunk_output(&options).unwrap_err();
    assert!(err[0].to_string().contains("output.dir"));
  }

  #[test]
  fn sourcemap_file_is_single_file_only() {
    let options = normalize_options(OutputOptions {
      sourcemap_file: Some("bundle.js.map".to_string()),
      ..OutputOptions::default()
    });
    assert!(validate_options_for_multi_chunk_output(&options).is_err());
  }
}
