use bindle_common::OutputChunk;
use bindle_error::BuildDiagnostic;

#[derive(Debug, Default)]
pub struct BundleOutput {
  pub assets: Vec<OutputChunk>,
  pub warnings: Vec<BuildDiagnostic>,
}
