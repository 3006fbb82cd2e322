/// User-supplied text stitched around the finalised chunk. `banner`/`footer`
/// land outside the format wrapper, `intro`/`outro` inside it.
#[derive(Debug, Default, Clone)]
pub struct NormalizedAddons {
  pub banner: Option<String>,
  pub footer: Option<String>,
  pub intro: Option<String>,
  pub outro: Option<String>,
}

impl NormalizedAddons {
  /// Stable fingerprint folded into the chunk content hash.
  pub fn fingerprint(&self) -> String {
    [&self.intro, &self.outro, &self.banner, &self.footer]
      .iter()
      .map(|part| part.as_deref().unwrap_or(""))
      .collect::<Vec<_>>()
      .join(":")
  }
}
