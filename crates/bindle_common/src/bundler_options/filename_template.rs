#[derive(Debug, Clone)]
pub struct FilenameTemplate {
  template: String,
}

#[derive(Debug, Default)]
pub struct FileNameRenderOptions<'me> {
  pub name: Option<&'me str>,
  pub hash: Option<&'me str>,
  pub format: Option<&'me str>,
  pub ext: Option<&'me str>,
  pub extname: Option<&'me str>,
}

impl FilenameTemplate {
  pub fn new(template: String) -> Self {
    Self { template }
  }

  pub fn template(&self) -> &str {
    &self.template
  }

  pub fn has_hash_pattern(&self) -> bool {
    self.template.contains("[hash]")
  }

  pub fn render(&self, options: &FileNameRenderOptions) -> String {
    let mut tmp = self.template.clone();
    if let Some(name) = options.name {
      tmp = tmp.replace("[name]", name);
    }
    if let Some(hash) = options.hash {
      tmp = tmp.replace("[hash]", hash);
    }
    if let Some(format) = options.format {
      tmp = tmp.replace("[format]", format);
    }
    if let Some(ext) = options.ext {
      tmp = tmp.replace("[ext]", ext);
    }
    if let Some(extname) = options.extname {
      tmp = tmp.replace("[extname]", extname);
    }
    tmp
  }
}

impl From<&str> for FilenameTemplate {
  fn from(template: &str) -> Self {
    Self::new(template.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn basic() {
    let tpl = FilenameTemplate::new("[name]-[hash].[format].js".to_string());
    assert!(tpl.has_hash_pattern());
    assert_eq!(
      tpl.render(&FileNameRenderOptions {
        name: Some("main"),
        hash: Some("abcd1234"),
        format: Some("es"),
        ..FileNameRenderOptions::default()
      }),
      "main-abcd1234.es.js"
    );
  }
}
