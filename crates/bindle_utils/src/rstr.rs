use std::{borrow::Borrow, fmt, ops::Deref};

use arcstr::ArcStr;

/// Cheaply clonable string used for identifier-ish data such as symbol names,
/// export names and chunk aliases.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rstr(ArcStr);

impl Rstr {
  pub fn new(value: &str) -> Self {
    Self(ArcStr::from(value))
  }

  pub fn as_str(&self) -> &str {
    self.0.as_str()
  }
}

impl Deref for Rstr {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    self.as_str()
  }
}

impl AsRef<str> for Rstr {
  fn as_ref(&self) -> &str {
    self.as_str()
  }
}

impl Borrow<str> for Rstr {
  fn borrow(&self) -> &str {
    self.as_str()
  }
}

impl fmt::Display for Rstr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

impl From<&str> for Rstr {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl From<String> for Rstr {
  fn from(value: String) -> Self {
    Self(ArcStr::from(value))
  }
}

impl From<ArcStr> for Rstr {
  fn from(value: ArcStr) -> Self {
    Self(value)
  }
}

impl PartialEq<str> for Rstr {
  fn eq(&self, other: &str) -> bool {
    self.as_str() == other
  }
}

impl PartialEq<&str> for Rstr {
  fn eq(&self, other: &&str) -> bool {
    self.as_str() == *other
  }
}

pub trait ToRstr {
  fn to_rstr(&self) -> Rstr;
}

impl ToRstr for str {
  fn to_rstr(&self) -> Rstr {
    Rstr::new(self)
  }
}

impl ToRstr for String {
  fn to_rstr(&self) -> Rstr {
    Rstr::new(self)
  }
}

impl ToRstr for ArcStr {
  fn to_rstr(&self) -> Rstr {
    Rstr(self.clone())
  }
}
