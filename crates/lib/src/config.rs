use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_DIRECTORY;

/// Configuration for a [`Store`](crate::store::Store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Directory holding value, options and temp files.
  pub directory: PathBuf,
  /// Optional namespace; keys become `<prefix>__<key>`.
  pub prefix: Option<String>,
  /// Write indented multi-line files instead of single-line ones.
  pub pretty: bool,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      directory: PathBuf::from(DEFAULT_DIRECTORY),
      prefix: None,
      pretty: true,
    }
  }
}

impl CacheConfig {
  pub fn new(directory: impl AsRef<Path>) -> Self {
    Self {
      directory: directory.as_ref().to_path_buf(),
      ..Self::default()
    }
  }

  pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.prefix = Some(prefix.into());
    self
  }

  pub fn with_pretty(mut self, pretty: bool) -> Self {
    self.pretty = pretty;
    self
  }
}
