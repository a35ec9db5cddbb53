use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec::CodecError;

/// Errors surfaced by cache operations.
///
/// A missing or expired value and a write skipped because of the lock flag are
/// not errors; see [`crate::entry::Lookup`] and [`crate::entry::WriteOutcome`].
#[derive(Debug, Error)]
pub enum CacheError {
  #[error("invalid cache key {key:?}: {reason}")]
  InvalidKey { key: String, reason: &'static str },

  #[error("failed to create cache directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to remove {path}: {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to list cache directory {path}: {source}")]
  ReadDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to encode value: {0}")]
  Encode(#[source] CodecError),

  #[error("failed to decode {path}: {source}")]
  Decode {
    path: PathBuf,
    #[source]
    source: CodecError,
  },
}

pub type Result<T, E = CacheError> = std::result::Result<T, E>;
