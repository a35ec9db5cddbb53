//! Per-entry options and their sidecar file.
//!
//! # Storage Layout
//!
//! ```text
//! {dir}/
//! ├── <key>        # value envelope
//! └── <key>.opt    # options envelope: {"expiry": <epoch secs | -1>, "lock": <bool>}
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::atomic::write_atomic;
use crate::codec::{self, CodecError, Value};
use crate::consts::{NEVER_EXPIRES, OPTIONS_SUFFIX};
use crate::error::{CacheError, Result};

/// Current wall-clock time in epoch seconds.
pub fn now_secs() -> i64 {
  let secs = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .unwrap_or_default()
    .as_secs();
  i64::try_from(secs).unwrap_or(i64::MAX)
}

/// Expiry and lock state of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOptions {
  /// Expiry as epoch seconds, or `-1` for never.
  pub expiry: i64,
  /// Advisory flag; a locked entry ignores `set`.
  pub lock: bool,
}

impl Default for EntryOptions {
  fn default() -> Self {
    Self {
      expiry: NEVER_EXPIRES,
      lock: false,
    }
  }
}

impl EntryOptions {
  pub fn never_expires(&self) -> bool {
    self.expiry == NEVER_EXPIRES
  }

  /// An entry is expired once `now` has moved strictly past its expiry.
  pub fn is_expired_at(&self, now: i64) -> bool {
    !self.never_expires() && self.expiry < now
  }

  /// Shallow merge: only the fields present in `patch` change.
  pub fn apply(&mut self, patch: &OptionsPatch) {
    if let Some(expiry) = patch.expiry {
      self.expiry = expiry;
    }
    if let Some(lock) = patch.lock {
      self.lock = lock;
    }
  }

  fn to_value(self) -> Value {
    let mut map = BTreeMap::new();
    map.insert("expiry".to_string(), Value::Int(self.expiry));
    map.insert("lock".to_string(), Value::Bool(self.lock));
    Value::Map(map)
  }

  /// Read options back from a decoded map; absent fields keep their defaults.
  fn from_value(value: &Value) -> std::result::Result<Self, CodecError> {
    let map = value
      .as_map()
      .ok_or_else(|| CodecError::Shape("options must be a map".to_string()))?;

    let mut options = Self::default();
    if let Some(expiry) = map.get("expiry") {
      options.expiry = expiry
        .as_i64()
        .ok_or_else(|| CodecError::Shape(format!("expiry must be an integer, got {:?}", expiry)))?;
    }
    if let Some(lock) = map.get("lock") {
      options.lock = lock
        .as_bool()
        .ok_or_else(|| CodecError::Shape(format!("lock must be a boolean, got {:?}", lock)))?;
    }
    Ok(options)
  }
}

/// A partial update to [`EntryOptions`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionsPatch {
  pub expiry: Option<i64>,
  pub lock: Option<bool>,
}

impl OptionsPatch {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn expiry(mut self, expiry: i64) -> Self {
    self.expiry = Some(expiry);
    self
  }

  pub fn lock(mut self, lock: bool) -> Self {
    self.lock = Some(lock);
    self
  }

  pub fn is_empty(&self) -> bool {
    self.expiry.is_none() && self.lock.is_none()
  }
}

/// The `<key>.opt` file that persists an entry's options.
///
/// It shares the atomic write path with value files but carries no options of its
/// own.
#[derive(Debug, Clone)]
pub struct MetadataRecord {
  dir: PathBuf,
  name: String,
}

impl MetadataRecord {
  pub fn new(dir: &Path, key: &str) -> Self {
    Self {
      dir: dir.to_path_buf(),
      name: format!("{}{}", key, OPTIONS_SUFFIX),
    }
  }

  pub fn path(&self) -> PathBuf {
    self.dir.join(&self.name)
  }

  pub fn exists(&self) -> bool {
    self.path().is_file()
  }

  /// Load the stored options.
  ///
  /// Returns `Ok(None)` if the options file does not exist.
  pub fn load(&self) -> Result<Option<EntryOptions>> {
    let path = self.path();

    let text = match fs::read_to_string(&path) {
      Ok(text) => text,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
      Err(source) => return Err(CacheError::Read { path, source }),
    };

    let value = codec::decode(&text)
      .and_then(|value| value.ok_or_else(|| CodecError::Shape("options file holds no value".to_string())))
      .map_err(|source| CacheError::Decode {
        path: path.clone(),
        source,
      })?;

    let options = EntryOptions::from_value(&value).map_err(|source| CacheError::Decode { path, source })?;
    Ok(Some(options))
  }

  /// Load the stored options, falling back to defaults when the file is missing,
  /// unreadable or corrupt.
  pub fn load_or_default(&self) -> EntryOptions {
    match self.load() {
      Ok(Some(options)) => options,
      Ok(None) => EntryOptions::default(),
      Err(e) => {
        warn!(path = %self.path().display(), error = %e, "ignoring unusable options file, using defaults");
        EntryOptions::default()
      }
    }
  }

  /// Persist options with the atomic write protocol.
  pub fn save(&self, options: &EntryOptions, pretty: bool) -> Result<()> {
    let text = codec::encode(&options.to_value(), pretty).map_err(CacheError::Encode)?;
    write_atomic(&self.dir, &self.name, text.as_bytes())?;
    debug!(path = %self.path().display(), expiry = options.expiry, lock = options.lock, "saved options");
    Ok(())
  }

  /// Remove the options file. A missing file is not an error.
  pub fn remove(&self) -> Result<()> {
    let path = self.path();
    match fs::remove_file(&path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
      Err(source) => Err(CacheError::Remove { path, source }),
    }
  }
}
