//! A single cache slot.
//!
//! An [`Entry`] pairs a value file with its options file and mirrors the options in
//! memory. The value file is written through [`crate::atomic`], so a reader sees
//! either the previous complete value or the new one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::atomic::write_atomic;
use crate::codec::{self, Value};
use crate::error::{CacheError, Result};
use crate::hooks::Hooks;
use crate::options::{EntryOptions, MetadataRecord, OptionsPatch, now_secs};

/// Result of reading an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
  /// No value file, or the entry has expired.
  Absent,
  /// The value file exists but holds no value.
  Empty,
  /// A stored value.
  Value(Value),
}

impl Lookup {
  pub fn is_absent(&self) -> bool {
    matches!(self, Lookup::Absent)
  }

  pub fn value(&self) -> Option<&Value> {
    match self {
      Lookup::Value(value) => Some(value),
      _ => None,
    }
  }

  pub fn into_value(self) -> Option<Value> {
    match self {
      Lookup::Value(value) => Some(value),
      _ => None,
    }
  }
}

/// What a `set` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
  Written,
  /// The entry is locked; nothing was written.
  Locked,
}

impl WriteOutcome {
  pub fn is_written(self) -> bool {
    matches!(self, WriteOutcome::Written)
  }
}

/// Optional option changes applied together with a write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
  /// Seconds from now until the entry expires.
  pub ttl: Option<u64>,
  pub lock: Option<bool>,
}

impl SetOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn ttl(mut self, seconds: u64) -> Self {
    self.ttl = Some(seconds);
    self
  }

  pub fn lock(mut self, lock: bool) -> Self {
    self.lock = Some(lock);
    self
  }

  fn to_patch(self, now: i64) -> OptionsPatch {
    OptionsPatch {
      expiry: self
        .ttl
        .map(|ttl| now.saturating_add(i64::try_from(ttl).unwrap_or(i64::MAX))),
      lock: self.lock,
    }
  }
}

/// Settings an entry captures when it is constructed.
#[derive(Debug, Clone, Default)]
pub struct EntrySettings {
  pub pretty: bool,
  pub hooks: Hooks,
}

/// One cache slot: `<dir>/<key>` plus `<dir>/<key>.opt`.
#[derive(Debug)]
pub struct Entry {
  key: String,
  dir: PathBuf,
  settings: EntrySettings,
  metadata: MetadataRecord,
  options: Mutex<EntryOptions>,
}

impl Entry {
  /// Open the entry for an effective key, loading its options from disk.
  ///
  /// An unreadable or corrupt options file is logged and replaced by defaults.
  pub fn open(dir: &Path, key: &str, settings: EntrySettings) -> Self {
    let metadata = MetadataRecord::new(dir, key);
    let options = metadata.load_or_default();
    debug!(key = %key, dir = %dir.display(), expiry = options.expiry, lock = options.lock, "opened entry");

    Self {
      key: key.to_string(),
      dir: dir.to_path_buf(),
      settings,
      metadata,
      options: Mutex::new(options),
    }
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  pub fn directory(&self) -> &Path {
    &self.dir
  }

  /// Path of the value file.
  pub fn path(&self) -> PathBuf {
    self.dir.join(&self.key)
  }

  /// Path of the options file.
  pub fn options_path(&self) -> PathBuf {
    self.metadata.path()
  }

  fn guard(&self) -> MutexGuard<'_, EntryOptions> {
    self.options.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Snapshot of the in-memory options.
  pub fn options(&self) -> EntryOptions {
    *self.guard()
  }

  /// True when the value file exists and the entry has not expired.
  pub fn is_valid(&self) -> bool {
    if self.options().is_expired_at(now_secs()) {
      return false;
    }
    self.path().is_file()
  }

  /// Seconds left before expiry, or `None` for an entry that never expires.
  pub fn ttl_remaining(&self) -> Option<i64> {
    let options = self.options();
    if options.never_expires() {
      return None;
    }
    Some(options.expiry.saturating_sub(now_secs()).max(0))
  }

  /// Store a value, keeping the current options.
  pub fn set(&self, value: impl Into<Value>) -> Result<WriteOutcome> {
    self.set_with(value, SetOptions::default())
  }

  /// Store a value and update the supplied options.
  ///
  /// A locked entry is left untouched and `WriteOutcome::Locked` is returned.
  /// Only the options given in `set_options` change; the rest are preserved.
  pub fn set_with(&self, value: impl Into<Value>, set_options: SetOptions) -> Result<WriteOutcome> {
    let mut options = self.guard();
    if options.lock {
      debug!(key = %self.key, "entry is locked, skipping write");
      return Ok(WriteOutcome::Locked);
    }

    let value = self.settings.hooks.on_set(value.into());
    let text = codec::encode(&value, self.settings.pretty).map_err(CacheError::Encode)?;
    write_atomic(&self.dir, &self.key, text.as_bytes())?;
    debug!(key = %self.key, bytes = text.len(), "stored value");

    let patch = set_options.to_patch(now_secs());
    if !patch.is_empty() {
      let mut next = *options;
      next.apply(&patch);
      self.metadata.save(&next, self.settings.pretty)?;
      *options = next;
    }

    Ok(WriteOutcome::Written)
  }

  /// Read the stored value.
  ///
  /// Missing and expired entries are [`Lookup::Absent`]; a corrupt value file is
  /// an error.
  pub fn get(&self) -> Result<Lookup> {
    if !self.is_valid() {
      debug!(key = %self.key, "cache miss");
      return Ok(Lookup::Absent);
    }

    let path = self.path();
    let text = match fs::read_to_string(&path) {
      Ok(text) => text,
      // Removed between the validity check and the read.
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Lookup::Absent),
      Err(source) => return Err(CacheError::Read { path, source }),
    };

    match codec::decode(&text) {
      Ok(Some(value)) => {
        debug!(key = %self.key, "cache hit");
        Ok(Lookup::Value(self.settings.hooks.on_get(value)))
      }
      Ok(None) => Ok(Lookup::Empty),
      Err(source) => Err(CacheError::Decode { path, source }),
    }
  }

  /// Set the lock flag and persist it.
  pub fn lock(&self) -> Result<()> {
    self.update_options(OptionsPatch::new().lock(true))
  }

  /// Clear the lock flag and persist it.
  pub fn unlock(&self) -> Result<()> {
    self.update_options(OptionsPatch::new().lock(false))
  }

  /// Merge `patch` into the options and persist the result.
  ///
  /// The in-memory options only change once the options file is written.
  pub fn update_options(&self, patch: OptionsPatch) -> Result<()> {
    let mut options = self.guard();
    let mut next = *options;
    next.apply(&patch);
    self.metadata.save(&next, self.settings.pretty)?;
    *options = next;
    Ok(())
  }

  /// Re-read the options file, picking up changes made by other processes.
  pub fn reload_options(&self) -> EntryOptions {
    let mut options = self.guard();
    *options = self.metadata.load_or_default();
    *options
  }

  /// Remove the value and options files.
  ///
  /// Files that are already gone are not an error. The in-memory options are
  /// reset to defaults.
  pub fn destroy(&self) -> Result<()> {
    let mut options = self.guard();
    let path = self.path();
    match fs::remove_file(&path) {
      Ok(()) => {}
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(source) => return Err(CacheError::Remove { path, source }),
    }
    self.metadata.remove()?;
    *options = EntryOptions::default();

    debug!(key = %self.key, "destroyed entry");
    Ok(())
  }
}
