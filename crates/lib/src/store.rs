//! Entry registry and cache-wide configuration.
//!
//! A [`Store`] hands out one shared [`Entry`] per directory and effective key, so
//! every caller in the process observes the same in-memory options. Configuration
//! changes apply to entries constructed afterwards; entries already handed out keep
//! the directory, pretty-print flag and hooks they were built with.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::CacheConfig;
use crate::consts::{OPTIONS_SUFFIX, PREFIX_SEPARATOR, TMP_SUFFIX};
use crate::entry::{Entry, EntrySettings};
use crate::error::{CacheError, Result};
use crate::hooks::{Hooks, Transform, ValueTransform};

/// Outcome of [`Store::clear_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearStats {
  pub files_removed: usize,
  pub bytes_freed: u64,
}

/// Summary of the files in the cache directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryStats {
  pub value_files: usize,
  pub options_files: usize,
  /// Temp files left behind by writers that never committed.
  pub temp_files: usize,
  pub total_bytes: u64,
}

type RegistryKey = (PathBuf, String);

pub struct Store {
  config: RwLock<CacheConfig>,
  hooks: RwLock<Hooks>,
  entries: Mutex<HashMap<RegistryKey, Arc<Entry>>>,
}

/// Check that a key names a single plain file inside the cache directory.
pub fn validate_key(key: &str) -> Result<()> {
  let reason = if key.is_empty() {
    Some("key is empty")
  } else if key == "." || key == ".." {
    Some("key is a relative path component")
  } else if key.contains(['/', '\\', '\0']) {
    Some("key contains a path separator or NUL")
  } else if key.ends_with(OPTIONS_SUFFIX) || key.ends_with(TMP_SUFFIX) {
    Some("key ends with a reserved suffix")
  } else {
    None
  };

  match reason {
    Some(reason) => Err(CacheError::InvalidKey {
      key: key.to_string(),
      reason,
    }),
    None => Ok(()),
  }
}

impl Store {
  pub fn new(config: CacheConfig) -> Self {
    Self {
      config: RwLock::new(config),
      hooks: RwLock::new(Hooks::default()),
      entries: Mutex::new(HashMap::new()),
    }
  }

  /// Snapshot of the current configuration.
  pub fn config(&self) -> CacheConfig {
    self.config.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  pub fn directory(&self) -> PathBuf {
    self.config().directory
  }

  /// Create the cache directory if it does not exist.
  pub fn init(&self) -> Result<()> {
    let path = self.directory();
    fs::create_dir_all(&path).map_err(|source| CacheError::CreateDir {
      path: path.clone(),
      source,
    })?;
    debug!(dir = %path.display(), "cache directory ready");
    Ok(())
  }

  fn update_config(&self, f: impl FnOnce(&mut CacheConfig)) {
    let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
    f(&mut config);
  }

  fn update_hooks(&self, f: impl FnOnce(&mut Hooks)) {
    let mut hooks = self.hooks.write().unwrap_or_else(PoisonError::into_inner);
    f(&mut hooks);
  }

  pub fn set_directory(&self, directory: impl AsRef<Path>) {
    let directory = directory.as_ref().to_path_buf();
    self.update_config(|config| config.directory = directory);
  }

  /// Set the key namespace. An empty prefix disables prefixing.
  pub fn set_prefix(&self, prefix: impl Into<String>) {
    let prefix = prefix.into();
    self.update_config(|config| config.prefix = Some(prefix).filter(|p| !p.is_empty()));
  }

  pub fn clear_prefix(&self) {
    self.update_config(|config| config.prefix = None);
  }

  pub fn set_pretty(&self, pretty: bool) {
    self.update_config(|config| config.pretty = pretty);
  }

  /// Transform applied to values before they are encoded.
  pub fn set_before_set(&self, transform: impl ValueTransform + 'static) {
    let transform: Transform = Arc::new(transform);
    self.update_hooks(|hooks| hooks.before_set = Some(transform));
  }

  /// Transform applied to decoded values before they are returned.
  pub fn set_before_get(&self, transform: impl ValueTransform + 'static) {
    let transform: Transform = Arc::new(transform);
    self.update_hooks(|hooks| hooks.before_get = Some(transform));
  }

  pub fn clear_before_set(&self) {
    self.update_hooks(|hooks| hooks.before_set = None);
  }

  pub fn clear_before_get(&self) {
    self.update_hooks(|hooks| hooks.before_get = None);
  }

  /// The key as it appears on disk, with the prefix applied when requested.
  pub fn effective_key(&self, key: &str, use_prefix: bool) -> Result<String> {
    validate_key(key)?;
    let effective = match self.config().prefix {
      Some(prefix) if use_prefix && !prefix.is_empty() => format!("{}{}{}", prefix, PREFIX_SEPARATOR, key),
      _ => key.to_string(),
    };
    validate_key(&effective)?;
    Ok(effective)
  }

  /// Shared entry for `key` in the current namespace.
  pub fn resolve(&self, key: &str) -> Result<Arc<Entry>> {
    self.resolve_with(key, true)
  }

  /// Shared entry for `key`, ignoring any configured prefix.
  pub fn resolve_unprefixed(&self, key: &str) -> Result<Arc<Entry>> {
    self.resolve_with(key, false)
  }

  fn resolve_with(&self, key: &str, use_prefix: bool) -> Result<Arc<Entry>> {
    let effective = self.effective_key(key, use_prefix)?;
    let config = self.config();
    let registry_key = (normalize_directory(&config.directory), effective);

    let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(entry) = entries.get(&registry_key) {
      return Ok(Arc::clone(entry));
    }

    let settings = EntrySettings {
      pretty: config.pretty,
      hooks: self.hooks.read().unwrap_or_else(PoisonError::into_inner).clone(),
    };
    let entry = Arc::new(Entry::open(&registry_key.0, &registry_key.1, settings));
    entries.insert(registry_key, Arc::clone(&entry));
    Ok(entry)
  }

  /// Delete every regular file directly inside the cache directory.
  ///
  /// Subdirectories and symlinks are left alone and the registry is not touched;
  /// entries handed out earlier simply report their values as absent. A missing
  /// directory counts as already clear.
  pub fn clear_all(&self) -> Result<ClearStats> {
    let dir = self.directory();
    let mut stats = ClearStats::default();

    for (path, size) in list_files(&dir)? {
      match fs::remove_file(&path) {
        Ok(()) => {
          stats.files_removed += 1;
          stats.bytes_freed += size;
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => return Err(CacheError::Remove { path, source }),
      }
    }

    info!(
      dir = %dir.display(),
      files_removed = stats.files_removed,
      bytes_freed = stats.bytes_freed,
      "cleared cache directory"
    );
    Ok(stats)
  }

  /// Count the value, options and orphaned temp files in the cache directory.
  pub fn scan(&self) -> Result<DirectoryStats> {
    let mut stats = DirectoryStats::default();

    for (path, size) in list_files(&self.directory())? {
      let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
      if name.ends_with(TMP_SUFFIX) {
        stats.temp_files += 1;
      } else if name.ends_with(OPTIONS_SUFFIX) {
        stats.options_files += 1;
      } else {
        stats.value_files += 1;
      }
      stats.total_bytes += size;
    }

    Ok(stats)
  }
}

/// Absolute, lexically cleaned form of `dir`, so `tmp`, `./tmp` and `tmp/` share
/// registry slots. Symlinks and `..` are left as written.
fn normalize_directory(dir: &Path) -> PathBuf {
  let absolute = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
  absolute.components().collect()
}

/// Regular files directly under `dir` with their sizes.
fn list_files(dir: &Path) -> Result<Vec<(PathBuf, u64)>> {
  let read_dir_err = |source: io::Error| CacheError::ReadDir {
    path: dir.to_path_buf(),
    source,
  };

  let entries = match fs::read_dir(dir) {
    Ok(entries) => entries,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
    Err(e) => return Err(read_dir_err(e)),
  };

  let mut files = Vec::new();
  for entry in entries {
    let entry = entry.map_err(read_dir_err)?;
    let file_type = entry.file_type().map_err(read_dir_err)?;
    if !file_type.is_file() {
      continue;
    }
    let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
    files.push((entry.path(), size));
  }
  Ok(files)
}
