//! Atomic file replacement.
//!
//! A write is split in two steps. [`stage`] creates a uniquely named temp file next
//! to the target with a create-exclusive open, writes the contents and syncs them.
//! [`StagedFile::commit`] renames the temp file over the target. The rename is the
//! commit point: readers see either the previous complete file or the new one.
//!
//! A process that dies between the two steps leaves an orphaned temp file behind
//! (`<name>.<token>.tmp`) and the target untouched. Nothing removes those orphans
//! automatically; [`crate::store::Store::scan`] reports them.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::consts::TMP_SUFFIX;
use crate::error::{CacheError, Result};

/// Contents written to a temp file that has not been committed yet.
#[derive(Debug)]
#[must_use = "a staged file is not visible until it is committed"]
pub struct StagedFile {
  temp_path: PathBuf,
  final_path: PathBuf,
}

/// Name of a fresh temp file for `name`.
fn temp_name(name: &str) -> String {
  format!("{}.{}{}", name, Uuid::new_v4().simple(), TMP_SUFFIX)
}

/// Write `contents` to a new temp file in `dir` destined for `dir/name`.
///
/// Fails if the temp file already exists, the directory is missing or the write
/// does not complete. A partially written temp file is removed before returning.
pub fn stage(dir: &Path, name: &str, contents: &[u8]) -> Result<StagedFile> {
  let temp_path = dir.join(temp_name(name));
  let final_path = dir.join(name);

  let mut file = OpenOptions::new()
    .write(true)
    .create_new(true)
    .open(&temp_path)
    .map_err(|source| CacheError::Write {
      path: temp_path.clone(),
      source,
    })?;

  if let Err(source) = file.write_all(contents).and_then(|()| file.sync_all()) {
    drop(file);
    remove_quietly(&temp_path);
    return Err(CacheError::Write { path: temp_path, source });
  }

  debug!(temp = %temp_path.display(), bytes = contents.len(), "staged temp file");
  Ok(StagedFile { temp_path, final_path })
}

/// Stage and commit in one call.
pub fn write_atomic(dir: &Path, name: &str, contents: &[u8]) -> Result<PathBuf> {
  stage(dir, name, contents)?.commit()
}

impl StagedFile {
  pub fn temp_path(&self) -> &Path {
    &self.temp_path
  }

  pub fn final_path(&self) -> &Path {
    &self.final_path
  }

  /// Atomically replace the target with the staged contents.
  pub fn commit(self) -> Result<PathBuf> {
    if let Err(source) = fs::rename(&self.temp_path, &self.final_path) {
      remove_quietly(&self.temp_path);
      return Err(CacheError::Write {
        path: self.final_path,
        source,
      });
    }

    debug!(path = %self.final_path.display(), "committed file");
    Ok(self.final_path)
  }

  /// Drop the staged contents without touching the target.
  pub fn discard(self) -> Result<()> {
    fs::remove_file(&self.temp_path).map_err(|source| CacheError::Remove {
      path: self.temp_path,
      source,
    })
  }
}

fn remove_quietly(path: &Path) {
  if let Err(e) = fs::remove_file(path) {
    warn!(path = %path.display(), error = %e, "failed to clean up temp file");
  }
}
