//! Default cache directory resolution for front ends.
//!
//! The store itself never reads the environment; callers such as the CLI use
//! [`default_cache_dir`] to pick a directory when none is given.

use std::path::PathBuf;

use crate::consts::{APP_NAME, DEFAULT_DIRECTORY};

/// Environment variable that overrides the cache directory.
pub const CACHE_DIR_ENV: &str = "FSCACHE_DIR";

fn non_empty_var(name: &str) -> Option<PathBuf> {
  std::env::var_os(name).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// Returns the user's home directory, if known.
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  non_empty_var("USERPROFILE")
}

/// Returns the user's home directory, if known.
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  non_empty_var("HOME")
}

/// Returns the directory cached values go to when none is configured.
///
/// `$FSCACHE_DIR` wins; otherwise the platform cache directory is used:
/// - Linux/macOS: `$XDG_CACHE_HOME/fscache` or `~/.cache/fscache`
/// - Windows: `%LOCALAPPDATA%\fscache\Cache`
///
/// Falls back to a relative `tmp` directory if no home directory can be found.
pub fn default_cache_dir() -> PathBuf {
  non_empty_var(CACHE_DIR_ENV)
    .or_else(platform_cache_dir)
    .unwrap_or_else(|| PathBuf::from(DEFAULT_DIRECTORY))
}

#[cfg(windows)]
fn platform_cache_dir() -> Option<PathBuf> {
  non_empty_var("LOCALAPPDATA").map(|p| p.join(APP_NAME).join("Cache"))
}

#[cfg(not(windows))]
fn platform_cache_dir() -> Option<PathBuf> {
  non_empty_var("XDG_CACHE_HOME")
    .or_else(|| home_dir().map(|home| home.join(".cache")))
    .map(|base| base.join(APP_NAME))
}
