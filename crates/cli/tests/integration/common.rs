//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated test environment.
///
/// Each test gets its own temporary cache directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// Cache directory (isolated per test).
  pub fn cache_path(&self) -> PathBuf {
    let p = self.temp.path().join("cache");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Path of a file inside the cache directory.
  pub fn cache_file(&self, name: &str) -> PathBuf {
    self.cache_path().join(name)
  }

  /// Names of the files currently in the cache directory, sorted.
  pub fn cache_files(&self) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(self.cache_path())
      .unwrap()
      .flatten()
      .map(|e| e.file_name().to_string_lossy().into_owned())
      .collect();
    names.sort();
    names
  }

  /// Get a pre-configured Command for the fscache binary.
  ///
  /// Sets `FSCACHE_DIR` to the isolated cache path and clears `RUST_LOG`.
  pub fn fscache_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("fscache");
    cmd.env("FSCACHE_DIR", self.cache_path());
    cmd.env_remove("RUST_LOG");
    cmd
  }

  /// Run `fscache -o json <args>` and parse stdout.
  pub fn json(&self, args: &[&str]) -> serde_json::Value {
    let output = self.fscache_cmd().args(["-o", "json"]).args(args).output().unwrap();
    serde_json::from_slice(&output.stdout)
      .unwrap_or_else(|e| panic!("invalid JSON from {:?}: {} ({:?})", args, e, output))
  }
}

pub fn read(path: &Path) -> String {
  std::fs::read_to_string(path).unwrap()
}
