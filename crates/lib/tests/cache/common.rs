use std::path::Path;

use fscache_lib::{CacheConfig, Store};
use tempfile::TempDir;

/// Store rooted in a fresh temporary directory.
pub fn create_test_store() -> (TempDir, Store) {
  let temp = TempDir::new().unwrap();
  let store = Store::new(CacheConfig::new(temp.path()));
  store.init().unwrap();
  (temp, store)
}

pub fn file_names(dir: &Path) -> Vec<String> {
  let mut names: Vec<String> = std::fs::read_dir(dir)
    .unwrap()
    .flatten()
    .map(|e| e.file_name().to_string_lossy().into_owned())
    .collect();
  names.sort();
  names
}
