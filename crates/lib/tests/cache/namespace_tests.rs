//! Prefixes, directories and whole-directory operations.

use fscache_lib::{CacheConfig, Lookup, Store, Value};
use tempfile::TempDir;

use super::common::{create_test_store, file_names};

#[test]
fn prefixed_and_unprefixed_keys_do_not_collide() {
  let (temp, store) = create_test_store();
  store.set_prefix("app");

  store.resolve("x").unwrap().set(1).unwrap();
  store.resolve_unprefixed("x").unwrap().set(2).unwrap();

  assert_eq!(file_names(temp.path()), vec!["app__x", "x"]);
  assert_eq!(store.resolve("x").unwrap().get().unwrap().into_value(), Some(Value::Int(1)));

  store.clear_prefix();
  assert_eq!(store.resolve("x").unwrap().get().unwrap().into_value(), Some(Value::Int(2)));
}

#[test]
fn same_key_in_two_directories_are_separate_entries() {
  let first = TempDir::new().unwrap();
  let second = TempDir::new().unwrap();
  let store = Store::new(CacheConfig::new(first.path()));

  let a = store.resolve("k").unwrap();
  store.set_directory(second.path());
  let b = store.resolve("k").unwrap();

  a.set("first").unwrap();
  assert_eq!(b.get().unwrap(), Lookup::Absent);
  assert_eq!(a.directory(), first.path());
  assert_eq!(b.directory(), second.path());
}

#[test]
fn clear_all_leaves_other_directories_alone() {
  let (temp, store) = create_test_store();
  let other = TempDir::new().unwrap();
  let other_store = Store::new(CacheConfig::new(other.path()));

  store.resolve("a").unwrap().set(1).unwrap();
  other_store.resolve("a").unwrap().set(1).unwrap();

  let stats = store.clear_all().unwrap();
  assert_eq!(stats.files_removed, 1);
  assert!(file_names(temp.path()).is_empty());
  assert_eq!(file_names(other.path()), vec!["a"]);
}

#[test]
fn invalid_keys_never_touch_the_filesystem() {
  let (temp, store) = create_test_store();

  for key in ["", "..", "a/b", "a\\b", "k.opt", "k.tmp"] {
    assert!(store.resolve(key).is_err(), "key {:?} should be rejected", key);
  }
  assert!(file_names(temp.path()).is_empty());
}
