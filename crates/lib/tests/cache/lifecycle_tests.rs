//! End-to-end entry lifecycles through the public API.

use std::collections::BTreeMap;

use fscache_lib::{Lookup, SetOptions, Value, WriteOutcome};

use super::common::{create_test_store, file_names};

mod values {
  use super::*;

  #[test]
  fn structured_value_survives_a_new_store() {
    let (temp, store) = create_test_store();

    let mut map = BTreeMap::new();
    map.insert("name".to_string(), Value::from("widget"));
    map.insert("sizes".to_string(), Value::from(vec![Value::Int(1), Value::Float(2.5)]));
    map.insert("extra".to_string(), Value::Null);
    let value = Value::Map(map);

    store.resolve("item").unwrap().set(value.clone()).unwrap();

    let fresh = fscache_lib::Store::new(fscache_lib::CacheConfig::new(temp.path()));
    assert_eq!(fresh.resolve("item").unwrap().get().unwrap(), Lookup::Value(value));
  }

  #[test]
  fn null_is_a_value_not_an_absence() {
    let (_temp, store) = create_test_store();
    let entry = store.resolve("nothing").unwrap();

    entry.set(Value::Null).unwrap();
    assert_eq!(entry.get().unwrap(), Lookup::Value(Value::Null));
  }

  #[test]
  fn non_finite_float_is_rejected_and_nothing_is_written() {
    let (temp, store) = create_test_store();
    let entry = store.resolve("nan").unwrap();

    assert!(entry.set(f64::NAN).is_err());
    assert!(file_names(temp.path()).is_empty());
  }

  #[test]
  fn overwrite_replaces_whole_value() {
    let (temp, store) = create_test_store();
    let entry = store.resolve("k").unwrap();

    entry.set("a much longer first value than the second").unwrap();
    entry.set("short").unwrap();

    assert_eq!(entry.get().unwrap().into_value(), Some(Value::from("short")));
    assert_eq!(file_names(temp.path()), vec!["k"]);
  }
}

mod options {
  use super::*;

  #[test]
  fn ttl_and_lock_are_shared_with_later_stores() {
    let (temp, store) = create_test_store();
    let entry = store.resolve("k").unwrap();

    let outcome = entry.set_with(1, SetOptions::new().ttl(3600).lock(true)).unwrap();
    assert_eq!(outcome, WriteOutcome::Written);

    let fresh = fscache_lib::Store::new(fscache_lib::CacheConfig::new(temp.path()));
    let reopened = fresh.resolve("k").unwrap();
    let options = reopened.options();
    assert!(options.lock);
    assert!(!options.never_expires());
    assert!(reopened.is_valid());

    assert_eq!(reopened.set(2).unwrap(), WriteOutcome::Locked);
    assert_eq!(reopened.get().unwrap().into_value(), Some(Value::Int(1)));
  }

  #[test]
  fn zero_ttl_expires_immediately_after_a_second() {
    let (_temp, store) = create_test_store();
    let entry = store.resolve("k").unwrap();

    entry.set_with(1, SetOptions::new().ttl(0)).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(1100));

    assert!(!entry.is_valid());
    assert_eq!(entry.get().unwrap(), Lookup::Absent);
  }

  #[test]
  fn destroy_clears_files_and_options() {
    let (temp, store) = create_test_store();
    let entry = store.resolve("k").unwrap();

    entry.set_with(1, SetOptions::new().lock(true)).unwrap();
    assert_eq!(file_names(temp.path()), vec!["k", "k.opt"]);

    entry.destroy().unwrap();
    assert!(file_names(temp.path()).is_empty());
    assert!(!entry.options().lock);

    assert_eq!(entry.set(2).unwrap(), WriteOutcome::Written);
  }
}

mod hooks {
  use super::*;

  #[test]
  fn hooks_transform_on_the_way_in_and_out() {
    let (_temp, store) = create_test_store();
    store.set_before_set(|v: Value| match v {
      Value::Int(n) => Value::Int(n * 10),
      other => other,
    });
    store.set_before_get(|v: Value| match v {
      Value::Int(n) => Value::Int(n + 1),
      other => other,
    });

    let entry = store.resolve("k").unwrap();
    entry.set(4).unwrap();

    assert_eq!(entry.get().unwrap().into_value(), Some(Value::Int(41)));
  }
}
