use predicates::prelude::*;

use super::common::{TestEnv, read};

#[test]
fn set_then_get_prints_value() {
  let env = TestEnv::new();

  env
    .fscache_cmd()
    .args(["set", "greeting", r#"{"text": "hi", "n": [1, 2.5, null]}"#])
    .assert()
    .success()
    .stdout(predicate::str::contains("Stored 'greeting'"));

  env
    .fscache_cmd()
    .args(["get", "greeting"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"text\": \"hi\""))
    .stdout(predicate::str::contains("2.5"));

  assert_eq!(env.cache_files(), vec!["greeting"]);
}

#[test]
fn get_json_reports_status() {
  let env = TestEnv::new();

  let missing = env.json(&["get", "k"]);
  assert_eq!(missing["status"], "absent");
  assert!(missing["value"].is_null());

  env.fscache_cmd().args(["set", "k", "--raw", "plain text"]).assert().success();

  let found = env.json(&["get", "k"]);
  assert_eq!(found["status"], "value");
  assert_eq!(found["value"], "plain text");
}

#[test]
fn empty_value_file_reports_empty() {
  let env = TestEnv::new();
  std::fs::write(env.cache_file("blank"), "").unwrap();

  let report = env.json(&["get", "blank"]);
  assert_eq!(report["status"], "empty");
}

#[test]
fn ttl_and_lock_are_persisted() {
  let env = TestEnv::new();

  env
    .fscache_cmd()
    .args(["set", "k", "1", "--ttl", "10m", "--lock"])
    .assert()
    .success();

  let options = env.json(&["options", "k"]);
  assert_eq!(options["lock"], true);
  assert!(options["expiry"].as_i64().unwrap() > 0);
  let remaining = options["ttl_remaining"].as_i64().unwrap();
  assert!((599..=600).contains(&remaining));

  assert!(read(&env.cache_file("k.opt")).contains("\"lock\": true"));
}

#[test]
fn locked_entry_ignores_set_until_unlocked() {
  let env = TestEnv::new();

  env.fscache_cmd().args(["set", "k", "1"]).assert().success();
  env.fscache_cmd().args(["lock", "k"]).assert().success();

  env
    .fscache_cmd()
    .args(["set", "k", "2"])
    .assert()
    .success()
    .stderr(predicate::str::contains("locked"));
  assert_eq!(env.json(&["get", "k"])["value"], 1);

  env.fscache_cmd().args(["unlock", "k"]).assert().success();
  let report = env.json(&["set", "k", "2"]);
  assert_eq!(report["written"], true);
  assert_eq!(env.json(&["get", "k"])["value"], 2);
}

#[test]
fn prefix_namespaces_keys() {
  let env = TestEnv::new();

  env.fscache_cmd().args(["--prefix", "ns1", "set", "x", "1"]).assert().success();
  env.fscache_cmd().args(["--prefix", "ns2", "get", "x"]).assert().code(1);
  env.fscache_cmd().args(["--prefix", "ns1", "get", "x"]).assert().success();

  assert_eq!(env.cache_files(), vec!["ns1__x"]);
}

#[test]
fn compact_writes_single_line() {
  let env = TestEnv::new();

  env
    .fscache_cmd()
    .args(["--compact", "set", "k", r#"{"a": [1, 2]}"#])
    .assert()
    .success();

  let text = read(&env.cache_file("k"));
  assert!(!text.contains('\n'));
  assert_eq!(env.json(&["get", "k"])["value"]["a"][1], 2);
}

#[test]
fn destroy_removes_files_and_is_idempotent() {
  let env = TestEnv::new();

  env.fscache_cmd().args(["set", "k", "1", "--lock"]).assert().success();
  env.fscache_cmd().args(["destroy", "k"]).assert().success();
  assert!(env.cache_files().is_empty());

  env.fscache_cmd().args(["destroy", "k"]).assert().success();
}

#[test]
fn clear_removes_all_files_but_not_subdirectories() {
  let env = TestEnv::new();

  env.fscache_cmd().args(["set", "a", "1", "--ttl", "1h"]).assert().success();
  env.fscache_cmd().args(["set", "b", "2"]).assert().success();
  std::fs::create_dir_all(env.cache_file("nested")).unwrap();

  let stats = env.json(&["clear"]);
  assert_eq!(stats["files_removed"], 3);

  assert_eq!(env.cache_files(), vec!["nested"]);
  env.fscache_cmd().args(["get", "a"]).assert().code(1);
}

#[test]
fn info_counts_orphaned_temp_files() {
  let env = TestEnv::new();

  env.fscache_cmd().args(["set", "a", "1", "--lock"]).assert().success();
  std::fs::write(env.cache_file("a.0123456789abcdef.tmp"), "partial").unwrap();

  let info = env.json(&["info"]);
  assert_eq!(info["stats"]["value_files"], 1);
  assert_eq!(info["stats"]["options_files"], 1);
  assert_eq!(info["stats"]["temp_files"], 1);

  env
    .fscache_cmd()
    .arg("info")
    .assert()
    .success()
    .stderr(predicate::str::contains("Temp files"));
}

#[test]
fn sub_second_ttl_keeps_entry_readable() {
  let env = TestEnv::new();

  env
    .fscache_cmd()
    .args(["set", "k", "1", "--ttl", "500ms"])
    .assert()
    .success();

  let options = env.json(&["options", "k"]);
  assert!(options["ttl_remaining"].as_i64().unwrap() <= 1);
  env.fscache_cmd().args(["get", "k"]).assert().success();
}
