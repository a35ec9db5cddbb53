//! Implementation of the `fscache get` command.

use anyhow::{Context, Result};
use serde::Serialize;

use fscache_lib::{Lookup, Store, Value};

use crate::output::{OutputFormat, print_json, print_warning};

#[derive(Serialize)]
struct GetReport<'a> {
  key: &'a str,
  status: &'static str,
  value: Option<&'a Value>,
}

/// Print the value stored under `key`.
///
/// Returns `false` when the entry is missing or expired.
pub fn cmd_get(store: &Store, key: &str, output: OutputFormat) -> Result<bool> {
  let entry = store.resolve(key)?;
  let lookup = entry.get().with_context(|| format!("Failed to read '{}'", key))?;

  let status = match &lookup {
    Lookup::Absent => "absent",
    Lookup::Empty => "empty",
    Lookup::Value(_) => "value",
  };

  if output.is_json() {
    print_json(&GetReport {
      key,
      status,
      value: lookup.value(),
    })?;
  } else {
    match &lookup {
      Lookup::Absent => print_warning(&format!("'{}' is not cached or has expired", key)),
      Lookup::Empty => print_warning(&format!("'{}' holds no value", key)),
      Lookup::Value(value) => {
        let text = serde_json::to_string_pretty(value).context("Failed to render value")?;
        println!("{}", text);
      }
    }
  }

  Ok(!lookup.is_absent())
}
