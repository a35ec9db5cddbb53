//! Implementation of the `fscache set` command.

use std::time::Duration;

use anyhow::{Context, Result};

use fscache_lib::{SetOptions, Store, Value, WriteOutcome};

use crate::output::{OutputFormat, print_json, print_success, print_warning};

fn parse_value(text: &str, raw: bool) -> Result<Value> {
  if raw {
    return Ok(Value::from(text));
  }
  serde_json::from_str(text).with_context(|| format!("Value is not valid JSON (use --raw to store text): {}", text))
}

/// Whole seconds for a `--ttl`, rounding any fraction up so `500ms` still outlives
/// the current second.
fn ttl_seconds(ttl: Duration) -> u64 {
  ttl.as_secs().saturating_add(u64::from(ttl.subsec_nanos() > 0))
}

pub fn cmd_set(
  store: &Store,
  key: &str,
  text: &str,
  raw: bool,
  ttl: Option<Duration>,
  lock: bool,
  output: OutputFormat,
) -> Result<()> {
  let value = parse_value(text, raw)?;
  store.init().context("Failed to prepare cache directory")?;

  let mut options = SetOptions::new();
  if let Some(ttl) = ttl {
    options = options.ttl(ttl_seconds(ttl));
  }
  if lock {
    options = options.lock(true);
  }

  let entry = store.resolve(key)?;
  let outcome = entry
    .set_with(value, options)
    .with_context(|| format!("Failed to store '{}'", key))?;

  if output.is_json() {
    print_json(&serde_json::json!({
      "key": key,
      "written": outcome.is_written(),
      "options": entry.options(),
    }))?;
  } else {
    match outcome {
      WriteOutcome::Written => print_success(&format!("Stored '{}'", key)),
      WriteOutcome::Locked => print_warning(&format!("'{}' is locked; value left unchanged", key)),
    }
  }

  Ok(())
}
