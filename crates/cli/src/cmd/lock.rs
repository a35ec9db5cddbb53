use anyhow::{Context, Result};

use fscache_lib::Store;

use crate::output::{OutputFormat, print_json, print_success};

/// Set or clear the lock flag of an entry.
pub fn cmd_lock(store: &Store, key: &str, lock: bool, output: OutputFormat) -> Result<()> {
  store.init().context("Failed to prepare cache directory")?;
  let entry = store.resolve(key)?;

  let result = if lock { entry.lock() } else { entry.unlock() };
  result.with_context(|| format!("Failed to update options of '{}'", key))?;

  if output.is_json() {
    print_json(&serde_json::json!({ "key": key, "options": entry.options() }))?;
  } else if lock {
    print_success(&format!("Locked '{}'", key));
  } else {
    print_success(&format!("Unlocked '{}'", key));
  }

  Ok(())
}
