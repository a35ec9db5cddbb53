//! Implementation of the `fscache destroy` command.

use anyhow::{Context, Result};

use fscache_lib::Store;

use crate::output::{OutputFormat, print_json, print_success};

/// Remove the value and options files of an entry.
///
/// Destroying an entry that does not exist succeeds.
pub fn cmd_destroy(store: &Store, key: &str, output: OutputFormat) -> Result<()> {
  let entry = store.resolve(key)?;
  entry
    .destroy()
    .with_context(|| format!("Failed to destroy '{}'", key))?;

  if output.is_json() {
    print_json(&serde_json::json!({ "key": key, "destroyed": true }))?;
  } else {
    print_success(&format!("Destroyed '{}'", key));
  }

  Ok(())
}
