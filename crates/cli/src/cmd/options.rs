use anyhow::Result;

use fscache_lib::Store;

use crate::output::{OutputFormat, format_ttl, print_info, print_json, print_stat};

/// Show the expiry and lock state of an entry.
pub fn cmd_options(store: &Store, key: &str, output: OutputFormat) -> Result<()> {
  let entry = store.resolve(key)?;
  let options = entry.options();
  let remaining = entry.ttl_remaining();

  if output.is_json() {
    print_json(&serde_json::json!({
      "key": key,
      "path": entry.path(),
      "valid": entry.is_valid(),
      "expiry": options.expiry,
      "ttl_remaining": remaining,
      "lock": options.lock,
    }))?;
    return Ok(());
  }

  print_info(&format!("Entry '{}'", entry.key()));
  print_stat("Path", &entry.path().display().to_string());
  print_stat("Valid", &entry.is_valid().to_string());
  let expiry = match remaining {
    None => "never".to_string(),
    Some(secs) => format!("{} ({})", options.expiry, format_ttl(secs.unsigned_abs())),
  };
  print_stat("Expiry", &expiry);
  print_stat("Locked", &options.lock.to_string());

  Ok(())
}
