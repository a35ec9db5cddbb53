//! Summary of the cache directory.

use anyhow::{Context, Result};

use fscache_lib::Store;

use crate::output::{OutputFormat, format_bytes, print_info, print_json, print_stat, print_warning};

pub fn cmd_info(store: &Store, output: OutputFormat) -> Result<()> {
  let config = store.config();
  let stats = store.scan().context("Failed to scan cache directory")?;

  if output.is_json() {
    print_json(&serde_json::json!({
      "directory": config.directory,
      "prefix": config.prefix,
      "pretty": config.pretty,
      "stats": stats,
    }))?;
    return Ok(());
  }

  print_info(&format!("fscache v{}", env!("CARGO_PKG_VERSION")));
  print_stat("Directory", &config.directory.display().to_string());
  print_stat("Prefix", config.prefix.as_deref().unwrap_or("(none)"));
  print_stat("Values", &stats.value_files.to_string());
  print_stat("Options files", &stats.options_files.to_string());
  print_stat("Temp files", &stats.temp_files.to_string());
  print_stat("Size", &format_bytes(stats.total_bytes));

  if stats.temp_files > 0 {
    print_warning("Temp files are left by interrupted writes and can be removed with 'fscache clear'");
  }

  Ok(())
}
