use anyhow::{Context, Result};

use fscache_lib::Store;

use crate::output::{OutputFormat, format_bytes, print_json, print_stat, print_success};

pub fn cmd_clear(store: &Store, output: OutputFormat) -> Result<()> {
  let stats = store.clear_all().context("Failed to clear cache directory")?;

  if output.is_json() {
    print_json(&stats)?;
  } else {
    print_success("Cache cleared");
    print_stat("Files removed", &stats.files_removed.to_string());
    print_stat("Space freed", &format_bytes(stats.bytes_freed));
  }

  Ok(())
}
