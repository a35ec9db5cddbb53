//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output including colored status
//! messages, human-readable byte/duration formatting, and Unicode symbols.

use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub fn format_bytes(bytes: u64) -> String {
  const UNITS: [&str; 3] = ["KB", "MB", "GB"];

  let mut size = bytes as f64;
  let mut unit = None;
  for next in UNITS {
    if size < 1024.0 {
      break;
    }
    size /= 1024.0;
    unit = Some(next);
  }

  match unit {
    Some(unit) => format!("{:.1} {}", size, unit),
    None => format!("{} B", bytes),
  }
}

/// Render a remaining lifetime in whole seconds, e.g. `1h 2m 5s`.
pub fn format_ttl(seconds: u64) -> String {
  if seconds == 0 {
    return "expired".to_string();
  }
  humantime::format_duration(Duration::from_secs(seconds)).to_string()
}

pub fn print_success(message: &str) {
  println!("{} {}", "✓".if_supports_color(Stream::Stdout, |s| s.green()), message);
}

pub fn print_info(message: &str) {
  println!("{} {}", "•".if_supports_color(Stream::Stdout, |s| s.blue()), message);
}

/// Errors and warnings go to stderr so `-o json` output stays parseable.
pub fn print_error(message: &str) {
  let line = format!("✗ {}", message);
  eprintln!("{}", line.if_supports_color(Stream::Stderr, |s| s.red()));
}

pub fn print_warning(message: &str) {
  let line = format!("⚠ {}", message);
  eprintln!("{}", line.if_supports_color(Stream::Stderr, |s| s.yellow()));
}

pub fn print_stat(label: &str, value: &str) {
  println!("  {}: {}", label.if_supports_color(Stream::Stdout, |s| s.dimmed()), value);
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
