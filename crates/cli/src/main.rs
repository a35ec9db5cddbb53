mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use fscache_lib::paths::default_cache_dir;
use fscache_lib::{CacheConfig, Store};

use crate::output::{OutputFormat, print_error};

/// fscache - filesystem-backed key-value cache
#[derive(Parser)]
#[command(name = "fscache")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Cache directory (default: $FSCACHE_DIR, else the platform cache directory)
  #[arg(short, long, global = true)]
  dir: Option<PathBuf>,

  /// Namespace keys as `<prefix>__<key>`
  #[arg(short, long, global = true)]
  prefix: Option<String>,

  /// Write single-line files instead of indented ones
  #[arg(long, global = true)]
  compact: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t)]
  output: OutputFormat,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the value stored under a key
  Get { key: String },

  /// Store a JSON value under a key
  Set {
    key: String,

    /// JSON text, or any text with --raw
    value: String,

    /// Store the value as a plain string instead of parsing JSON
    #[arg(long)]
    raw: bool,

    /// Expire the entry after this long (e.g. 30s, 5m, 2h)
    #[arg(long, value_parser = humantime::parse_duration)]
    ttl: Option<Duration>,

    /// Lock the entry after writing
    #[arg(long)]
    lock: bool,
  },

  /// Lock an entry so further writes are ignored
  Lock { key: String },

  /// Unlock an entry
  Unlock { key: String },

  /// Show the expiry and lock state of an entry
  Options { key: String },

  /// Remove an entry and its options file
  Destroy { key: String },

  /// Remove every file in the cache directory
  Clear,

  /// Summarize the cache directory
  Info,
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn build_store(cli: &Cli) -> Store {
  let directory = cli.dir.clone().unwrap_or_else(default_cache_dir);
  let directory = dunce::canonicalize(&directory).unwrap_or(directory);
  debug!(dir = %directory.display(), prefix = ?cli.prefix, "using cache directory");

  let mut config = CacheConfig::new(directory).with_pretty(!cli.compact);
  if let Some(prefix) = &cli.prefix {
    config = config.with_prefix(prefix.clone());
  }
  Store::new(config)
}

fn run(cli: Cli) -> Result<ExitCode> {
  let store = build_store(&cli);
  let output = cli.output;

  match cli.command {
    Commands::Get { key } => {
      let found = cmd::cmd_get(&store, &key, output)?;
      return Ok(if found { ExitCode::SUCCESS } else { ExitCode::from(1) });
    }
    Commands::Set {
      key,
      value,
      raw,
      ttl,
      lock,
    } => cmd::cmd_set(&store, &key, &value, raw, ttl, lock, output)?,
    Commands::Lock { key } => cmd::cmd_lock(&store, &key, true, output)?,
    Commands::Unlock { key } => cmd::cmd_lock(&store, &key, false, output)?,
    Commands::Options { key } => cmd::cmd_options(&store, &key, output)?,
    Commands::Destroy { key } => cmd::cmd_destroy(&store, &key, output)?,
    Commands::Clear => cmd::cmd_clear(&store, output)?,
    Commands::Info => cmd::cmd_info(&store, output)?,
  }

  Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli) {
    Ok(code) => code,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::from(2)
    }
  }
}
