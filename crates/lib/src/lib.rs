//! fscache-lib: a filesystem-backed key-value cache.
//!
//! Values live in plain files under a cache directory, each paired with a
//! `<key>.opt` file recording its expiry and an advisory lock flag:
//! - `Store`: hands out one shared `Entry` per key and holds configuration
//! - `Entry`: one cache slot with `set`, `get`, `lock`, `unlock` and `destroy`
//! - `codec`: the `Value` universe and its versioned JSON envelope
//! - `atomic`: temp-file-then-rename writes used for every file
//!
//! ```no_run
//! use fscache_lib::{CacheConfig, Lookup, SetOptions, Store};
//!
//! # fn main() -> Result<(), fscache_lib::CacheError> {
//! let store = Store::new(CacheConfig::new("/tmp/fscache").with_prefix("app"));
//! store.init()?;
//!
//! let entry = store.resolve("greeting")?;
//! entry.set_with("hello", SetOptions::new().ttl(60))?;
//!
//! if let Lookup::Value(value) = entry.get()? {
//!   println!("{:?}", value);
//! }
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod codec;
pub mod config;
pub mod consts;
pub mod entry;
pub mod error;
pub mod hooks;
pub mod options;
pub mod paths;
pub mod store;

pub use codec::Value;
pub use config::CacheConfig;
pub use entry::{Entry, Lookup, SetOptions, WriteOutcome};
pub use error::CacheError;
pub use options::{EntryOptions, OptionsPatch};
pub use store::Store;
