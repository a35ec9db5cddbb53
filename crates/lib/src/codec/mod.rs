//! Text encoding for cached values.
//!
//! Every file the cache writes holds a small JSON envelope:
//!
//! ```json
//! {
//!   "format": 1,
//!   "value": { "answer": 42 }
//! }
//! ```
//!
//! The envelope is plain data and is never evaluated. A file that is empty, or an
//! envelope that has no `value` field, decodes to "no value" rather than an error.

mod value;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::consts::FORMAT_VERSION;

pub use value::Value;

#[derive(Debug, Error)]
pub enum CodecError {
  #[error("invalid JSON: {0}")]
  Json(#[source] serde_json::Error),

  #[error("cannot encode NaN or infinite floats")]
  NonFiniteFloat,

  #[error("unsupported format version {0} (expected {expected})", expected = FORMAT_VERSION)]
  UnsupportedFormat(u32),

  #[error("unexpected shape: {0}")]
  Shape(String),
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
  format: u32,
  value: &'a Value,
}

#[derive(Deserialize)]
struct Envelope {
  format: u32,
  #[serde(default, deserialize_with = "present")]
  value: Option<Value>,
}

// Keeps an explicit `null` as `Some(Value::Null)`; only a missing field is `None`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
  Value::deserialize(deserializer).map(Some)
}

/// Encode a value into envelope text.
///
/// `pretty` selects indented multi-line output; otherwise the envelope is written
/// on a single line. Both forms decode to the same value.
pub fn encode(value: &Value, pretty: bool) -> Result<String, CodecError> {
  if value.has_non_finite() {
    return Err(CodecError::NonFiniteFloat);
  }

  let envelope = EnvelopeRef {
    format: FORMAT_VERSION,
    value,
  };

  let text = if pretty {
    serde_json::to_string_pretty(&envelope)
  } else {
    serde_json::to_string(&envelope)
  };
  text.map_err(CodecError::Json)
}

/// Decode envelope text.
///
/// Returns `Ok(None)` when the text carries no value at all.
pub fn decode(text: &str) -> Result<Option<Value>, CodecError> {
  if text.trim().is_empty() {
    return Ok(None);
  }

  let envelope: Envelope = serde_json::from_str(text).map_err(CodecError::Json)?;
  if envelope.format != FORMAT_VERSION {
    return Err(CodecError::UnsupportedFormat(envelope.format));
  }

  Ok(envelope.value)
}
