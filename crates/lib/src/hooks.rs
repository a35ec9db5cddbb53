//! Pluggable value transforms.
//!
//! A [`Store`](crate::store::Store) can hold two transforms: `before_set` runs on a
//! value before it is encoded, and `before_get` runs on a decoded value before it is
//! returned to the caller.

use std::fmt;
use std::sync::Arc;

use crate::codec::Value;

pub trait ValueTransform: Send + Sync {
  fn transform(&self, value: Value) -> Value;
}

impl<F> ValueTransform for F
where
  F: Fn(Value) -> Value + Send + Sync,
{
  fn transform(&self, value: Value) -> Value {
    self(value)
  }
}

/// Shared handle to a transform.
pub type Transform = Arc<dyn ValueTransform>;

/// The pair of transforms captured by an entry.
#[derive(Clone, Default)]
pub struct Hooks {
  pub before_set: Option<Transform>,
  pub before_get: Option<Transform>,
}

impl Hooks {
  pub(crate) fn on_set(&self, value: Value) -> Value {
    match &self.before_set {
      Some(hook) => hook.transform(value),
      None => value,
    }
  }

  pub(crate) fn on_get(&self, value: Value) -> Value {
    match &self.before_get {
      Some(hook) => hook.transform(value),
      None => value,
    }
  }
}

impl fmt::Debug for Hooks {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Hooks")
      .field("before_set", &self.before_set.is_some())
      .field("before_get", &self.before_get.is_some())
      .finish()
  }
}
