//! The structured value universe stored by the cache.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, DeserializeOwned, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::CodecError;

/// A value that can be stored in and loaded from the cache.
///
/// Integers and floats are kept apart on round trip: `Int(1)` and `Float(1.0)`
/// decode back to the variant they were written as.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
  #[default]
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  String(String),
  List(Vec<Value>),
  Map(BTreeMap<String, Value>),
}

impl Value {
  /// Convert any serializable type into a `Value`.
  pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, CodecError> {
    let json = serde_json::to_value(value).map_err(CodecError::Json)?;
    serde_json::from_value(json).map_err(CodecError::Json)
  }

  /// Convert this value into any deserializable type.
  pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, CodecError> {
    let json = serde_json::to_value(self).map_err(CodecError::Json)?;
    serde_json::from_value(json).map_err(CodecError::Json)
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Value::Int(i) => Some(*i),
      _ => None,
    }
  }

  /// Numeric view of the value; integers are widened.
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Value::Int(i) => Some(*i as f64),
      Value::Float(f) => Some(*f),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_list(&self) -> Option<&[Value]> {
    match self {
      Value::List(items) => Some(items),
      _ => None,
    }
  }

  pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
    match self {
      Value::Map(map) => Some(map),
      _ => None,
    }
  }

  /// Look up a field of a map value.
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.as_map().and_then(|map| map.get(key))
  }

  /// Returns true if a NaN or infinite float appears anywhere in the value.
  pub(crate) fn has_non_finite(&self) -> bool {
    match self {
      Value::Float(f) => !f.is_finite(),
      Value::List(items) => items.iter().any(Value::has_non_finite),
      Value::Map(map) => map.values().any(Value::has_non_finite),
      _ => false,
    }
  }
}

impl Serialize for Value {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Value::Null => serializer.serialize_unit(),
      Value::Bool(b) => serializer.serialize_bool(*b),
      Value::Int(i) => serializer.serialize_i64(*i),
      Value::Float(f) => {
        if !f.is_finite() {
          return Err(ser::Error::custom(format!("cannot encode non-finite float {}", f)));
        }
        serializer.serialize_f64(*f)
      }
      Value::String(s) => serializer.serialize_str(s),
      Value::List(items) => {
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items {
          seq.serialize_element(item)?;
        }
        seq.end()
      }
      Value::Map(map) => {
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (k, v) in map {
          out.serialize_entry(k, v)?;
        }
        out.end()
      }
    }
  }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
  type Value = Value;

  fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("null, a boolean, a number, a string, a list or a map")
  }

  fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
    Ok(Value::Null)
  }

  fn visit_none<E: de::Error>(self) -> Result<Value, E> {
    Ok(Value::Null)
  }

  fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
    Deserialize::deserialize(deserializer)
  }

  fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
    Ok(Value::Bool(v))
  }

  fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
    Ok(Value::Int(v))
  }

  fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
    Ok(match i64::try_from(v) {
      Ok(i) => Value::Int(i),
      Err(_) => Value::Float(v as f64),
    })
  }

  fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
    Ok(Value::Float(v))
  }

  fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
    Ok(Value::String(v.to_string()))
  }

  fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
    Ok(Value::String(v))
  }

  fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
    let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
    while let Some(item) = seq.next_element()? {
      items.push(item);
    }
    Ok(Value::List(items))
  }

  fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
    let mut map = BTreeMap::new();
    while let Some((k, v)) = access.next_entry::<String, Value>()? {
      map.insert(k, v);
    }
    Ok(Value::Map(map))
  }
}

impl<'de> Deserialize<'de> for Value {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    deserializer.deserialize_any(ValueVisitor)
  }
}

impl From<bool> for Value {
  fn from(v: bool) -> Self {
    Value::Bool(v)
  }
}

impl From<i64> for Value {
  fn from(v: i64) -> Self {
    Value::Int(v)
  }
}

impl From<i32> for Value {
  fn from(v: i32) -> Self {
    Value::Int(i64::from(v))
  }
}

impl From<u32> for Value {
  fn from(v: u32) -> Self {
    Value::Int(i64::from(v))
  }
}

impl From<f64> for Value {
  fn from(v: f64) -> Self {
    Value::Float(v)
  }
}

impl From<&str> for Value {
  fn from(v: &str) -> Self {
    Value::String(v.to_string())
  }
}

impl From<String> for Value {
  fn from(v: String) -> Self {
    Value::String(v)
  }
}

impl From<Vec<Value>> for Value {
  fn from(v: Vec<Value>) -> Self {
    Value::List(v)
  }
}

impl From<BTreeMap<String, Value>> for Value {
  fn from(v: BTreeMap<String, Value>) -> Self {
    Value::Map(v)
  }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self {
    v.map_or(Value::Null, Into::into)
  }
}

impl FromIterator<Value> for Value {
  fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
    Value::List(iter.into_iter().collect())
  }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
  fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
    Value::Map(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
  }
}
