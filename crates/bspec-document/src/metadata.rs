//! Open metadata bag carried by every document.
//!
//! Values are a closed tagged union; accessors return a typed result
//! instead of panicking on a mismatch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Key-value metadata beyond the well-known frontmatter fields.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A dynamically typed metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<MetadataValue>),
    Map(BTreeMap<String, MetadataValue>),
}

/// Returned when an accessor is called on a value of another type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected}, found {found}")]
pub struct MetadataTypeError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl MetadataValue {
    /// Schema type name: `string`, `array`, `object`, `number`, `boolean` or `null`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) | Self::Float(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "array",
            Self::Map(_) => "object",
        }
    }

    fn mismatch(&self, expected: &'static str) -> MetadataTypeError {
        MetadataTypeError {
            expected,
            found: self.type_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Result<&str, MetadataTypeError> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }

    pub fn as_bool(&self) -> Result<bool, MetadataTypeError> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(other.mismatch("boolean")),
        }
    }

    pub fn as_i64(&self) -> Result<i64, MetadataTypeError> {
        match self {
            Self::Integer(n) => Ok(*n),
            other => Err(other.mismatch("integer")),
        }
    }

    /// Numeric value; integers are widened.
    pub fn as_f64(&self) -> Result<f64, MetadataTypeError> {
        match self {
            Self::Integer(n) => Ok(*n as f64),
            Self::Float(n) => Ok(*n),
            other => Err(other.mismatch("number")),
        }
    }

    pub fn as_list(&self) -> Result<&[MetadataValue], MetadataTypeError> {
        match self {
            Self::List(items) => Ok(items),
            other => Err(other.mismatch("array")),
        }
    }

    pub fn as_map(&self) -> Result<&BTreeMap<String, MetadataValue>, MetadataTypeError> {
        match self {
            Self::Map(map) => Ok(map),
            other => Err(other.mismatch("object")),
        }
    }

    /// Textual form of a scalar. Lists, maps and null have none.
    pub fn scalar_string(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Integer(n) => Some(n.to_string()),
            Self::Float(n) => Some(n.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Null | Self::List(_) | Self::Map(_) => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            other => match serde_json::to_string(other) {
                Ok(json) => f.write_str(&json),
                Err(_) => Err(fmt::Error),
            },
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for MetadataValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl<T: Into<MetadataValue>> From<Vec<T>> for MetadataValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_yaml::Value> for MetadataValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s),
            Value::Sequence(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Mapping(map) => Self::Map(
                map.into_iter()
                    .filter_map(|(k, v)| yaml_key(k).map(|k| (k, Self::from(v))))
                    .collect(),
            ),
            Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

impl From<serde_json::Value> for MetadataValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

/// Stringify a YAML mapping key. Structured keys are dropped.
pub(crate) fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    MetadataValue::from(key).scalar_string()
}
