//! The value-builder capability supplied by the host, plus a native
//! value type for hosts (and tests) that do not bring their own.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Constructors for the closed set of value kinds the row decoder can
/// produce.
///
/// A scripting host implements this over its own object system; the
/// decoder never manages the lifetime of constructed values, ownership
/// passes to the host immediately. Methods take `&mut self` so builders
/// backed by an arena or GC can allocate.
pub trait ValueBuilder {
    type Value;

    fn integer(&mut self, value: i64) -> Self::Value;
    fn double(&mut self, value: f64) -> Self::Value;
    fn string(&mut self, value: &str) -> Self::Value;
    fn boolean(&mut self, value: bool) -> Self::Value;
    fn bytes(&mut self, value: &[u8]) -> Self::Value;
    /// A (column-name, value) pair.
    fn pair(&mut self, first: Self::Value, second: Self::Value) -> Self::Value;
    /// An ordered list; an empty `values` builds the empty list.
    fn list(&mut self, values: Vec<Self::Value>) -> Self::Value;
    /// The null/empty value.
    fn empty(&mut self) -> Self::Value;
}

/// Crate-native value, for embedding without a host object system.
///
/// The scalar variants are the closed set a decoded column can take;
/// `Pair` and `List` only appear in assembled rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Binary data
    Blob(Vec<u8>),
    /// Null/empty value
    Empty,
    /// A (column-name, value) pair
    Pair(Box<HostValue>, Box<HostValue>),
    /// An ordered list (a decoded row is a list of pairs)
    List(Vec<HostValue>),
}

impl HostValue {
    /// Check if this value is the null/empty value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let HostValue::Int(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let HostValue::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let HostValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HostValue::Bool(value) => Some(*value),
            HostValue::Int(1) => Some(true),
            HostValue::Int(0) => Some(false),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let HostValue::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_pair(&self) -> Option<(&HostValue, &HostValue)> {
        if let HostValue::Pair(first, second) = self {
            Some((first.as_ref(), second.as_ref()))
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[HostValue]> {
        if let HostValue::List(values) = self {
            Some(values)
        } else {
            None
        }
    }

    /// Parse a timestamp out of a text value, with or without
    /// fractional seconds.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<chrono::NaiveDateTime> {
        let s = self.as_text()?;
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Some(dt);
        }
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S.%3f") {
            return Some(dt);
        }
        None
    }

    /// Look a column up by name in a row (a list of name/value pairs).
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&HostValue> {
        let pairs = self.as_list()?;
        pairs.iter().find_map(|pair| match pair.as_pair() {
            Some((name, value)) if name.as_text() == Some(column_name) => Some(value),
            _ => None,
        })
    }
}

impl From<&HostValue> for JsonValue {
    fn from(value: &HostValue) -> Self {
        match value {
            HostValue::Int(i) => JsonValue::from(*i),
            HostValue::Float(f) => JsonValue::from(*f),
            HostValue::Text(s) => JsonValue::from(s.as_str()),
            HostValue::Bool(b) => JsonValue::from(*b),
            HostValue::Blob(bytes) => JsonValue::from(bytes.clone()),
            HostValue::Empty => JsonValue::Null,
            HostValue::Pair(first, second) => {
                JsonValue::from(vec![JsonValue::from(first.as_ref()), JsonValue::from(second.as_ref())])
            }
            HostValue::List(values) => {
                JsonValue::from(values.iter().map(JsonValue::from).collect::<Vec<_>>())
            }
        }
    }
}

/// [`ValueBuilder`] producing [`HostValue`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostValueBuilder;

impl ValueBuilder for HostValueBuilder {
    type Value = HostValue;

    fn integer(&mut self, value: i64) -> HostValue {
        HostValue::Int(value)
    }

    fn double(&mut self, value: f64) -> HostValue {
        HostValue::Float(value)
    }

    fn string(&mut self, value: &str) -> HostValue {
        HostValue::Text(value.to_string())
    }

    fn boolean(&mut self, value: bool) -> HostValue {
        HostValue::Bool(value)
    }

    fn bytes(&mut self, value: &[u8]) -> HostValue {
        HostValue::Blob(value.to_vec())
    }

    fn pair(&mut self, first: HostValue, second: HostValue) -> HostValue {
        HostValue::Pair(Box::new(first), Box::new(second))
    }

    fn list(&mut self, values: Vec<HostValue>) -> HostValue {
        HostValue::List(values)
    }

    fn empty(&mut self) -> HostValue {
        HostValue::Empty
    }
}
