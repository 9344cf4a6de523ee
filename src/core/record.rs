//! Runtime record shapes flowing through pipelines.
//!
//! Every element an endpoint emits is a [`Record`]: a scalar value, an
//! ordered sequence of values, or a keyed map with insertion order
//! preserved. Operators never know the static type of their input; they
//! classify each record at runtime via [`Record::shape`] and dispatch on
//! the result.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar payload carried inside a [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value
    Null,
    /// Boolean value (true/false)
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
        }
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
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// The three runtime shapes a record can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A single scalar value
    Scalar,
    /// An ordered list of values
    Sequence,
    /// A named-field map, insertion order preserved
    Keyed,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar => write!(f, "scalar"),
            Shape::Sequence => write!(f, "sequence"),
            Shape::Keyed => write!(f, "keyed"),
        }
    }
}

/// One data record in a pipeline.
///
/// Serializes untagged, so records round-trip through JSON as plain
/// values, arrays, and objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    /// A single value
    Scalar(Value),
    /// An ordered list of values
    Sequence(Vec<Value>),
    /// A named-field map, insertion order preserved
    Keyed(IndexMap<String, Value>),
}

impl Record {
    /// Build a scalar record.
    pub fn scalar(value: impl Into<Value>) -> Self {
        Record::Scalar(value.into())
    }

    /// Build a sequence record from anything iterable.
    pub fn sequence<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Record::Sequence(values.into_iter().map(Into::into).collect())
    }

    /// Build a keyed record; field order follows iteration order.
    pub fn keyed<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Record::Keyed(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Classify this record's runtime shape.
    pub fn shape(&self) -> Shape {
        match self {
            Record::Scalar(_) => Shape::Scalar,
            Record::Sequence(_) => Shape::Sequence,
            Record::Keyed(_) => Shape::Keyed,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Record::Scalar(v) => write!(f, "{}", v),
            Record::Sequence(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            Record::Keyed(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Selects a subset of an endpoint's records for `read` and `clear`.
///
/// `Fields` matches keyed records whose named fields all equal the given
/// values; non-keyed records never match it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selector {
    /// Match every record
    #[default]
    All,
    /// Match keyed records by field equality
    Fields(IndexMap<String, Value>),
}

impl Selector {
    /// Build a field-equality selector.
    pub fn fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Selector::Fields(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Whether `record` falls inside this selection.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Selector::All => true,
            Selector::Fields(wanted) => match record {
                Record::Keyed(map) => wanted
                    .iter()
                    .all(|(key, value)| map.get(key) == Some(value)),
                _ => false,
            },
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => write!(f, "*"),
            Selector::Fields(map) => {
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, " and ")?;
                    }
                    write!(f, "{} = {}", k, v)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_classification() {
        assert_eq!(Record::scalar(1).shape(), Shape::Scalar);
        assert_eq!(Record::sequence([1, 2]).shape(), Shape::Sequence);
        assert_eq!(Record::keyed([("f1", 1)]).shape(), Shape::Keyed);
    }

    #[test]
    fn json_round_trip_keeps_field_order() {
        let record = Record::keyed([("b", 1), ("a", 2)]);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"b":1,"a":2}"#);
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn field_selector_matches_keyed_only() {
        let selector = Selector::fields([("f1", 1)]);
        assert!(selector.matches(&Record::keyed([("f1", 1), ("f2", 2)])));
        assert!(!selector.matches(&Record::keyed([("f1", 2)])));
        assert!(!selector.matches(&Record::sequence([1])));
        assert!(!selector.matches(&Record::scalar(1)));
    }
}
