//! The value model navigated by this crate.
//!
//! `Value` is a superset of the JSON data model: integers and floats are
//! distinct (integers are bit-addressable subjects), records keep insertion
//! order, and two extra shapes exist that JSON cannot express: fixed-shape
//! tuples and lazy sequences.

use std::fmt;

use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::{Error as _, SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::NavError;
use crate::lazy::LazySeq;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Value>),
    Map(IndexMap<String, Value>),
    Tuple(TupleValue),
    Lazy(LazySeq),
}

/// A closed record: named fields in a fixed order, also addressable by
/// position. Unlike `Map`, asking for a field it does not have is a shape
/// violation (reported as absence, not as an open-ended miss).
#[derive(Debug, Clone, PartialEq)]
pub struct TupleValue {
    fields: Vec<(String, Value)>,
}

impl TupleValue {
    pub fn new<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn position(&self, index: usize) -> Option<&Value> {
        self.fields.get(index).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_values(self) -> impl Iterator<Item = Value> {
        self.fields.into_iter().map(|(_, v)| v)
    }
}

// =====================
// Type checks
// =====================

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short noun used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Seq(_) => "sequence",
            Value::Map(_) => "record",
            Value::Tuple(_) => "tuple",
            Value::Lazy(_) => "lazy sequence",
        }
    }
}

// =====================
// Extraction
// =====================

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view: integers widen to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(fields) => Some(fields),
            _ => None,
        }
    }
}

// =====================
// Constructors
// =====================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Str(c.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Value::Map(fields)
    }
}

impl From<TupleValue> for Value {
    fn from(tuple: TupleValue) -> Self {
        Value::Tuple(tuple)
    }
}

impl From<LazySeq> for Value {
    fn from(lazy: LazySeq) -> Self {
        Value::Lazy(lazy)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Seq(iter.into_iter().collect())
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::Str(s),
            JsonValue::Array(items) => Value::Seq(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(fields) => Value::Map(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

// =====================
// Conversion out
// =====================

impl Value {
    /// Converts into a plain JSON value. Tuples render as objects. A lazy
    /// sequence is drained first, so this forces every pending element and
    /// surfaces any deferred error; do not call it on an unbounded stream
    /// without slicing a finite window first.
    pub fn into_json(self) -> Result<JsonValue, NavError> {
        match self {
            Value::Null => Ok(JsonValue::Null),
            Value::Bool(b) => Ok(JsonValue::Bool(b)),
            Value::Int(n) => Ok(JsonValue::from(n)),
            Value::Float(n) => Ok(serde_json::Number::from_f64(n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null)),
            Value::Str(s) => Ok(JsonValue::String(s)),
            Value::Seq(items) => Ok(JsonValue::Array(
                items
                    .into_iter()
                    .map(Value::into_json)
                    .collect::<Result<_, _>>()?,
            )),
            Value::Map(fields) => Ok(JsonValue::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| Ok((k, v.into_json()?)))
                    .collect::<Result<_, NavError>>()?,
            )),
            Value::Tuple(tuple) => Ok(JsonValue::Object(
                tuple
                    .fields
                    .into_iter()
                    .map(|(k, v)| Ok((k, v.into_json()?)))
                    .collect::<Result<_, NavError>>()?,
            )),
            Value::Lazy(lazy) => Value::Seq(lazy.to_values()?).into_json(),
        }
    }
}

// =====================
// Comparison against plain JSON
// =====================

impl PartialEq<JsonValue> for Value {
    fn eq(&self, other: &JsonValue) -> bool {
        match (self, other) {
            (Value::Null, JsonValue::Null) => true,
            (Value::Bool(a), JsonValue::Bool(b)) => a == b,
            (Value::Int(a), JsonValue::Number(n)) => n.as_i64() == Some(*a),
            (Value::Float(a), JsonValue::Number(n)) => {
                n.as_i64().is_none() && n.as_f64() == Some(*a)
            }
            (Value::Str(a), JsonValue::String(b)) => a == b,
            (Value::Seq(a), JsonValue::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (Value::Map(a), JsonValue::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|other| v == other))
            }
            _ => false,
        }
    }
}

impl PartialEq<Value> for JsonValue {
    fn eq(&self, other: &Value) -> bool {
        other == self
    }
}

// =====================
// Serde
// =====================

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(n) => serializer.serialize_f64(*n),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Tuple(tuple) => {
                let mut map = serializer.serialize_map(Some(tuple.len()))?;
                for (k, v) in tuple.iter() {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Lazy(_) => Err(S::Error::custom(
                "lazy sequences cannot be serialized; slice a finite window first",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        JsonValue::deserialize(deserializer).map(Value::from)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Lazy(_) => write!(f, "<lazy>"),
            other => match other.clone().into_json() {
                Ok(json) => write!(f, "{}", json),
                Err(_) => write!(f, "<{}>", other.kind()),
            },
        }
    }
}

// =====================
// Tests
// =====================
