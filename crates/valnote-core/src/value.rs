//! Decoded value types

use ordered_float::OrderedFloat;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{Error, Result};

/// A value decoded from a server response
///
/// `Value` is totally ordered so that any value, floats and nested
/// composites included, can live in a `Set` or be a `Dictionary` key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    Integer(i64),
    Float(OrderedFloat<f64>),
    String(String),
    /// A variable or namespace reference (`prices`, `std::ages`), kept as text
    Symbol(String),
    Vector(Vec<Value>),
    Set(BTreeSet<Value>),
    Tuple(Box<Value>, Box<Value>),
    Dictionary(BTreeMap<Value, Value>),
}

impl Value {
    /// Build a float value, rejecting NaN and infinities
    pub fn float(v: f64) -> Result<Self> {
        if v.is_finite() {
            Ok(Value::Float(OrderedFloat(v)))
        } else {
            Err(Error::NonFiniteFloat(v))
        }
    }

    pub fn tuple(first: impl Into<Value>, second: impl Into<Value>) -> Self {
        Value::Tuple(Box::new(first.into()), Box::new(second.into()))
    }

    /// Name of the variant, as used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Char(_) => "character",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Vector(_) => "vector",
            Value::Set(_) => "set",
            Value::Tuple(..) => "tuple",
            Value::Dictionary(_) => "dictionary",
        }
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

    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(n.into_inner()),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Text of a string or symbol
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Vector(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&BTreeSet<Value>> {
        match self {
            Value::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<(&Value, &Value)> {
        match self {
            Value::Tuple(first, second) => Some((first, second)),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&BTreeMap<Value, Value>> {
        match self {
            Value::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a dictionary entry by key
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.as_dictionary()?.get(key)
    }

    /// Project the value onto JSON.
    ///
    /// Characters and symbols become strings, sets and tuples become arrays.
    /// A dictionary whose keys are all strings becomes an object; any other
    /// dictionary becomes an array of `[key, value]` pairs, so keys such as
    /// `42` and `"42"` stay apart.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Char(c) => Json::String(c.to_string()),
            Value::Integer(n) => Json::from(*n),
            Value::Float(n) => serde_json::Number::from_f64(n.into_inner())
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) | Value::Symbol(s) => Json::String(s.clone()),
            Value::Vector(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Set(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Tuple(first, second) => Json::Array(vec![first.to_json(), second.to_json()]),
            Value::Dictionary(map) if map.keys().all(|k| matches!(k, Value::String(_))) => Json::Object(
                map.iter()
                    .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), v.to_json())))
                    .collect(),
            ),
            Value::Dictionary(map) => Json::Array(
                map.iter()
                    .map(|(k, v)| Json::Array(vec![k.to_json(), v.to_json()]))
                    .collect(),
            ),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

/// Renders the value in wire notation.
///
/// Scalars echo back to a literal that decodes to an equal value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "'{}'", c),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => {
                let n = n.into_inner();
                let text = n.to_string();
                if text.contains('.') || !n.is_finite() {
                    write!(f, "{}", text)
                } else {
                    write!(f, "{}.0", text)
                }
            }
            Value::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::Vector(items) => write_list(f, '[', items.iter(), ']'),
            Value::Set(items) => write_list(f, '{', items.iter(), '}'),
            Value::Tuple(first, second) => write!(f, "({},{})", first, second),
            Value::Dictionary(map) => {
                write!(f, "(")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "({},{})", k, v)?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_list<'a>(
    f: &mut fmt::Formatter<'_>,
    open: char,
    items: impl Iterator<Item = &'a Value>,
    close: char,
) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "{}", close)
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(OrderedFloat(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Vector(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    /// Collects into a set
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Set(iter.into_iter().map(Into::into).collect())
    }
}

macro_rules! try_from_value {
    ($ty:ty, $expected:literal, $pat:pat => $out:expr) => {
        impl TryFrom<Value> for $ty {
            type Error = Error;

            fn try_from(value: Value) -> Result<Self> {
                match value {
                    $pat => Ok($out),
                    other => Err(Error::TypeMismatch {
                        expected: $expected,
                        got: other.type_name(),
                    }),
                }
            }
        }
    };
}

try_from_value!(bool, "boolean", Value::Bool(b) => b);
try_from_value!(char, "character", Value::Char(c) => c);
try_from_value!(i64, "integer", Value::Integer(n) => n);
try_from_value!(f64, "float", Value::Float(n) => n.into_inner());
try_from_value!(String, "string", Value::String(s) => s);
try_from_value!(Vec<Value>, "vector", Value::Vector(items) => items);
