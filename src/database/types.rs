use std::{
    collections::{HashMap, HashSet, VecDeque},
    fmt,
};

use serde::{Deserialize, Serialize};

use super::SortedSet;
use crate::{StoreError, StoreResult};

/// Represents a value held by one key of the keyspace.
///
/// The variant discriminant doubles as the key's type tag (see
/// [`Value::value_type`]), so there is no separate registry to keep in sync.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Value {
    /// A text scalar.
    Str(String),
    /// An integer scalar.
    Int(i64),
    /// A floating-point scalar. Always finite.
    Float(f64),
    /// An ordered, index-addressable sequence allowing duplicates.
    List(VecDeque<String>),
    /// A field map; fields are unique.
    Hash(HashMap<String, String>),
    /// A collection of distinct members ordered by score.
    ZSet(SortedSet),
    /// A collection of distinct members.
    Set(HashSet<String>),
}

/// Type tag of a live key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    String,
    List,
    Set,
    Hash,
    ZSet,
}

impl ValueType {
    /// Name reported by `TYPE` and in `WrongType` errors.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::List => "list",
            Self::Set => "set",
            Self::Hash => "hash",
            Self::ZSet => "zset",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// Type tag derived from the variant.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Str(_) | Value::Int(_) | Value::Float(_) => ValueType::String,
            Value::List(_) => ValueType::List,
            Value::Set(_) => ValueType::Set,
            Value::Hash(_) => ValueType::Hash,
            Value::ZSet(_) => ValueType::ZSet,
        }
    }

    /// `true` for the string family (text, integer, float).
    pub fn is_scalar(&self) -> bool {
        self.value_type() == ValueType::String
    }

    /// Text rendering of a scalar, `None` for containers.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Str(s) => Some(s.clone()),
            Value::Int(n) => Some(n.to_string()),
            Value::Float(f) => Some(f.to_string()),
            _ => None,
        }
    }

    /// Checks that the value may be stored under a string key.
    pub(crate) fn into_scalar(self) -> StoreResult<Value> {
        match self {
            Value::Float(f) if !f.is_finite() => {
                Err(StoreError::invalid(format!("float value {f} is not finite")))
            }
            v if v.is_scalar() => Ok(v),
            other => Err(StoreError::invalid(format!(
                "expected a scalar, got a {}",
                other.value_type()
            ))),
        }
    }

    /// Integer interpretation of any scalar holding a whole number:
    /// `Int`, an integral `Float`, or `Str` such as `"7"` or `"7.0"`.
    pub(crate) fn to_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Float(f) => integral(*f),
            Value::Str(s) => {
                let s = s.trim();
                s.parse()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
            }
            _ => None,
        }
    }

    /// Float interpretation of any numeric-looking scalar.
    pub(crate) fn to_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            Value::Str(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }
}

fn integral(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound.
    (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64)
        .then_some(f as i64)
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

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}
