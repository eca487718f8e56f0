use std::fmt;

use crate::database::Value;

/// Result of executing a [`super::Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Nil,
    Ok,
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Reply>),
}

impl Reply {
    pub fn from_bool(flag: bool) -> Self {
        Reply::Int(i64::from(flag))
    }

    pub fn from_len(len: usize) -> Self {
        Reply::Int(i64::try_from(len).unwrap_or(i64::MAX))
    }

    pub fn from_strings(items: Vec<String>) -> Self {
        Reply::Array(items.into_iter().map(Reply::Str).collect())
    }

    /// Flattens `(member, score)` pairs into `[member, score, ...]`.
    pub fn from_scored(pairs: Vec<(String, f64)>) -> Self {
        Reply::Array(
            pairs
                .into_iter()
                .flat_map(|(m, s)| [Reply::Str(m), Reply::Float(s)])
                .collect(),
        )
    }
}

impl From<Option<String>> for Reply {
    fn from(value: Option<String>) -> Self {
        value.map_or(Reply::Nil, Reply::Str)
    }
}

impl From<Option<f64>> for Reply {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Reply::Nil, Reply::Float)
    }
}

impl From<Option<usize>> for Reply {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Reply::Nil, Reply::from_len)
    }
}

impl From<Option<Value>> for Reply {
    fn from(value: Option<Value>) -> Self {
        match value {
            None => Reply::Nil,
            Some(Value::Int(n)) => Reply::Int(n),
            Some(Value::Float(f)) => Reply::Float(f),
            Some(other) => other.as_text().map_or(Reply::Nil, Reply::Str),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Reply::Nil => write!(f, "(nil)"),
            Reply::Ok => write!(f, "OK"),
            Reply::Int(n) => write!(f, "(integer) {n}"),
            Reply::Float(x) => write!(f, "{x}"),
            Reply::Str(s) => write!(f, "\"{s}\""),
            Reply::Array(items) if items.is_empty() => write!(f, "(empty array)"),
            Reply::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}) {item}", i + 1)?;
                }
                Ok(())
            }
        }
    }
}
