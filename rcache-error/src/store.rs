use thiserror::Error;

use crate::StatusCode;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by keyspace operations.
///
/// Every variant leaves the store untouched: operations validate their input
/// and the type of every key involved before committing anything.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The key exists and holds a value of another type family.
    #[error("WRONGTYPE key '{key}' holds {actual}, operation expects {expected}")]
    WrongType {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Input cannot be coerced to the shape the operation requires.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// The stored value cannot be interpreted as a number.
    #[error("Value at key '{key}' is not a number")]
    NotANumber { key: String },

    /// A required source key is absent.
    #[error("No such key: {key}")]
    NoSuchKey { key: String },

    /// Textual command could not be turned into a command.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl StoreError {
    /// Builds an [`StoreError::InvalidValue`] from anything printable.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidValue(reason.into())
    }

    /// Status code for the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::WrongType { .. } => StatusCode::WrongType,
            Self::InvalidValue(_) => StatusCode::InvalidValue,
            Self::NotANumber { .. } => StatusCode::NotANumber,
            Self::NoSuchKey { .. } => StatusCode::NotFound,
            Self::Parse(_) => StatusCode::ParseError,
        }
    }
}
