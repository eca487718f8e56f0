use thiserror::Error;

use crate::StoreError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Empty command")]
    EmptyCommand,

    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    #[error("{0} requires {1} argument(s)")]
    WrongArgCount(&'static str, usize),

    #[error("{0} requires an odd number of arguments")]
    UnpairedArguments(&'static str),

    #[error("{0}: '{1}' is not a valid number")]
    InvalidNumber(&'static str, String),

    #[error("{0}: unexpected argument '{1}'")]
    UnexpectedArgument(&'static str, String),
}

impl From<ParseError> for StoreError {
    fn from(err: ParseError) -> Self {
        match err {
            // A malformed score or delta is an invalid value, not a syntax problem.
            ParseError::InvalidNumber(..) => StoreError::InvalidValue(err.to_string()),
            other => StoreError::Parse(other.to_string()),
        }
    }
}
