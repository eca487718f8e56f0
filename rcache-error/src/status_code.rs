use std::fmt;

use num_enum::TryFromPrimitive;

/// Status codes used to categorise errors.
///
/// # Ranges:
/// - 0xxx: success
/// - 1xxx: general errors
/// - 2xxx: data errors
/// - 8xxx: command / parsing errors
///
/// `num_enum::TryFromPrimitive` provides `TryFrom<u32>`, handy for hosts
/// that pass codes across an FFI or scripting boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: success ===
    Success = 0,

    // === 1xxx: general ===
    Internal = 1003,
    InvalidArgs = 1004,

    // === 2xxx: data ===
    NotFound = 2000,
    InvalidValue = 2004,
    WrongType = 2007,
    NotANumber = 2010,

    // === 8xxx: command ===
    ParseError = 8009,
}

impl StatusCode {
    /// Numeric representation of the code.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Looks up a code, returning `None` for unknown values.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// `true` when `code` is the success code.
    pub fn is_success(code: u32) -> bool {
        Self::Success as u32 == code
    }

    /// Errors caused by the caller's input or by the state of the data
    /// (the `2xxx` range plus `InvalidArgs`).
    pub fn is_client_error(&self) -> bool {
        let c = self.code();
        if (2000..=2999).contains(&c) {
            return true;
        }
        matches!(self, Self::InvalidArgs)
    }

    /// Errors raised while turning textual input into a command.
    pub fn is_protocol_error(&self) -> bool {
        (8000..=8999).contains(&self.code())
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
