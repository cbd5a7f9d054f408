// src/common/response/error.rs

use core::fmt;

/// Error type for decoding a bridge response line on the host side.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResponseParseError {
    /// Line was empty after trimming.
    EmptyInput,
    /// First word is not a known response keyword.
    UnknownResponse,
    /// `ERR` followed by an unrecognised code.
    UnknownErrorCode,
    /// Wrong number of whitespace-separated parts for the keyword.
    WrongFieldCount,
    /// A timestamp, measurement value or detail did not parse as a number.
    NumericError,
    /// Status field is not `0x` followed by hex digits fitting in a byte.
    InvalidStatus,
}

impl From<core::num::ParseIntError> for ResponseParseError {
    fn from(_: core::num::ParseIntError) -> Self {
        ResponseParseError::NumericError
    }
}

impl From<core::num::ParseFloatError> for ResponseParseError {
    fn from(_: core::num::ParseFloatError) -> Self {
        ResponseParseError::NumericError
    }
}

impl fmt::Display for ResponseParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ResponseParseError {}
