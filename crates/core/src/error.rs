//! Error types for core relation construction.

use crate::types::DataType;
use alloc::string::String;
use core::fmt;

/// Result type alias for core operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised while building schemas and relations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Invalid schema definition.
    InvalidSchema {
        message: String,
    },
    /// A row does not have the schema's arity.
    ArityMismatch {
        row: usize,
        expected: usize,
        got: usize,
    },
    /// A value's runtime type differs from its column's declared type.
    TypeMismatch {
        column: String,
        expected: DataType,
        got: DataType,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSchema { message } => {
                write!(f, "Invalid schema: {}", message)
            }
            Error::ArityMismatch { row, expected, got } => {
                write!(
                    f,
                    "Row {} has {} values, expected {}",
                    row + 1,
                    got,
                    expected
                )
            }
            Error::TypeMismatch {
                column,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Type mismatch in column {}: expected {}, got {}",
                    column, expected, got
                )
            }
        }
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Error::InvalidSchema {
            message: message.into(),
        }
    }
}
