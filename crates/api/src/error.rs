//! Error type for the service and the command line interface.

use raqp_query::catalog::DefinitionError;
use raqp_query::QueryError;
use std::fmt;
use std::io;

/// Any failure the API layer can report.
#[derive(Debug)]
pub enum ApiError {
    /// A relation definition, from a catalog file or inline in a request.
    Definition(DefinitionError),
    /// A failure in the query pipeline.
    Query(QueryError),
    /// A request line that is not a valid JSON request.
    Json(serde_json::Error),
    Io(io::Error),
}

impl ApiError {
    /// Returns a stable lowercase name for the failure, used in log events.
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::Definition(_) => "definition",
            ApiError::Query(err) => err.category().as_str(),
            ApiError::Json(_) => "request",
            ApiError::Io(_) => "io",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Definition(err) => err.fmt(f),
            ApiError::Query(err) => err.fmt(f),
            ApiError::Json(err) => write!(f, "Malformed request: {}", err),
            ApiError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Json(err) => Some(err),
            ApiError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DefinitionError> for ApiError {
    fn from(err: DefinitionError) -> Self {
        ApiError::Definition(err)
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::Query(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Json(err)
    }
}

impl From<io::Error> for ApiError {
    fn from(err: io::Error) -> Self {
        ApiError::Io(err)
    }
}
