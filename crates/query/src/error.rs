//! Error types for every stage of query processing.
//!
//! Each stage has its own error type. [`QueryError`] wraps them so callers can
//! use `?` across the whole pipeline and still recover the stage through
//! [`QueryError::category`].

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use raqp_core::schema::SchemaMismatch;
use raqp_core::DataType;

/// Result type alias for query processing.
pub type Result<T> = core::result::Result<T, QueryError>;

/// What went wrong while tokenizing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A character that starts no token.
    UnexpectedChar(char),
    /// A string literal with no closing quote.
    UnterminatedString,
    /// A numeric literal that does not fit its type.
    NumberOutOfRange,
}

/// A lexical error with the byte offset where it was detected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub offset: usize,
    pub kind: LexErrorKind,
}

impl LexError {
    pub fn new(offset: usize, kind: LexErrorKind) -> Self {
        Self { offset, kind }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lexical error at offset {}: ", self.offset)?;
        match &self.kind {
            LexErrorKind::UnexpectedChar(c) => write!(f, "unexpected character '{}'", c),
            LexErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            LexErrorKind::NumberOutOfRange => write!(f, "number literal out of range"),
        }
    }
}

/// A syntax error: the parser found a token it could not accept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// Byte offset of the offending token.
    pub offset: usize,
    /// Descriptions of the tokens that would have been accepted.
    pub expected: Vec<&'static str>,
    /// Description of the token actually found.
    pub found: String,
}

impl ParseError {
    pub fn new(offset: usize, expected: Vec<&'static str>, found: impl Into<String>) -> Self {
        Self {
            offset,
            expected,
            found: found.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Syntax error at offset {}: expected ", self.offset)?;
        match self.expected.as_slice() {
            [] => write!(f, "nothing")?,
            [one] => write!(f, "{}", one)?,
            many => write!(f, "one of {}", many.join(", "))?,
        }
        write!(f, ", found {}", self.found)
    }
}

/// A semantic error detected while resolving names and checking types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindError {
    /// A relation name that the catalog does not know.
    UnknownRelation(String),
    /// A column reference that does not resolve against the input schema.
    UnknownColumn {
        column: String,
        available: Vec<String>,
    },
    /// The operator would produce two columns with the same name.
    DuplicateColumn(String),
    /// Operand types that cannot be compared, or a non-Boolean condition.
    TypeMismatch {
        expected: DataType,
        found: DataType,
        context: String,
    },
    /// Set operands that are not union-compatible.
    SchemaMismatch {
        operator: &'static str,
        detail: SchemaMismatch,
    },
    /// Product or theta join inputs share column names.
    ColumnNameCollision {
        operator: &'static str,
        names: Vec<String>,
    },
    /// Natural join inputs share no column name.
    NoJoinColumns {
        left: Vec<String>,
        right: Vec<String>,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::UnknownRelation(name) => write!(f, "Unknown relation: {}", name),
            BindError::UnknownColumn { column, available } => write!(
                f,
                "Unknown column: {} (available: {})",
                column,
                available.join(", ")
            ),
            BindError::DuplicateColumn(name) => write!(f, "Duplicate column: {}", name),
            BindError::TypeMismatch {
                expected,
                found,
                context,
            } => write!(
                f,
                "Type mismatch in `{}`: expected {}, found {}",
                context, expected, found
            ),
            BindError::SchemaMismatch { operator, detail } => {
                write!(f, "Schema mismatch in {}: {}", operator, detail)
            }
            BindError::ColumnNameCollision { operator, names } => write!(
                f,
                "Column name collision in {}: {}",
                operator,
                names.join(", ")
            ),
            BindError::NoJoinColumns { left, right } => write!(
                f,
                "Natural join has no common columns (left: {}; right: {})",
                left.join(", "),
                right.join(", ")
            ),
        }
    }
}

/// A failure while computing a result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvaluationError {
    /// An operator would exceed the configured row limit.
    RowLimitExceeded { operator: &'static str, limit: usize },
    /// An operator produced rows that violate its own output schema.
    InvariantViolation(String),
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::RowLimitExceeded { operator, limit } => write!(
                f,
                "Row limit exceeded: {} would produce more than {} rows",
                operator, limit
            ),
            EvaluationError::InvariantViolation(msg) => {
                write!(f, "Internal invariant violated: {}", msg)
            }
        }
    }
}

impl From<raqp_core::Error> for EvaluationError {
    fn from(err: raqp_core::Error) -> Self {
        EvaluationError::InvariantViolation(err.to_string())
    }
}

/// The error category reported to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    Lex,
    Parse,
    Bind,
    Evaluation,
}

impl ErrorCategory {
    /// Returns a stable lowercase name for the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Lex => "lex",
            ErrorCategory::Parse => "parse",
            ErrorCategory::Bind => "bind",
            ErrorCategory::Evaluation => "evaluation",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any error the query pipeline can produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryError {
    Lex(LexError),
    Parse(ParseError),
    Bind(BindError),
    Evaluation(EvaluationError),
}

impl QueryError {
    /// Returns the stage that failed.
    pub fn category(&self) -> ErrorCategory {
        match self {
            QueryError::Lex(_) => ErrorCategory::Lex,
            QueryError::Parse(_) => ErrorCategory::Parse,
            QueryError::Bind(_) => ErrorCategory::Bind,
            QueryError::Evaluation(_) => ErrorCategory::Evaluation,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Lex(e) => e.fmt(f),
            QueryError::Parse(e) => e.fmt(f),
            QueryError::Bind(e) => e.fmt(f),
            QueryError::Evaluation(e) => e.fmt(f),
        }
    }
}

impl From<LexError> for QueryError {
    fn from(err: LexError) -> Self {
        QueryError::Lex(err)
    }
}

impl From<ParseError> for QueryError {
    fn from(err: ParseError) -> Self {
        QueryError::Parse(err)
    }
}

impl From<BindError> for QueryError {
    fn from(err: BindError) -> Self {
        QueryError::Bind(err)
    }
}

impl From<EvaluationError> for QueryError {
    fn from(err: EvaluationError) -> Self {
        QueryError::Evaluation(err)
    }
}
