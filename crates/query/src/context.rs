//! Execution context for query evaluation.
//!
//! The context carries the limits an evaluation must respect. It is cheap to
//! clone and holds no per-query state, so one context can serve many
//! concurrent evaluations.

/// Row limit applied when none is configured.
pub const DEFAULT_MAX_ROWS: usize = 1_000_000;

/// Limits applied while evaluating a bound query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionContext {
    max_rows: Option<usize>,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self {
            max_rows: Some(DEFAULT_MAX_ROWS),
        }
    }
}

impl ExecutionContext {
    /// Creates a context with the default row limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context without a row limit.
    pub fn unbounded() -> Self {
        Self { max_rows: None }
    }

    /// Sets the maximum number of rows any single operator may produce.
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Returns the row limit, if any.
    #[inline]
    pub fn max_rows(&self) -> Option<usize> {
        self.max_rows
    }
}
