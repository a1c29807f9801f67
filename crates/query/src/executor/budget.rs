//! Row budget enforcement.

use crate::context::ExecutionContext;
use crate::error::EvaluationError;

/// Caps the number of rows a single operator may produce.
#[derive(Clone, Copy, Debug)]
pub struct RowBudget {
    limit: Option<usize>,
}

impl RowBudget {
    pub fn new(limit: Option<usize>) -> Self {
        Self { limit }
    }

    pub fn from_context(ctx: &ExecutionContext) -> Self {
        Self::new(ctx.max_rows())
    }

    /// Fails if `rows` exceeds the limit.
    #[inline]
    pub fn check(&self, operator: &'static str, rows: usize) -> Result<(), EvaluationError> {
        match self.limit {
            Some(limit) if rows > limit => Err(EvaluationError::RowLimitExceeded { operator, limit }),
            _ => Ok(()),
        }
    }

    /// Checks the size of a product before materializing it.
    pub fn check_product(
        &self,
        operator: &'static str,
        left: usize,
        right: usize,
    ) -> Result<(), EvaluationError> {
        match left.checked_mul(right) {
            Some(rows) => self.check(operator, rows),
            None => Err(EvaluationError::RowLimitExceeded {
                operator,
                limit: self.limit.unwrap_or(usize::MAX),
            }),
        }
    }
}
