//! Cartesian product executor.

use super::budget::RowBudget;
use crate::error::EvaluationError;
use alloc::vec::Vec;
use raqp_core::{Relation, Row};

/// Pairs every left row with every right row, left-major.
pub struct CrossProduct;

impl CrossProduct {
    /// Executes the product. The output size is checked against the budget
    /// before any row is built.
    pub fn execute(
        &self,
        left: &Relation,
        right: &Relation,
        budget: &RowBudget,
    ) -> Result<Vec<Row>, EvaluationError> {
        budget.check_product("product", left.len(), right.len())?;
        let mut rows = Vec::with_capacity(left.len() * right.len());
        for l in left.iter() {
            for r in right.iter() {
                rows.push(Row::concat(l, r));
            }
        }
        Ok(rows)
    }
}
