//! Project executor.

use alloc::vec::Vec;
use raqp_core::{Relation, Row};

/// Project executor - keeps the given column positions, in the given order.
/// Duplicate output rows are kept.
pub struct ProjectExecutor<'a> {
    column_indices: &'a [usize],
}

impl<'a> ProjectExecutor<'a> {
    /// Creates a new project executor.
    pub fn new(column_indices: &'a [usize]) -> Self {
        Self { column_indices }
    }

    /// Executes the projection on the input relation.
    pub fn execute(&self, input: &Relation) -> Vec<Row> {
        input
            .iter()
            .map(|row| row.project(self.column_indices))
            .collect()
    }
}
