//! Union, intersection and difference.
//!
//! All three produce sets: duplicate rows are removed and each surviving row
//! keeps the position of its first occurrence, left input before right.

use alloc::vec::Vec;
use hashbrown::HashSet;
use raqp_core::{Relation, Row};

/// The set operation to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOperation {
    Union,
    Intersect,
    Difference,
}

impl SetOperation {
    pub fn name(&self) -> &'static str {
        match self {
            SetOperation::Union => "union",
            SetOperation::Intersect => "intersect",
            SetOperation::Difference => "difference",
        }
    }
}

/// Set operation executor over union-compatible relations.
pub struct SetExecutor {
    operation: SetOperation,
}

impl SetExecutor {
    pub fn new(operation: SetOperation) -> Self {
        Self { operation }
    }

    /// Executes the operation. Rows are compared structurally.
    pub fn execute(&self, left: &Relation, right: &Relation) -> Vec<Row> {
        match self.operation {
            SetOperation::Union => {
                let mut seen: HashSet<&Row> = HashSet::with_capacity(left.len() + right.len());
                left.iter()
                    .chain(right.iter())
                    .filter(|row| seen.insert(*row))
                    .cloned()
                    .collect()
            }
            SetOperation::Intersect => {
                let probe: HashSet<&Row> = right.iter().collect();
                let mut seen: HashSet<&Row> = HashSet::new();
                left.iter()
                    .filter(|row| probe.contains(*row) && seen.insert(*row))
                    .cloned()
                    .collect()
            }
            SetOperation::Difference => {
                let probe: HashSet<&Row> = right.iter().collect();
                let mut seen: HashSet<&Row> = HashSet::new();
                left.iter()
                    .filter(|row| !probe.contains(*row) && seen.insert(*row))
                    .cloned()
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use raqp_core::schema::{Column, Schema};
    use raqp_core::{DataType, Value};

    fn names(values: &[&str]) -> Relation {
        let schema = Schema::try_new(vec![Column::new("name", DataType::Text)]).unwrap();
        Relation::try_new(
            schema,
            values
                .iter()
                .map(|v| Row::new(vec![Value::Text((*v).into())]))
                .collect(),
        )
        .unwrap()
    }

    fn texts(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.get(0).and_then(|v| v.as_str()).unwrap()).collect()
    }

    #[test]
    fn test_union_keeps_first_occurrence() {
        let left = names(&["John", "Alice", "John"]);
        let right = names(&["Bob", "Alice", "Carol"]);
        let rows = SetExecutor::new(SetOperation::Union).execute(&left, &right);
        assert_eq!(texts(&rows), vec!["John", "Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_intersect_in_left_order() {
        let left = names(&["John", "Alice", "Bob", "Alice"]);
        let right = names(&["Bob", "Alice"]);
        let rows = SetExecutor::new(SetOperation::Intersect).execute(&left, &right);
        assert_eq!(texts(&rows), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_difference() {
        let left = names(&["John", "Alice", "Bob", "John"]);
        let right = names(&["Alice"]);
        let rows = SetExecutor::new(SetOperation::Difference).execute(&left, &right);
        assert_eq!(texts(&rows), vec!["John", "Bob"]);

        let rows = SetExecutor::new(SetOperation::Difference).execute(&left, &left);
        assert!(rows.is_empty());
    }
}
