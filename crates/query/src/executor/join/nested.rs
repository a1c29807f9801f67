//! Nested loop join implementation.

use crate::binder::{BoundPredicate, JoinKey};
use crate::executor::budget::RowBudget;
use crate::error::EvaluationError;
use alloc::vec::Vec;
use core::cmp::Ordering;
use raqp_core::{Relation, Row};

/// Nested loop join executor.
///
/// Compares every pair of rows, left-major. Used for theta joins and for
/// natural joins whose key columns need Integer/Float promotion.
pub struct NestedLoopJoin;

impl NestedLoopJoin {
    /// Joins on a predicate over the concatenated row.
    pub fn execute_theta(
        &self,
        left: &Relation,
        right: &Relation,
        condition: &BoundPredicate,
        budget: &RowBudget,
    ) -> Result<Vec<Row>, EvaluationError> {
        let mut rows = Vec::new();
        for l in left.iter() {
            for r in right.iter() {
                let joined = Row::concat(l, r);
                if condition.eval(&joined) {
                    budget.check("theta join", rows.len() + 1)?;
                    rows.push(joined);
                }
            }
        }
        Ok(rows)
    }

    /// Joins on equality of the key columns, keeping only the right columns
    /// that are not keys.
    pub fn execute_natural(
        &self,
        left: &Relation,
        right: &Relation,
        keys: &[JoinKey],
        right_columns: &[usize],
        budget: &RowBudget,
    ) -> Result<Vec<Row>, EvaluationError> {
        let mut rows = Vec::new();
        for l in left.iter() {
            for r in right.iter() {
                let matched = keys.iter().all(|k| match (l.get(k.left), r.get(k.right)) {
                    (Some(a), Some(b)) => a.compare(b) == Some(Ordering::Equal),
                    _ => false,
                });
                if matched {
                    budget.check("natural join", rows.len() + 1)?;
                    rows.push(Row::concat_selected(l, r, right_columns));
                }
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CompareOp;
    use crate::binder::BoundOperand;
    use alloc::vec;
    use raqp_core::schema::{Column, Schema};
    use raqp_core::{DataType, Value};

    fn single(name: &str, ty: DataType, values: Vec<Value>) -> Relation {
        let schema = Schema::try_new(vec![Column::new(name, ty)]).unwrap();
        Relation::try_new(schema, values.into_iter().map(|v| Row::new(vec![v])).collect()).unwrap()
    }

    #[test]
    fn test_theta_join() {
        let left = single("a", DataType::Integer, vec![Value::Integer(1), Value::Integer(5)]);
        let right = single("b", DataType::Integer, vec![Value::Integer(3), Value::Integer(4)]);
        let cond = BoundPredicate::Compare {
            left: BoundOperand::Column(0),
            op: CompareOp::Lt,
            right: BoundOperand::Column(1),
        };
        let rows = NestedLoopJoin
            .execute_theta(&left, &right, &cond, &RowBudget::new(None))
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], Row::new(vec![Value::Integer(1), Value::Integer(3)]));
    }

    #[test]
    fn test_natural_join_promotes_numeric_keys() {
        let left = single("k", DataType::Integer, vec![Value::Integer(1), Value::Integer(2)]);
        let right = single("k", DataType::Float, vec![Value::Float(2.0), Value::Float(2.5)]);
        let rows = NestedLoopJoin
            .execute_natural(
                &left,
                &right,
                &[JoinKey { left: 0, right: 0 }],
                &[],
                &RowBudget::new(None),
            )
            .unwrap();
        assert_eq!(rows, vec![Row::new(vec![Value::Integer(2)])]);
    }
}
