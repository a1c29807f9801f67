//! Filter executor.

use crate::binder::BoundPredicate;
use alloc::vec::Vec;
use raqp_core::{Relation, Row};

/// Filter executor - keeps the rows that satisfy a predicate, in input order.
pub struct FilterExecutor<'a> {
    predicate: &'a BoundPredicate,
}

impl<'a> FilterExecutor<'a> {
    /// Creates a new filter executor.
    pub fn new(predicate: &'a BoundPredicate) -> Self {
        Self { predicate }
    }

    /// Executes the filter on the input relation.
    pub fn execute(&self, input: &Relation) -> Vec<Row> {
        input
            .iter()
            .filter(|row| self.predicate.eval(row))
            .cloned()
            .collect()
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

    #[test]
    fn test_filter_executor() {
        let schema = Schema::try_new(vec![Column::new("value", DataType::Integer)]).unwrap();
        let input = Relation::try_new(
            schema,
            vec![
                Row::new(vec![Value::Integer(10)]),
                Row::new(vec![Value::Integer(20)]),
                Row::new(vec![Value::Integer(30)]),
            ],
        )
        .unwrap();

        let pred = BoundPredicate::Compare {
            left: BoundOperand::Column(0),
            op: CompareOp::Gt,
            right: BoundOperand::Literal(Value::Integer(15)),
        };
        let result = FilterExecutor::new(&pred).execute(&input);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].get(0), Some(&Value::Integer(20)));
    }
}
