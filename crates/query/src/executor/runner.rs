//! Bound tree evaluator.
//!
//! The evaluator walks a [`BoundNode`] bottom-up and materializes each
//! operator's result. Leaves share the catalog's relation through `Arc`, so
//! a bare relation reference costs no copy. Every other result is rebuilt
//! through [`Relation::try_new`], which re-checks it against the schema the
//! binder inferred.

use super::budget::RowBudget;
use super::join::{HashJoin, NestedLoopJoin};
use super::set_ops::{SetExecutor, SetOperation};
use super::{CrossProduct, FilterExecutor, ProjectExecutor};
use crate::binder::{BoundKind, BoundNode, JoinKey};
use crate::context::ExecutionContext;
use crate::error::EvaluationError;
use alloc::sync::Arc;
use alloc::vec::Vec;
use raqp_core::schema::Schema;
use raqp_core::{Relation, Row};

/// Evaluates bound query trees.
pub struct Evaluator {
    budget: RowBudget,
}

impl Evaluator {
    pub fn new(ctx: &ExecutionContext) -> Self {
        Self {
            budget: RowBudget::from_context(ctx),
        }
    }

    /// Evaluates a bound tree to a relation whose schema is the node's schema.
    pub fn evaluate(&self, node: &BoundNode) -> Result<Arc<Relation>, EvaluationError> {
        let schema = node.schema();
        let relation = match node.kind() {
            BoundKind::Relation { relation, .. } => return Ok(Arc::clone(relation)),
            BoundKind::Select { predicate, input } => {
                let input = self.evaluate(input)?;
                let rows = FilterExecutor::new(predicate).execute(&input);
                self.finish("select", schema, rows)?
            }
            BoundKind::Project { indices, input } => {
                let input = self.evaluate(input)?;
                let rows = ProjectExecutor::new(indices).execute(&input);
                self.finish("project", schema, rows)?
            }
            BoundKind::Rename { input } => {
                let input = self.evaluate(input)?;
                let relation = Arc::try_unwrap(input).unwrap_or_else(|shared| (*shared).clone());
                relation.with_schema(schema.clone())?
            }
            BoundKind::Union { left, right } => self.set_op(SetOperation::Union, schema, left, right)?,
            BoundKind::Intersect { left, right } => {
                self.set_op(SetOperation::Intersect, schema, left, right)?
            }
            BoundKind::Difference { left, right } => {
                self.set_op(SetOperation::Difference, schema, left, right)?
            }
            BoundKind::Product { left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                let rows = CrossProduct.execute(&left, &right, &self.budget)?;
                self.finish("product", schema, rows)?
            }
            BoundKind::ThetaJoin {
                condition,
                left,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                let rows = NestedLoopJoin.execute_theta(&left, &right, condition, &self.budget)?;
                self.finish("theta join", schema, rows)?
            }
            BoundKind::NaturalJoin {
                keys,
                right_columns,
                left,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                let rows = if keys_hashable(keys, &left, &right) {
                    HashJoin::new(keys, right_columns).execute(&left, &right, &self.budget)?
                } else {
                    NestedLoopJoin.execute_natural(
                        &left,
                        &right,
                        keys,
                        right_columns,
                        &self.budget,
                    )?
                };
                self.finish("natural join", schema, rows)?
            }
        };

        tracing::trace!(
            operator = node.operator_name(),
            rows = relation.len(),
            "evaluated operator"
        );
        Ok(Arc::new(relation))
    }

    fn set_op(
        &self,
        operation: SetOperation,
        schema: &Schema,
        left: &BoundNode,
        right: &BoundNode,
    ) -> Result<Relation, EvaluationError> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;
        let rows = SetExecutor::new(operation).execute(&left, &right);
        self.finish(operation.name(), schema, rows)
    }

    fn finish(
        &self,
        operator: &'static str,
        schema: &Schema,
        rows: Vec<Row>,
    ) -> Result<Relation, EvaluationError> {
        self.budget.check(operator, rows.len())?;
        Ok(Relation::try_new(schema.clone(), rows)?)
    }
}

/// Hashing compares keys structurally, which only agrees with `Value::compare`
/// when both sides of every key have the same type.
fn keys_hashable(keys: &[JoinKey], left: &Relation, right: &Relation) -> bool {
    keys.iter().all(|k| {
        let l = left.schema().column(k.left).map(|c| c.data_type());
        let r = right.schema().column(k.right).map(|c| c.data_type());
        l.is_some() && l == r
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Binder;
    use crate::catalog::Catalog;
    use crate::parse::parse;
    use alloc::vec;
    use raqp_core::schema::Column;
    use raqp_core::{DataType, Value};

    fn catalog() -> Catalog {
        let r = Relation::try_new(
            Schema::try_new(vec![
                Column::new("a", DataType::Integer),
                Column::new("b", DataType::Integer),
            ])
            .unwrap(),
            vec![
                Row::new(vec![Value::Integer(1), Value::Integer(2)]),
                Row::new(vec![Value::Integer(3), Value::Integer(4)]),
            ],
        )
        .unwrap();
        let s = Relation::try_new(
            Schema::try_new(vec![
                Column::new("b", DataType::Float),
                Column::new("c", DataType::Text),
            ])
            .unwrap(),
            vec![
                Row::new(vec![Value::Float(4.0), Value::Text("four".into())]),
                Row::new(vec![Value::Float(2.5), Value::Text("half".into())]),
            ],
        )
        .unwrap();
        Catalog::builder()
            .add_relation("R", r)
            .unwrap()
            .add_relation("S", s)
            .unwrap()
            .build()
    }

    fn run(query: &str, ctx: &ExecutionContext) -> Result<Arc<Relation>, EvaluationError> {
        let catalog = catalog();
        let bound = Binder::new(&catalog).bind(&parse(query).unwrap()).unwrap();
        Evaluator::new(ctx).evaluate(&bound)
    }

    #[test]
    fn test_select() {
        let result = run("σ a>1 (R)", &ExecutionContext::new()).unwrap();
        assert_eq!(
            result.rows(),
            &[Row::new(vec![Value::Integer(3), Value::Integer(4)])]
        );
    }

    #[test]
    fn test_leaf_shares_catalog_relation() {
        let catalog = catalog();
        let bound = Binder::new(&catalog).bind(&parse("R").unwrap()).unwrap();
        let result = Evaluator::new(&ExecutionContext::new())
            .evaluate(&bound)
            .unwrap();
        assert!(Arc::ptr_eq(&result, catalog.get("R").unwrap()));
    }

    #[test]
    fn test_rename_keeps_rows() {
        let result = run("ρ a→x (R)", &ExecutionContext::new()).unwrap();
        assert_eq!(result.schema().names(), vec!["x", "b"]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_natural_join_with_promotion() {
        let result = run("R ⨝ S", &ExecutionContext::new()).unwrap();
        assert_eq!(result.schema().names(), vec!["a", "b", "c"]);
        assert_eq!(
            result.rows(),
            &[Row::new(vec![
                Value::Integer(3),
                Value::Integer(4),
                Value::Text("four".into())
            ])]
        );
    }

    #[test]
    fn test_row_limit() {
        let ctx = ExecutionContext::new().with_max_rows(Some(3));
        let err = run("R × ρ b→x, c→y (S)", &ctx).unwrap_err();
        assert_eq!(
            err,
            EvaluationError::RowLimitExceeded {
                operator: "product",
                limit: 3
            }
        );

        let ctx = ExecutionContext::new().with_max_rows(Some(1));
        assert!(run("σ a > 1 (R)", &ctx).is_ok());
        assert!(run("σ a > 0 (R)", &ctx).is_err());
    }
}
