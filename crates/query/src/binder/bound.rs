//! Bound query trees.
//!
//! A bound tree mirrors the parsed expression, but every node carries its
//! output [`Schema`], leaves hold the resolved relation, and predicates refer
//! to columns by position.

use crate::ast::CompareOp;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use raqp_core::schema::Schema;
use raqp_core::{Relation, Row, Value};

/// A resolved comparison operand.
#[derive(Clone, Debug, PartialEq)]
pub enum BoundOperand {
    /// Position in the input row.
    Column(usize),
    Literal(Value),
}

impl BoundOperand {
    #[inline]
    fn resolve<'a>(&'a self, row: &'a Row) -> Option<&'a Value> {
        match self {
            BoundOperand::Column(idx) => row.get(*idx),
            BoundOperand::Literal(v) => Some(v),
        }
    }
}

/// A type-checked predicate over rows of one schema.
#[derive(Clone, Debug, PartialEq)]
pub enum BoundPredicate {
    Compare {
        left: BoundOperand,
        op: CompareOp,
        right: BoundOperand,
    },
    And(Box<BoundPredicate>, Box<BoundPredicate>),
    Or(Box<BoundPredicate>, Box<BoundPredicate>),
    Not(Box<BoundPredicate>),
    /// A Boolean operand.
    Operand(BoundOperand),
}

impl BoundPredicate {
    /// Evaluates the predicate against a row.
    pub fn eval(&self, row: &Row) -> bool {
        match self {
            BoundPredicate::Compare { left, op, right } => {
                match (left.resolve(row), right.resolve(row)) {
                    (Some(l), Some(r)) => op.holds(l.compare(r)),
                    _ => false,
                }
            }
            BoundPredicate::And(l, r) => l.eval(row) && r.eval(row),
            BoundPredicate::Or(l, r) => l.eval(row) || r.eval(row),
            BoundPredicate::Not(inner) => !inner.eval(row),
            BoundPredicate::Operand(operand) => operand
                .resolve(row)
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }

    /// Returns the column positions the predicate reads, in first-use order.
    pub fn columns(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns(&self, out: &mut Vec<usize>) {
        fn push(out: &mut Vec<usize>, operand: &BoundOperand) {
            if let BoundOperand::Column(idx) = operand {
                if !out.contains(idx) {
                    out.push(*idx);
                }
            }
        }
        match self {
            BoundPredicate::Compare { left, right, .. } => {
                push(out, left);
                push(out, right);
            }
            BoundPredicate::Operand(operand) => push(out, operand),
            BoundPredicate::And(l, r) | BoundPredicate::Or(l, r) => {
                l.collect_columns(out);
                r.collect_columns(out);
            }
            BoundPredicate::Not(inner) => inner.collect_columns(out),
        }
    }
}

/// A natural join key: a column of the left input equal to one of the right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoinKey {
    pub left: usize,
    pub right: usize,
}

/// The operator of a bound node.
#[derive(Clone, Debug)]
pub enum BoundKind {
    Relation {
        name: String,
        relation: Arc<Relation>,
    },
    Select {
        predicate: BoundPredicate,
        input: Box<BoundNode>,
    },
    Project {
        indices: Vec<usize>,
        input: Box<BoundNode>,
    },
    Rename {
        input: Box<BoundNode>,
    },
    Union {
        left: Box<BoundNode>,
        right: Box<BoundNode>,
    },
    Intersect {
        left: Box<BoundNode>,
        right: Box<BoundNode>,
    },
    Difference {
        left: Box<BoundNode>,
        right: Box<BoundNode>,
    },
    Product {
        left: Box<BoundNode>,
        right: Box<BoundNode>,
    },
    ThetaJoin {
        condition: BoundPredicate,
        left: Box<BoundNode>,
        right: Box<BoundNode>,
    },
    NaturalJoin {
        keys: Vec<JoinKey>,
        /// Right columns that are not join keys, in right order.
        right_columns: Vec<usize>,
        left: Box<BoundNode>,
        right: Box<BoundNode>,
    },
}

/// A node of a bound query tree.
#[derive(Clone, Debug)]
pub struct BoundNode {
    schema: Schema,
    kind: BoundKind,
}

impl BoundNode {
    pub fn new(schema: Schema, kind: BoundKind) -> Self {
        Self { schema, kind }
    }

    /// Returns the output schema.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[inline]
    pub fn kind(&self) -> &BoundKind {
        &self.kind
    }

    /// Returns a short operator name used in logs and errors.
    pub fn operator_name(&self) -> &'static str {
        match &self.kind {
            BoundKind::Relation { .. } => "relation",
            BoundKind::Select { .. } => "select",
            BoundKind::Project { .. } => "project",
            BoundKind::Rename { .. } => "rename",
            BoundKind::Union { .. } => "union",
            BoundKind::Intersect { .. } => "intersect",
            BoundKind::Difference { .. } => "difference",
            BoundKind::Product { .. } => "product",
            BoundKind::ThetaJoin { .. } => "theta join",
            BoundKind::NaturalJoin { .. } => "natural join",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn row() -> Row {
        Row::new(vec![
            Value::Integer(3),
            Value::Float(2.5),
            Value::Text("x".into()),
            Value::Boolean(true),
        ])
    }

    fn cmp(l: BoundOperand, op: CompareOp, r: BoundOperand) -> BoundPredicate {
        BoundPredicate::Compare { left: l, op, right: r }
    }

    #[test]
    fn test_eval_compare_promotes() {
        let p = cmp(BoundOperand::Column(0), CompareOp::Gt, BoundOperand::Column(1));
        assert!(p.eval(&row()));
        let p = cmp(
            BoundOperand::Column(0),
            CompareOp::Eq,
            BoundOperand::Literal(Value::Float(3.0)),
        );
        assert!(p.eval(&row()));
    }

    #[test]
    fn test_eval_connectives() {
        let t = BoundPredicate::Operand(BoundOperand::Column(3));
        let f = BoundPredicate::Not(Box::new(t.clone()));
        assert!(t.eval(&row()));
        assert!(!f.eval(&row()));
        assert!(BoundPredicate::Or(Box::new(f.clone()), Box::new(t.clone())).eval(&row()));
        assert!(!BoundPredicate::And(Box::new(f), Box::new(t)).eval(&row()));
    }

    #[test]
    fn test_columns() {
        let p = BoundPredicate::And(
            Box::new(cmp(BoundOperand::Column(2), CompareOp::Eq, BoundOperand::Column(0))),
            Box::new(BoundPredicate::Operand(BoundOperand::Column(2))),
        );
        assert_eq!(p.columns(), vec![2, 0]);
    }
}
