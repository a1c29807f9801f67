//! Relational expression trees.

use super::predicate::{ColumnName, Predicate};
use crate::parse::BinaryOp;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// One `old → new` pair of a rename.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenamePair {
    pub from: String,
    pub to: String,
}

impl RenamePair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A relational algebra expression.
#[derive(Clone, Debug, PartialEq)]
pub enum RelExpr {
    /// A reference to a base relation.
    Relation(String),
    /// σ: keeps rows satisfying the predicate.
    Select {
        predicate: Predicate,
        input: Box<RelExpr>,
    },
    /// π: keeps the listed columns, in list order, removing duplicate rows.
    Project {
        columns: Vec<ColumnName>,
        input: Box<RelExpr>,
    },
    /// ρ: renames columns.
    Rename {
        mapping: Vec<RenamePair>,
        input: Box<RelExpr>,
    },
    Union {
        left: Box<RelExpr>,
        right: Box<RelExpr>,
    },
    Intersect {
        left: Box<RelExpr>,
        right: Box<RelExpr>,
    },
    Difference {
        left: Box<RelExpr>,
        right: Box<RelExpr>,
    },
    Product {
        left: Box<RelExpr>,
        right: Box<RelExpr>,
    },
    /// ⨝: natural join without a condition, theta join with one.
    Join {
        left: Box<RelExpr>,
        right: Box<RelExpr>,
        condition: Option<Predicate>,
    },
}

impl RelExpr {
    pub fn relation(name: impl Into<String>) -> Self {
        RelExpr::Relation(name.into())
    }

    pub fn select(predicate: Predicate, input: RelExpr) -> Self {
        RelExpr::Select {
            predicate,
            input: Box::new(input),
        }
    }

    pub fn project(columns: Vec<ColumnName>, input: RelExpr) -> Self {
        RelExpr::Project {
            columns,
            input: Box::new(input),
        }
    }

    pub fn rename(mapping: Vec<RenamePair>, input: RelExpr) -> Self {
        RelExpr::Rename {
            mapping,
            input: Box::new(input),
        }
    }

    pub fn union(left: RelExpr, right: RelExpr) -> Self {
        RelExpr::Union {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn intersect(left: RelExpr, right: RelExpr) -> Self {
        RelExpr::Intersect {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn difference(left: RelExpr, right: RelExpr) -> Self {
        RelExpr::Difference {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn product(left: RelExpr, right: RelExpr) -> Self {
        RelExpr::Product {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn natural_join(left: RelExpr, right: RelExpr) -> Self {
        RelExpr::Join {
            left: Box::new(left),
            right: Box::new(right),
            condition: None,
        }
    }

    pub fn theta_join(left: RelExpr, right: RelExpr, condition: Predicate) -> Self {
        RelExpr::Join {
            left: Box::new(left),
            right: Box::new(right),
            condition: Some(condition),
        }
    }

    /// Builds the node for a binary operator.
    pub fn binary(op: BinaryOp, left: RelExpr, right: RelExpr) -> Self {
        match op {
            BinaryOp::Union => Self::union(left, right),
            BinaryOp::Intersect => Self::intersect(left, right),
            BinaryOp::Difference => Self::difference(left, right),
            BinaryOp::Product => Self::product(left, right),
            BinaryOp::Join => Self::natural_join(left, right),
        }
    }

    /// Returns the binary operator at the root, if any.
    pub fn binary_op(&self) -> Option<BinaryOp> {
        match self {
            RelExpr::Union { .. } => Some(BinaryOp::Union),
            RelExpr::Intersect { .. } => Some(BinaryOp::Intersect),
            RelExpr::Difference { .. } => Some(BinaryOp::Difference),
            RelExpr::Product { .. } => Some(BinaryOp::Product),
            RelExpr::Join { .. } => Some(BinaryOp::Join),
            _ => None,
        }
    }

    /// Returns the name of the leftmost base relation. Results are labelled
    /// with it.
    pub fn leading_relation(&self) -> &str {
        match self {
            RelExpr::Relation(name) => name,
            RelExpr::Select { input, .. }
            | RelExpr::Project { input, .. }
            | RelExpr::Rename { input, .. } => input.leading_relation(),
            RelExpr::Union { left, .. }
            | RelExpr::Intersect { left, .. }
            | RelExpr::Difference { left, .. }
            | RelExpr::Product { left, .. }
            | RelExpr::Join { left, .. } => left.leading_relation(),
        }
    }

    /// Returns the number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            RelExpr::Relation(_) => 1,
            RelExpr::Select { input, .. }
            | RelExpr::Project { input, .. }
            | RelExpr::Rename { input, .. } => 1 + input.node_count(),
            RelExpr::Union { left, right }
            | RelExpr::Intersect { left, right }
            | RelExpr::Difference { left, right }
            | RelExpr::Product { left, right }
            | RelExpr::Join { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parenthesize: bool) -> fmt::Result {
        if parenthesize {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

/// Writes the normalized form: Unicode operators, single spaces, unary
/// operands always parenthesized, binary operands only when precedence
/// requires it.
impl fmt::Display for RelExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelExpr::Relation(name) => f.write_str(name),
            RelExpr::Select { predicate, input } => write!(f, "σ {} ({})", predicate, input),
            RelExpr::Project { columns, input } => {
                f.write_str("π ")?;
                for (i, c) in columns.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, " ({})", input)
            }
            RelExpr::Rename { mapping, input } => {
                f.write_str("ρ ")?;
                for (i, pair) in mapping.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}→{}", pair.from, pair.to)?;
                }
                write!(f, " ({})", input)
            }
            RelExpr::Union { left, right }
            | RelExpr::Intersect { left, right }
            | RelExpr::Difference { left, right }
            | RelExpr::Product { left, right }
            | RelExpr::Join { left, right, .. } => {
                let prec = self.binary_op().map(|op| op.precedence()).unwrap_or(0);
                let left_parens = left.binary_op().is_some_and(|op| op.precedence() < prec);
                let right_parens = right.binary_op().is_some_and(|op| op.precedence() <= prec);

                left.fmt_operand(f, left_parens)?;
                match self {
                    RelExpr::Union { .. } => f.write_str(" ∪ ")?,
                    RelExpr::Intersect { .. } => f.write_str(" ∩ ")?,
                    RelExpr::Difference { .. } => f.write_str(" − ")?,
                    RelExpr::Product { .. } => f.write_str(" × ")?,
                    RelExpr::Join {
                        condition: Some(cond),
                        ..
                    } => write!(f, " ⨝[{}] ", cond)?,
                    _ => f.write_str(" ⨝ ")?,
                }
                right.fmt_operand(f, right_parens)
            }
        }
    }
}
