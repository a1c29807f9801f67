//! AST module for relational expressions and predicates.

mod expr;
mod predicate;

pub use expr::{RelExpr, RenamePair};
pub use predicate::{ColumnName, CompareOp, Operand, Predicate};
