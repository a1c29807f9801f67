//! Query executor module.
//!
//! One executor per operator, each reading whole input relations and
//! producing rows. [`Evaluator`] drives them over a bound tree.

mod budget;
mod filter;
pub mod join;
mod product;
mod project;
mod runner;
mod set_ops;

pub use budget::RowBudget;
pub use filter::FilterExecutor;
pub use join::{HashJoin, NestedLoopJoin};
pub use product::CrossProduct;
pub use project::ProjectExecutor;
pub use runner::Evaluator;
pub use set_ops::{SetExecutor, SetOperation};
