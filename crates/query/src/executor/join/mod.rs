//! Join algorithms.

mod hash;
mod nested;

pub use hash::HashJoin;
pub use nested::NestedLoopJoin;
