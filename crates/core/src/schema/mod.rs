//! Schema module.
//!
//! This module contains the column and schema definitions shared by base
//! relations and by the inferred output of every query operator.

mod column;
mod row_type;

pub use column::Column;
pub use row_type::{Schema, SchemaMismatch};
