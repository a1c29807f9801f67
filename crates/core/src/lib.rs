//! RAQP Core - value, row, schema and relation types for the relational algebra
//! query processor.
//!
//! This crate provides the foundational types shared by every stage of the
//! query pipeline:
//!
//! - `DataType`: The closed set of scalar kinds (Integer, Float, Text, Boolean)
//! - `Value`: Runtime scalars, with the Integer/Float promotion rule in `Value::compare`
//! - `Row`: A positional tuple of values
//! - `schema`: Column and schema definitions, union compatibility
//! - `Relation`: A schema plus rows, validated at construction
//! - `Error`: Error types for schema and relation construction
//!
//! # Example
//!
//! ```rust
//! use raqp_core::{DataType, Relation, Row, Value};
//! use raqp_core::schema::{Column, Schema};
//!
//! let schema = Schema::try_new(vec![
//!     Column::new("a", DataType::Integer),
//!     Column::new("b", DataType::Integer),
//! ])
//! .unwrap();
//!
//! let relation = Relation::try_new(
//!     schema,
//!     vec![
//!         Row::new(vec![Value::Integer(1), Value::Integer(2)]),
//!         Row::new(vec![Value::Integer(3), Value::Integer(4)]),
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(relation.len(), 2);
//! assert_eq!(relation.rows()[1].get(0), Some(&Value::Integer(3)));
//! ```

#![no_std]

extern crate alloc;

mod error;
mod relation;
mod row;
pub mod schema;
mod types;
mod value;

pub use error::{Error, Result};
pub use relation::Relation;
pub use row::Row;
pub use types::DataType;
pub use value::Value;
