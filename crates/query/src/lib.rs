//! RAQP Query - parser, binder and evaluator for relational algebra.
//!
//! This crate turns query text into a result relation:
//!
//! - `parse`: Tokens, lexer and recursive descent parser
//! - `ast`: Relational expression and predicate trees
//! - `catalog`: Named base relations and the definition loader
//! - `binder`: Name resolution, type checking and schema inference
//! - `executor`: One executor per operator, plus the tree evaluator
//! - `context`: Execution limits
//! - `engine`: The whole pipeline behind `QueryEngine`
//!
//! # Example
//!
//! ```rust
//! use raqp_query::catalog::load_catalog;
//! use raqp_query::QueryEngine;
//!
//! let catalog = load_catalog("R (a, b) = {\n 1, 2\n 3, 4\n}").unwrap();
//! let output = QueryEngine::new(&catalog).execute("σ a>1 (R)").unwrap();
//!
//! assert_eq!(output.query, "σ a > 1 (R)");
//! assert_eq!(output.relation.len(), 1);
//! ```

#![no_std]

extern crate alloc;

pub mod ast;
pub mod binder;
pub mod catalog;
pub mod context;
pub mod engine;
pub mod error;
pub mod executor;
pub mod parse;

pub use catalog::{Catalog, RelationProvider};
pub use context::ExecutionContext;
pub use engine::{PreparedQuery, QueryEngine, QueryOutput};
pub use error::{BindError, ErrorCategory, EvaluationError, LexError, ParseError, QueryError};
