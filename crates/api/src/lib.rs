//! RAQP API - the request/response surface of the relational algebra query
//! processor.
//!
//! This crate wraps the query pipeline in a service that never fails:
//!
//! - `wire`: `QueryRequest`, `QueryResponse` and `Table`, serialized with serde
//! - `convert`: Values and relations to JSON
//! - `format`: Summary and listing text, plus the error fallback
//! - `service`: `QueryService`, including inline relation definitions
//! - `config`: `ServiceConfig` and the command line arguments
//! - `logging`: Global `tracing` subscriber setup
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use raqp_api::{QueryRequest, QueryService, ServiceConfig};
//! use raqp_query::catalog::load_catalog;
//! use serde_json::json;
//!
//! let catalog = load_catalog("R (a, b) = {\n 1, 2\n 3, 4\n}").unwrap();
//! let service = QueryService::new(Arc::new(catalog), ServiceConfig::default());
//!
//! let response = service.handle(&QueryRequest::new("σ a>1 (R)"));
//! assert_eq!(response.table.columns, vec!["a", "b"]);
//! assert_eq!(response.table.rows, vec![vec![json!(3), json!(4)]]);
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod logging;
pub mod service;
pub mod wire;

pub use config::{Args, ServiceConfig};
pub use error::ApiError;
pub use format::{Formatter, TextStyle};
pub use logging::LogFormat;
pub use service::QueryService;
pub use wire::{QueryRequest, QueryResponse, Table};
