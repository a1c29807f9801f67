//! The query service.
//!
//! A [`QueryService`] owns a shared, read-only catalog and turns requests into
//! responses. It keeps no per-request state, so one service can be shared by
//! reference across any number of threads.
//!
//! Request text may carry its own relations: everything before a line that
//! starts with `Query:` is read as relation definitions, and the rest of the
//! text is the query. Those relations shadow catalog relations of the same
//! name for that request only.

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::format::Formatter;
use crate::wire::{QueryRequest, QueryResponse};
use raqp_query::catalog::{load_catalog, Overlay};
use raqp_query::{QueryEngine, RelationProvider};
use std::sync::Arc;

/// Marks the start of the query in request text with inline definitions.
pub const QUERY_MARKER: &str = "Query:";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Execute,
    Validate,
}

/// Runs requests against a shared catalog.
#[derive(Clone)]
pub struct QueryService {
    catalog: Arc<dyn RelationProvider>,
    config: ServiceConfig,
}

impl QueryService {
    pub fn new(catalog: Arc<dyn RelationProvider>, config: ServiceConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn formatter(&self) -> Formatter {
        Formatter::new(self.config.text_style)
    }

    /// Runs a request through the whole pipeline. Failures are reported in
    /// the response text with an empty table.
    pub fn handle(&self, request: &QueryRequest) -> QueryResponse {
        self.respond(request, Mode::Execute)
    }

    /// Checks a request without evaluating it. The response lists the result
    /// columns and carries no rows.
    pub fn validate(&self, request: &QueryRequest) -> QueryResponse {
        self.respond(request, Mode::Validate)
    }

    /// Runs a request and returns failures as errors instead of responses.
    pub fn try_handle(&self, request: &QueryRequest) -> Result<QueryResponse, ApiError> {
        self.process(&request.query, Mode::Execute)
    }

    fn respond(&self, request: &QueryRequest, mode: Mode) -> QueryResponse {
        match self.process(&request.query, mode) {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(category = err.category(), error = %err, "query failed");
                self.formatter().format_error(&err)
            }
        }
    }

    fn process(&self, text: &str, mode: Mode) -> Result<QueryResponse, ApiError> {
        match split_inline(text) {
            Some((definitions, query)) => {
                let local = load_catalog(definitions)?;
                tracing::debug!(relations = local.len(), "loaded inline definitions");
                let overlay = Overlay::new(&local, self.catalog.as_ref());
                self.run(&overlay, query, mode)
            }
            None => self.run(self.catalog.as_ref(), text, mode),
        }
    }

    fn run(
        &self,
        catalog: &dyn RelationProvider,
        query: &str,
        mode: Mode,
    ) -> Result<QueryResponse, ApiError> {
        let engine = QueryEngine::new(catalog).with_context(self.config.execution_context());
        let prepared = engine.prepare(query)?;
        if mode == Mode::Validate {
            return Ok(self.formatter().format_schema(&prepared));
        }
        let output = engine.execute_prepared(&prepared)?;
        tracing::debug!(query = %output.query, rows = output.relation.len(), "query succeeded");
        Ok(self.formatter().format(&output))
    }
}

/// Splits request text at the first line starting with [`QUERY_MARKER`] into
/// the definitions before it and the query after the marker.
fn split_inline(text: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with(QUERY_MARKER) {
            let start = offset + (line.len() - trimmed.len()) + QUERY_MARKER.len();
            return Some((&text[..offset], &text[start..]));
        }
        offset += line.len();
    }
    None
}
