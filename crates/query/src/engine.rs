//! Query engine: the parse, bind and evaluate pipeline behind one handle.

use crate::ast::RelExpr;
use crate::binder::{Binder, BoundNode};
use crate::catalog::RelationProvider;
use crate::context::ExecutionContext;
use crate::error::Result;
use crate::executor::Evaluator;
use crate::parse::parse;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use raqp_core::schema::Schema;
use raqp_core::Relation;

/// A parsed and bound query, ready to evaluate.
#[derive(Clone, Debug)]
pub struct PreparedQuery {
    expr: RelExpr,
    bound: BoundNode,
}

impl PreparedQuery {
    /// Returns the parsed expression.
    pub fn expr(&self) -> &RelExpr {
        &self.expr
    }

    /// Returns the bound tree.
    pub fn bound(&self) -> &BoundNode {
        &self.bound
    }

    /// Returns the result schema.
    pub fn schema(&self) -> &Schema {
        self.bound.schema()
    }

    /// Returns the query in normalized form.
    pub fn normalized(&self) -> String {
        self.expr.to_string()
    }

    /// Returns the name results are labelled with: the leftmost relation.
    pub fn result_name(&self) -> &str {
        self.expr.leading_relation()
    }
}

/// The outcome of a successful query.
#[derive(Clone, Debug)]
pub struct QueryOutput {
    /// The query in normalized form.
    pub query: String,
    /// The result label.
    pub name: String,
    pub relation: Arc<Relation>,
}

/// Runs queries against a catalog.
///
/// The engine holds only shared references and a copyable context, so it is
/// cheap to create per request and safe to use from many threads at once.
pub struct QueryEngine<'a> {
    catalog: &'a dyn RelationProvider,
    context: ExecutionContext,
}

impl<'a> QueryEngine<'a> {
    pub fn new(catalog: &'a dyn RelationProvider) -> Self {
        Self {
            catalog,
            context: ExecutionContext::default(),
        }
    }

    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = context;
        self
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Parses a query without resolving names.
    pub fn parse(&self, text: &str) -> Result<RelExpr> {
        parse(text)
    }

    /// Parses and binds a query.
    pub fn prepare(&self, text: &str) -> Result<PreparedQuery> {
        let expr = parse(text)?;
        tracing::debug!(nodes = expr.node_count(), "parsed query");
        let bound = Binder::new(self.catalog).bind(&expr)?;
        Ok(PreparedQuery { expr, bound })
    }

    /// Checks a query and returns its result schema without evaluating it.
    pub fn validate(&self, text: &str) -> Result<Schema> {
        Ok(self.prepare(text)?.schema().clone())
    }

    /// Parses, binds and evaluates a query.
    pub fn execute(&self, text: &str) -> Result<QueryOutput> {
        let prepared = self.prepare(text)?;
        self.execute_prepared(&prepared)
    }

    /// Evaluates a prepared query.
    pub fn execute_prepared(&self, prepared: &PreparedQuery) -> Result<QueryOutput> {
        let relation = Evaluator::new(&self.context).evaluate(prepared.bound())?;
        tracing::debug!(
            rows = relation.len(),
            columns = relation.schema().len(),
            "evaluated query"
        );
        Ok(QueryOutput {
            query: prepared.normalized(),
            name: prepared.result_name().into(),
            relation,
        })
    }
}
