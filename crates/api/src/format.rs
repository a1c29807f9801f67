//! Response formatting.
//!
//! The table part of a response is always the same; the `text` part depends
//! on the [`TextStyle`]:
//!
//! ```text
//! Summary:  π Name (σ Age > 30 (Employees))
//!           2 rows
//!
//! Listing:  Employees = {Name
//!             "John"
//!             "Carol"
//!           }
//! ```

use crate::convert::relation_to_table;
use crate::error::ApiError;
use crate::wire::{QueryResponse, Table};
use raqp_core::{Relation, Value};
use raqp_query::{PreparedQuery, QueryOutput};
use std::fmt::Write;

/// How the `text` field of a successful response is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TextStyle {
    /// The normalized query and the row count.
    #[default]
    Summary,
    /// Every row, labelled with the query's leading relation.
    Listing,
}

/// Builds responses from query results and errors.
#[derive(Clone, Copy, Debug, Default)]
pub struct Formatter {
    style: TextStyle,
}

impl Formatter {
    pub fn new(style: TextStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> TextStyle {
        self.style
    }

    /// Formats a query result.
    pub fn format(&self, output: &QueryOutput) -> QueryResponse {
        let text = match self.style {
            TextStyle::Summary => summary(&output.query, output.relation.len()),
            TextStyle::Listing => listing(&output.name, &output.relation),
        };
        QueryResponse {
            text,
            table: relation_to_table(&output.relation),
        }
    }

    /// Formats a validated query: the result columns and no rows.
    pub fn format_schema(&self, prepared: &PreparedQuery) -> QueryResponse {
        let columns: Vec<String> = prepared
            .schema()
            .names()
            .into_iter()
            .map(String::from)
            .collect();
        let text = format!(
            "{}\nvalid, {} {}",
            prepared.normalized(),
            columns.len(),
            plural(columns.len(), "column", "columns")
        );
        QueryResponse {
            text,
            table: Table {
                columns,
                rows: Vec::new(),
            },
        }
    }

    /// Formats a failure as the empty-table fallback.
    pub fn format_error(&self, err: &ApiError) -> QueryResponse {
        QueryResponse::fallback(err.to_string())
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

fn summary(query: &str, rows: usize) -> String {
    format!("{}\n{} {}", query, rows, plural(rows, "row", "rows"))
}

fn listing(name: &str, relation: &Relation) -> String {
    if relation.is_empty() {
        return String::from("No result.");
    }
    let mut out = format!("{} = {{{}", name, relation.schema().names().join(", "));
    for row in relation.iter() {
        out.push_str("\n  ");
        for (i, value) in row.values().iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            match value {
                Value::Text(s) => {
                    let _ = write!(out, "\"{}\"", s.replace('"', "\\\""));
                }
                other => {
                    let _ = write!(out, "{}", other);
                }
            }
        }
    }
    out.push_str("\n}");
    out
}
