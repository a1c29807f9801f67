//! Wire types exchanged with clients.

use serde::{Deserialize, Serialize};

/// A query request: `{"query": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// A result table. Each row has one JSON value per column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl Table {
    /// The table sent with every error response.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if the table has neither columns nor rows.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}

/// A query response: `{"text": "...", "table": {"columns": [...], "rows": [...]}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub text: String,
    pub table: Table,
}

impl QueryResponse {
    /// A response carrying only a message and the empty table.
    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            table: Table::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_from_json() {
        let request: QueryRequest = serde_json::from_str(r#"{"query": "π a (R)"}"#).unwrap();
        assert_eq!(request, QueryRequest::new("π a (R)"));
    }

    #[test]
    fn test_response_shape() {
        let response = QueryResponse {
            text: "R\n1 row".into(),
            table: Table {
                columns: vec!["a".into(), "b".into()],
                rows: vec![vec![json!(1), json!("x")]],
            },
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "text": "R\n1 row",
                "table": {"columns": ["a", "b"], "rows": [[1, "x"]]}
            })
        );
    }

    #[test]
    fn test_fallback_has_empty_table() {
        let response = QueryResponse::fallback("Unknown relation: X");
        assert!(response.table.is_empty());
        assert_eq!(
            serde_json::to_value(&response.table).unwrap(),
            json!({"columns": [], "rows": []})
        );
    }
}
