//! Conversion of values and relations to JSON.

use crate::wire::Table;
use raqp_core::{Relation, Row, Value};
use serde_json::Value as JsonValue;

/// Converts a value to a JSON value.
///
/// Integers, finite floats and booleans pass through as JSON numbers and
/// booleans. JSON has no representation for NaN or infinities, so those
/// floats are sent as strings.
pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Integer(n) => JsonValue::from(*n),
        Value::Float(n) => serde_json::Number::from_f64(*n)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(n.to_string())),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Boolean(b) => JsonValue::Bool(*b),
    }
}

/// Converts a row to a JSON array in column order.
pub fn row_to_json(row: &Row) -> Vec<JsonValue> {
    row.values().iter().map(value_to_json).collect()
}

/// Converts a relation to a wire table.
pub fn relation_to_table(relation: &Relation) -> Table {
    Table {
        columns: relation
            .schema()
            .names()
            .into_iter()
            .map(String::from)
            .collect(),
        rows: relation.iter().map(row_to_json).collect(),
    }
}
