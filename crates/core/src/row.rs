//! Row structure.
//!
//! This module defines the `Row` struct which represents a single tuple of a
//! relation. A row carries no schema of its own; positional alignment with the
//! owning relation's schema is checked when the relation is constructed.

use crate::value::Value;
use alloc::vec::Vec;

/// A tuple of values, positionally aligned with a schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Row {
    /// Values stored in this row, indexed by column position.
    values: Vec<Value>,
}

impl Row {
    /// Creates a new row from values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Returns a reference to the values.
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the row and returns its values.
    #[inline]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Gets a value at the given column index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns the number of values in this row.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if this row has no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Concatenates two rows (left values followed by right values).
    pub fn concat(left: &Row, right: &Row) -> Row {
        let mut values = Vec::with_capacity(left.len() + right.len());
        values.extend(left.values.iter().cloned());
        values.extend(right.values.iter().cloned());
        Row { values }
    }

    /// Concatenates this row with the selected columns of another row.
    pub fn concat_selected(left: &Row, right: &Row, right_indices: &[usize]) -> Row {
        let mut values = Vec::with_capacity(left.len() + right_indices.len());
        values.extend(left.values.iter().cloned());
        values.extend(right_indices.iter().filter_map(|&i| right.get(i).cloned()));
        Row { values }
    }

    /// Builds a new row holding only the given column indices, in order.
    pub fn project(&self, indices: &[usize]) -> Row {
        let values = indices
            .iter()
            .filter_map(|&i| self.values.get(i).cloned())
            .collect();
        Row { values }
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::new(values)
    }
}
