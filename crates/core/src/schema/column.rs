//! Column definition for relation schemas.

use crate::types::DataType;
use alloc::string::String;

/// A column definition in a relation schema.
#[derive(Clone, Debug)]
pub struct Column {
    /// Column name.
    name: String,
    /// Data type of the column.
    data_type: DataType,
    /// Name of the base relation this column was read from, if any.
    qualifier: Option<String>,
}

impl Column {
    /// Creates a new unqualified column definition.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            qualifier: None,
        }
    }

    /// Sets the qualifying relation name.
    pub fn qualified(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Returns a copy of this column under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: self.data_type,
            qualifier: self.qualifier.clone(),
        }
    }

    /// Returns the column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the data type.
    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Returns the qualifying relation name.
    #[inline]
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Returns whether this column answers to `qualifier.name`.
    pub fn matches(&self, qualifier: Option<&str>, name: &str) -> bool {
        if self.name != name {
            return false;
        }
        match qualifier {
            None => true,
            Some(q) => self.qualifier.as_deref() == Some(q),
        }
    }
}

// Qualifiers are provenance only; they do not take part in schema equality.
impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.data_type == other.data_type
    }
}

impl Eq for Column {}
