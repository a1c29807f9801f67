//! Data type definitions for relational algebra values.
//!
//! This module defines the closed set of scalar kinds a column can hold.

use core::fmt;

/// Supported scalar data types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point number
    Float,
    /// UTF-8 string
    Text,
    /// Boolean type (true/false)
    Boolean,
}

impl DataType {
    /// Returns whether this type is numeric (Integer or Float).
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }

    /// Returns whether values of this type can be compared with values of `other`.
    ///
    /// Identical kinds are always comparable. The only cross-kind pair is
    /// Integer/Float, where the Integer operand is promoted.
    pub fn comparable_with(&self, other: DataType) -> bool {
        *self == other || (self.is_numeric() && other.is_numeric())
    }

    /// Parses a type name as written in relation definitions.
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "int" | "integer" => Some(DataType::Integer),
            "float" | "real" | "double" => Some(DataType::Float),
            "text" | "string" | "str" => Some(DataType::Text),
            "bool" | "boolean" => Some(DataType::Boolean),
            _ => None,
        }
    }

    /// Returns the canonical name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Integer => "Integer",
            DataType::Float => "Float",
            DataType::Text => "Text",
            DataType::Boolean => "Boolean",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
