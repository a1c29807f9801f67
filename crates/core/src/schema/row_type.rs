//! Ordered, typed column signature of a relation.

use super::column::Column;
use crate::error::{Error, Result};
use crate::types::DataType;
use alloc::format;
use alloc::vec::Vec;
use core::fmt;

/// An ordered sequence of uniquely named, typed columns.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Schema {
    columns: Vec<Column>,
}

/// Why two schemas are not union-compatible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaMismatch {
    /// The schemas have a different number of columns.
    Arity { left: usize, right: usize },
    /// The column types differ at a position.
    Type {
        position: usize,
        left: DataType,
        right: DataType,
    },
}

impl fmt::Display for SchemaMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaMismatch::Arity { left, right } => {
                write!(f, "arity differs: left has {} columns, right has {}", left, right)
            }
            SchemaMismatch::Type {
                position,
                left,
                right,
            } => write!(
                f,
                "column {} differs in type: left is {}, right is {}",
                position + 1,
                left,
                right
            ),
        }
    }
}

impl Schema {
    /// Creates a schema, rejecting duplicate column names.
    pub fn try_new(columns: Vec<Column>) -> Result<Self> {
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name() == col.name()) {
                return Err(Error::InvalidSchema {
                    message: format!("Duplicate column: {}", col.name()),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Creates a schema with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the columns.
    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the column at the given position.
    #[inline]
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Returns the number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the schema has no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the column names in order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    /// Returns the column types in order.
    pub fn data_types(&self) -> Vec<DataType> {
        self.columns.iter().map(|c| c.data_type()).collect()
    }

    /// Gets a column index by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Resolves an optionally qualified column reference to its position.
    pub fn resolve(&self, qualifier: Option<&str>, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.matches(qualifier, name))
    }

    /// Returns a copy of this schema with every column qualified by `qualifier`.
    pub fn qualified(&self, qualifier: &str) -> Schema {
        Schema {
            columns: self
                .columns
                .iter()
                .map(|c| c.clone().qualified(qualifier))
                .collect(),
        }
    }

    /// Checks union compatibility: same arity and identical types position-wise.
    pub fn check_union_compatible(&self, other: &Schema) -> core::result::Result<(), SchemaMismatch> {
        if self.len() != other.len() {
            return Err(SchemaMismatch::Arity {
                left: self.len(),
                right: other.len(),
            });
        }
        for (position, (l, r)) in self.columns.iter().zip(other.columns.iter()).enumerate() {
            if l.data_type() != r.data_type() {
                return Err(SchemaMismatch::Type {
                    position,
                    left: l.data_type(),
                    right: r.data_type(),
                });
            }
        }
        Ok(())
    }

    /// Returns the names present in both schemas, in this schema's order.
    pub fn common_names<'a>(&'a self, other: &Schema) -> Vec<&'a str> {
        self.columns
            .iter()
            .map(|c| c.name())
            .filter(|name| other.index_of(name).is_some())
            .collect()
    }

    /// Builds the schema of the given column positions, in order.
    pub fn project(&self, indices: &[usize]) -> Result<Schema> {
        let mut columns = Vec::with_capacity(indices.len());
        for &i in indices {
            let col = self.columns.get(i).ok_or_else(|| Error::InvalidSchema {
                message: format!("Column position {} out of range", i),
            })?;
            columns.push(col.clone());
        }
        Schema::try_new(columns)
    }

    /// Concatenates two schemas (left columns followed by right columns).
    pub fn concat(&self, other: &Schema) -> Result<Schema> {
        let mut columns = self.columns.clone();
        columns.extend(other.columns.iter().cloned());
        Schema::try_new(columns)
    }
}

impl FromIterator<Column> for Schema {
    /// Collects columns without the duplicate check; prefer [`Schema::try_new`]
    /// for untrusted input.
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        Schema {
            columns: iter.into_iter().collect(),
        }
    }
}
