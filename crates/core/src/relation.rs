//! Relation: a schema plus a bag of rows.

use crate::error::{Error, Result};
use crate::row::Row;
use crate::schema::Schema;
use alloc::vec::Vec;

/// A typed relation.
///
/// Every row has exactly the schema's arity and each value's runtime type
/// matches the declared column type. The invariant is checked once, in
/// [`Relation::try_new`], and the fields are never exposed mutably.
#[derive(Clone, Debug, PartialEq)]
pub struct Relation {
    schema: Schema,
    rows: Vec<Row>,
}

impl Relation {
    /// Creates a relation, validating every row against the schema.
    pub fn try_new(schema: Schema, rows: Vec<Row>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            check_row(&schema, i, row)?;
        }
        Ok(Self { schema, rows })
    }

    /// Creates a relation with no rows.
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Returns the schema.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the rows.
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the relation has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns an iterator over the rows.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Replaces the schema, keeping rows. The new schema must have the same
    /// column types position-wise.
    pub fn with_schema(self, schema: Schema) -> Result<Self> {
        if schema.data_types() != self.schema.data_types() {
            return Err(Error::InvalidSchema {
                message: "Replacement schema changes column types".into(),
            });
        }
        Ok(Self {
            schema,
            rows: self.rows,
        })
    }

    /// Splits the relation into its schema and rows.
    pub fn into_parts(self) -> (Schema, Vec<Row>) {
        (self.schema, self.rows)
    }
}

fn check_row(schema: &Schema, index: usize, row: &Row) -> Result<()> {
    if row.len() != schema.len() {
        return Err(Error::ArityMismatch {
            row: index,
            expected: schema.len(),
            got: row.len(),
        });
    }
    for (value, column) in row.values().iter().zip(schema.columns()) {
        if value.data_type() != column.data_type() {
            return Err(Error::TypeMismatch {
                column: column.name().into(),
                expected: column.data_type(),
                got: value.data_type(),
            });
        }
    }
    Ok(())
}
