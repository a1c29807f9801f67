//! Relation catalog.
//!
//! The catalog maps relation names to immutable [`Relation`]s. It is built
//! once through [`CatalogBuilder`] and then shared read-only; lookups hand out
//! `Arc` clones so evaluations never copy base data.
//!
//! Query-local relations (for example ones defined inline next to a query)
//! are layered over a shared catalog with [`Overlay`] instead of mutating it.

mod loader;

pub use loader::{load_catalog, parse_definitions, DefinitionError};

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;
use raqp_core::Relation;

/// Name resolution for base relations.
pub trait RelationProvider: Send + Sync {
    /// Looks up a relation by exact, case-sensitive name.
    fn lookup(&self, name: &str) -> Option<Arc<Relation>>;
}

impl<T: RelationProvider + ?Sized> RelationProvider for Arc<T> {
    fn lookup(&self, name: &str) -> Option<Arc<Relation>> {
        (**self).lookup(name)
    }
}

impl<T: RelationProvider + ?Sized> RelationProvider for &T {
    fn lookup(&self, name: &str) -> Option<Arc<Relation>> {
        (**self).lookup(name)
    }
}

/// Errors raised while registering relations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// The name is already registered.
    DuplicateRelation(String),
    /// The name cannot be written as an identifier in a query.
    InvalidName(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateRelation(name) => {
                write!(f, "Relation {} is defined more than once", name)
            }
            CatalogError::InvalidName(name) => write!(f, "Invalid relation name: {:?}", name),
        }
    }
}

/// An immutable set of named relations.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    relations: BTreeMap<String, Arc<Relation>>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts building a catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Returns the relation with the given name.
    pub fn get(&self, name: &str) -> Option<&Arc<Relation>> {
        self.relations.get(name)
    }

    /// Returns true if a relation with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    /// Returns the relation names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.relations.keys().map(|k| k.as_str())
    }

    /// Returns the number of relations.
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Returns true if the catalog has no relations.
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

impl RelationProvider for Catalog {
    fn lookup(&self, name: &str) -> Option<Arc<Relation>> {
        self.relations.get(name).cloned()
    }
}

/// Builder for [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    relations: BTreeMap<String, Arc<Relation>>,
}

impl CatalogBuilder {
    /// Registers a relation. Names must be identifiers and unique.
    pub fn add_relation(
        mut self,
        name: impl Into<String>,
        relation: Relation,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(CatalogError::InvalidName(name));
        }
        if self.relations.contains_key(&name) {
            return Err(CatalogError::DuplicateRelation(name));
        }
        self.relations.insert(name, Arc::new(relation));
        Ok(self)
    }

    /// Finishes the catalog.
    pub fn build(self) -> Catalog {
        Catalog {
            relations: self.relations,
        }
    }
}

/// A catalog layered over another provider. Local names shadow base names.
pub struct Overlay<'a> {
    local: &'a Catalog,
    base: &'a dyn RelationProvider,
}

impl<'a> Overlay<'a> {
    pub fn new(local: &'a Catalog, base: &'a dyn RelationProvider) -> Self {
        Self { local, base }
    }
}

impl RelationProvider for Overlay<'_> {
    fn lookup(&self, name: &str) -> Option<Arc<Relation>> {
        self.local.lookup(name).or_else(|| self.base.lookup(name))
    }
}

/// Returns true if `name` lexes as a single identifier.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if crate::parse::is_ident_start(c) => {}
        _ => return false,
    }
    chars.all(crate::parse::is_ident_continue) && crate::parse::Keyword::lookup(name).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use raqp_core::schema::{Column, Schema};
    use raqp_core::{DataType, Row, Value};

    fn single(value: i64) -> Relation {
        let schema = Schema::try_new(vec![Column::new("a", DataType::Integer)]).unwrap();
        Relation::try_new(schema, vec![Row::new(vec![Value::Integer(value)])]).unwrap()
    }

    #[test]
    fn test_builder_and_lookup() {
        let catalog = Catalog::builder()
            .add_relation("R", single(1))
            .unwrap()
            .add_relation("S", single(2))
            .unwrap()
            .build();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.lookup("R").is_some());
        assert!(catalog.lookup("r").is_none());
        assert_eq!(catalog.names().collect::<alloc::vec::Vec<_>>(), vec!["R", "S"]);
    }

    #[test]
    fn test_builder_rejects_bad_names() {
        let err = Catalog::builder()
            .add_relation("R", single(1))
            .unwrap()
            .add_relation("R", single(2))
            .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateRelation("R".into()));

        assert!(Catalog::builder().add_relation("1R", single(1)).is_err());
        assert!(Catalog::builder().add_relation("select", single(1)).is_err());
        assert!(Catalog::builder().add_relation("", single(1)).is_err());
    }

    #[test]
    fn test_overlay_shadows_base() {
        let base = Catalog::builder()
            .add_relation("R", single(1))
            .unwrap()
            .add_relation("S", single(2))
            .unwrap()
            .build();
        let local = Catalog::builder().add_relation("R", single(9)).unwrap().build();
        let overlay = Overlay::new(&local, &base);

        let r = overlay.lookup("R").unwrap();
        assert_eq!(r.rows()[0].get(0), Some(&Value::Integer(9)));
        assert!(overlay.lookup("S").is_some());
        assert!(overlay.lookup("T").is_none());
    }

    #[test]
    fn test_lookup_shares_relation() {
        let catalog = Catalog::builder().add_relation("R", single(1)).unwrap().build();
        let a = catalog.lookup("R").unwrap();
        let b = catalog.lookup("R").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
