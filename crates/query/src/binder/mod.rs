//! Name resolution and type checking.
//!
//! The binder walks a parsed [`RelExpr`] bottom-up against a
//! [`RelationProvider`], computing every node's output schema and rejecting
//! queries that could not be evaluated. A successfully bound tree never
//! fails evaluation for a semantic reason.

mod bound;

pub use bound::{BoundKind, BoundNode, BoundOperand, BoundPredicate, JoinKey};

use crate::ast::{ColumnName, Operand, Predicate, RelExpr, RenamePair};
use crate::catalog::RelationProvider;
use crate::error::BindError;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use raqp_core::schema::{Column, Schema};
use raqp_core::DataType;

/// Binds parsed expressions against a catalog.
pub struct Binder<'a> {
    catalog: &'a dyn RelationProvider,
}

impl<'a> Binder<'a> {
    pub fn new(catalog: &'a dyn RelationProvider) -> Self {
        Self { catalog }
    }

    /// Binds an expression, producing a tree annotated with schemas.
    pub fn bind(&self, expr: &RelExpr) -> Result<BoundNode, BindError> {
        match expr {
            RelExpr::Relation(name) => {
                let relation = self
                    .catalog
                    .lookup(name)
                    .ok_or_else(|| BindError::UnknownRelation(name.clone()))?;
                let schema = relation.schema().qualified(name);
                Ok(BoundNode::new(
                    schema,
                    BoundKind::Relation {
                        name: name.clone(),
                        relation,
                    },
                ))
            }
            RelExpr::Select { predicate, input } => {
                let input = self.bind(input)?;
                let predicate = bind_predicate(predicate, input.schema())?;
                Ok(BoundNode::new(
                    input.schema().clone(),
                    BoundKind::Select {
                        predicate,
                        input: Box::new(input),
                    },
                ))
            }
            RelExpr::Project { columns, input } => {
                let input = self.bind(input)?;
                self.bind_project(columns, input)
            }
            RelExpr::Rename { mapping, input } => {
                let input = self.bind(input)?;
                self.bind_rename(mapping, input)
            }
            RelExpr::Union { left, right } => {
                self.bind_set_op("union", left, right, |left, right| BoundKind::Union {
                    left,
                    right,
                })
            }
            RelExpr::Intersect { left, right } => {
                self.bind_set_op("intersect", left, right, |left, right| {
                    BoundKind::Intersect { left, right }
                })
            }
            RelExpr::Difference { left, right } => {
                self.bind_set_op("difference", left, right, |left, right| {
                    BoundKind::Difference { left, right }
                })
            }
            RelExpr::Product { left, right } => {
                let left = self.bind(left)?;
                let right = self.bind(right)?;
                let schema = disjoint_concat("product", left.schema(), right.schema())?;
                Ok(BoundNode::new(
                    schema,
                    BoundKind::Product {
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                ))
            }
            RelExpr::Join {
                left,
                right,
                condition: Some(condition),
            } => {
                let left = self.bind(left)?;
                let right = self.bind(right)?;
                let schema = disjoint_concat("join", left.schema(), right.schema())?;
                let condition = bind_predicate(condition, &schema)?;
                Ok(BoundNode::new(
                    schema,
                    BoundKind::ThetaJoin {
                        condition,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                ))
            }
            RelExpr::Join {
                left,
                right,
                condition: None,
            } => {
                let left = self.bind(left)?;
                let right = self.bind(right)?;
                self.bind_natural_join(left, right)
            }
        }
    }

    fn bind_project(&self, columns: &[ColumnName], input: BoundNode) -> Result<BoundNode, BindError> {
        let schema = input.schema();
        let mut indices = Vec::with_capacity(columns.len());
        for column in columns {
            let idx = resolve_column(column, schema)?;
            if indices.contains(&idx) {
                return Err(BindError::DuplicateColumn(column.name.clone()));
            }
            indices.push(idx);
        }
        let output: Schema = indices
            .iter()
            .filter_map(|&i| schema.column(i).cloned())
            .collect();
        Ok(BoundNode::new(
            output,
            BoundKind::Project {
                indices,
                input: Box::new(input),
            },
        ))
    }

    fn bind_rename(&self, mapping: &[RenamePair], input: BoundNode) -> Result<BoundNode, BindError> {
        let schema = input.schema();
        let mut targets: Vec<Option<&str>> = alloc::vec![None; schema.len()];
        for pair in mapping {
            let idx = schema
                .index_of(&pair.from)
                .ok_or_else(|| unknown_column(pair.from.clone(), schema))?;
            if targets[idx].is_some() {
                return Err(BindError::DuplicateColumn(pair.from.clone()));
            }
            targets[idx] = Some(pair.to.as_str());
        }

        let columns: Vec<Column> = schema
            .columns()
            .iter()
            .zip(&targets)
            .map(|(col, target)| match target {
                Some(to) => col.renamed(*to),
                None => col.clone(),
            })
            .collect();
        for (i, col) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name() == col.name()) {
                return Err(BindError::DuplicateColumn(col.name().into()));
            }
        }

        Ok(BoundNode::new(
            columns.into_iter().collect(),
            BoundKind::Rename {
                input: Box::new(input),
            },
        ))
    }

    fn bind_set_op(
        &self,
        operator: &'static str,
        left: &RelExpr,
        right: &RelExpr,
        make: fn(Box<BoundNode>, Box<BoundNode>) -> BoundKind,
    ) -> Result<BoundNode, BindError> {
        let left = self.bind(left)?;
        let right = self.bind(right)?;
        left.schema()
            .check_union_compatible(right.schema())
            .map_err(|detail| BindError::SchemaMismatch { operator, detail })?;

        let schema = left.schema().clone();
        Ok(BoundNode::new(schema, make(Box::new(left), Box::new(right))))
    }

    fn bind_natural_join(&self, left: BoundNode, right: BoundNode) -> Result<BoundNode, BindError> {
        let (ls, rs) = (left.schema(), right.schema());
        let common = ls.common_names(rs);
        if common.is_empty() {
            return Err(BindError::NoJoinColumns {
                left: ls.names().into_iter().map(String::from).collect(),
                right: rs.names().into_iter().map(String::from).collect(),
            });
        }

        let mut keys = Vec::with_capacity(common.len());
        for name in &common {
            let (Some(l), Some(r)) = (ls.index_of(name), rs.index_of(name)) else {
                continue;
            };
            let (lt, rt) = (ls.columns()[l].data_type(), rs.columns()[r].data_type());
            if !lt.comparable_with(rt) {
                return Err(BindError::TypeMismatch {
                    expected: lt,
                    found: rt,
                    context: format!("natural join on {}", name),
                });
            }
            keys.push(JoinKey { left: l, right: r });
        }

        let right_columns: Vec<usize> = (0..rs.len())
            .filter(|i| !keys.iter().any(|k| k.right == *i))
            .collect();
        let mut columns: Vec<Column> = ls.columns().to_vec();
        columns.extend(right_columns.iter().map(|&i| rs.columns()[i].clone()));

        Ok(BoundNode::new(
            columns.into_iter().collect(),
            BoundKind::NaturalJoin {
                keys,
                right_columns,
                left: Box::new(left),
                right: Box::new(right),
            },
        ))
    }
}

fn disjoint_concat(operator: &'static str, left: &Schema, right: &Schema) -> Result<Schema, BindError> {
    let names: Vec<String> = left
        .common_names(right)
        .into_iter()
        .map(String::from)
        .collect();
    if !names.is_empty() {
        return Err(BindError::ColumnNameCollision { operator, names });
    }
    left.concat(right)
        .map_err(|e| BindError::DuplicateColumn(e.to_string()))
}

fn unknown_column(column: String, schema: &Schema) -> BindError {
    BindError::UnknownColumn {
        column,
        available: schema.names().into_iter().map(String::from).collect(),
    }
}

fn resolve_column(column: &ColumnName, schema: &Schema) -> Result<usize, BindError> {
    schema
        .resolve(column.qualifier.as_deref(), &column.name)
        .ok_or_else(|| unknown_column(column.to_string(), schema))
}

fn bind_operand(operand: &Operand, schema: &Schema) -> Result<(BoundOperand, DataType), BindError> {
    match operand {
        Operand::Column(column) => {
            let idx = resolve_column(column, schema)?;
            let ty = schema.columns()[idx].data_type();
            Ok((BoundOperand::Column(idx), ty))
        }
        Operand::Literal(value) => Ok((BoundOperand::Literal(value.clone()), value.data_type())),
    }
}

/// Resolves and type-checks a predicate against the schema of its input.
pub fn bind_predicate(predicate: &Predicate, schema: &Schema) -> Result<BoundPredicate, BindError> {
    match predicate {
        Predicate::Compare { left, op, right } => {
            let (left_bound, lt) = bind_operand(left, schema)?;
            let (right_bound, rt) = bind_operand(right, schema)?;
            if !lt.comparable_with(rt) {
                return Err(BindError::TypeMismatch {
                    expected: lt,
                    found: rt,
                    context: predicate.to_string(),
                });
            }
            Ok(BoundPredicate::Compare {
                left: left_bound,
                op: *op,
                right: right_bound,
            })
        }
        Predicate::And(l, r) => Ok(BoundPredicate::And(
            Box::new(bind_predicate(l, schema)?),
            Box::new(bind_predicate(r, schema)?),
        )),
        Predicate::Or(l, r) => Ok(BoundPredicate::Or(
            Box::new(bind_predicate(l, schema)?),
            Box::new(bind_predicate(r, schema)?),
        )),
        Predicate::Not(inner) => Ok(BoundPredicate::Not(Box::new(bind_predicate(inner, schema)?))),
        Predicate::Operand(operand) => {
            let (bound, ty) = bind_operand(operand, schema)?;
            if ty != DataType::Boolean {
                return Err(BindError::TypeMismatch {
                    expected: DataType::Boolean,
                    found: ty,
                    context: predicate.to_string(),
                });
            }
            Ok(BoundPredicate::Operand(bound))
        }
    }
}
