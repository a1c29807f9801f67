//! Hash join implementation for natural joins.

use crate::binder::JoinKey;
use crate::executor::budget::RowBudget;
use crate::error::EvaluationError;
use alloc::vec::Vec;
use core::hash::{Hash, Hasher};
use hashbrown::HashMap;
use raqp_core::{Relation, Row, Value};

/// A wrapper around a Value reference that implements Hash and Eq for use as
/// a HashMap key without cloning.
#[derive(Clone, Copy)]
struct ValueRef<'a>(&'a Value);

impl Hash for ValueRef<'_> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialEq for ValueRef<'_> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for ValueRef<'_> {}

/// Hash join executor.
///
/// Builds a hash table over the right input keyed by the join columns, then
/// probes it with each left row in order, so the output is left-major with
/// right rows in their original order. Keys are compared structurally, so the
/// evaluator only picks this join when both sides of every key have the same
/// type.
pub struct HashJoin<'a> {
    keys: &'a [JoinKey],
    right_columns: &'a [usize],
}

impl<'a> HashJoin<'a> {
    pub fn new(keys: &'a [JoinKey], right_columns: &'a [usize]) -> Self {
        Self {
            keys,
            right_columns,
        }
    }

    fn key<'r>(row: &'r Row, positions: impl Iterator<Item = usize>) -> Option<Vec<ValueRef<'r>>> {
        positions.map(|i| row.get(i).map(ValueRef)).collect()
    }

    /// Executes the hash join.
    pub fn execute(
        &self,
        left: &Relation,
        right: &Relation,
        budget: &RowBudget,
    ) -> Result<Vec<Row>, EvaluationError> {
        // Build phase
        let mut table: HashMap<Vec<ValueRef<'_>>, Vec<u32>> = HashMap::with_capacity(right.len());
        for (idx, row) in right.iter().enumerate() {
            if let Some(key) = Self::key(row, self.keys.iter().map(|k| k.right)) {
                table.entry(key).or_default().push(idx as u32);
            }
        }

        // Probe phase
        let mut rows = Vec::new();
        for l in left.iter() {
            let Some(key) = Self::key(l, self.keys.iter().map(|k| k.left)) else {
                continue;
            };
            if let Some(matches) = table.get(&key) {
                for &idx in matches {
                    budget.check("natural join", rows.len() + 1)?;
                    let r = &right.rows()[idx as usize];
                    rows.push(Row::concat_selected(l, r, self.right_columns));
                }
            }
        }
        Ok(rows)
    }
}
