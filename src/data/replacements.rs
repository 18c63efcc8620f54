//! Column-oriented binding tables ("replacements") and their algebra.
//!
//! A table maps each variable name to a column of node handles.  All columns
//! have the same length and index `i` across columns is one consistent
//! assignment.  A table can also carry rows without columns: that is what a
//! variable-free pattern produces when it matches, and it acts as the
//! identity for [`Replacements::join`].

use super::{Assignment, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;

/// Violations of the column/row shape of a binding table.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BindingError {
    /// Two non-empty tables with different variable sets were united.
    #[error("cannot unite tables over {left:?} and {right:?}")]
    MismatchedKeys {
        left: BTreeSet<String>,
        right: BTreeSet<String>,
    },
    /// A row did not bind exactly the table's variables.
    #[error("row does not match table columns {expected:?}")]
    RaggedRow { expected: BTreeSet<String> },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacements {
    columns: BTreeMap<String, Vec<NodeId>>,
    rows: usize,
}

impl Replacements {
    /// Create an empty table (no rows, no columns).
    pub fn new() -> Self {
        Self::default()
    }

    /// A single row with no columns.
    pub fn unit() -> Self {
        Self {
            columns: BTreeMap::new(),
            rows: 1,
        }
    }

    /// Re-collect assignment rows into a table.
    ///
    /// Every row must bind the same set of names.
    pub fn from_assignments<'a, I>(rows: I) -> Result<Self, BindingError>
    where
        I: IntoIterator<Item = &'a Assignment>,
    {
        let mut table = Self::new();
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Variable names present in the table.
    pub fn key_names(&self) -> BTreeSet<String> {
        self.columns.keys().cloned().collect()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[NodeId]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Row `index` as an assignment.
    pub fn row(&self, index: usize) -> Option<Assignment> {
        if index >= self.rows {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|(name, column)| (name.clone(), column[index]))
                .collect(),
        )
    }

    /// Transpose the table into one assignment per row.
    pub fn to_assignments(&self) -> Vec<Assignment> {
        (0..self.rows).filter_map(|index| self.row(index)).collect()
    }

    pub fn contains_row(&self, row: &Assignment) -> bool {
        if row.len() != self.columns.len() {
            return false;
        }
        (0..self.rows).any(|index| {
            self.columns
                .iter()
                .all(|(name, column)| row.get(name) == Some(column[index]))
        })
    }

    /// Append a row.  The first row of an empty table fixes its columns.
    pub fn push_row(&mut self, row: &Assignment) -> Result<(), BindingError> {
        if self.rows == 0 {
            self.columns = row.names().map(|name| (name.clone(), Vec::new())).collect();
        } else if row.len() != self.columns.len()
            || !row.names().all(|name| self.columns.contains_key(name))
        {
            return Err(BindingError::RaggedRow {
                expected: self.key_names(),
            });
        }
        self.append(row);
        Ok(())
    }

    // Callers guarantee that `row` binds exactly the table's columns.
    fn append(&mut self, row: &Assignment) {
        for (name, column) in self.columns.iter_mut() {
            if let Some(node) = row.get(name) {
                column.push(node);
            }
        }
        self.rows += 1;
    }

    /// Concatenate the rows of both tables.
    ///
    /// An empty side is the identity; otherwise the variable sets must match.
    pub fn unite(&self, other: &Replacements) -> Result<Replacements, BindingError> {
        if other.is_empty() {
            return Ok(self.clone());
        }
        if self.is_empty() {
            return Ok(other.clone());
        }
        if self.key_names() != other.key_names() {
            return Err(BindingError::MismatchedKeys {
                left: self.key_names(),
                right: other.key_names(),
            });
        }

        let mut result = self.clone();
        for (name, column) in result.columns.iter_mut() {
            if let Some(values) = other.columns.get(name) {
                column.extend_from_slice(values);
            }
        }
        result.rows += other.rows;
        Ok(result)
    }

    /// Add the rows of `other` that are not already present.
    pub fn merge_distinct(&mut self, other: &Replacements) -> Result<(), BindingError> {
        for row in other.to_assignments() {
            if !self.contains_row(&row) {
                self.push_row(&row)?;
            }
        }
        Ok(())
    }

    /// Natural join: rows of both tables that agree on the shared variables.
    pub fn join(&self, other: &Replacements) -> Replacements {
        let left_rows = self.to_assignments();
        let right_rows = other.to_assignments();

        let mut result = Replacements::new();
        result.columns = self
            .columns
            .keys()
            .chain(other.columns.keys())
            .map(|name| (name.clone(), Vec::new()))
            .collect();

        for left in &left_rows {
            for right in &right_rows {
                if left.agrees_with(right) {
                    let row = left.merged(right);
                    if !result.contains_row(&row) {
                        result.append(&row);
                    }
                }
            }
        }
        result
    }

    /// Keep only the named columns, dropping duplicate rows.
    pub fn project(&self, names: &BTreeSet<String>) -> Replacements {
        let mut result = Replacements::new();
        result.columns = self
            .columns
            .keys()
            .filter(|name| names.contains(*name))
            .map(|name| (name.clone(), Vec::new()))
            .collect();

        let mut seen = HashSet::new();
        for index in 0..self.rows {
            let key: Vec<NodeId> = result
                .columns
                .keys()
                .map(|name| self.columns[name][index])
                .collect();
            if seen.insert(key) {
                if let Some(row) = self.row(index) {
                    let projected: Assignment = row
                        .iter()
                        .filter(|(name, _)| names.contains(*name))
                        .map(|(name, node)| (name.clone(), node))
                        .collect();
                    result.append(&projected);
                }
            }
        }
        result
    }
}
