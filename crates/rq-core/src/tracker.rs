//! Schema tracking across a clause pipeline
//!
//! [`SchemaTracker`] owns the column set visible at the current stage of a
//! query and applies the transform of each schema-changing clause in turn:
//! select and group-by replace the set, extend adds, rename substitutes
//! 1:1, join unions after a collision check.

use crate::error::{CoreError, CoreResult};
use crate::schema::{Column, ColumnType, Table};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier of one pipeline stage, unique within a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StageId {
    /// Name of the source table the session started from
    pub table: String,
    /// Monotonic stage counter
    pub index: u32,
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.table, self.index)
    }
}

/// Per-session schema state
#[derive(Debug, Clone)]
pub struct SchemaTracker {
    source: String,
    table: Table,
    stage: u32,
}

impl SchemaTracker {
    /// Start tracking from a source table at stage 0
    pub fn new(table: Table) -> Self {
        Self {
            source: table.name.clone(),
            table,
            stage: 0,
        }
    }

    /// Columns visible at the current stage
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The current stage identifier
    pub fn stage(&self) -> StageId {
        StageId {
            table: self.source.clone(),
            index: self.stage,
        }
    }

    /// True if `name` is visible at the current stage
    pub fn validate_column(&self, name: &str) -> bool {
        self.table.contains(name)
    }

    /// Look up a visible column, failing with [`CoreError::UnknownColumn`]
    pub fn require_column(&self, name: &str) -> CoreResult<&Column> {
        self.table
            .column(name)
            .ok_or_else(|| self.unknown_column(name))
    }

    /// Move to a fresh stage and return its identifier
    pub fn advance_stage(&mut self) -> StageId {
        self.stage += 1;
        let stage = self.stage();
        debug!(
            "Schema stage advanced to {} ({} columns)",
            stage,
            self.table.len()
        );
        stage
    }

    /// Keep only `names`, in the given order
    pub fn apply_select(&mut self, names: &[&str]) -> CoreResult<StageId> {
        let columns = self.project(names)?;
        self.table.columns = columns;
        Ok(self.advance_stage())
    }

    /// Deduplicate on `names`; an empty list keeps every column and the stage
    pub fn apply_distinct(&mut self, names: &[&str]) -> CoreResult<StageId> {
        if names.is_empty() {
            return Ok(self.stage());
        }
        self.apply_select(names)
    }

    /// Append derived columns; nothing is applied if any name is taken
    pub fn apply_extend(&mut self, columns: &[(&str, ColumnType)]) -> CoreResult<StageId> {
        let mut extended = self.table.columns.clone();
        for (name, column_type) in columns {
            self.ensure_absent(&extended, name)?;
            extended.push(Column::new(*name, column_type.clone()));
        }
        self.table.columns = extended;
        Ok(self.advance_stage())
    }

    /// Rename columns in place, keeping order and type.
    ///
    /// Pairs apply in sequence, so a later pair may rename the result of an
    /// earlier one. The rename is all-or-nothing.
    pub fn apply_rename(&mut self, renames: &[(&str, &str)]) -> CoreResult<StageId> {
        let mut renamed = self.table.columns.clone();
        for (old, new) in renames {
            let index = renamed
                .iter()
                .position(|c| c.name == *old)
                .ok_or_else(|| self.unknown_column(old))?;
            if old != new {
                self.ensure_absent(&renamed, new)?;
            }
            renamed[index].name = (*new).to_string();
        }
        self.table.columns = renamed;
        Ok(self.advance_stage())
    }

    /// Replace the column set with grouping keys followed by aggregate outputs
    pub fn apply_group_by(&mut self, keys: &[&str], aggregates: &[&str]) -> CoreResult<StageId> {
        let mut columns = self.project(keys)?;
        for alias in aggregates {
            if columns.iter().any(|c| c.name == *alias) {
                return Err(CoreError::DuplicateColumn {
                    column: (*alias).to_string(),
                    table: self.table.name.clone(),
                });
            }
            columns.push(Column::new(*alias, ColumnType::Unknown));
        }
        self.table.columns = columns;
        Ok(self.advance_stage())
    }

    /// Union with another table's columns.
    ///
    /// Fails with [`CoreError::JoinCollision`] listing every overlapping name;
    /// overlaps must be renamed before the join.
    pub fn apply_join(&mut self, right: &Table) -> CoreResult<StageId> {
        let left: HashSet<&str> = self.table.columns.iter().map(|c| c.name.as_str()).collect();
        let collisions: Vec<String> = right
            .columns
            .iter()
            .filter(|c| left.contains(c.name.as_str()))
            .map(|c| c.name.clone())
            .collect();
        if !collisions.is_empty() {
            return Err(CoreError::JoinCollision {
                left: self.table.name.clone(),
                right: right.name.clone(),
                columns: collisions,
            });
        }
        self.table.columns.extend(right.columns.iter().cloned());
        Ok(self.advance_stage())
    }

    fn project(&self, names: &[&str]) -> CoreResult<Vec<Column>> {
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let col = self.require_column(name)?;
            if !seen.insert(*name) {
                return Err(CoreError::DuplicateColumn {
                    column: (*name).to_string(),
                    table: self.table.name.clone(),
                });
            }
            columns.push(col.clone());
        }
        Ok(columns)
    }

    fn unknown_column(&self, name: &str) -> CoreError {
        CoreError::UnknownColumn {
            column: name.to_string(),
            table: self.table.name.clone(),
            stage: self.stage().to_string(),
        }
    }

    fn ensure_absent(&self, columns: &[Column], name: &str) -> CoreResult<()> {
        if columns.iter().any(|c| c.name == name) {
            return Err(CoreError::DuplicateColumn {
                column: name.to_string(),
                table: self.table.name.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tests;
