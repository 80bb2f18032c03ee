//! Fluent query-building session
//!
//! A [`QueryBuilder`] owns the clause list and the [`SchemaTracker`] for one
//! query. Each method validates its clause against the current stage, then
//! appends the clause and applies the schema transform. Errors consume the
//! session.

use crate::clause::{
    Clause, DistinctClause, ExtendClause, FilterClause, FromClause, GroupByClause, JoinClause,
    JoinType, LimitClause, OffsetClause, OrderByClause, RenameClause, SelectionClause,
};
use crate::error::{CoreError, CoreResult};
use crate::expr::{
    ColumnAliasExpression, ComputedColumnAliasExpression, Expression, GroupByExpression,
    JoinExpression, OrderByExpression,
};
use crate::node::NodeKind;
use crate::references::{collect_column_uses, ColumnUse};
use crate::schema::{ColumnType, Database, Table};
use crate::tracker::{SchemaTracker, StageId};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A finished clause sequence bound to an execution runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundQuery {
    /// Clauses in pipeline order, starting with the source
    pub clauses: Vec<Clause>,
    /// Runtime identifier appended as the last pipeline stage
    pub runtime: String,
    /// Columns visible after the last clause
    pub schema: Table,
}

impl BoundQuery {
    /// Serialize for handing to another process
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a query produced by [`BoundQuery::to_json`]
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One query-building session
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    database: String,
    tracker: SchemaTracker,
    clauses: Vec<Clause>,
}

impl QueryBuilder {
    /// Start a query on a table of a configured database
    pub fn from_table(database: &Database, table: &str) -> CoreResult<Self> {
        let table = database.table(table)?;
        Ok(Self::from_db(database.name.clone(), table.clone()))
    }

    /// Start a query on `database.table` with an explicit schema
    pub fn from_db(database: impl Into<String>, table: Table) -> Self {
        let from = FromClause::new(database, table.name.clone());
        debug!("Starting query on {}", from.qualified_name());
        Self {
            database: from.database.clone(),
            tracker: SchemaTracker::new(table),
            clauses: vec![Clause::From(from)],
        }
    }

    /// Columns visible at the current stage
    pub fn schema(&self) -> &Table {
        self.tracker.table()
    }

    /// Current stage identifier
    pub fn stage(&self) -> StageId {
        self.tracker.stage()
    }

    /// Clauses accepted so far
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Finish the session, binding it to `runtime`
    pub fn bind(self, runtime: impl Into<String>) -> BoundQuery {
        BoundQuery {
            clauses: self.clauses,
            runtime: runtime.into(),
            schema: self.tracker.table().clone(),
        }
    }

    /// Project onto `columns`
    pub fn select(mut self, columns: &[&str]) -> CoreResult<Self> {
        self.tracker.apply_select(columns)?;
        Ok(self.accept(Clause::Selection(SelectionClause {
            expressions: columns.iter().map(|c| Expression::column(*c)).collect(),
        })))
    }

    /// Add derived columns; later items may use earlier ones
    pub fn extend(mut self, items: Vec<ComputedColumnAliasExpression>) -> CoreResult<Self> {
        if items.is_empty() {
            return Err(CoreError::structural(
                NodeKind::ExtendClause,
                "at least one column is required",
            ));
        }
        let mut added: Vec<&str> = Vec::with_capacity(items.len());
        for item in &items {
            for column in closure_columns(&item.expression, NodeKind::ExtendClause)? {
                if !added.contains(&column.as_str()) {
                    self.tracker.require_column(&column)?;
                }
            }
            if added.contains(&item.alias.as_str()) || self.tracker.validate_column(&item.alias) {
                return Err(CoreError::DuplicateColumn {
                    column: item.alias.clone(),
                    table: self.tracker.table().name.clone(),
                });
            }
            added.push(&item.alias);
        }
        let new_columns: Vec<(&str, ColumnType)> =
            added.iter().map(|name| (*name, ColumnType::Unknown)).collect();
        self.tracker.apply_extend(&new_columns)?;
        let expressions = items.into_iter().map(Expression::from).collect();
        Ok(self.accept(Clause::Extend(ExtendClause { expressions })))
    }

    /// Rename `(old, new)` pairs
    pub fn rename(mut self, pairs: &[(&str, &str)]) -> CoreResult<Self> {
        if pairs.is_empty() {
            return Err(CoreError::structural(
                NodeKind::RenameClause,
                "at least one rename is required",
            ));
        }
        self.tracker.apply_rename(pairs)?;
        let renames = pairs
            .iter()
            .map(|(old, new)| ColumnAliasExpression::new(*new, *old))
            .collect();
        Ok(self.accept(Clause::Rename(RenameClause { renames })))
    }

    /// Keep rows matching `predicate`
    pub fn filter(self, predicate: Expression) -> CoreResult<Self> {
        for column in closure_columns(&predicate, NodeKind::FilterClause)? {
            self.tracker.require_column(&column)?;
        }
        Ok(self.accept(Clause::Filter(FilterClause {
            expression: predicate,
        })))
    }

    /// Aggregate by `keys`.
    ///
    /// Each aggregate must wrap a map-reduce pair. `having` may only use the
    /// keys and the aggregate aliases.
    pub fn group_by(
        mut self,
        keys: &[&str],
        aggregates: Vec<ComputedColumnAliasExpression>,
        having: Option<Expression>,
    ) -> CoreResult<Self> {
        let expression = GroupByExpression {
            selections: keys.iter().map(|k| Expression::column(*k)).collect(),
            expressions: aggregates.into_iter().map(Expression::from).collect(),
            having: having.map(Box::new),
        };
        for key in keys {
            self.tracker.require_column(key)?;
        }
        let mut outputs: Vec<&str> = keys.to_vec();
        for (alias, map_reduce) in expression.aggregates()? {
            let map_reduce = Expression::MapReduce(map_reduce.clone());
            for column in closure_columns(&map_reduce, NodeKind::GroupByClause)? {
                self.tracker.require_column(&column)?;
            }
            outputs.push(alias);
        }
        if let Some(having) = &expression.having {
            for column in closure_columns(having, NodeKind::GroupByClause)? {
                if !outputs.contains(&column.as_str()) {
                    return Err(CoreError::UnknownColumn {
                        column,
                        table: self.tracker.table().name.clone(),
                        stage: format!("{} (aggregated)", self.tracker.stage()),
                    });
                }
            }
        }
        let aliases: Vec<&str> = outputs[keys.len()..].to_vec();
        self.tracker.apply_group_by(keys, &aliases)?;
        Ok(self.accept(Clause::GroupBy(GroupByClause { expression })))
    }

    /// Deduplicate rows, optionally on a subset of columns
    pub fn distinct(mut self, columns: &[&str]) -> CoreResult<Self> {
        self.tracker.apply_distinct(columns)?;
        Ok(self.accept(Clause::Distinct(DistinctClause {
            expressions: columns.iter().map(|c| Expression::column(*c)).collect(),
        })))
    }

    /// Sort by `orderings`, highest priority first
    pub fn order_by(self, orderings: Vec<OrderByExpression>) -> CoreResult<Self> {
        if orderings.is_empty() {
            return Err(CoreError::structural(
                NodeKind::OrderByClause,
                "at least one ordering is required",
            ));
        }
        for ordering in &orderings {
            for column in referenced_columns(&ordering.expression)? {
                self.tracker.require_column(&column)?;
            }
        }
        Ok(self.accept(Clause::OrderBy(OrderByClause { orderings })))
    }

    /// Cap the number of rows
    pub fn limit(self, value: u64) -> CoreResult<Self> {
        Ok(self.accept(Clause::Limit(LimitClause { value })))
    }

    /// Skip rows
    pub fn offset(self, value: u64) -> CoreResult<Self> {
        Ok(self.accept(Clause::Offset(OffsetClause { value })))
    }

    /// Skip `offset` rows then keep at most `limit`
    pub fn take(self, offset: u64, limit: u64) -> CoreResult<Self> {
        self.offset(offset)?.limit(limit)
    }

    /// Join `right` (from `database`) using `predicate`.
    ///
    /// A lambda predicate binds its first parameter to the current schema and
    /// its second to `right`. A raw predicate may use any aliases; each column
    /// must then exist on at least one side.
    pub fn join(
        mut self,
        database: impl Into<String>,
        right: &Table,
        join_type: JoinType,
        predicate: Expression,
    ) -> CoreResult<Self> {
        let uses = collect_column_uses(&predicate)?;
        reject_bare_columns(&uses, NodeKind::Join)?;
        match &predicate {
            Expression::Lambda(lambda) => {
                if lambda.parameters.len() != 2 {
                    return Err(CoreError::structural(
                        NodeKind::Join,
                        format!(
                            "join predicate must bind two aliases, got {}",
                            lambda.parameters.len()
                        ),
                    ));
                }
                for ColumnUse { alias, column } in &uses {
                    if alias.as_deref() == Some(lambda.parameters[1].as_str()) {
                        require_in(right, column)?;
                    } else {
                        self.tracker.require_column(column)?;
                    }
                }
            }
            _ => {
                for ColumnUse { column, .. } in &uses {
                    if !right.contains(column) {
                        self.tracker.require_column(column)?;
                    }
                }
            }
        }
        self.tracker.apply_join(right)?;
        let from = FromClause::new(database, right.name.clone());
        Ok(self.accept(Clause::Join(JoinClause {
            from,
            join_type,
            on: JoinExpression::new(predicate),
        })))
    }

    /// Inner join with a table of the session's database
    pub fn inner_join(self, right: &Table, predicate: Expression) -> CoreResult<Self> {
        let database = self.database.clone();
        self.join(database, right, JoinType::Inner, predicate)
    }

    /// Left join with a table of the session's database
    pub fn left_join(self, right: &Table, predicate: Expression) -> CoreResult<Self> {
        let database = self.database.clone();
        self.join(database, right, JoinType::Left, predicate)
    }

    fn accept(mut self, clause: Clause) -> Self {
        debug!(
            "Accepted {} at stage {}",
            clause.kind(),
            self.tracker.stage()
        );
        self.clauses.push(clause);
        self
    }
}

/// Distinct columns referenced by `expr` after structural and alias checks
fn referenced_columns(expr: &Expression) -> CoreResult<Vec<String>> {
    Ok(distinct_columns(collect_column_uses(expr)?))
}

/// Like [`referenced_columns`], for expressions evaluated per row.
///
/// Rows are only reachable through an alias, so a bare column reference is
/// rejected as [`CoreError::Structural`].
fn closure_columns(expr: &Expression, context: NodeKind) -> CoreResult<Vec<String>> {
    let uses = collect_column_uses(expr)?;
    reject_bare_columns(&uses, context)?;
    Ok(distinct_columns(uses))
}

fn reject_bare_columns(uses: &[ColumnUse], context: NodeKind) -> CoreResult<()> {
    match uses.iter().find(|u| u.alias.is_none()) {
        Some(bare) => Err(CoreError::structural(
            context,
            format!("column '{}' must be accessed through a row alias", bare.column),
        )),
        None => Ok(()),
    }
}

fn distinct_columns(uses: Vec<ColumnUse>) -> Vec<String> {
    let mut seen = HashSet::new();
    uses.into_iter()
        .map(|u| u.column)
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

fn require_in(table: &Table, column: &str) -> CoreResult<()> {
    if table.contains(column) {
        Ok(())
    } else {
        Err(CoreError::UnknownColumn {
            column: column.to_string(),
            table: table.name.clone(),
            stage: format!("{}_0", table.name),
        })
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
