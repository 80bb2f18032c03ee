//! Clause nodes: one pipeline operation each
//!
//! A query is an ordered `Vec<Clause>` starting with a [`FromClause`].

use crate::expr::{
    ColumnAliasExpression, Expression, GroupByExpression, JoinExpression, OrderByExpression,
};
use crate::node::NodeKind;
use serde::{Deserialize, Serialize};

/// Source table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FromClause {
    /// Database name
    pub database: String,
    /// Table name
    pub table: String,
}

impl FromClause {
    /// Source `database.table`
    pub fn new(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
        }
    }

    /// `database.table`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.database, self.table)
    }
}

/// Projection onto a list of columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionClause {
    /// Projected columns
    pub expressions: Vec<Expression>,
}

/// Adds derived columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendClause {
    /// One computed column alias per new column
    pub expressions: Vec<Expression>,
}

/// Renames columns; each entry maps `reference` (old) to `alias` (new)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameClause {
    /// Rename pairs in application order
    pub renames: Vec<ColumnAliasExpression>,
}

/// Row filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    /// Predicate
    pub expression: Expression,
}

/// Aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupByClause {
    /// Keys, aggregates and optional having predicate
    pub expression: GroupByExpression,
}

/// Row deduplication, optionally restricted to some columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistinctClause {
    /// Deduplication columns; empty means whole rows
    pub expressions: Vec<Expression>,
}

/// Ordering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByClause {
    /// Sort keys in priority order
    pub orderings: Vec<OrderByExpression>,
}

/// Row cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitClause {
    /// Maximum number of rows
    pub value: u64,
}

/// Row skip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetClause {
    /// Number of rows to skip
    pub value: u64,
}

/// Join flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    /// Keep matching pairs only
    Inner,
    /// Keep every left row
    Left,
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinType::Inner => write!(f, "inner"),
            JoinType::Left => write!(f, "left"),
        }
    }
}

/// Join with another table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinClause {
    /// Right-hand table
    pub from: FromClause,
    /// Join flavour
    pub join_type: JoinType,
    /// Predicate
    pub on: JoinExpression,
}

/// Pipeline operation (closed variant set)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Clause {
    /// Source table
    From(FromClause),
    /// Projection
    Selection(SelectionClause),
    /// Derived columns
    Extend(ExtendClause),
    /// Column renames
    Rename(RenameClause),
    /// Row filter
    Filter(FilterClause),
    /// Aggregation
    GroupBy(GroupByClause),
    /// Deduplication
    Distinct(DistinctClause),
    /// Ordering
    OrderBy(OrderByClause),
    /// Row cap
    Limit(LimitClause),
    /// Row skip
    Offset(OffsetClause),
    /// Join
    Join(JoinClause),
}

impl Clause {
    /// The node kind of this clause
    pub fn kind(&self) -> NodeKind {
        match self {
            Clause::From(_) => NodeKind::FromClause,
            Clause::Selection(_) => NodeKind::SelectionClause,
            Clause::Extend(_) => NodeKind::ExtendClause,
            Clause::Rename(_) => NodeKind::RenameClause,
            Clause::Filter(_) => NodeKind::FilterClause,
            Clause::GroupBy(_) => NodeKind::GroupByClause,
            Clause::Distinct(_) => NodeKind::DistinctClause,
            Clause::OrderBy(_) => NodeKind::OrderByClause,
            Clause::Limit(_) => NodeKind::LimitClause,
            Clause::Offset(_) => NodeKind::OffsetClause,
            Clause::Join(_) => NodeKind::JoinClause,
        }
    }
}
