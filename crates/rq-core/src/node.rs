//! Discriminator naming every IR node kind.
//!
//! Error messages and debug logs identify nodes by [`NodeKind`] rather than
//! by dumping the whole subtree.

use serde::{Deserialize, Serialize};

/// Every expression and clause kind in the IR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    // ── Expressions ──────────────────────────────────────────────────
    /// Grouping wrapper around a binary operand
    Operand,
    /// Unary operator application
    Unary,
    /// Binary operator application
    Binary,
    /// Literal value
    Literal,
    /// Unqualified column name
    ColumnReference,
    /// Alias-qualified column access
    ColumnAlias,
    /// Named derived column
    ComputedColumnAlias,
    /// Bare closure parameter
    VariableAlias,
    /// Function call
    Function,
    /// Named closure
    Lambda,
    /// Aggregate map/fold pair
    MapReduce,
    /// Conditional
    If,
    /// Logical negation
    Not,
    /// Sort specification
    OrderBy,
    /// Join predicate
    Join,
    /// Aggregation specification
    GroupBy,

    // ── Clauses ──────────────────────────────────────────────────────
    /// Source table
    FromClause,
    /// Projection
    SelectionClause,
    /// Derived columns
    ExtendClause,
    /// Column renames
    RenameClause,
    /// Row filter
    FilterClause,
    /// Aggregation
    GroupByClause,
    /// Deduplication
    DistinctClause,
    /// Ordering
    OrderByClause,
    /// Row cap
    LimitClause,
    /// Row skip
    OffsetClause,
    /// Join with another table
    JoinClause,
}

impl NodeKind {
    /// Human-readable label for error messages and display.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Operand => "operand expression",
            NodeKind::Unary => "unary expression",
            NodeKind::Binary => "binary expression",
            NodeKind::Literal => "literal expression",
            NodeKind::ColumnReference => "column reference",
            NodeKind::ColumnAlias => "column alias",
            NodeKind::ComputedColumnAlias => "computed column alias",
            NodeKind::VariableAlias => "variable alias",
            NodeKind::Function => "function expression",
            NodeKind::Lambda => "lambda expression",
            NodeKind::MapReduce => "map-reduce expression",
            NodeKind::If => "if expression",
            NodeKind::Not => "not expression",
            NodeKind::OrderBy => "order-by expression",
            NodeKind::Join => "join expression",
            NodeKind::GroupBy => "group-by expression",
            NodeKind::FromClause => "from clause",
            NodeKind::SelectionClause => "selection clause",
            NodeKind::ExtendClause => "extend clause",
            NodeKind::RenameClause => "rename clause",
            NodeKind::FilterClause => "filter clause",
            NodeKind::GroupByClause => "group-by clause",
            NodeKind::DistinctClause => "distinct clause",
            NodeKind::OrderByClause => "order-by clause",
            NodeKind::LimitClause => "limit clause",
            NodeKind::OffsetClause => "offset clause",
            NodeKind::JoinClause => "join clause",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
