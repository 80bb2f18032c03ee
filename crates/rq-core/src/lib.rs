//! rq-core - Query IR and schema tracking for relq
//!
//! This crate provides the expression and clause IR, the visitor traits that
//! back ends implement, the per-session schema tracker, the fluent query
//! builder, and configuration loading.

pub mod clause;
pub mod config;
pub mod error;
pub mod expr;
pub mod function;
pub mod literal;
pub mod node;
pub mod operator;
pub mod query;
pub mod references;
pub mod schema;
pub mod tracker;
pub mod visitor;

pub use clause::{Clause, FromClause, JoinType};
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use expr::{
    ComputedColumnAliasExpression, Expression, LambdaExpression, MapReduceExpression,
    OrderByExpression, OrderType,
};
pub use function::Function;
pub use literal::{Literal, LiteralValue};
pub use node::NodeKind;
pub use operator::{BinaryOperator, UnaryOperator};
pub use query::{BoundQuery, QueryBuilder};
pub use schema::{Column, ColumnType, Database, Table};
pub use tracker::{SchemaTracker, StageId};
pub use visitor::{ClauseVisitor, ExpressionVisitor};
