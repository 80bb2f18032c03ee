//! Double-dispatch visitor traits over the IR.
//!
//! Every `visit_*` method is required, so adding a node kind breaks every
//! visitor at compile time instead of falling through to a default.
//! `accept` on each node forwards to the matching `visit_*` method; the
//! enum-level `accept` matches exhaustively and forwards to the node.

use crate::clause::{
    Clause, DistinctClause, ExtendClause, FilterClause, FromClause, GroupByClause, JoinClause,
    LimitClause, OffsetClause, OrderByClause, RenameClause, SelectionClause,
};
use crate::expr::{
    BinaryExpression, ColumnAliasExpression, ColumnReferenceExpression,
    ComputedColumnAliasExpression, Expression, FunctionExpression, IfExpression, JoinExpression,
    LambdaExpression, LiteralExpression, MapReduceExpression, NotExpression, OperandExpression,
    OrderByExpression, UnaryExpression, VariableAliasExpression,
};

/// Visitor over expression nodes
pub trait ExpressionVisitor {
    /// Value produced per visited node
    type Output;

    fn visit_operand(&mut self, node: &OperandExpression) -> Self::Output;
    fn visit_unary(&mut self, node: &UnaryExpression) -> Self::Output;
    fn visit_binary(&mut self, node: &BinaryExpression) -> Self::Output;
    fn visit_literal(&mut self, node: &LiteralExpression) -> Self::Output;
    fn visit_column_reference(&mut self, node: &ColumnReferenceExpression) -> Self::Output;
    fn visit_column_alias(&mut self, node: &ColumnAliasExpression) -> Self::Output;
    fn visit_computed_column_alias(&mut self, node: &ComputedColumnAliasExpression)
        -> Self::Output;
    fn visit_variable_alias(&mut self, node: &VariableAliasExpression) -> Self::Output;
    fn visit_function(&mut self, node: &FunctionExpression) -> Self::Output;
    fn visit_lambda(&mut self, node: &LambdaExpression) -> Self::Output;
    fn visit_map_reduce(&mut self, node: &MapReduceExpression) -> Self::Output;
    fn visit_if(&mut self, node: &IfExpression) -> Self::Output;
    fn visit_not(&mut self, node: &NotExpression) -> Self::Output;
    fn visit_order_by(&mut self, node: &OrderByExpression) -> Self::Output;
    fn visit_join(&mut self, node: &JoinExpression) -> Self::Output;
}

/// Visitor over clause nodes
pub trait ClauseVisitor {
    /// Value produced per visited clause
    type Output;

    fn visit_from(&mut self, clause: &FromClause) -> Self::Output;
    fn visit_selection(&mut self, clause: &SelectionClause) -> Self::Output;
    fn visit_extend(&mut self, clause: &ExtendClause) -> Self::Output;
    fn visit_rename(&mut self, clause: &RenameClause) -> Self::Output;
    fn visit_filter(&mut self, clause: &FilterClause) -> Self::Output;
    fn visit_group_by(&mut self, clause: &GroupByClause) -> Self::Output;
    fn visit_distinct(&mut self, clause: &DistinctClause) -> Self::Output;
    fn visit_order_by(&mut self, clause: &OrderByClause) -> Self::Output;
    fn visit_limit(&mut self, clause: &LimitClause) -> Self::Output;
    fn visit_offset(&mut self, clause: &OffsetClause) -> Self::Output;
    fn visit_join(&mut self, clause: &JoinClause) -> Self::Output;
}

macro_rules! impl_accept {
    ($visitor:ident: $($node:ty => $method:ident),* $(,)?) => {
        $(
            impl $node {
                /// Dispatch to the matching visitor method
                pub fn accept<V: $visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
                    visitor.$method(self)
                }
            }
        )*
    };
}

impl_accept!(ExpressionVisitor:
    OperandExpression => visit_operand,
    UnaryExpression => visit_unary,
    BinaryExpression => visit_binary,
    LiteralExpression => visit_literal,
    ColumnReferenceExpression => visit_column_reference,
    ColumnAliasExpression => visit_column_alias,
    ComputedColumnAliasExpression => visit_computed_column_alias,
    VariableAliasExpression => visit_variable_alias,
    FunctionExpression => visit_function,
    LambdaExpression => visit_lambda,
    MapReduceExpression => visit_map_reduce,
    IfExpression => visit_if,
    NotExpression => visit_not,
    OrderByExpression => visit_order_by,
    JoinExpression => visit_join,
);

impl_accept!(ClauseVisitor:
    FromClause => visit_from,
    SelectionClause => visit_selection,
    ExtendClause => visit_extend,
    RenameClause => visit_rename,
    FilterClause => visit_filter,
    GroupByClause => visit_group_by,
    DistinctClause => visit_distinct,
    OrderByClause => visit_order_by,
    LimitClause => visit_limit,
    OffsetClause => visit_offset,
    JoinClause => visit_join,
);

impl Expression {
    /// Dispatch to the visitor method for this node's kind
    pub fn accept<V: ExpressionVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Expression::Operand(node) => node.accept(visitor),
            Expression::Unary(node) => node.accept(visitor),
            Expression::Binary(node) => node.accept(visitor),
            Expression::Literal(node) => node.accept(visitor),
            Expression::ColumnReference(node) => node.accept(visitor),
            Expression::ColumnAlias(node) => node.accept(visitor),
            Expression::ComputedColumnAlias(node) => node.accept(visitor),
            Expression::VariableAlias(node) => node.accept(visitor),
            Expression::Function(node) => node.accept(visitor),
            Expression::Lambda(node) => node.accept(visitor),
            Expression::MapReduce(node) => node.accept(visitor),
            Expression::If(node) => node.accept(visitor),
            Expression::Not(node) => node.accept(visitor),
            Expression::OrderBy(node) => node.accept(visitor),
            Expression::Join(node) => node.accept(visitor),
        }
    }
}

impl Clause {
    /// Dispatch to the visitor method for this clause's kind
    pub fn accept<V: ClauseVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Clause::From(clause) => clause.accept(visitor),
            Clause::Selection(clause) => clause.accept(visitor),
            Clause::Extend(clause) => clause.accept(visitor),
            Clause::Rename(clause) => clause.accept(visitor),
            Clause::Filter(clause) => clause.accept(visitor),
            Clause::GroupBy(clause) => clause.accept(visitor),
            Clause::Distinct(clause) => clause.accept(visitor),
            Clause::OrderBy(clause) => clause.accept(visitor),
            Clause::Limit(clause) => clause.accept(visitor),
            Clause::Offset(clause) => clause.accept(visitor),
            Clause::Join(clause) => clause.accept(visitor),
        }
    }
}
