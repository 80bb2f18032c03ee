//! Expression tree for the query IR
//!
//! Nodes are plain data. Behaviour lives in visitors (see [`crate::visitor`]);
//! the only logic here is construction and shape checks that do not need a
//! schema.

use crate::error::{CoreError, CoreResult};
use crate::function::Function;
use crate::literal::LiteralValue;
use crate::node::NodeKind;
use crate::operator::{BinaryOperator, UnaryOperator};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Grouping wrapper around the operand of a unary or binary expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperandExpression {
    /// Wrapped expression
    pub expression: Box<Expression>,
}

impl OperandExpression {
    /// Wrap an expression
    pub fn new(expression: Expression) -> Self {
        Self {
            expression: Box::new(expression),
        }
    }
}

/// Unary operator application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpression {
    /// Operator
    pub operator: UnaryOperator,
    /// Operand
    pub operand: OperandExpression,
}

/// Binary operator application. Both sides are always wrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    /// Left operand
    pub left: OperandExpression,
    /// Operator
    pub operator: BinaryOperator,
    /// Right operand
    pub right: OperandExpression,
}

/// Literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpression {
    /// The literal
    pub literal: LiteralValue,
}

/// Unqualified column name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnReferenceExpression {
    /// Column name
    pub name: String,
}

impl ColumnReferenceExpression {
    /// Reference a column by name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Alias-qualified column access (`$alias.column`).
///
/// Rename clauses reuse this node: `alias` is the new name and `reference`
/// the column being renamed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnAliasExpression {
    /// Closure parameter (or new column name inside a rename)
    pub alias: String,
    /// Referenced column
    pub reference: ColumnReferenceExpression,
}

impl ColumnAliasExpression {
    /// Access `column` through `alias`
    pub fn new(alias: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            reference: ColumnReferenceExpression::new(column),
        }
    }
}

/// Names a derived column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedColumnAliasExpression {
    /// Output column name
    pub alias: String,
    /// Expression computing the column (usually a lambda or map-reduce)
    pub expression: Box<Expression>,
}

impl ComputedColumnAliasExpression {
    /// Name `expression` as `alias`
    pub fn new(alias: impl Into<String>, expression: Expression) -> Self {
        Self {
            alias: alias.into(),
            expression: Box::new(expression),
        }
    }
}

/// Bare reference to a closure parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableAliasExpression {
    /// Parameter name
    pub alias: String,
}

/// Ordered call to a named function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionExpression {
    /// Function tag
    pub function: Function,
    /// Parameters in signature order; the first is the receiver
    pub parameters: Vec<Expression>,
}

impl FunctionExpression {
    /// Check the parameter count against the function's arity
    pub fn validate(&self) -> CoreResult<()> {
        let arity = self.function.arity();
        if arity.accepts(self.parameters.len()) {
            Ok(())
        } else {
            Err(CoreError::structural(
                NodeKind::Function,
                format!(
                    "{} takes {} parameter(s), got {}",
                    self.function,
                    arity,
                    self.parameters.len()
                ),
            ))
        }
    }
}

/// Named closure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LambdaExpression {
    /// Parameter names; non-empty and distinct
    pub parameters: Vec<String>,
    /// Closure body
    pub expression: Box<Expression>,
}

impl LambdaExpression {
    /// Build a closure over `parameters`
    pub fn new<I, S>(parameters: I, expression: Expression) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameters: parameters.into_iter().map(Into::into).collect(),
            expression: Box::new(expression),
        }
    }

    /// Check that the parameter list is non-empty with distinct names
    pub fn validate(&self) -> CoreResult<()> {
        if self.parameters.is_empty() {
            return Err(CoreError::structural(
                NodeKind::Lambda,
                "parameter list is empty",
            ));
        }
        let mut seen = HashSet::new();
        for param in &self.parameters {
            if param.is_empty() {
                return Err(CoreError::structural(
                    NodeKind::Lambda,
                    "parameter name is empty",
                ));
            }
            if !seen.insert(param.as_str()) {
                return Err(CoreError::structural(
                    NodeKind::Lambda,
                    format!("parameter '{param}' is declared twice"),
                ));
            }
        }
        Ok(())
    }

    /// True if `name` is one of the parameters
    pub fn binds(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p == name)
    }
}

/// One aggregate output: a projection lambda and a fold lambda
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapReduceExpression {
    /// Per-row projection
    pub map: LambdaExpression,
    /// Fold over the projected values
    pub reduce: LambdaExpression,
}

impl MapReduceExpression {
    /// Pair a projection with a fold
    pub fn new(map: LambdaExpression, reduce: LambdaExpression) -> Self {
        Self { map, reduce }
    }
}

/// Conditional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfExpression {
    /// Condition
    pub test: Box<Expression>,
    /// Value when the condition holds
    pub body: Box<Expression>,
    /// Value otherwise
    pub orelse: Box<Expression>,
}

/// Logical negation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotExpression {
    /// Negated expression
    pub expression: Box<Expression>,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Ascending
    Ascending,
    /// Descending
    Descending,
}

/// Sort specification for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByExpression {
    /// Direction
    pub direction: OrderType,
    /// Sort key, normally a column reference
    pub expression: Box<Expression>,
}

impl OrderByExpression {
    /// Ascending sort on a column
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            direction: OrderType::Ascending,
            expression: Box::new(Expression::column(column)),
        }
    }

    /// Descending sort on a column
    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            direction: OrderType::Descending,
            expression: Box::new(Expression::column(column)),
        }
    }
}

/// Join predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinExpression {
    /// Predicate; a two-parameter lambda or a raw alias-qualified expression
    pub on: Box<Expression>,
}

impl JoinExpression {
    /// Wrap a predicate
    pub fn new(on: Expression) -> Self {
        Self { on: Box::new(on) }
    }
}

/// Aggregation specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupByExpression {
    /// Grouping keys
    pub selections: Vec<Expression>,
    /// One `ComputedColumnAlias(MapReduce)` per aggregate output
    pub expressions: Vec<Expression>,
    /// Optional predicate over the aggregated rows
    pub having: Option<Box<Expression>>,
}

impl GroupByExpression {
    /// View each aggregate as `(alias, map-reduce)`.
    ///
    /// Fails if an entry is not a computed alias wrapping a map-reduce pair.
    pub fn aggregates(&self) -> CoreResult<Vec<(&str, &MapReduceExpression)>> {
        self.expressions
            .iter()
            .map(|expr| match expr {
                Expression::ComputedColumnAlias(computed) => match computed.expression.as_ref() {
                    Expression::MapReduce(map_reduce) => Ok((computed.alias.as_str(), map_reduce)),
                    other => Err(CoreError::structural(
                        NodeKind::GroupBy,
                        format!(
                            "aggregate '{}' must wrap a map-reduce expression, found {}",
                            computed.alias,
                            other.kind()
                        ),
                    )),
                },
                other => Err(CoreError::structural(
                    NodeKind::GroupBy,
                    format!(
                        "aggregate entries must be computed column aliases, found {}",
                        other.kind()
                    ),
                )),
            })
            .collect()
    }
}

/// Expression tree node (closed variant set)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Grouping wrapper
    Operand(OperandExpression),
    /// Unary operator application
    Unary(UnaryExpression),
    /// Binary operator application
    Binary(BinaryExpression),
    /// Literal value
    Literal(LiteralExpression),
    /// Unqualified column name
    ColumnReference(ColumnReferenceExpression),
    /// Alias-qualified column access
    ColumnAlias(ColumnAliasExpression),
    /// Named derived column
    ComputedColumnAlias(ComputedColumnAliasExpression),
    /// Bare closure parameter
    VariableAlias(VariableAliasExpression),
    /// Function call
    Function(FunctionExpression),
    /// Named closure
    Lambda(LambdaExpression),
    /// Aggregate map/fold pair
    MapReduce(MapReduceExpression),
    /// Conditional
    If(IfExpression),
    /// Logical negation
    Not(NotExpression),
    /// Sort specification
    OrderBy(OrderByExpression),
    /// Join predicate
    Join(JoinExpression),
}

impl Expression {
    /// Unqualified column reference
    pub fn column(name: impl Into<String>) -> Self {
        Expression::ColumnReference(ColumnReferenceExpression::new(name))
    }

    /// `$alias.column`
    pub fn alias(alias: impl Into<String>, column: impl Into<String>) -> Self {
        Expression::ColumnAlias(ColumnAliasExpression::new(alias, column))
    }

    /// Bare closure parameter
    pub fn variable(alias: impl Into<String>) -> Self {
        Expression::VariableAlias(VariableAliasExpression {
            alias: alias.into(),
        })
    }

    /// Literal value
    pub fn literal(value: impl Into<LiteralValue>) -> Self {
        Expression::Literal(LiteralExpression {
            literal: value.into(),
        })
    }

    /// Binary expression; both sides are wrapped in operands
    pub fn binary(left: Expression, operator: BinaryOperator, right: Expression) -> Self {
        Expression::Binary(BinaryExpression {
            left: OperandExpression::new(left),
            operator,
            right: OperandExpression::new(right),
        })
    }

    /// Unary expression; the operand is wrapped
    pub fn unary(operator: UnaryOperator, operand: Expression) -> Self {
        Expression::Unary(UnaryExpression {
            operator,
            operand: OperandExpression::new(operand),
        })
    }

    /// Function call
    pub fn function(function: Function, parameters: Vec<Expression>) -> Self {
        Expression::Function(FunctionExpression {
            function,
            parameters,
        })
    }

    /// Closure over `parameters`
    pub fn lambda<I, S>(parameters: I, body: Expression) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Expression::Lambda(LambdaExpression::new(parameters, body))
    }

    /// Conditional
    pub fn if_else(test: Expression, body: Expression, orelse: Expression) -> Self {
        Expression::If(IfExpression {
            test: Box::new(test),
            body: Box::new(body),
            orelse: Box::new(orelse),
        })
    }

    /// Logical negation
    pub fn negation(expression: Expression) -> Self {
        Expression::Not(NotExpression {
            expression: Box::new(expression),
        })
    }

    /// Name this expression as a derived column
    pub fn named(self, alias: impl Into<String>) -> ComputedColumnAliasExpression {
        ComputedColumnAliasExpression::new(alias, self)
    }

    /// `self == other`
    pub fn eq(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOperator::Equals, other)
    }

    /// `self != other`
    pub fn ne(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOperator::NotEquals, other)
    }

    /// `self < other`
    pub fn lt(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOperator::LessThan, other)
    }

    /// `self <= other`
    pub fn le(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOperator::LessThanEquals, other)
    }

    /// `self > other`
    pub fn gt(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOperator::GreaterThan, other)
    }

    /// `self >= other`
    pub fn ge(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOperator::GreaterThanEquals, other)
    }

    /// `self && other`
    pub fn and(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOperator::And, other)
    }

    /// `self || other`
    pub fn or(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOperator::Or, other)
    }

    /// `self + other`
    pub fn add(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOperator::Add, other)
    }

    /// `self - other`
    pub fn sub(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOperator::Subtract, other)
    }

    /// `self * other`
    pub fn mul(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOperator::Multiply, other)
    }

    /// `self / other`
    pub fn div(self, other: Expression) -> Self {
        Expression::binary(self, BinaryOperator::Divide, other)
    }

    /// The node kind of this expression
    pub fn kind(&self) -> NodeKind {
        match self {
            Expression::Operand(_) => NodeKind::Operand,
            Expression::Unary(_) => NodeKind::Unary,
            Expression::Binary(_) => NodeKind::Binary,
            Expression::Literal(_) => NodeKind::Literal,
            Expression::ColumnReference(_) => NodeKind::ColumnReference,
            Expression::ColumnAlias(_) => NodeKind::ColumnAlias,
            Expression::ComputedColumnAlias(_) => NodeKind::ComputedColumnAlias,
            Expression::VariableAlias(_) => NodeKind::VariableAlias,
            Expression::Function(_) => NodeKind::Function,
            Expression::Lambda(_) => NodeKind::Lambda,
            Expression::MapReduce(_) => NodeKind::MapReduce,
            Expression::If(_) => NodeKind::If,
            Expression::Not(_) => NodeKind::Not,
            Expression::OrderBy(_) => NodeKind::OrderBy,
            Expression::Join(_) => NodeKind::Join,
        }
    }

    /// The column name if this is an unqualified column reference
    pub fn as_column_name(&self) -> Option<&str> {
        match self {
            Expression::ColumnReference(col) => Some(&col.name),
            _ => None,
        }
    }
}

impl From<LambdaExpression> for Expression {
    fn from(lambda: LambdaExpression) -> Self {
        Expression::Lambda(lambda)
    }
}

impl From<MapReduceExpression> for Expression {
    fn from(map_reduce: MapReduceExpression) -> Self {
        Expression::MapReduce(map_reduce)
    }
}

impl From<ComputedColumnAliasExpression> for Expression {
    fn from(computed: ComputedColumnAliasExpression) -> Self {
        Expression::ComputedColumnAlias(computed)
    }
}

impl From<OrderByExpression> for Expression {
    fn from(order: OrderByExpression) -> Self {
        Expression::OrderBy(order)
    }
}

#[cfg(test)]
#[path = "expr_test.rs"]
mod tests;
