//! Free-variable extraction
//!
//! Closures synthesized for filter and join predicates need a parameter
//! list. [`free_variables`] derives it from the aliases the predicate
//! actually uses.

use std::collections::BTreeSet;

use rq_core::expr::{
    BinaryExpression, ColumnAliasExpression, ColumnReferenceExpression,
    ComputedColumnAliasExpression, FunctionExpression, IfExpression, JoinExpression,
    LambdaExpression, LiteralExpression, MapReduceExpression, NotExpression, OperandExpression,
    OrderByExpression, UnaryExpression, VariableAliasExpression,
};
use rq_core::{Expression, ExpressionVisitor};

/// Sorted, deduplicated aliases referenced by `expr` and not bound inside it
pub fn free_variables(expr: &Expression) -> Vec<String> {
    expr.accept(&mut FreeVariableExtractor)
        .into_iter()
        .collect()
}

/// Visitor returning the set of free aliases below a node
pub struct FreeVariableExtractor;

impl ExpressionVisitor for FreeVariableExtractor {
    type Output = BTreeSet<String>;

    fn visit_operand(&mut self, node: &OperandExpression) -> Self::Output {
        node.expression.accept(self)
    }

    fn visit_unary(&mut self, node: &UnaryExpression) -> Self::Output {
        node.operand.accept(self)
    }

    fn visit_binary(&mut self, node: &BinaryExpression) -> Self::Output {
        let mut left = node.left.accept(self);
        let right = node.right.accept(self);
        left.extend(right);
        left
    }

    fn visit_literal(&mut self, _node: &LiteralExpression) -> Self::Output {
        BTreeSet::new()
    }

    fn visit_column_reference(&mut self, _node: &ColumnReferenceExpression) -> Self::Output {
        BTreeSet::new()
    }

    fn visit_column_alias(&mut self, node: &ColumnAliasExpression) -> Self::Output {
        BTreeSet::from([node.alias.clone()])
    }

    fn visit_computed_column_alias(
        &mut self,
        node: &ComputedColumnAliasExpression,
    ) -> Self::Output {
        node.expression.accept(self)
    }

    fn visit_variable_alias(&mut self, node: &VariableAliasExpression) -> Self::Output {
        BTreeSet::from([node.alias.clone()])
    }

    fn visit_function(&mut self, node: &FunctionExpression) -> Self::Output {
        node.parameters
            .iter()
            .flat_map(|param| param.accept(self))
            .collect()
    }

    fn visit_lambda(&mut self, node: &LambdaExpression) -> Self::Output {
        let mut vars = node.expression.accept(self);
        vars.retain(|alias| !node.binds(alias));
        vars
    }

    fn visit_map_reduce(&mut self, node: &MapReduceExpression) -> Self::Output {
        let mut vars = node.map.accept(self);
        vars.extend(node.reduce.accept(self));
        vars
    }

    fn visit_if(&mut self, node: &IfExpression) -> Self::Output {
        let mut vars = node.test.accept(self);
        vars.extend(node.body.accept(self));
        vars.extend(node.orelse.accept(self));
        vars
    }

    fn visit_not(&mut self, node: &NotExpression) -> Self::Output {
        node.expression.accept(self)
    }

    fn visit_order_by(&mut self, node: &OrderByExpression) -> Self::Output {
        node.expression.accept(self)
    }

    fn visit_join(&mut self, node: &JoinExpression) -> Self::Output {
        node.on.accept(self)
    }
}

#[cfg(test)]
#[path = "free_vars_test.rs"]
mod tests;
