//! Column-reference collection for schema validation

use crate::error::{CoreError, CoreResult};
use crate::expr::{
    BinaryExpression, ColumnAliasExpression, ColumnReferenceExpression,
    ComputedColumnAliasExpression, Expression, FunctionExpression, IfExpression, JoinExpression,
    LambdaExpression, LiteralExpression, MapReduceExpression, NotExpression, OperandExpression,
    OrderByExpression, UnaryExpression, VariableAliasExpression,
};
use crate::visitor::ExpressionVisitor;

/// One column mentioned by an expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnUse {
    /// Qualifying alias, `None` for a bare column reference
    pub alias: Option<String>,
    /// Column name
    pub column: String,
}

/// Collect every column mentioned by `expr`, in visit order.
///
/// Every lambda and function call in the tree is shape-checked on the way
/// (see [`LambdaExpression::validate`] and [`FunctionExpression::validate`]).
/// Inside a lambda every alias-qualified access must go through one of the
/// lambda's parameters; an alias that is not bound by the innermost lambda
/// is rejected with [`CoreError::UnknownAlias`]. Aliases outside any lambda
/// are free and returned as-is.
pub fn collect_column_uses(expr: &Expression) -> CoreResult<Vec<ColumnUse>> {
    let mut collector = ColumnCollector::default();
    expr.accept(&mut collector);
    if let Some(err) = collector.malformed.into_iter().next() {
        return Err(err);
    }
    match collector.unbound.into_iter().next() {
        Some((alias, parameters)) => Err(CoreError::UnknownAlias { alias, parameters }),
        None => Ok(collector.uses),
    }
}

#[derive(Default)]
struct ColumnCollector {
    scopes: Vec<Vec<String>>,
    uses: Vec<ColumnUse>,
    unbound: Vec<(String, Vec<String>)>,
    malformed: Vec<CoreError>,
}

impl ColumnCollector {
    fn check_bound(&mut self, alias: &str) {
        if let Some(scope) = self.scopes.last() {
            if !scope.iter().any(|p| p == alias) {
                self.unbound.push((alias.to_string(), scope.clone()));
            }
        }
    }
}

impl ExpressionVisitor for ColumnCollector {
    type Output = ();

    fn visit_operand(&mut self, node: &OperandExpression) {
        node.expression.accept(self);
    }

    fn visit_unary(&mut self, node: &UnaryExpression) {
        node.operand.accept(self);
    }

    fn visit_binary(&mut self, node: &BinaryExpression) {
        node.left.accept(self);
        node.right.accept(self);
    }

    fn visit_literal(&mut self, _node: &LiteralExpression) {}

    fn visit_column_reference(&mut self, node: &ColumnReferenceExpression) {
        self.uses.push(ColumnUse {
            alias: None,
            column: node.name.clone(),
        });
    }

    fn visit_column_alias(&mut self, node: &ColumnAliasExpression) {
        self.check_bound(&node.alias);
        self.uses.push(ColumnUse {
            alias: Some(node.alias.clone()),
            column: node.reference.name.clone(),
        });
    }

    fn visit_computed_column_alias(&mut self, node: &ComputedColumnAliasExpression) {
        node.expression.accept(self);
    }

    fn visit_variable_alias(&mut self, node: &VariableAliasExpression) {
        self.check_bound(&node.alias);
    }

    fn visit_function(&mut self, node: &FunctionExpression) {
        if let Err(err) = node.validate() {
            self.malformed.push(err);
        }
        for param in &node.parameters {
            param.accept(self);
        }
    }

    fn visit_lambda(&mut self, node: &LambdaExpression) {
        if let Err(err) = node.validate() {
            self.malformed.push(err);
        }
        self.scopes.push(node.parameters.clone());
        node.expression.accept(self);
        self.scopes.pop();
    }

    fn visit_map_reduce(&mut self, node: &MapReduceExpression) {
        node.map.accept(self);
        // The fold runs over projected values, not table rows
        let columns_before = self.uses.len();
        node.reduce.accept(self);
        self.uses.truncate(columns_before);
    }

    fn visit_if(&mut self, node: &IfExpression) {
        node.test.accept(self);
        node.body.accept(self);
        node.orelse.accept(self);
    }

    fn visit_not(&mut self, node: &NotExpression) {
        node.expression.accept(self);
    }

    fn visit_order_by(&mut self, node: &OrderByExpression) {
        node.expression.accept(self);
    }

    fn visit_join(&mut self, node: &JoinExpression) {
        node.on.accept(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::Function;

    fn names(uses: &[ColumnUse]) -> Vec<&str> {
        uses.iter().map(|u| u.column.as_str()).collect()
    }

    #[test]
    fn test_collects_alias_qualified_columns() {
        let expr = Expression::lambda(
            ["a"],
            Expression::alias("a", "id")
                .eq(Expression::literal(1))
                .and(Expression::alias("a", "name").ne(Expression::literal("x"))),
        );
        let uses = collect_column_uses(&expr).unwrap();
        assert_eq!(names(&uses), vec!["id", "name"]);
        assert_eq!(uses[0].alias.as_deref(), Some("a"));
    }

    #[test]
    fn test_rejects_alias_not_bound_by_lambda() {
        let expr = Expression::lambda(
            ["a"],
            Expression::alias("b", "id").eq(Expression::literal(1)),
        );
        let err = collect_column_uses(&expr).unwrap_err();
        assert!(
            matches!(err, CoreError::UnknownAlias { ref alias, .. } if alias == "b"),
            "{err}"
        );
    }

    #[test]
    fn test_free_aliases_outside_lambda_are_allowed() {
        let expr = Expression::alias("e", "dept_id").eq(Expression::alias("d", "id"));
        let uses = collect_column_uses(&expr).unwrap();
        assert_eq!(uses.len(), 2);
    }

    #[test]
    fn test_map_reduce_ignores_fold_parameters() {
        let expr = Expression::MapReduce(MapReduceExpression::new(
            LambdaExpression::new(["r"], Expression::alias("r", "salary")),
            LambdaExpression::new(
                ["y"],
                Expression::function(Function::Sum, vec![Expression::variable("y")]),
            ),
        ));
        let uses = collect_column_uses(&expr).unwrap();
        assert_eq!(names(&uses), vec!["salary"]);
    }

    #[test]
    fn test_malformed_nodes_are_reported_first() {
        let expr = Expression::lambda(
            ["a"],
            Expression::function(Function::Count, vec![]).eq(Expression::alias("b", "id")),
        );
        let err = collect_column_uses(&expr).unwrap_err();
        assert!(matches!(err, CoreError::Structural { .. }), "{err}");
    }

    #[test]
    fn test_unbound_variable_inside_fold_is_rejected() {
        let expr = Expression::MapReduce(MapReduceExpression::new(
            LambdaExpression::new(["r"], Expression::alias("r", "salary")),
            LambdaExpression::new(
                ["y"],
                Expression::function(Function::Sum, vec![Expression::variable("z")]),
            ),
        ));
        assert!(collect_column_uses(&expr).is_err());
    }
}
