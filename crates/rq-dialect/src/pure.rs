//! Pure relation dialect
//!
//! Renders the IR as a chain of relation functions:
//!
//! ```text
//! #>{db.employees}#->select(~[id])->filter(a | $a.id==1)->from(R)
//! ```

use log::{debug, trace, warn};
use rq_core::clause::{
    DistinctClause, ExtendClause, FilterClause, FromClause, GroupByClause, JoinClause, JoinType,
    LimitClause, OffsetClause, OrderByClause, RenameClause, SelectionClause,
};
use rq_core::expr::{
    BinaryExpression, ColumnAliasExpression, ColumnReferenceExpression,
    ComputedColumnAliasExpression, FunctionExpression, IfExpression, JoinExpression,
    LambdaExpression, LiteralExpression, MapReduceExpression, NotExpression, OperandExpression,
    OrderByExpression, OrderType, UnaryExpression, VariableAliasExpression,
};
use rq_core::{
    BinaryOperator, BoundQuery, Clause, ClauseVisitor, CoreError, Expression, ExpressionVisitor,
    Function, LiteralValue, NodeKind, UnaryOperator,
};

use crate::dialect::QueryDialect;
use crate::error::{DialectError, DialectResult};
use crate::free_vars::free_variables;

const NAME: &str = "pure-relation";
const CONNECTIVE: &str = "->";
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Closure parameter used when a predicate references no alias
pub const FALLBACK_PARAMETER: &str = "x";

/// Pure relation dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct PureRelationDialect;

impl PureRelationDialect {
    /// Create a new pure relation dialect
    pub fn new() -> Self {
        Self
    }

    /// Render a single expression
    pub fn compile_expression(&self, expr: &Expression) -> DialectResult<String> {
        expr.accept(&mut ExpressionRenderer)
    }
}

impl QueryDialect for PureRelationDialect {
    fn compile(&self, query: &BoundQuery) -> DialectResult<String> {
        match query.clauses.first() {
            Some(Clause::From(_)) => {}
            Some(other) => {
                return Err(CoreError::structural(
                    NodeKind::FromClause,
                    format!("query must start with a from clause, found {}", other.kind()),
                )
                .into())
            }
            None => {
                return Err(
                    CoreError::structural(NodeKind::FromClause, "query has no clauses").into(),
                )
            }
        }
        if query.clauses[1..]
            .iter()
            .any(|c| matches!(c, Clause::From(_)))
        {
            return Err(CoreError::structural(
                NodeKind::FromClause,
                "from clause may only appear first; use a join clause for further tables",
            )
            .into());
        }

        let body = self.compile_clauses(&query.clauses)?;
        let text = format!("{body}{CONNECTIVE}from({})", query.runtime);
        debug!(
            "Compiled {} clauses with {} dialect",
            query.clauses.len(),
            self.name()
        );
        Ok(text)
    }

    fn compile_clauses(&self, clauses: &[Clause]) -> DialectResult<String> {
        let mut renderer = ClauseRenderer::default();
        let mut fragments = Vec::with_capacity(clauses.len());
        for clause in clauses {
            let fragment = clause.accept(&mut renderer)?;
            trace!("{}: {}", clause.kind(), fragment);
            fragments.push(fragment);
        }
        Ok(fragments.join(CONNECTIVE))
    }

    fn pipeline_connective(&self) -> &'static str {
        CONNECTIVE
    }

    fn name(&self) -> &'static str {
        NAME
    }
}

fn unsupported(construct: impl std::fmt::Display) -> DialectError {
    DialectError::unsupported(NAME, construct)
}

fn render_all(exprs: &[Expression]) -> DialectResult<Vec<String>> {
    exprs.iter().map(|e| e.accept(&mut ExpressionRenderer)).collect()
}

/// Column names of a list that must contain only column references
fn column_list(exprs: &[Expression], context: NodeKind) -> DialectResult<Vec<&str>> {
    exprs
        .iter()
        .map(|e| {
            e.as_column_name()
                .ok_or_else(|| unsupported(format!("{} in {}", e.kind(), context)))
        })
        .collect()
}

/// Render `expr` as a closure body with a parameter list.
///
/// Lambdas keep their declared parameters; anything else gets its sorted
/// free variables.
fn closure(expr: &Expression) -> DialectResult<String> {
    if let Expression::Lambda(lambda) = expr {
        return lambda.accept(&mut ExpressionRenderer);
    }
    let mut params = free_variables(expr);
    if params.is_empty() {
        warn!(
            "Predicate references no alias, using fallback parameter '{}'",
            FALLBACK_PARAMETER
        );
        params.push(FALLBACK_PARAMETER.to_string());
    }
    let body = expr.accept(&mut ExpressionRenderer)?;
    Ok(format!("{} | {}", params.join(", "), body))
}

#[derive(Default)]
struct ExpressionRenderer;

impl ExpressionRenderer {
    fn binary_symbol(operator: BinaryOperator) -> Option<&'static str> {
        match operator {
            BinaryOperator::Equals => Some("=="),
            BinaryOperator::NotEquals => Some("!="),
            BinaryOperator::LessThan => Some("<"),
            BinaryOperator::LessThanEquals => Some("<="),
            BinaryOperator::GreaterThan => Some(">"),
            BinaryOperator::GreaterThanEquals => Some(">="),
            BinaryOperator::And => Some("&&"),
            BinaryOperator::Or => Some("||"),
            BinaryOperator::Add => Some("+"),
            BinaryOperator::Subtract => Some("-"),
            BinaryOperator::Multiply => Some("*"),
            BinaryOperator::Divide => Some("/"),
            _ => None,
        }
    }

    fn receiver_method(operator: BinaryOperator) -> Option<&'static str> {
        match operator {
            BinaryOperator::Modulo => Some("mod"),
            BinaryOperator::Exponent => Some("pow"),
            BinaryOperator::BitwiseAnd => Some("bitAnd"),
            BinaryOperator::BitwiseOr => Some("bitOr"),
            BinaryOperator::In | BinaryOperator::NotIn => Some("in"),
            _ => None,
        }
    }

    /// Render `expr`, parenthesized when it is a bare binary expression
    fn grouped(&mut self, expr: &Expression) -> DialectResult<String> {
        let text = expr.accept(self)?;
        if matches!(expr, Expression::Binary(_)) {
            Ok(format!("({text})"))
        } else {
            Ok(text)
        }
    }

    fn function_name(function: Function) -> &'static str {
        match function {
            Function::Count => "count",
            Function::Average => "avg",
            Function::Sum => "sum",
            Function::Min => "min",
            Function::Max => "max",
            Function::Modulo => "mod",
            Function::Exponent => "pow",
            Function::StringConcat => "joinStrings",
        }
    }
}

impl ExpressionVisitor for ExpressionRenderer {
    type Output = DialectResult<String>;

    fn visit_operand(&mut self, node: &OperandExpression) -> Self::Output {
        self.grouped(&node.expression)
    }

    fn visit_unary(&mut self, node: &UnaryExpression) -> Self::Output {
        let operand = node.operand.accept(self)?;
        match node.operator {
            UnaryOperator::Not => Ok(format!("!{operand}")),
        }
    }

    fn visit_binary(&mut self, node: &BinaryExpression) -> Self::Output {
        let left = node.left.accept(self)?;
        let right = node.right.accept(self)?;
        if let Some(symbol) = Self::binary_symbol(node.operator) {
            return Ok(format!("{left}{symbol}{right}"));
        }
        match (node.operator, Self::receiver_method(node.operator)) {
            (BinaryOperator::NotIn, Some(method)) => Ok(format!("!{left}->{method}({right})")),
            (_, Some(method)) => Ok(format!("{left}->{method}({right})")),
            (operator, None) => Err(unsupported(format!("{operator} operator"))),
        }
    }

    fn visit_literal(&mut self, node: &LiteralExpression) -> Self::Output {
        Ok(match &node.literal {
            LiteralValue::Integer(lit) => lit.value().to_string(),
            LiteralValue::String(lit) => format!("'{}'", lit.value().replace('\'', "\\'")),
            LiteralValue::Boolean(lit) => lit.value().to_string(),
            LiteralValue::Date(lit) => format!("%{}", lit.value().format(DATE_FORMAT)),
        })
    }

    fn visit_column_reference(&mut self, node: &ColumnReferenceExpression) -> Self::Output {
        Ok(node.name.clone())
    }

    fn visit_column_alias(&mut self, node: &ColumnAliasExpression) -> Self::Output {
        Ok(format!("${}.{}", node.alias, node.reference.name))
    }

    fn visit_computed_column_alias(
        &mut self,
        node: &ComputedColumnAliasExpression,
    ) -> Self::Output {
        Ok(format!("{}:{}", node.alias, closure(&node.expression)?))
    }

    fn visit_variable_alias(&mut self, node: &VariableAliasExpression) -> Self::Output {
        Ok(format!("${}", node.alias))
    }

    fn visit_function(&mut self, node: &FunctionExpression) -> Self::Output {
        node.validate()?;
        let name = Self::function_name(node.function);
        if node.function == Function::StringConcat {
            let items = node
                .parameters
                .iter()
                .map(|p| self.grouped(p))
                .collect::<DialectResult<Vec<_>>>()?;
            return Ok(format!("[{}]->{}('')", items.join(", "), name));
        }
        let (receiver, rest) = match node.parameters.split_first() {
            Some(split) => split,
            None => {
                return Err(CoreError::structural(
                    NodeKind::Function,
                    format!("{} has no receiver", node.function),
                )
                .into())
            }
        };
        let receiver = self.grouped(receiver)?;
        Ok(format!("{receiver}->{name}({})", render_all(rest)?.join(", ")))
    }

    fn visit_lambda(&mut self, node: &LambdaExpression) -> Self::Output {
        node.validate()?;
        let body = node.expression.accept(self)?;
        Ok(format!("{} | {}", node.parameters.join(", "), body))
    }

    fn visit_map_reduce(&mut self, node: &MapReduceExpression) -> Self::Output {
        let map = node.map.accept(self)?;
        let reduce = node.reduce.accept(self)?;
        Ok(format!("{map} : {reduce}"))
    }

    fn visit_if(&mut self, node: &IfExpression) -> Self::Output {
        let test = node.test.accept(self)?;
        let body = node.body.accept(self)?;
        let orelse = node.orelse.accept(self)?;
        Ok(format!("if({test}, | {body}, | {orelse})"))
    }

    fn visit_not(&mut self, node: &NotExpression) -> Self::Output {
        Ok(format!("!{}", self.grouped(&node.expression)?))
    }

    fn visit_order_by(&mut self, node: &OrderByExpression) -> Self::Output {
        let column = node
            .expression
            .as_column_name()
            .ok_or_else(|| unsupported(format!("{} as sort key", node.expression.kind())))?;
        let direction = match node.direction {
            OrderType::Ascending => "ascending",
            OrderType::Descending => "descending",
        };
        Ok(format!("~{column}->{direction}()"))
    }

    fn visit_join(&mut self, node: &JoinExpression) -> Self::Output {
        let (params, body) = match node.on.as_ref() {
            Expression::Lambda(lambda) => {
                lambda.validate()?;
                (lambda.parameters.clone(), lambda.expression.accept(self)?)
            }
            other => (free_variables(other), other.accept(self)?),
        };
        if params.len() != 2 {
            return Err(unsupported(format!(
                "join predicate over {} aliases ({})",
                params.len(),
                params.join(", ")
            )));
        }
        Ok(format!("{{{} | {}}}", params.join(", "), body))
    }
}

#[derive(Default)]
struct ClauseRenderer {
    expressions: ExpressionRenderer,
}

impl ClauseVisitor for ClauseRenderer {
    type Output = DialectResult<String>;

    fn visit_from(&mut self, clause: &FromClause) -> Self::Output {
        Ok(format!("#>{{{}}}#", clause.qualified_name()))
    }

    fn visit_selection(&mut self, clause: &SelectionClause) -> Self::Output {
        let columns = column_list(&clause.expressions, NodeKind::SelectionClause)?;
        Ok(format!("select(~[{}])", columns.join(", ")))
    }

    fn visit_extend(&mut self, clause: &ExtendClause) -> Self::Output {
        let items = clause
            .expressions
            .iter()
            .map(|item| match item {
                Expression::ComputedColumnAlias(computed) => {
                    computed.accept(&mut self.expressions)
                }
                other => Err(CoreError::structural(
                    NodeKind::ExtendClause,
                    format!("items must be computed column aliases, found {}", other.kind()),
                )
                .into()),
            })
            .collect::<DialectResult<Vec<_>>>()?;
        Ok(format!("extend(~[{}])", items.join(", ")))
    }

    fn visit_rename(&mut self, clause: &RenameClause) -> Self::Output {
        if clause.renames.is_empty() {
            return Err(
                CoreError::structural(NodeKind::RenameClause, "no columns to rename").into(),
            );
        }
        let pairs: Vec<String> = clause
            .renames
            .iter()
            .map(|r| format!("rename(~{}, ~{})", r.reference.name, r.alias))
            .collect();
        Ok(pairs.join(CONNECTIVE))
    }

    fn visit_filter(&mut self, clause: &FilterClause) -> Self::Output {
        Ok(format!("filter({})", closure(&clause.expression)?))
    }

    fn visit_group_by(&mut self, clause: &GroupByClause) -> Self::Output {
        let group = &clause.expression;
        let keys = column_list(&group.selections, NodeKind::GroupByClause)?;
        let aggregates = group
            .aggregates()?
            .into_iter()
            .map(|(alias, map_reduce)| -> DialectResult<String> {
                Ok(format!("{alias}:{}", map_reduce.accept(&mut self.expressions)?))
            })
            .collect::<DialectResult<Vec<_>>>()?;
        let mut text = format!("groupBy(~[{}], ~[{}])", keys.join(", "), aggregates.join(", "));
        if let Some(having) = &group.having {
            text.push_str(CONNECTIVE);
            text.push_str(&format!("filter({})", closure(having)?));
        }
        Ok(text)
    }

    fn visit_distinct(&mut self, clause: &DistinctClause) -> Self::Output {
        if clause.expressions.is_empty() {
            return Ok("distinct()".to_string());
        }
        let columns = column_list(&clause.expressions, NodeKind::DistinctClause)?;
        Ok(format!("distinct(~[{}])", columns.join(", ")))
    }

    fn visit_order_by(&mut self, clause: &OrderByClause) -> Self::Output {
        let entries = clause
            .orderings
            .iter()
            .map(|o| o.accept(&mut self.expressions))
            .collect::<DialectResult<Vec<_>>>()?;
        Ok(format!("sort([{}])", entries.join(", ")))
    }

    fn visit_limit(&mut self, clause: &LimitClause) -> Self::Output {
        Ok(format!("limit({})", clause.value))
    }

    fn visit_offset(&mut self, clause: &OffsetClause) -> Self::Output {
        Ok(format!("drop({})", clause.value))
    }

    fn visit_join(&mut self, clause: &JoinClause) -> Self::Output {
        let source = self.visit_from(&clause.from)?;
        let kind = match clause.join_type {
            JoinType::Inner => "JoinKind.INNER",
            JoinType::Left => "JoinKind.LEFT",
        };
        let predicate = clause.on.accept(&mut self.expressions)?;
        Ok(format!("join({source}, {kind}, {predicate})"))
    }
}

#[cfg(test)]
#[path = "pure_test.rs"]
mod tests;
