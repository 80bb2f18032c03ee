use super::*;
use chrono::NaiveDate;
use rq_core::clause::FromClause;
use rq_core::expr::GroupByExpression;
use rq_core::{MapReduceExpression, OrderByExpression, Table};

fn render(expr: &Expression) -> String {
    PureRelationDialect::new().compile_expression(expr).unwrap()
}

fn render_clauses(clauses: &[Clause]) -> String {
    PureRelationDialect::new().compile_clauses(clauses).unwrap()
}

fn from_table() -> Clause {
    Clause::From(FromClause::new("local::DuckDuckDatabase", "table"))
}

fn bound(clauses: Vec<Clause>) -> BoundQuery {
    BoundQuery {
        clauses,
        runtime: "local::DuckDuckRuntime".to_string(),
        schema: Table::new("table", Vec::<(&str, rq_core::ColumnType)>::new()),
    }
}

#[test]
fn test_literals() {
    assert_eq!(render(&Expression::literal(42)), "42");
    assert_eq!(render(&Expression::literal(-7)), "-7");
    assert_eq!(render(&Expression::literal(true)), "true");
    assert_eq!(render(&Expression::literal("it's")), "'it\\'s'");
}

#[test]
fn test_date_literal_uses_percent_timestamp() {
    let date = NaiveDate::from_ymd_opt(2025, 4, 11).unwrap();
    assert_eq!(render(&Expression::literal(date)), "%2025-04-11T00:00:00");
    let dt = date.and_hms_opt(10, 0, 0).unwrap();
    assert_eq!(render(&Expression::literal(dt)), "%2025-04-11T10:00:00");
}

#[test]
fn test_column_nodes() {
    assert_eq!(render(&Expression::column("id")), "id");
    assert_eq!(render(&Expression::alias("a", "id")), "$a.id");
    assert_eq!(render(&Expression::variable("y")), "$y");
}

#[test]
fn test_binary_symbols() {
    let cases = [
        (BinaryOperator::Equals, "$a.x==1"),
        (BinaryOperator::NotEquals, "$a.x!=1"),
        (BinaryOperator::LessThanEquals, "$a.x<=1"),
        (BinaryOperator::And, "$a.x&&1"),
        (BinaryOperator::Divide, "$a.x/1"),
    ];
    for (op, expected) in cases {
        let expr = Expression::binary(Expression::alias("a", "x"), op, Expression::literal(1));
        assert_eq!(render(&expr), expected);
    }
}

#[test]
fn test_receiver_style_operators() {
    let modulo = Expression::binary(
        Expression::alias("a", "x"),
        BinaryOperator::Modulo,
        Expression::literal(2),
    );
    assert_eq!(render(&modulo), "$a.x->mod(2)");
    let not_in = Expression::binary(
        Expression::alias("a", "x"),
        BinaryOperator::NotIn,
        Expression::alias("a", "ys"),
    );
    assert_eq!(render(&not_in), "!$a.x->in($a.ys)");
}

#[test]
fn test_not_in_groups_binary_left_operand() {
    let not_in = Expression::binary(
        Expression::alias("a", "x").add(Expression::literal(1)),
        BinaryOperator::NotIn,
        Expression::alias("a", "ys"),
    );
    assert_eq!(render(&not_in), "!($a.x+1)->in($a.ys)");
    let modulo = Expression::binary(
        Expression::alias("a", "x").sub(Expression::literal(1)),
        BinaryOperator::Modulo,
        Expression::literal(2),
    );
    assert_eq!(render(&modulo), "($a.x-1)->mod(2)");
}

#[test]
fn test_is_operator_is_unsupported() {
    let expr = Expression::binary(
        Expression::alias("a", "x"),
        BinaryOperator::Is,
        Expression::literal(true),
    );
    let err = PureRelationDialect::new()
        .compile_expression(&expr)
        .unwrap_err();
    assert!(matches!(err, DialectError::UnsupportedConstruct { .. }), "{err}");
    assert!(err.to_string().contains("D001"), "{err}");
}

#[test]
fn test_nested_binary_is_parenthesized() {
    let expr = Expression::alias("a", "x")
        .add(Expression::literal(1))
        .mul(Expression::literal(2));
    assert_eq!(render(&expr), "($a.x+1)*2");
    let logical = Expression::alias("a", "x")
        .gt(Expression::literal(1))
        .and(Expression::alias("a", "y").lt(Expression::literal(5)));
    assert_eq!(render(&logical), "($a.x>1)&&($a.y<5)");
}

#[test]
fn test_unary_and_not() {
    let unary = Expression::unary(UnaryOperator::Not, Expression::alias("a", "flag"));
    assert_eq!(render(&unary), "!$a.flag");
    let not = Expression::negation(Expression::alias("a", "x").eq(Expression::literal(1)));
    assert_eq!(render(&not), "!($a.x==1)");
    let not_flag = Expression::negation(Expression::alias("a", "flag"));
    assert_eq!(render(&not_flag), "!$a.flag");
}

#[test]
fn test_unary_not_groups_binary_operand() {
    let unary = Expression::unary(
        UnaryOperator::Not,
        Expression::alias("a", "x").gt(Expression::literal(1)),
    );
    assert_eq!(render(&unary), "!($a.x>1)");
}

#[test]
fn test_functions_render_receiver_style() {
    let count = Expression::function(Function::Count, vec![Expression::variable("a")]);
    assert_eq!(render(&count), "$a->count()");
    let avg = Expression::function(Function::Average, vec![Expression::variable("a")]);
    assert_eq!(render(&avg), "$a->avg()");
    let pow = Expression::function(
        Function::Exponent,
        vec![Expression::alias("a", "column"), Expression::literal(2)],
    );
    assert_eq!(render(&pow), "$a.column->pow(2)");
}

#[test]
fn test_function_groups_binary_receiver() {
    let sum = Expression::function(
        Function::Sum,
        vec![Expression::alias("a", "x").add(Expression::literal(1))],
    );
    assert_eq!(render(&sum), "($a.x+1)->sum()");
    let pow = Expression::function(
        Function::Exponent,
        vec![
            Expression::alias("a", "x").mul(Expression::literal(2)),
            Expression::alias("a", "y").add(Expression::literal(1)),
        ],
    );
    assert_eq!(render(&pow), "($a.x*2)->pow($a.y+1)");
}

#[test]
fn test_string_concat_joins_list() {
    let concat = Expression::function(
        Function::StringConcat,
        vec![Expression::alias("a", "first"), Expression::alias("a", "last")],
    );
    assert_eq!(render(&concat), "[$a.first, $a.last]->joinStrings('')");
    let grouped = Expression::function(
        Function::StringConcat,
        vec![
            Expression::alias("a", "first").add(Expression::literal("!")),
            Expression::alias("a", "last"),
        ],
    );
    assert_eq!(render(&grouped), "[($a.first+'!'), $a.last]->joinStrings('')");
}

#[test]
fn test_function_arity_mismatch_is_structural() {
    let expr = Expression::function(Function::Modulo, vec![Expression::alias("a", "x")]);
    let err = PureRelationDialect::new()
        .compile_expression(&expr)
        .unwrap_err();
    assert!(
        matches!(err, DialectError::Core(CoreError::Structural { .. })),
        "{err}"
    );
}

#[test]
fn test_if_expression() {
    let expr = Expression::lambda(
        ["a"],
        Expression::if_else(
            Expression::alias("a", "columnA").gt(Expression::alias("a", "columnB")),
            Expression::alias("a", "columnA"),
            Expression::alias("a", "columnB"),
        ),
    );
    assert_eq!(
        render(&expr),
        "a | if($a.columnA>$a.columnB, | $a.columnA, | $a.columnB)"
    );
}

#[test]
fn test_lambda_with_duplicate_params_fails() {
    let expr = Expression::lambda(["a", "a"], Expression::literal(1));
    assert!(PureRelationDialect::new().compile_expression(&expr).is_err());
}

#[test]
fn test_filter_synthesizes_sorted_params() {
    let clause = Clause::Filter(FilterClause {
        expression: Expression::alias("b", "id").eq(Expression::alias("a", "id")),
    });
    assert_eq!(render_clauses(&[clause]), "filter(a, b | $b.id==$a.id)");
}

#[test]
fn test_filter_without_alias_uses_fallback() {
    let clause = Clause::Filter(FilterClause {
        expression: Expression::literal(true),
    });
    assert_eq!(render_clauses(&[clause]), "filter(x | true)");
}

#[test]
fn test_select_rejects_non_column() {
    let clause = Clause::Selection(SelectionClause {
        expressions: vec![Expression::literal(1)],
    });
    let err = PureRelationDialect::new()
        .compile_clauses(&[clause])
        .unwrap_err();
    assert!(err.to_string().contains("literal expression in selection clause"), "{err}");
}

#[test]
fn test_extend_multiple_items() {
    let clause = Clause::Extend(ExtendClause {
        expressions: vec![
            Expression::lambda(["a"], Expression::alias("a", "column"))
                .named("a")
                .into(),
            Expression::lambda(["b"], Expression::alias("b", "column"))
                .named("b")
                .into(),
        ],
    });
    assert_eq!(
        render_clauses(&[clause]),
        "extend(~[a:a | $a.column, b:b | $b.column])"
    );
}

#[test]
fn test_extend_item_must_be_named() {
    let clause = Clause::Extend(ExtendClause {
        expressions: vec![Expression::alias("a", "column")],
    });
    assert!(PureRelationDialect::new().compile_clauses(&[clause]).is_err());
}

#[test]
fn test_rename_pairs_chain() {
    let clause = Clause::Rename(RenameClause {
        renames: vec![
            ColumnAliasExpression::new("newColumnA", "columnA"),
            ColumnAliasExpression::new("newColumnB", "columnB"),
        ],
    });
    assert_eq!(
        render_clauses(&[clause]),
        "rename(~columnA, ~newColumnA)->rename(~columnB, ~newColumnB)"
    );
}

#[test]
fn test_group_by_with_having() {
    let count = MapReduceExpression::new(
        LambdaExpression::new(
            ["a"],
            Expression::alias("a", "column").add(Expression::alias("a", "column2")),
        ),
        LambdaExpression::new(
            ["a"],
            Expression::function(Function::Count, vec![Expression::variable("a")]),
        ),
    );
    let avg = MapReduceExpression::new(
        LambdaExpression::new(["a"], Expression::alias("a", "column")),
        LambdaExpression::new(
            ["a"],
            Expression::function(Function::Average, vec![Expression::variable("a")]),
        ),
    );
    let group = GroupByExpression {
        selections: vec![Expression::column("column"), Expression::column("column2")],
        expressions: vec![
            Expression::from(count).named("count").into(),
            Expression::from(avg).named("avg").into(),
        ],
        having: None,
    };
    assert_eq!(
        render_clauses(&[Clause::GroupBy(GroupByClause {
            expression: group.clone()
        })]),
        "groupBy(~[column, column2], ~[count:a | $a.column+$a.column2 : a | $a->count(), avg:a | $a.column : a | $a->avg()])"
    );

    let having = GroupByExpression {
        having: Some(Box::new(Expression::lambda(
            ["g"],
            Expression::alias("g", "count").gt(Expression::literal(3)),
        ))),
        ..group
    };
    let text = render_clauses(&[Clause::GroupBy(GroupByClause { expression: having })]);
    assert!(text.ends_with("->filter(g | $g.count>3)"), "{text}");
}

#[test]
fn test_distinct_forms() {
    let all = Clause::Distinct(DistinctClause {
        expressions: vec![],
    });
    assert_eq!(render_clauses(&[all]), "distinct()");
    let some = Clause::Distinct(DistinctClause {
        expressions: vec![Expression::column("a"), Expression::column("b")],
    });
    assert_eq!(render_clauses(&[some]), "distinct(~[a, b])");
}

#[test]
fn test_order_limit_offset() {
    let clauses = [
        Clause::OrderBy(OrderByClause {
            orderings: vec![
                OrderByExpression::ascending("columnA"),
                OrderByExpression::descending("columnB"),
            ],
        }),
        Clause::Offset(OffsetClause { value: 5 }),
        Clause::Limit(LimitClause { value: 10 }),
    ];
    assert_eq!(
        render_clauses(&clauses),
        "sort([~columnA->ascending(), ~columnB->descending()])->drop(5)->limit(10)"
    );
}

#[test]
fn test_join_with_raw_predicate_uses_sorted_aliases() {
    let clause = Clause::Join(JoinClause {
        from: FromClause::new("db", "departments"),
        join_type: JoinType::Left,
        on: JoinExpression::new(Expression::alias("e", "dept_id").eq(Expression::alias("d", "id"))),
    });
    assert_eq!(
        render_clauses(&[clause]),
        "join(#>{db.departments}#, JoinKind.LEFT, {d, e | $e.dept_id==$d.id})"
    );
}

#[test]
fn test_join_over_three_aliases_is_unsupported() {
    let clause = Clause::Join(JoinClause {
        from: FromClause::new("db", "departments"),
        join_type: JoinType::Inner,
        on: JoinExpression::new(
            Expression::alias("a", "x")
                .eq(Expression::alias("b", "y"))
                .and(Expression::alias("c", "z").eq(Expression::literal(1))),
        ),
    });
    let err = PureRelationDialect::new()
        .compile_clauses(&[clause])
        .unwrap_err();
    assert!(matches!(err, DialectError::UnsupportedConstruct { .. }), "{err}");
}

#[test]
fn test_compile_appends_runtime() {
    let query = bound(vec![
        from_table(),
        Clause::Selection(SelectionClause {
            expressions: vec![Expression::column("column")],
        }),
    ]);
    assert_eq!(
        PureRelationDialect::new().compile(&query).unwrap(),
        "#>{local::DuckDuckDatabase.table}#->select(~[column])->from(local::DuckDuckRuntime)"
    );
}

#[test]
fn test_compile_requires_leading_from() {
    let dialect = PureRelationDialect::new();
    assert!(dialect.compile(&bound(vec![])).is_err());
    let no_from = bound(vec![Clause::Limit(LimitClause { value: 1 })]);
    assert!(dialect.compile(&no_from).is_err());
    let twice = bound(vec![from_table(), from_table()]);
    assert!(dialect.compile(&twice).is_err());
}

#[test]
fn test_dialect_identity() {
    let dialect = PureRelationDialect::default();
    assert_eq!(dialect.name(), "pure-relation");
    assert_eq!(dialect.pipeline_connective(), "->");
}
