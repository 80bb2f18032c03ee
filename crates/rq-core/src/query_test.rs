use super::*;
use crate::expr::{LambdaExpression, MapReduceExpression};
use crate::function::Function;

fn employees() -> Table {
    Table::new(
        "employees",
        [
            ("id", ColumnType::Integer),
            ("name", ColumnType::String),
            ("dept_id", ColumnType::Integer),
            ("salary", ColumnType::Float),
        ],
    )
}

fn departments() -> Table {
    Table::new(
        "departments",
        [("id", ColumnType::Integer), ("title", ColumnType::String)],
    )
}

fn builder() -> QueryBuilder {
    QueryBuilder::from_db("db", employees())
}

fn total_salary() -> ComputedColumnAliasExpression {
    Expression::from(MapReduceExpression::new(
        LambdaExpression::new(["r"], Expression::alias("r", "salary")),
        LambdaExpression::new(
            ["y"],
            Expression::function(Function::Sum, vec![Expression::variable("y")]),
        ),
    ))
    .named("total")
}

#[test]
fn test_session_starts_with_from_clause() {
    let q = builder();
    assert_eq!(q.clauses().len(), 1);
    assert!(matches!(&q.clauses()[0], Clause::From(f) if f.qualified_name() == "db.employees"));
    assert_eq!(q.stage().to_string(), "employees_0");
}

#[test]
fn test_from_table_unknown_table() {
    let db = Database::new("db", vec![employees()]);
    assert!(QueryBuilder::from_table(&db, "employees").is_ok());
    let err = QueryBuilder::from_table(&db, "nope").unwrap_err();
    assert!(matches!(err, CoreError::UnknownTable { .. }), "{err}");
}

#[test]
fn test_select_then_filter_on_dropped_column_fails() {
    let err = builder()
        .select(&["id"])
        .unwrap()
        .filter(Expression::lambda(
            ["a"],
            Expression::alias("a", "name").eq(Expression::literal("x")),
        ))
        .unwrap_err();
    assert!(
        matches!(err, CoreError::UnknownColumn { ref column, .. } if column == "name"),
        "{err}"
    );
}

#[test]
fn test_filter_rejects_unbound_alias() {
    let err = builder()
        .filter(Expression::lambda(
            ["a"],
            Expression::alias("b", "id").eq(Expression::literal(1)),
        ))
        .unwrap_err();
    assert!(matches!(err, CoreError::UnknownAlias { .. }), "{err}");
}

#[test]
fn test_row_expressions_reject_bare_columns() {
    let err = builder()
        .filter(Expression::column("id").eq(Expression::literal(1)))
        .unwrap_err();
    assert!(
        matches!(err, CoreError::Structural { ref node, .. } if node == "filter clause"),
        "{err}"
    );
    assert!(err.to_string().contains("'id'"), "{err}");

    let err = builder()
        .extend(vec![Expression::column("salary")
            .mul(Expression::literal(2))
            .named("double_salary")])
        .unwrap_err();
    assert!(matches!(err, CoreError::Structural { .. }), "{err}");

    let having = Expression::column("total").gt(Expression::literal(10));
    let err = builder()
        .group_by(&["dept_id"], vec![total_salary()], Some(having))
        .unwrap_err();
    assert!(matches!(err, CoreError::Structural { .. }), "{err}");

    let err = builder()
        .inner_join(
            &departments(),
            Expression::column("dept_id").eq(Expression::alias("d", "id")),
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::Structural { .. }), "{err}");
}

#[test]
fn test_filter_without_columns_is_accepted() {
    assert!(builder().filter(Expression::literal(true)).is_ok());
}

#[test]
fn test_extend_items_apply_in_order() {
    let q = builder()
        .extend(vec![
            Expression::lambda(["a"], Expression::alias("a", "id").add(Expression::literal(1)))
                .named("next_id"),
            Expression::lambda(
                ["a"],
                Expression::alias("a", "next_id").mul(Expression::literal(2)),
            )
            .named("double_next"),
        ])
        .unwrap();
    assert!(q.schema().contains("next_id"));
    assert!(q.schema().contains("double_next"));
    assert_eq!(q.stage().index, 1);
}

#[test]
fn test_extend_existing_name_fails() {
    let err = builder()
        .extend(vec![Expression::lambda(["a"], Expression::alias("a", "id")).named("name")])
        .unwrap_err();
    assert!(matches!(err, CoreError::DuplicateColumn { .. }), "{err}");
}

#[test]
fn test_extend_requires_items() {
    let err = builder().extend(vec![]).unwrap_err();
    assert!(matches!(err, CoreError::Structural { .. }), "{err}");
}

#[test]
fn test_rename_builds_alias_pairs() {
    let q = builder().rename(&[("name", "full_name")]).unwrap();
    let Clause::Rename(rename) = &q.clauses()[1] else {
        panic!("expected rename clause");
    };
    assert_eq!(rename.renames[0].alias, "full_name");
    assert_eq!(rename.renames[0].reference.name, "name");
    assert!(q.schema().contains("full_name"));
}

#[test]
fn test_group_by_replaces_schema() {
    let q = builder()
        .group_by(&["dept_id"], vec![total_salary()], None)
        .unwrap();
    assert_eq!(q.schema().column_names(), vec!["dept_id", "total"]);
}

#[test]
fn test_group_by_having_uses_outputs_only() {
    let having_total = Expression::lambda(
        ["g"],
        Expression::alias("g", "total").gt(Expression::literal(100)),
    );
    assert!(builder()
        .group_by(&["dept_id"], vec![total_salary()], Some(having_total))
        .is_ok());

    let having_name = Expression::lambda(
        ["g"],
        Expression::alias("g", "name").eq(Expression::literal("x")),
    );
    let err = builder()
        .group_by(&["dept_id"], vec![total_salary()], Some(having_name))
        .unwrap_err();
    assert!(matches!(err, CoreError::UnknownColumn { .. }), "{err}");
}

#[test]
fn test_group_by_rejects_plain_aggregate() {
    let err = builder()
        .group_by(
            &["dept_id"],
            vec![Expression::column("salary").named("total")],
            None,
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::Structural { .. }), "{err}");
}

#[test]
fn test_order_by_unknown_column() {
    let err = builder()
        .order_by(vec![OrderByExpression::ascending("age")])
        .unwrap_err();
    assert!(matches!(err, CoreError::UnknownColumn { .. }), "{err}");
}

#[test]
fn test_take_appends_offset_then_limit() {
    let q = builder().take(5, 10).unwrap();
    let kinds: Vec<NodeKind> = q.clauses().iter().map(Clause::kind).collect();
    assert_eq!(
        kinds,
        vec![NodeKind::FromClause, NodeKind::OffsetClause, NodeKind::LimitClause]
    );
}

#[test]
fn test_join_with_collision_fails() {
    let err = builder()
        .inner_join(
            &departments(),
            Expression::lambda(
                ["e", "d"],
                Expression::alias("e", "dept_id").eq(Expression::alias("d", "id")),
            ),
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::JoinCollision { .. }), "{err}");
}

#[test]
fn test_join_after_rename_succeeds() {
    let q = builder()
        .rename(&[("id", "emp_id")])
        .unwrap()
        .left_join(
            &departments(),
            Expression::lambda(
                ["e", "d"],
                Expression::alias("e", "dept_id").eq(Expression::alias("d", "id")),
            ),
        )
        .unwrap();
    assert!(q.schema().contains("title"));
    let Clause::Join(join) = q.clauses().last().unwrap() else {
        panic!("expected join clause");
    };
    assert_eq!(join.join_type, JoinType::Left);
    assert_eq!(join.from.qualified_name(), "db.departments");
}

#[test]
fn test_join_checks_each_side() {
    let err = builder()
        .rename(&[("id", "emp_id")])
        .unwrap()
        .inner_join(
            &departments(),
            Expression::lambda(
                ["e", "d"],
                Expression::alias("e", "dept_id").eq(Expression::alias("d", "dept_id")),
            ),
        )
        .unwrap_err();
    assert!(
        matches!(err, CoreError::UnknownColumn { ref table, .. } if table == "departments"),
        "{err}"
    );
}

#[test]
fn test_join_lambda_needs_two_params() {
    let err = builder()
        .rename(&[("id", "emp_id")])
        .unwrap()
        .inner_join(
            &departments(),
            Expression::lambda(["e"], Expression::alias("e", "dept_id").eq(Expression::literal(1))),
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::Structural { .. }), "{err}");
}

#[test]
fn test_bound_query_json_round_trip() {
    let bound = builder()
        .select(&["id", "name"])
        .unwrap()
        .limit(3)
        .unwrap()
        .bind("R");
    assert_eq!(bound.runtime, "R");
    assert_eq!(bound.schema.column_names(), vec!["id", "name"]);
    let json = bound.to_json().unwrap();
    assert!(json.contains("\"runtime\": \"R\""), "{json}");
    assert_eq!(BoundQuery::from_json(&json).unwrap(), bound);
}
