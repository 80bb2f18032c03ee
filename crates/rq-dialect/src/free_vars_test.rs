use super::*;
use rq_core::Function;

#[test]
fn test_binary_sides_are_unioned_and_sorted() {
    let expr = Expression::alias("b", "y").eq(Expression::alias("a", "x"));
    assert_eq!(free_variables(&expr), vec!["a", "b"]);
}

#[test]
fn test_repeated_alias_is_deduplicated() {
    let expr = Expression::alias("a", "x")
        .gt(Expression::literal(1))
        .and(Expression::alias("a", "y").lt(Expression::literal(5)));
    assert_eq!(free_variables(&expr), vec!["a"]);
}

#[test]
fn test_function_parameters_are_unioned() {
    let expr = Expression::function(
        Function::StringConcat,
        vec![
            Expression::alias("z", "first"),
            Expression::literal(" "),
            Expression::alias("m", "last"),
        ],
    );
    assert_eq!(free_variables(&expr), vec!["m", "z"]);
}

#[test]
fn test_literals_and_bare_columns_have_no_aliases() {
    assert!(free_variables(&Expression::literal(true)).is_empty());
    assert!(free_variables(&Expression::column("id")).is_empty());
}

#[test]
fn test_lambda_parameters_are_bound() {
    let expr = Expression::lambda(
        ["a"],
        Expression::alias("a", "x").eq(Expression::alias("b", "y")),
    );
    assert_eq!(free_variables(&expr), vec!["b"]);
}

#[test]
fn test_not_and_if_propagate() {
    let expr = Expression::negation(Expression::if_else(
        Expression::alias("c", "flag"),
        Expression::alias("a", "x"),
        Expression::variable("b"),
    ));
    assert_eq!(free_variables(&expr), vec!["a", "b", "c"]);
}

#[test]
fn test_extraction_is_deterministic() {
    let expr = Expression::alias("q", "x")
        .eq(Expression::alias("p", "y"))
        .or(Expression::alias("r", "z").ne(Expression::literal(0)));
    let first = free_variables(&expr);
    for _ in 0..10 {
        assert_eq!(free_variables(&expr), first);
    }
    assert_eq!(first, vec!["p", "q", "r"]);
}
