//! Tests for the expression language.

use super::*;

fn env(pairs: &[(&str, Value)]) -> Env {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn list(items: &[&str]) -> Value {
    Value::List(items.iter().map(|s| s.to_string()).collect())
}

fn eval_str(src: &str, vars: &Env) -> std::result::Result<Value, ExpressionError> {
    let expr = parse(src).unwrap();
    eval(&expr, &Scope::new(vars))
}

// =========================================================================
// Parsing
// =========================================================================

#[test]
fn test_parse_membership() {
    let expr = parse(r#""Go" in langs"#).unwrap();
    assert_eq!(
        expr,
        Expr::Contains {
            needle: Box::new(Expr::Literal(Value::Str("Go".to_string()))),
            haystack: Box::new(Expr::Ref("langs".to_string())),
        }
    );
}

#[test]
fn test_parse_precedence_and_binds_tighter_than_or() {
    let expr = parse("a or b and c").unwrap();
    assert_eq!(
        expr,
        Expr::Or(
            Box::new(Expr::Ref("a".to_string())),
            Box::new(Expr::And(
                Box::new(Expr::Ref("b".to_string())),
                Box::new(Expr::Ref("c".to_string())),
            )),
        )
    );
}

#[test]
fn test_parse_symbolic_operators() {
    assert_eq!(parse("a && !b").unwrap(), parse("a and not b").unwrap());
    assert_eq!(parse("a || b").unwrap(), parse("a or b").unwrap());
}

#[test]
fn test_parse_leading_dot_and_namespaces() {
    assert_eq!(parse(".ProjectName").unwrap(), Expr::Ref("ProjectName".to_string()));
    assert_eq!(parse(".Scaffold.langs").unwrap(), Expr::Ref("langs".to_string()));
    assert_eq!(parse(".Computed.go").unwrap(), Expr::Ref("go".to_string()));
    assert_eq!(parse("build.tool").unwrap(), Expr::Ref("build.tool".to_string()));
}

#[test]
fn test_parse_bare_dot() {
    assert_eq!(parse(".").unwrap(), Expr::Dot);
    assert!(parse(r#". == "Go""#).unwrap().uses_dot());
}

#[test]
fn test_parse_string_escapes() {
    let expr = parse(r#"'it\'s' == "a\"b\n""#).unwrap();
    assert_eq!(
        expr,
        Expr::Eq(
            Box::new(Expr::Literal(Value::Str("it's".to_string()))),
            Box::new(Expr::Literal(Value::Str("a\"b\n".to_string()))),
        )
    );
}

#[test]
fn test_parse_errors_report_column() {
    let err = parse("a and").unwrap_err();
    assert_eq!(err.message, "unexpected end of expression");
    assert_eq!(err.column, 6);

    let err = parse("(a or b").unwrap_err();
    assert_eq!(err.message, "expected ')'");

    let err = parse("a b").unwrap_err();
    assert_eq!(err.column, 3);
    assert!(err.message.contains("name 'b'"));

    let err = parse("a @ b").unwrap_err();
    assert_eq!(err.message, "unexpected character '@'");

    let err = parse(r#""open"#).unwrap_err();
    assert_eq!(err.message, "unterminated string literal");

    let err = parse("   ").unwrap_err();
    assert_eq!(err.message, "empty expression");
}

#[test]
fn test_references_in_source_order() {
    let expr = parse(r#"("Go" in langs and go) or not python or langs"#).unwrap();
    assert_eq!(expr.references(), vec!["langs", "go", "python", "langs"]);
}

// =========================================================================
// Evaluation
// =========================================================================

#[test]
fn test_membership_in_list() {
    let vars = env(&[("langs", list(&["Go", "Python"]))]);
    assert_eq!(eval_str(r#""Go" in langs"#, &vars).unwrap(), Value::Bool(true));
    assert_eq!(eval_str(r#""Rust" in langs"#, &vars).unwrap(), Value::Bool(false));
}

#[test]
fn test_membership_in_string_is_substring() {
    let vars = env(&[("name", Value::Str("my-service".to_string()))]);
    assert_eq!(eval_str(r#""service" in name"#, &vars).unwrap(), Value::Bool(true));
}

#[test]
fn test_membership_in_bool_is_error() {
    let vars = env(&[("flag", Value::Bool(true))]);
    assert_eq!(
        eval_str(r#""x" in flag"#, &vars).unwrap_err(),
        ExpressionError::InvalidMembership("bool")
    );
}

#[test]
fn test_list_in_list_is_subset() {
    let vars = env(&[
        ("langs", list(&["Go", "Python", "Rust"])),
        ("wanted", list(&["Go", "Rust"])),
    ]);
    assert_eq!(eval_str("wanted in langs", &vars).unwrap(), Value::Bool(true));
}

#[test]
fn test_logic_and_truthiness() {
    let vars = env(&[
        ("go", Value::Bool(true)),
        ("python", Value::Bool(false)),
        ("name", Value::Str(String::new())),
        ("langs", list(&[])),
    ]);
    assert!(eval_bool(&parse("go and not python").unwrap(), &Scope::new(&vars)).unwrap());
    assert!(!eval_bool(&parse("go and python").unwrap(), &Scope::new(&vars)).unwrap());
    assert!(eval_bool(&parse("python or go").unwrap(), &Scope::new(&vars)).unwrap());
    assert!(!eval_bool(&parse("name").unwrap(), &Scope::new(&vars)).unwrap());
    assert!(!eval_bool(&parse("langs").unwrap(), &Scope::new(&vars)).unwrap());
    assert!(eval_bool(&parse("!langs").unwrap(), &Scope::new(&vars)).unwrap());
}

#[test]
fn test_equality_is_structural() {
    let vars = env(&[("license", Value::Str("MIT".to_string()))]);
    assert_eq!(eval_str(r#"license == "MIT""#, &vars).unwrap(), Value::Bool(true));
    assert_eq!(eval_str(r#"license != "MIT""#, &vars).unwrap(), Value::Bool(false));
    assert_eq!(eval_str(r#"license == true"#, &vars).unwrap(), Value::Bool(false));
}

#[test]
fn test_undefined_name_is_error_even_when_other_side_decides() {
    let vars = env(&[("go", Value::Bool(false))]);
    assert_eq!(
        eval_str("go and missing", &vars).unwrap_err(),
        ExpressionError::Undefined("missing".to_string())
    );
    assert_eq!(
        eval_str("true or missing", &vars).unwrap_err(),
        ExpressionError::Undefined("missing".to_string())
    );
}

#[test]
fn test_dot_requires_range_scope() {
    let vars = Env::new();
    assert_eq!(
        eval_str(".", &vars).unwrap_err(),
        ExpressionError::DotOutsideRange
    );

    let scope = Scope::new(&vars);
    let inner = scope.with_dot("Go");
    let expr = parse(r#". == "Go""#).unwrap();
    assert!(eval_bool(&expr, &inner).unwrap());
}

#[test]
fn test_value_scalar_forms() {
    assert_eq!(Value::Bool(true).as_scalar(), Some("true".to_string()));
    assert_eq!(Value::Str("x".to_string()).as_scalar(), Some("x".to_string()));
    assert_eq!(list(&["a"]).as_scalar(), None);
    assert_eq!(list(&["a"]).kind(), "list");
}

#[test]
fn test_display_round_trips_through_parser() {
    let src = r#"("Go" in langs and not python) or license == "MIT""#;
    let expr = parse(src).unwrap();
    assert_eq!(parse(&expr.to_string()).unwrap(), expr);
}
