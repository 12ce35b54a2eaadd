use rpncalc::calc_engine::{format_result, tokenize};
use rpncalc::{evaluate_expression, CalcError, ErrorKind};

fn assert_value(expr: &str, expected: f64) {
    match evaluate_expression(expr) {
        Ok(value) => assert!(
            (value - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "{} evaluated to {}, expected {}",
            expr,
            value,
            expected
        ),
        Err(e) => panic!("{} failed: {}", expr, e),
    }
}

fn assert_kind(expr: &str, kind: ErrorKind) {
    match evaluate_expression(expr) {
        Ok(value) => panic!("{} evaluated to {}, expected {:?}", expr, value, kind),
        Err(e) => assert_eq!(e.kind(), kind, "{}: {}", expr, e),
    }
}

#[test]
fn standard_precedence() {
    assert_value("2 + 3 * 4", 14.0);
    assert_value("(2 + 3) * 4", 20.0);
    assert_value("2 * 3 + 4", 10.0);
    assert_value("100 / 10 / 5", 2.0);
    assert_value("2 * (3 + (4 - 1)) / 3", 4.0);
}

#[test]
fn exponent_associates_right() {
    assert_value("2 ^ 3 ^ 2", 512.0);
    assert_value("(2 ^ 3) ^ 2", 64.0);
}

#[test]
fn negation_applies_after_exponent() {
    assert_value("-2 ^ 2", -4.0);
    assert_value("(-2) ^ 2", 4.0);
    assert_value("-2 ^ -2", -0.25);
}

#[test]
fn unary_minus_composition() {
    assert_value("5 + -3", 2.0);
    assert_value("5 - -3", 8.0);
    assert_value("-(2 + 3) * 2", -10.0);
    assert_value("sqrt(16) * -1", -4.0);
}

#[test]
fn functions() {
    assert_value("sqrt(16)", 4.0);
    assert_value("sin(0)", 0.0);
    assert_value("log(100)", 2.0);
    assert_value("ln(1)", 0.0);
    assert_value("abs(3 - 10)", 7.0);
    assert_value("cos(pi)", -1.0);
    assert_value("sqrt(sqrt(81))", 3.0);
}

#[test]
fn division_by_zero_is_an_error() {
    assert_eq!(evaluate_expression("5 / 0"), Err(CalcError::DivisionByZero));
    assert_kind("0 / 0", ErrorKind::DivisionByZero);
    assert_kind("1 / (1 - 1)", ErrorKind::DivisionByZero);
}

#[test]
fn domain_errors() {
    assert_kind("ln(-2)", ErrorKind::Domain);
    assert_kind("log(0)", ErrorKind::Domain);
    assert_kind("sqrt(-0.5)", ErrorKind::Domain);
    assert_eq!(
        evaluate_expression("ln(-2)"),
        Err(CalcError::Domain { function: "ln", argument: -2.0 })
    );
}

#[test]
fn malformed_literals() {
    assert_kind("1..2", ErrorKind::Tokenize);
    assert_kind("3.14.15", ErrorKind::Tokenize);
    assert_kind("2 $ 3", ErrorKind::Tokenize);
}

#[test]
fn operator_adjacency() {
    assert!(evaluate_expression("6 * / 2").is_err());
    assert_kind("6 * / 2", ErrorKind::InsufficientOperands);
    assert_kind("2 +", ErrorKind::InsufficientOperands);
    assert_kind("^ 2", ErrorKind::InsufficientOperands);
    assert_kind("2 3", ErrorKind::MalformedExpression);
}

#[test]
fn parentheses() {
    assert_kind("(2 + 3", ErrorKind::MismatchedParentheses);
    assert_kind("2 + 3)", ErrorKind::MismatchedParentheses);
    assert_kind("((2)", ErrorKind::MismatchedParentheses);
    assert_kind("1, 2", ErrorKind::MismatchedParentheses);
    assert_kind("()", ErrorKind::MalformedExpression);
}

#[test]
fn separators_need_operands_on_both_sides() {
    for input in ["sqrt(,16)", "(1,)", "sin(0,)", "(,2) * 3"] {
        assert!(evaluate_expression(input).is_err(), "{} was accepted", input);
        assert_kind(input, ErrorKind::MismatchedParentheses);
    }
    assert_kind("(2 *)", ErrorKind::InsufficientOperands);
}

#[test]
fn unknown_function() {
    assert_eq!(
        evaluate_expression("cbrt(8)"),
        Err(CalcError::UnknownFunction("cbrt".into()))
    );
}

#[test]
fn formatted_results_parse_back() {
    let inputs = [
        "2 + 3 * 4",
        "1 / 3",
        "-7 / 4",
        "2 ^ 60",
        "1 / 3 * 10 ^ -8",
        "sqrt(2)",
        "-(10 ^ 18) / 7",
        "123456.789 * 1000",
    ];
    for input in inputs {
        let value = evaluate_expression(input).unwrap();
        let shown = format_result(value);
        assert!(tokenize(&shown).is_ok(), "{} -> {}", input, shown);
        let reparsed = evaluate_expression(&shown).unwrap();
        assert!(
            (reparsed - value).abs() <= 1e-9 * value.abs().max(1.0),
            "{} -> {} -> {}",
            input,
            shown,
            reparsed
        );
    }
}
