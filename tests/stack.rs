use pretty_assertions::assert_eq;
use quill::{error::RuntimeError,
            host::MemoryHost,
            interpreter::{session::Session,
                          stack::{Operator, fold, split_stack},
                          value::Value}};

fn eval(expression: &str) -> Result<Value, RuntimeError> {
    Session::new(MemoryHost::new()).evaluate_stack(expression)
}

fn assert_value(expression: &str, expected: &str) {
    match eval(expression) {
        Ok(value) => assert_eq!(value.to_string(), expected, "{expression}"),
        Err(e) => panic!("{expression} failed: {e}"),
    }
}

#[test]
fn folds_left_to_right_without_precedence() {
    assert_value("(3 + 4 * 2)", "14");
    assert_value("(10 - 2 - 3)", "5");
    assert_value("(2 ^ 10)", "1024");
    assert_value("(7 % 4)", "3");
    assert_value("(1 / 4)", "0.25");
    assert_value("(42)", "42");
}

#[test]
fn unary_minus() {
    assert_value("(-3 + 5)", "2");
    assert_value("(5 - -3)", "8");
    assert_value("(- - 4)", "4");
}

#[test]
fn nested_groups_and_calls() {
    assert_value("((1 + 2) * 3)", "9");
    assert_value("(upper(\"a\") + \"b\")", "Ab");
}

#[test]
fn text_arithmetic() {
    assert_value("(\"abcabc\" - \"bc\")", "aabc");
    assert_value("(\"abc\" - \"zz\")", "abc");
    assert_value("(\"ab\" * 3)", "ababab");
    assert_value("(\"ab\" * 0)", "");
    assert_value("(\"n\" + 1)", "n1");
    assert_value("(1 + \"n\")", "1n");
}

#[test]
fn numeric_strings_are_numbers() {
    let mut session = Session::new(MemoryHost::new());
    session.execute_source("s = \"4\"");
    assert_eq!(session.evaluate_stack("(s + 1)"), Ok(Value::Num(5.0)));
}

#[test]
fn arithmetic_errors() {
    assert_eq!(eval("(1 / 0)"), Err(RuntimeError::DivideByZero));
    assert_eq!(eval("(1 % 0)"), Err(RuntimeError::DivideByZero));
    assert!(matches!(eval("(\"a\" / 2)"), Err(RuntimeError::InvalidOperator { .. })));
    assert!(matches!(eval("(\"a\" * \"b\")"), Err(RuntimeError::TypeMismatch { .. })));
    assert!(matches!(eval("(\"a\" * -1)"), Err(RuntimeError::TypeMismatch { .. })));
    assert!(matches!(eval("(1 +)"), Err(RuntimeError::InvalidOperator { .. })));
    assert!(matches!(eval("(1 2)"), Err(RuntimeError::InvalidOperator { .. })));
    assert!(matches!(eval("(1 & 2)"), Err(RuntimeError::InvalidOperator { .. })));
    assert!(matches!(eval("()"), Err(RuntimeError::InvalidOperation { .. })));
    assert!(matches!(eval("(-\"a\")"), Err(RuntimeError::TypeMismatch { .. })));
    assert_eq!(eval("(x + 1)"),
               Err(RuntimeError::UndefinedVariable { name: "x".to_string() }));
}

#[test]
fn oversized_repetition_is_an_error() {
    assert!(matches!(eval("(\"abc\" * 9000000000000000000)"),
                     Err(RuntimeError::InvalidOperation { .. })));

    let mut session = Session::new(MemoryHost::new());
    session.run_source("say (\"abc\" * 9000000000000000000)\nsay \"after\"");
    assert_eq!(session.host().stdout(), "after\n");
    assert!(session.host().stderr().contains("exceeds"), "{}", session.host().stderr());
}

#[test]
fn split_stack_keeps_calls_and_indexes_whole() {
    let (operands, operators) = split_stack("L[0] + f(1, (2)) * 3").unwrap();
    let texts: Vec<&str> = operands.iter().map(|o| o.text.as_str()).collect();
    assert_eq!(texts, ["L[0]", "f(1, (2))", "3"]);
    assert_eq!(operators, [Operator::Add, Operator::Multiply]);
}

#[test]
fn fold_switches_to_text_when_any_operand_is_text() {
    let values = [Value::Num(1.0), Value::from("2"), Value::from("x")];
    assert_eq!(fold(&values, &[Operator::Add, Operator::Add]), Ok(Value::from("12x")));

    let values = [Value::Num(1.0), Value::from("2")];
    assert_eq!(fold(&values, &[Operator::Add]), Ok(Value::Num(3.0)));
}

#[test]
fn operators_parse_from_text() {
    assert_eq!("^".parse::<Operator>(), Ok(Operator::Power));
    assert!("**".parse::<Operator>().is_err());
}
