use cinder_diagnostic::CompileErrorKind;
use cinder_ir::Operator;
use cinder_value::{Capture, Value};
use pretty_assertions::assert_eq;

use super::{bare, code, error_kind, get, pushed_function, with};

#[test]
fn test_top_level_function_is_hoisted_and_called_directly() {
    let code = code("(function add (a b) (return (+ a b))) (add 1 2)");
    let add = pushed_function(&code, 0);

    assert_eq!(add.capture(), &Capture::Global);
    assert_eq!(add.name(), "add");
    assert_eq!(add.function().parameters(), ["a", "b"]);
    assert_eq!(
        add.function().code(),
        [get("a"), get("b"), bare(Operator::Add), bare(Operator::Return)]
    );
    assert_eq!(
        code[1..],
        [
            with(Operator::Define, Value::variable("add")),
            with(Operator::Push, 1.0),
            with(Operator::Push, 2.0),
            with(
                Operator::CallDirect,
                vec![Value::Function(add.clone()), 2.0.into()]
            ),
        ]
    );
}

#[test]
fn test_prologue_precedes_earlier_statements() {
    assert_eq!(
        code("(main) (function main () (return 1))")[1..],
        [
            with(Operator::Define, Value::variable("main")),
            get("main"),
            with(Operator::Call, 0.0),
        ]
    );
}

#[test]
fn test_self_recursion_resolves_at_runtime() {
    let code = code("(function fact (n) (return (fact n)))");
    assert_eq!(
        pushed_function(&code, 0).function().code(),
        [
            get("n"),
            get("fact"),
            with(Operator::Call, 1.0),
            bare(Operator::Return),
        ]
    );
}

#[test]
fn test_nested_named_function_defines_itself() {
    let code = code("(function outer () (function inner () (return 1)) (return (inner)))");
    let outer = pushed_function(&code, 0);
    let body = outer.function().code();

    assert_eq!(body.len(), 5);
    assert!(pushed_function(body, 0).is_lexical());
    assert_eq!(pushed_function(body, 0).name(), "inner");
    assert_eq!(
        body[1..],
        [
            with(Operator::Define, Value::variable("inner")),
            get("inner"),
            with(Operator::Call, 0.0),
            bare(Operator::Return),
        ]
    );
}

#[test]
fn test_anonymous_function_literal() {
    let code = code("(define f (function (x ...rest) (return x)))");
    let literal = pushed_function(&code, 0);
    assert!(literal.is_lexical());
    assert_eq!(literal.name(), "anonymous");
    assert_eq!(literal.function().variadic(), Some("rest"));
    assert_eq!(code[1], with(Operator::Define, Value::variable("f")));
}

#[test]
fn test_function_literals_are_not_folded_into_lists() {
    let code = code("[(function () (return 1))]");
    assert_eq!(code.len(), 2);
    assert_eq!(code[1], with(Operator::MakeArray, 1.0));
}

#[test]
fn test_parameter_errors() {
    assert_eq!(
        error_kind("(function f (...rest a) 1)"),
        CompileErrorKind::VariadicNotLast("rest".to_owned())
    );
    assert_eq!(
        error_kind("(function f (a ...a) 1)"),
        CompileErrorKind::DuplicateParameter("a".to_owned())
    );
    assert_eq!(
        error_kind("(function f (print) 1)"),
        CompileErrorKind::AssignToConstant("print".to_owned())
    );
    assert_eq!(
        error_kind("(const k 1) (function f (k) 1)"),
        CompileErrorKind::AssignToConstant("k".to_owned())
    );
}

#[test]
fn test_function_name_errors() {
    assert_eq!(
        error_kind("(function f () 1) (function f () 2)"),
        CompileErrorKind::ConstantRedefined("f".to_owned())
    );
    assert_eq!(
        error_kind("(function print () 1)"),
        CompileErrorKind::AssignToConstant("print".to_owned())
    );
    assert_eq!(
        error_kind("(function f)"),
        CompileErrorKind::WrongArgumentCount {
            form: "function".to_owned(),
            expected: "a parameter list and a body".to_owned(),
            found: 1,
        }
    );
    assert_eq!(
        error_kind("(function f x)"),
        CompileErrorKind::Expected {
            expected: "a parameter list".to_owned(),
            found: "`x`".to_owned(),
        }
    );
}
