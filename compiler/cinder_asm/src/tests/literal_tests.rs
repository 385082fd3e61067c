use std::collections::BTreeMap;

use cinder_ir::Operator;
use cinder_value::Value;
use pretty_assertions::assert_eq;

use super::{bare, builtins, code, get, ops, with};
use crate::compile_str;

#[test]
fn test_literal_list_folds_to_one_push() {
    assert_eq!(
        code(r#"[1 "a" true [null]]"#),
        vec![with(
            Operator::Push,
            vec![
                1.0.into(),
                "a".into(),
                true.into(),
                Value::array(vec![Value::Null])
            ]
        )]
    );
}

#[test]
fn test_dynamic_element_builds_whole_list() {
    assert_eq!(
        code("[1 x [2]]"),
        vec![
            with(Operator::Push, 1.0),
            get("x"),
            with(Operator::Push, vec![Value::Number(2.0)]),
            with(Operator::MakeArray, 3.0),
        ]
    );
}

#[test]
fn test_literal_map_folds() {
    let mut expected = BTreeMap::new();
    expected.insert("a".to_owned(), Value::Number(1.0));
    expected.insert("b c".to_owned(), Value::array(vec![Value::Number(2.0)]));
    assert_eq!(
        code(r#"{a 1 "b c" [2]}"#),
        vec![with(Operator::Push, Value::object(expected))]
    );
}

#[test]
fn test_dynamic_map_pushes_keys() {
    assert_eq!(
        code("{name who age 3}"),
        vec![
            with(Operator::Push, "name"),
            get("who"),
            with(Operator::Push, "age"),
            with(Operator::Push, 3.0),
            with(Operator::MakeObject, 2.0),
        ]
    );
}

#[test]
fn test_builtin_properties_fold() {
    assert_eq!(code("limits.max"), vec![with(Operator::Push, 10.0)]);
    assert_eq!(code("limits.tiers.2"), vec![with(Operator::Push, 3.0)]);
    assert_eq!(code("flat.name"), vec![with(Operator::Push, "flat")]);
}

#[test]
fn test_partial_fold_leaves_runtime_path() {
    let tiers = Value::array(vec![1.0.into(), 2.0.into(), 3.0.into()]);
    assert_eq!(
        code("limits.tiers.9.name"),
        vec![
            with(Operator::Push, tiers),
            with(Operator::GetProperty, vec![Value::Number(9.0), "name".into()]),
        ]
    );
}

#[test]
fn test_unknown_parent_reads_at_runtime() {
    assert_eq!(
        code("player.items.0"),
        vec![
            get("player"),
            with(Operator::GetProperty, vec![Value::string("items"), 0.0.into()]),
        ]
    );
    // empty segments are not paths
    assert_eq!(code("a..b"), vec![get("a..b")]);
}

#[test]
fn test_spread() {
    assert_eq!(
        code("...args"),
        vec![get("args"), bare(Operator::ToArgument)]
    );
}

#[test]
fn test_labels_push_as_values() {
    assert_eq!(
        code(":done"),
        vec![with(Operator::Push, Value::variable(":done"))]
    );
}

#[test]
fn test_arithmetic_folding() {
    assert_eq!(code("(+ 1 2 3)"), vec![with(Operator::Push, 6.0)]);
    assert_eq!(code("(- 10 1 2)"), vec![with(Operator::Push, 7.0)]);
    assert_eq!(code("(- 4)"), vec![with(Operator::Push, -4.0)]);
    assert_eq!(code("(* limits.max 2)"), vec![with(Operator::Push, 20.0)]);
}

#[test]
fn test_arithmetic_immediates() {
    assert_eq!(
        code("(+ x 1 y)"),
        vec![
            get("x"),
            with(Operator::Add, 1.0),
            get("y"),
            bare(Operator::Add),
        ]
    );
    assert_eq!(
        code("(% 7 x)"),
        vec![
            with(Operator::Push, 7.0),
            get("x"),
            bare(Operator::Mod),
        ]
    );
    assert_eq!(
        code("(- x)"),
        vec![get("x"), bare(Operator::Negate)]
    );
}

#[test]
fn test_comparison_and_logic() {
    assert_eq!(code("(< 1 2)"), vec![with(Operator::Push, true)]);
    assert_eq!(code(r#"(== "a" "a")"#), vec![with(Operator::Push, true)]);
    assert_eq!(
        code("(>= x 3)"),
        vec![get("x"), with(Operator::GreaterEqual, 3.0)]
    );
    assert_eq!(
        ops("(&& a b c)"),
        vec![
            Operator::Get,
            Operator::Get,
            Operator::And,
            Operator::Get,
            Operator::And,
        ]
    );
    assert_eq!(code("(! false)"), vec![with(Operator::Push, true)]);
    assert_eq!(code("(! x)"), vec![get("x"), bare(Operator::Not)]);
}

#[test]
fn test_concat() {
    assert_eq!(
        code(r#"($ "n=" 1 " " true)"#),
        vec![with(Operator::Push, "n=1 true")]
    );
    assert_eq!(code("($)"), vec![with(Operator::Push, "")]);
    assert_eq!(
        code(r#"($ "n=" n)"#),
        vec![
            with(Operator::Push, "n="),
            get("n"),
            with(Operator::StringConcat, 2.0),
        ]
    );
}

#[test]
fn test_direct_and_dynamic_calls() {
    // Builtins compare by identity, so the operand must come from the
    // scope the script was compiled against.
    let scope = builtins();
    let print = scope.get("print").unwrap();
    let script = compile_str("(print 1 x)", &scope).unwrap();
    assert_eq!(
        script.main().code(),
        &[
            with(Operator::Push, 1.0),
            get("x"),
            with(Operator::CallDirect, vec![print, 2.0.into()]),
        ]
    );
    assert_eq!(
        code("(f 1)"),
        vec![with(Operator::Push, 1.0), get("f"), with(Operator::Call, 1.0)]
    );
}

#[test]
fn test_assignment_forms() {
    assert_eq!(
        code("(define a b (pair))"),
        vec![
            get("pair"),
            with(Operator::Call, 0.0),
            with(Operator::Define, Value::variable("b")),
            with(Operator::Define, Value::variable("a")),
        ]
    );
    assert_eq!(
        code("(+= x 2)"),
        vec![
            get("x"),
            with(Operator::Add, 2.0),
            with(Operator::Set, Value::variable("x")),
        ]
    );
    assert_eq!(
        code(r#"($= s "!")"#),
        vec![
            get("s"),
            with(Operator::Push, "!"),
            with(Operator::StringConcat, 2.0),
            with(Operator::Set, Value::variable("s")),
        ]
    );
    assert_eq!(
        code("(++ i) (-- j)"),
        vec![
            with(Operator::Inc, Value::variable("i")),
            with(Operator::Dec, Value::variable("j")),
        ]
    );
}

#[test]
fn test_const_folds_into_uses() {
    assert_eq!(
        code("(const n 4) (const m (* n 2)) (+ m x)"),
        vec![with(Operator::Push, 8.0), get("x"), bare(Operator::Add)]
    );
}

#[test]
fn test_blocks_and_empty_expressions() {
    assert_eq!(
        ops("((f) () (g))"),
        vec![Operator::Get, Operator::Call, Operator::Get, Operator::Call]
    );
    assert!(code("()").is_empty());
}
