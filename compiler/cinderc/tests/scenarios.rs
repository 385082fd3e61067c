//! End-to-end scenarios: source text in, operand stack out.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;
use std::rc::Rc;

use cinderc::{
    compile, compile_named, run_source, run_to_completion, CompileErrorKind, Error, Machine,
    RuntimeErrorKind, Scope, Value, VmConfig,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn num(n: f64) -> Value {
    Value::Number(n)
}

/// A host scope with a logging `print`, a `yield` that pauses the machine
/// and a `config` object.
fn host() -> (Scope, Rc<RefCell<Vec<String>>>) {
    let scope = Scope::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    scope
        .define_builtin("print", None, move |_, args| {
            let line: Vec<String> = args.iter().map(Value::display_value).collect();
            sink.borrow_mut().push(line.join(" "));
            Ok(())
        })
        .unwrap();
    scope
        .define_builtin("yield", Some(0), |vm: &mut dyn Machine, _| {
            vm.pause();
            Ok(())
        })
        .unwrap();
    let mut config = std::collections::BTreeMap::new();
    config.insert("retries".to_owned(), num(3.0));
    scope.define("config", Value::object(config)).unwrap();
    scope.freeze();
    (scope, log)
}

fn run(source: &str) -> Vec<Value> {
    let (scope, _) = host();
    run_source(source, &scope).unwrap()
}

const PROGRAM: &str = r#"
    (function fib (n)
      (if (< n 2)
        (return n)
        (return (+ (fib (- n 1)) (fib (- n 2))))))

    (define results [])
    (define i 0)
    (loop (< i 8)
      (set results [...results (fib i)])
      (yield)
      (++ i))
    (print "done" i)
    (return results config.retries)
"#;

#[test]
fn test_counting_loop_scenario() {
    let (scope, _) = host();
    let source = "(define total 0) (loop (< total 3) (set total (+ total 1))) (return total)";
    let script = compile(source, &scope).unwrap();
    assert_eq!(script.main().labels().len(), 2);
    assert_eq!(
        run_to_completion(&script, VmConfig::default(), 1).unwrap(),
        vec![num(3.0)]
    );
}

#[test]
fn test_program_output_and_log() {
    let (scope, log) = host();
    let values = run_source(PROGRAM, &scope).unwrap();
    let fibs = [0.0, 1.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0].map(num).to_vec();
    assert_eq!(values, vec![Value::array(fibs), num(3.0)]);
    assert_eq!(*log.borrow(), vec!["done 8".to_owned()]);
}

#[test]
fn test_any_tick_size_reaches_the_same_result() {
    let (scope, _) = host();
    let script = compile(PROGRAM, &scope).unwrap();
    let expected = run_to_completion(&script, VmConfig::default(), usize::MAX).unwrap();
    for per_tick in [1, 2, 3, 7, 64] {
        assert_eq!(
            run_to_completion(&script, VmConfig::default(), per_tick).unwrap(),
            expected
        );
    }
}

#[test]
fn test_literal_and_runtime_containers_agree() {
    let (scope, _) = host();
    let script = compile("[1 [2 3] {a 4}]", &scope).unwrap();
    assert_eq!(script.main().code().len(), 1);

    let values = run("(define two 2) (define four 4) [1 [two 3] {a four}] [1 [2 3] {a 4}]");
    assert_eq!(values.len(), 2);
    assert_eq!(values[0], values[1]);
}

#[test]
fn test_spread_and_variadics() {
    assert_eq!(
        run("(function n (...xs) (return xs)) (define xs [1 2 3]) (return (n ...xs) (n))"),
        vec![
            Value::arguments(vec![num(1.0), num(2.0), num(3.0)]),
            Value::arguments(Vec::new()),
        ]
    );
}

#[test]
fn test_closures_resolve_against_their_definition() {
    let source = r#"
        (function make (prefix)
          (return (function (name) (return ($ prefix name)))))
        (define hello (make "hello, "))
        (function use_it () (define prefix "bye, ") (return (hello "ada")))
        (return (use_it))"#;
    assert_eq!(run(source), vec![Value::string("hello, ada")]);
}

#[test]
fn test_compile_errors_surface_through_the_facade() {
    let (scope, _) = host();
    let error = compile_named("demo.cin", "(define x 1)\n(break)", &scope).unwrap_err();
    assert_eq!(error.kind, CompileErrorKind::OutsideLoop("break".to_owned()));
    assert_eq!(error.position(), "demo.cin:2:1");
    assert!(error.to_string().starts_with("error["));

    let error = run_source("(const c 1) (set c 2)", &scope).unwrap_err();
    assert!(matches!(error, Error::Compile(_)));
}

#[test]
fn test_runtime_errors_carry_traces() {
    let (scope, _) = host();
    let error = run_source("(function f (v) (return v.missing))\n(f {a 1})", &scope).unwrap_err();
    let Error::Runtime(error) = error else {
        panic!("expected a runtime error");
    };
    assert!(matches!(error.kind, RuntimeErrorKind::PropertyNotFound { .. }));
    let trace = error.trace.unwrap();
    assert_eq!(trace.entries()[0].function, "f");
    assert_eq!(trace.entries()[1].function, "global");
}

#[test]
fn test_limits_come_from_config() {
    let (scope, _) = host();
    let script = compile("(function down (n) (down (+ n 1))) (down 0)", &scope).unwrap();
    let error = run_to_completion(&script, VmConfig::default().with_call_stack_size(16), 100)
        .unwrap_err();
    assert_eq!(error.kind, RuntimeErrorKind::CallStackOverflow { depth: 16 });
}

#[test]
fn test_deeply_nested_source_compiles_runs_and_drops() {
    let depth = 50_000;

    let source = format!("(return {}1{})", "[".repeat(depth), "]".repeat(depth));
    let values = run(&source);
    let mut levels = 0;
    let mut current = &values[0];
    while let Some([inner]) = current.as_slice() {
        levels += 1;
        current = inner;
    }
    assert_eq!(levels, depth);
    assert_eq!(current, &num(1.0));
    drop(values);

    let (scope, log) = host();
    let source = format!("{}print \"deep\"{}", "(".repeat(depth), ")".repeat(depth));
    run_source(&source, &scope).unwrap();
    assert_eq!(*log.borrow(), vec!["deep".to_owned()]);
}

proptest! {
    #[test]
    fn prop_compilation_is_deterministic(
        values in prop::collection::vec(-1000i32..1000, 1..8),
        dynamic in any::<bool>(),
    ) {
        let (scope, _) = host();
        let items: Vec<String> = values.iter().map(ToString::to_string).collect();
        let prefix = if dynamic { "(define y 1) " } else { "" };
        let tail = if dynamic { " y" } else { "" };
        let source = format!(
            "{prefix}(function f (a ...rest) (return [a {}{tail}])) (loop false (break)) (f 1)",
            items.join(" ")
        );
        let first = compile(&source, &scope).unwrap();
        let second = compile(&source, &scope).unwrap();
        prop_assert_eq!(first.main().code(), second.main().code());
        prop_assert_eq!(first.main().labels(), second.main().labels());
        prop_assert_eq!(first.main().parameters(), second.main().parameters());
    }
}
