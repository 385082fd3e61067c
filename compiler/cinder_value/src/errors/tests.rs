use super::*;
use pretty_assertions::assert_eq;

fn entry(function: &str, line: u32, op: Operator, operand: Option<Value>) -> TraceEntry {
    TraceEntry {
        function: function.to_owned(),
        index: 0,
        location: SourceLocation::new(line, 1),
        op,
        operand,
    }
}

#[test]
fn test_trace_entry_format() {
    assert_eq!(
        entry("fib", 3, Operator::Call, Some(Value::Number(2.0))).to_string(),
        "[fib]:3:Call:[2]"
    );
    assert_eq!(
        entry("global", 7, Operator::Return, None).to_string(),
        "[global]:7:Return:[]"
    );
}

#[test]
fn test_error_display_with_trace() {
    let trace = StackTrace::new(vec![
        entry("inner", 2, Operator::Set, Some(Value::variable("x"))),
        entry("global", 5, Operator::CallDirect, None),
    ]);
    let error = undefined_variable("x").with_trace(trace);

    assert_eq!(
        error.to_string(),
        "runtime error: undefined variable `x`\n\
         stack trace:\n  \
         0: [inner]:2:Set:[x]\n  \
         1: [global]:5:CallDirect:[]"
    );
}

#[test]
fn test_with_trace_keeps_innermost() {
    let first = StackTrace::new(vec![entry("a", 1, Operator::Get, None)]);
    let second = StackTrace::new(vec![entry("b", 1, Operator::Get, None)]);
    let error = stack_underflow().with_trace(first.clone()).with_trace(second);
    assert_eq!(error.trace, Some(first));
}

#[test]
fn test_factory_kinds() {
    assert_eq!(
        arity_mismatch("add", "2", 3).kind,
        RuntimeErrorKind::ArityMismatch {
            name: "add".into(),
            expected: "2".into(),
            got: 3
        }
    );
    assert_eq!(
        property_not_found(4, "array").to_string(),
        "runtime error: property `4` not found on array"
    );
    assert_eq!(
        missing_operand(Operator::Define).to_string(),
        "runtime error: `Define` requires an immediate operand"
    );
    assert_eq!(
        RuntimeError::custom("boom").kind,
        RuntimeErrorKind::Custom("boom".into())
    );
}
