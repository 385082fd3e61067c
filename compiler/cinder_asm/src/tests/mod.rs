//! Assembler tests, grouped by form.

mod function_tests;
mod literal_tests;

use std::collections::BTreeMap;

use cinder_diagnostic::{CompileError, CompileErrorKind};
use cinder_ir::Operator;
use cinder_value::{CodeLine, Function, Scope, Script, Value};

use crate::compile_str;

/// Host scope used by every test: a `print` builtin and a `limits` object.
pub(crate) fn builtins() -> Scope {
    let scope = Scope::new();
    scope.define_builtin("print", None, |_, _| Ok(())).unwrap();
    let mut limits = BTreeMap::new();
    limits.insert("max".to_owned(), Value::Number(10.0));
    limits.insert(
        "tiers".to_owned(),
        Value::array(vec![1.0.into(), 2.0.into(), 3.0.into()]),
    );
    scope.define("limits", Value::object(limits)).unwrap();
    scope.define("flat.name", Value::string("flat")).unwrap();
    scope.freeze();
    scope
}

pub(crate) fn script(source: &str) -> Script {
    compile_str(source, &builtins()).unwrap()
}

pub(crate) fn main(source: &str) -> Function {
    (**script(source).main()).clone()
}

pub(crate) fn code(source: &str) -> Vec<CodeLine> {
    main(source).code().to_vec()
}

pub(crate) fn ops(source: &str) -> Vec<Operator> {
    code(source).iter().map(|line| line.op).collect()
}

pub(crate) fn failure(source: &str) -> CompileError {
    compile_str(source, &builtins()).unwrap_err()
}

pub(crate) fn error_kind(source: &str) -> CompileErrorKind {
    failure(source).kind
}

pub(crate) fn with(op: Operator, operand: impl Into<Value>) -> CodeLine {
    CodeLine::with(op, operand.into())
}

pub(crate) fn get(name: &str) -> CodeLine {
    CodeLine::with(Operator::Get, Value::variable(name))
}

pub(crate) fn bare(op: Operator) -> CodeLine {
    CodeLine::bare(op)
}

/// The function operand of the `Push` at `index`.
pub(crate) fn pushed_function(code: &[CodeLine], index: usize) -> cinder_value::FunctionValue {
    match &code[index].operand {
        Some(Value::Function(function)) => function.clone(),
        other => panic!("expected a function push, got {other:?}"),
    }
}
