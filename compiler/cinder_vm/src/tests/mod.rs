//! Machine tests: scripts compiled with `cinder_asm` and run to completion.

mod control_tests;

use std::cell::RefCell;
use std::rc::Rc;

use cinder_value::{RuntimeError, RuntimeErrorKind, Scope, Value};

use crate::{VirtualMachine, VmConfig};

/// Builtins shared by the tests. `print` appends to the returned log.
pub(crate) fn host() -> (Scope, Rc<RefCell<Vec<String>>>) {
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
        .define_builtin("count", None, |vm, args| {
            #[allow(clippy::cast_precision_loss)]
            let n = args.len() as f64;
            vm.push(Value::Number(n))
        })
        .unwrap();
    scope
        .define_builtin("sum", None, |vm, args| {
            let mut total = 0.0;
            for i in 0..args.len() {
                total += args.number(i)?;
            }
            vm.push(Value::Number(total))
        })
        .unwrap();
    scope
        .define_builtin("pair", Some(0), |vm, _| {
            vm.push(Value::string("left"))?;
            vm.push(Value::string("right"))
        })
        .unwrap();
    scope
        .define_builtin("wait", Some(0), |vm, _| {
            vm.pause();
            Ok(())
        })
        .unwrap();
    scope
        .define_builtin("fail", Some(1), |_, args| {
            Err(RuntimeError::custom(args.string(0)?.to_owned()))
        })
        .unwrap();
    scope.freeze();
    (scope, log)
}

pub(crate) fn machine_for(source: &str, config: VmConfig) -> VirtualMachine {
    let (scope, _) = host();
    let script = cinder_asm::compile_str(source, &scope).unwrap();
    let mut vm = VirtualMachine::new(config);
    vm.load_script(&script);
    vm
}

/// Run to completion and return the final operand stack.
pub(crate) fn run(source: &str) -> Vec<Value> {
    let mut vm = machine_for(source, VmConfig::default());
    vm.run().unwrap();
    assert!(!vm.is_running(), "script paused unexpectedly");
    vm.stack().to_vec()
}

pub(crate) fn run_err_with(source: &str, config: VmConfig) -> RuntimeError {
    let mut vm = machine_for(source, config);
    let error = vm.run().unwrap_err();
    assert!(!vm.is_running(), "machine must halt on error");
    error
}

pub(crate) fn run_err(source: &str) -> RuntimeError {
    run_err_with(source, VmConfig::default())
}

pub(crate) fn error_kind(source: &str) -> RuntimeErrorKind {
    run_err(source).kind
}

pub(crate) fn num(n: f64) -> Value {
    Value::Number(n)
}
