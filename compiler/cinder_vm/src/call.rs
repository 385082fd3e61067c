//! Calls and returns.

use cinder_value::{
    arity_mismatch, call_stack_overflow, not_callable, Arguments, BuiltinFunction, Capture,
    FunctionValue, RuntimeResult, Scope, Value,
};

use crate::machine::ScopeFrame;
use crate::VirtualMachine;

impl VirtualMachine {
    /// Pop `count` arguments, splicing spread argument lists in place.
    pub(crate) fn pop_arguments(&mut self, count: usize) -> RuntimeResult<Vec<Value>> {
        let popped = self.pop_many(count)?;
        if !popped.iter().any(|v| matches!(v, Value::Arguments(_))) {
            return Ok(popped);
        }
        let mut args = Vec::with_capacity(popped.len());
        for value in popped {
            match value {
                Value::Arguments(spread) => args.extend(spread.iter().cloned()),
                other => args.push(other),
            }
        }
        Ok(args)
    }

    pub(crate) fn invoke(&mut self, callee: Value, args: Vec<Value>) -> RuntimeResult<()> {
        match callee {
            Value::Builtin(builtin) => self.call_builtin(&builtin, args),
            Value::Function(function) => self.call_function(&function, args),
            other => Err(not_callable(other.type_name())),
        }
    }

    fn call_builtin(&mut self, builtin: &BuiltinFunction, args: Vec<Value>) -> RuntimeResult<()> {
        if let Some(arity) = builtin.arity() {
            if arity != args.len() {
                return Err(arity_mismatch(builtin.name(), arity.to_string(), args.len()));
            }
        }
        tracing::trace!(builtin = builtin.name(), args = args.len(), "call builtin");
        builtin.call(self, Arguments::new(args))
    }

    /// Save the caller, open a frame scope under the callee's captured
    /// scope and bind parameters.
    fn call_function(&mut self, callee: &FunctionValue, mut args: Vec<Value>) -> RuntimeResult<()> {
        let function = callee.function();
        if self.frames.len() >= self.config().call_stack_size {
            return Err(call_stack_overflow(self.frames.len()));
        }

        let positional = function.positional();
        let got = args.len();
        let rest = match function.variadic() {
            Some(name) if got >= positional.len() => {
                Some((name, args.split_off(positional.len())))
            }
            Some(_) => {
                let expected = format!("at least {}", positional.len());
                return Err(arity_mismatch(function.name(), expected, got));
            }
            None if got == positional.len() => None,
            None => {
                return Err(arity_mismatch(
                    function.name(),
                    positional.len().to_string(),
                    got,
                ))
            }
        };

        let parent = match callee.capture() {
            Capture::Global => self.global.clone(),
            Capture::Lexical => self.scope.clone(),
            Capture::Scope(scope) => scope.clone(),
        };
        let scope = Scope::with_parent(&parent);
        // A fresh frame scope is never frozen.
        for (name, value) in positional.iter().zip(args) {
            let _ = scope.define(name.as_str(), value);
        }
        if let Some((name, rest)) = rest {
            let _ = scope.define(name, Value::arguments(rest));
        }

        tracing::trace!(
            function = function.name(),
            depth = self.frames.len() + 1,
            "call"
        );
        let caller = self.function.replace(function.clone());
        if let Some(caller) = caller {
            self.frames.push(ScopeFrame {
                pc: self.pc,
                function: caller,
                scope: std::mem::replace(&mut self.scope, scope),
            });
        } else {
            self.scope = scope;
        }
        self.pc = 0;
        Ok(())
    }

    /// Pop the innermost frame; returning from the global function halts.
    pub(crate) fn return_from_call(&mut self) {
        match self.frames.pop() {
            Some(frame) => {
                tracing::trace!(depth = self.frames.len(), "return");
                self.pc = frame.pc;
                self.function = Some(frame.function);
                self.scope = frame.scope;
            }
            None => {
                tracing::debug!(results = self.stack.len(), "script finished");
                cinder_value::Machine::halt(self);
            }
        }
    }
}
