//! Host callbacks.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::{Arguments, RuntimeResult, Value};

/// What a builtin may do to the machine that called it.
///
/// Builtins return their results by pushing them. Pausing keeps the
/// machine's whole state intact, so the host can resume it later.
pub trait Machine {
    /// Push a return value onto the operand stack.
    fn push(&mut self, value: Value) -> RuntimeResult<()>;

    /// Suspend stepping until the host resumes the machine.
    fn pause(&mut self);

    /// Stop the machine; it will not step again.
    fn halt(&mut self);

    fn is_paused(&self) -> bool;
}

/// Signature of a host callback.
pub type NativeFn = dyn Fn(&mut dyn Machine, Arguments) -> RuntimeResult<()>;

/// A named host callback, optionally with a fixed arity.
#[derive(Clone)]
pub struct BuiltinFunction {
    name: Rc<str>,
    arity: Option<usize>,
    func: Rc<NativeFn>,
}

impl BuiltinFunction {
    pub fn new<F>(name: &str, arity: Option<usize>, func: F) -> Self
    where
        F: Fn(&mut dyn Machine, Arguments) -> RuntimeResult<()> + 'static,
    {
        BuiltinFunction {
            name: Rc::from(name),
            arity,
            func: Rc::new(func),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Required argument count; `None` accepts any number.
    #[inline]
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Invoke the callback. Arity is checked by the caller.
    pub fn call(&self, machine: &mut dyn Machine, args: Arguments) -> RuntimeResult<()> {
        (self.func)(machine, args)
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.func).cast::<()>() as usize
    }
}

impl PartialEq for BuiltinFunction {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BuiltinFunction {}

impl PartialOrd for BuiltinFunction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BuiltinFunction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.addr().cmp(&other.addr()))
    }
}

impl fmt::Debug for BuiltinFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity {
            Some(arity) => write!(f, "{}/{arity}", self.name),
            None => write!(f, "{}/*", self.name),
        }
    }
}

impl From<BuiltinFunction> for Value {
    fn from(builtin: BuiltinFunction) -> Self {
        Value::Builtin(builtin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        pushed: Vec<Value>,
        paused: bool,
    }

    impl Machine for Recorder {
        fn push(&mut self, value: Value) -> RuntimeResult<()> {
            self.pushed.push(value);
            Ok(())
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn halt(&mut self) {}

        fn is_paused(&self) -> bool {
            self.paused
        }
    }

    #[test]
    fn test_call_pushes_through_machine() {
        let sum = BuiltinFunction::new("sum", None, |vm, args| {
            let total: f64 = args.iter().filter_map(Value::as_number).sum();
            vm.push(Value::Number(total))
        });
        let mut recorder = Recorder {
            pushed: Vec::new(),
            paused: false,
        };

        let args = Arguments::new(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert!(sum.call(&mut recorder, args).is_ok());
        assert_eq!(recorder.pushed, vec![Value::Number(3.0)]);
    }

    #[test]
    fn test_builtin_may_pause() {
        let wait = BuiltinFunction::new("wait", Some(0), |vm, _| {
            vm.pause();
            Ok(())
        });
        let mut recorder = Recorder {
            pushed: Vec::new(),
            paused: false,
        };
        assert!(wait.call(&mut recorder, Arguments::empty()).is_ok());
        assert!(recorder.is_paused());
    }

    #[test]
    fn test_identity_and_name_ordering() {
        let a = BuiltinFunction::new("a", None, |_, _| Ok(()));
        let b = BuiltinFunction::new("b", None, |_, _| Ok(()));
        assert_eq!(a, a.clone());
        assert!(a < b);
        let other_a = BuiltinFunction::new("a", None, |_, _| Ok(()));
        assert_ne!(a, other_a);
        assert_eq!(format!("{a:?}"), "a/*");
    }
}
