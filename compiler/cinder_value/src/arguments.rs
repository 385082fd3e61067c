//! Flattened call arguments.

use std::ops::Deref;

use crate::errors::{arity_mismatch, type_mismatch};
use crate::{Heap, RuntimeResult, Value};

/// Read-only, ordered view of the arguments of one call.
///
/// Builtins receive their arguments as one `Arguments`; a variadic `...rest`
/// parameter is bound to one; and `...value` in a call wraps an array into
/// one so that it is spliced into the callee's argument list.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Arguments(Heap<Vec<Value>>);

impl Arguments {
    pub fn new(items: Vec<Value>) -> Self {
        Arguments(Heap::new(items))
    }

    pub fn empty() -> Self {
        Arguments::new(Vec::new())
    }

    /// Fail with an arity error unless exactly `expected` values were passed.
    pub fn expect_len(&self, callee: &str, expected: usize) -> RuntimeResult<()> {
        if self.len() == expected {
            Ok(())
        } else {
            Err(arity_mismatch(callee, expected.to_string(), self.len()))
        }
    }

    /// The `index`th argument as a number.
    pub fn number(&self, index: usize) -> RuntimeResult<f64> {
        let value = self.get(index).unwrap_or(&Value::Null);
        value
            .as_number()
            .ok_or_else(|| type_mismatch("number", value.type_name()))
    }

    /// The `index`th argument as a string.
    pub fn string(&self, index: usize) -> RuntimeResult<&str> {
        let value = self.get(index).unwrap_or(&Value::Null);
        value
            .as_str()
            .ok_or_else(|| type_mismatch("string", value.type_name()))
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.0.into_inner()
    }
}

impl Deref for Arguments {
    type Target = [Value];

    #[inline]
    fn deref(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(items: Vec<Value>) -> Self {
        Arguments::new(items)
    }
}
