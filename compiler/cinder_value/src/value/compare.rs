//! Total order over values.
//!
//! Kinds are ranked first; within a kind:
//! - numbers compare numerically, NaN falling back to `f64::total_cmp`
//! - arrays and argument lists compare by length, then elementwise
//! - objects compare by size, then entry by entry in key order
//! - functions compare structurally, then by captured scope identity
//! - builtins compare by name, then by callback identity
//!
//! Equality is defined as `cmp == Equal`, so `Eq` and `Ord` always agree.

use std::cmp::Ordering;

use cinder_stack::ensure_sufficient_stack;

use super::Value;

impl Value {
    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
            Value::Variable(_) => 6,
            Value::Function(_) => 7,
            Value::Builtin(_) => 8,
            Value::Arguments(_) => 9,
        }
    }
}

fn compare_numbers(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

fn compare_sequences(a: &[Value], b: &[Value]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        a.iter()
            .zip(b)
            .map(|(x, y)| x.cmp(y))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => compare_numbers(*a, *b),
            (Value::String(a), Value::String(b)) | (Value::Variable(a), Value::Variable(b)) => {
                a.cmp(b)
            }
            (Value::Array(a), Value::Array(b)) => ensure_sufficient_stack(|| compare_sequences(a, b)),
            (Value::Arguments(a), Value::Arguments(b)) => {
                ensure_sufficient_stack(|| compare_sequences(a, b))
            }
            (Value::Object(a), Value::Object(b)) => ensure_sufficient_stack(|| {
                a.len().cmp(&b.len()).then_with(|| {
                    a.iter()
                        .zip(b.iter())
                        .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| va.cmp(vb)))
                        .find(|ord| ord.is_ne())
                        .unwrap_or(Ordering::Equal)
                })
            }),
            (Value::Function(a), Value::Function(b)) => a.cmp(b),
            (Value::Builtin(a), Value::Builtin(b)) => a.cmp(b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}
