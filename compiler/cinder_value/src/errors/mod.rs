//! Runtime errors.
//!
//! Runtime errors are fail-stop: once one is raised the machine state is not
//! safe to continue from, and the host is expected to halt and report it.
//!
//! `RuntimeErrorKind` carries the structured category; the factory functions
//! below are the construction API used by the machine and by builtins. The
//! machine attaches a [`StackTrace`] at the failing instruction.

use std::fmt;

use cinder_ir::{Operator, SourceLocation};

use crate::Value;

/// Result of a runtime operation.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Typed runtime error category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeErrorKind {
    // Stack discipline
    #[error("operand stack overflow (capacity {capacity})")]
    StackOverflow { capacity: usize },
    #[error("operand stack underflow")]
    StackUnderflow,
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("`{0}` requires an immediate operand")]
    MissingOperand(Operator),

    // Scopes
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),
    #[error("cannot assign to read-only variable `{0}`")]
    ReadOnlyVariable(String),
    #[error("property `{property}` not found on {found}")]
    PropertyNotFound {
        property: String,
        found: &'static str,
    },

    // Control flow
    #[error("label `{0}` not found")]
    LabelNotFound(String),
    #[error("cannot jump to {0}")]
    InvalidJumpTarget(&'static str),
    #[error("call stack overflow (depth {depth})")]
    CallStackOverflow { depth: usize },
    #[error("{0} is not callable")]
    NotCallable(&'static str),
    #[error("`{name}` expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: String,
        got: usize,
    },

    /// Raised by host builtins.
    #[error("{0}")]
    Custom(String),
}

/// One frame of a runtime stack trace.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceEntry {
    pub function: String,
    /// Index of the instruction within the function's code.
    pub index: usize,
    pub location: SourceLocation,
    pub op: Operator,
    pub operand: Option<Value>,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]:{}:{}:[", self.function, self.location.line, self.op)?;
        if let Some(operand) = &self.operand {
            write!(f, "{operand}")?;
        }
        write!(f, "]")
    }
}

/// Stack trace captured when a runtime error is raised, innermost first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StackTrace {
    entries: Vec<TraceEntry>,
}

impl StackTrace {
    pub fn new(entries: Vec<TraceEntry>) -> Self {
        StackTrace { entries }
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stack trace:")?;
        for (i, entry) in self.entries.iter().enumerate() {
            write!(f, "\n  {i}: {entry}")?;
        }
        Ok(())
    }
}

/// A runtime error, optionally with the stack trace of where it happened.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub trace: Option<StackTrace>,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind) -> Self {
        RuntimeError { kind, trace: None }
    }

    /// Error raised by a host builtin.
    pub fn custom(message: impl Into<String>) -> Self {
        RuntimeError::new(RuntimeErrorKind::Custom(message.into()))
    }

    /// Attach a trace unless one is already present.
    ///
    /// Errors raised inside a builtin keep the trace of the innermost frame.
    #[must_use]
    pub fn with_trace(mut self, trace: StackTrace) -> Self {
        if self.trace.is_none() {
            self.trace = Some(trace);
        }
        self
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "runtime error: {}", self.kind)?;
        if let Some(trace) = &self.trace {
            write!(f, "\n{trace}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<RuntimeErrorKind> for RuntimeError {
    fn from(kind: RuntimeErrorKind) -> Self {
        RuntimeError::new(kind)
    }
}

// Factory functions

#[cold]
pub fn stack_overflow(capacity: usize) -> RuntimeError {
    RuntimeErrorKind::StackOverflow { capacity }.into()
}

#[cold]
pub fn stack_underflow() -> RuntimeError {
    RuntimeErrorKind::StackUnderflow.into()
}

#[cold]
pub fn type_mismatch(expected: &'static str, found: &'static str) -> RuntimeError {
    RuntimeErrorKind::TypeMismatch { expected, found }.into()
}

#[cold]
pub fn missing_operand(op: Operator) -> RuntimeError {
    RuntimeErrorKind::MissingOperand(op).into()
}

#[cold]
pub fn undefined_variable(name: &str) -> RuntimeError {
    RuntimeErrorKind::UndefinedVariable(name.to_owned()).into()
}

#[cold]
pub fn read_only_variable(name: &str) -> RuntimeError {
    RuntimeErrorKind::ReadOnlyVariable(name.to_owned()).into()
}

#[cold]
pub fn property_not_found(property: impl fmt::Display, found: &'static str) -> RuntimeError {
    RuntimeErrorKind::PropertyNotFound {
        property: property.to_string(),
        found,
    }
    .into()
}

#[cold]
pub fn label_not_found(label: &str) -> RuntimeError {
    RuntimeErrorKind::LabelNotFound(label.to_owned()).into()
}

#[cold]
pub fn invalid_jump_target(found: &'static str) -> RuntimeError {
    RuntimeErrorKind::InvalidJumpTarget(found).into()
}

#[cold]
pub fn call_stack_overflow(depth: usize) -> RuntimeError {
    RuntimeErrorKind::CallStackOverflow { depth }.into()
}

#[cold]
pub fn not_callable(found: &'static str) -> RuntimeError {
    RuntimeErrorKind::NotCallable(found).into()
}

#[cold]
pub fn arity_mismatch(name: &str, expected: impl Into<String>, got: usize) -> RuntimeError {
    RuntimeErrorKind::ArityMismatch {
        name: name.to_owned(),
        expected: expected.into(),
        got,
    }
    .into()
}

#[cfg(test)]
mod tests;
