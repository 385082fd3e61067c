//! Runtime data model shared by the Cinder assembler and virtual machine.
//!
//! - [`Value`]: the closed, immutable, totally ordered value type
//! - [`Scope`]: parent-linked name bindings (builtin, const and runtime roles)
//! - [`Function`] / [`CodeLine`]: compiled bytecode units
//! - [`BuiltinFunction`] / [`Machine`]: the host callback seam
//! - [`RuntimeError`] / [`StackTrace`]: fail-stop execution errors
//! - [`Script`]: a compiled unit ready to load into a machine

mod arguments;
mod builtin;
mod errors;
mod function;
mod scope;
mod script;
mod value;

pub use arguments::Arguments;
pub use builtin::{BuiltinFunction, Machine, NativeFn};
pub use errors::{
    arity_mismatch, call_stack_overflow, invalid_jump_target, label_not_found, missing_operand,
    not_callable, property_not_found, read_only_variable, stack_overflow, stack_underflow,
    type_mismatch, undefined_variable, RuntimeError, RuntimeErrorKind, RuntimeResult, StackTrace,
    TraceEntry,
};
pub use function::{Capture, CodeLine, DebugSymbols, Function, FunctionValue, ANONYMOUS};
pub use scope::{AssignError, LocalScope, Scope};
pub use script::Script;
pub use value::{Heap, PathSegment, Value};
