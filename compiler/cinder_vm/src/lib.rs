//! The Cinder virtual machine.
//!
//! A stack machine executing the bytecode produced by `cinder_asm`:
//!
//! - an operand stack bounded by [`VmConfig::stack_size`]
//! - a call stack of saved frames bounded by [`VmConfig::call_stack_size`]
//! - one runtime scope per call, parented to the callee's captured scope
//!
//! The host drives execution with [`VirtualMachine::step`] (or the
//! [`run`](VirtualMachine::run) / [`run_steps`](VirtualMachine::run_steps)
//! loops) and registers builtins in the scope a script is compiled against.
//! Builtins reach back into the machine through the
//! [`Machine`](cinder_value::Machine) trait.

mod call;
mod config;
mod exec;
mod machine;
mod operators;

pub use config::VmConfig;
pub use machine::VirtualMachine;
pub use operators::{evaluate_binary, evaluate_unary};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
