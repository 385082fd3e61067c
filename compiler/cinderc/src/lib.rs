//! Cinder: an embeddable scripting engine.
//!
//! ```text
//! source text
//!     │  cinder_lexer::lex
//!     ▼
//! token tree
//!     │  cinder_asm::Assembler
//!     ▼
//! Script (global Function + builtin Scope)
//!     │  cinder_vm::VirtualMachine::step
//!     ▼
//! operand stack
//! ```
//!
//! This crate ties the pipeline together for hosts that do not need to drive
//! each stage themselves, and hosts the `cinder` command-line runner.

use std::sync::Once;

use cinder_ir::SourceFile;

pub use cinder_diagnostic::{ColorMode, CompileError, CompileErrorKind, TerminalEmitter};
pub use cinder_value::{
    Arguments, Machine, RuntimeError, RuntimeErrorKind, RuntimeResult, Scope, Script, StackTrace,
    Value,
};
pub use cinder_vm::{VirtualMachine, VmConfig};

/// Either half of the error taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Compile(#[from] CompileError),
    #[error("{0}")]
    Runtime(#[from] RuntimeError),
}

/// Compile unnamed source text against `builtins`.
pub fn compile(text: &str, builtins: &Scope) -> Result<Script, CompileError> {
    cinder_asm::compile_str(text, builtins)
}

/// Compile source text; `name` appears in diagnostics.
pub fn compile_named(name: &str, text: &str, builtins: &Scope) -> Result<Script, CompileError> {
    cinder_asm::compile(&SourceFile::new(name, text), builtins)
}

/// Run `script` until it halts, in ticks of at most `steps_per_tick` steps.
///
/// A pause raised by a builtin lasts until the next tick. Returns the
/// values left on the operand stack.
pub fn run_to_completion(
    script: &Script,
    config: VmConfig,
    steps_per_tick: usize,
) -> Result<Vec<Value>, RuntimeError> {
    let mut vm = VirtualMachine::new(config);
    vm.load_script(script);

    let steps_per_tick = steps_per_tick.max(1);
    let mut ticks = 0usize;
    while vm.is_running() {
        if vm.is_paused() {
            vm.resume();
        }
        vm.run_steps(steps_per_tick)?;
        ticks += 1;
    }
    tracing::debug!(ticks, "run complete");
    Ok(vm.stack().to_vec())
}

/// Compile and run in one go with the default configuration.
pub fn run_source(text: &str, builtins: &Scope) -> Result<Vec<Value>, Error> {
    let script = compile(text, builtins)?;
    Ok(run_to_completion(&script, VmConfig::default(), usize::MAX)?)
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=cinder_vm=trace` or
/// similar; nothing is installed when `RUST_LOG` is unset.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
