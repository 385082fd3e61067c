//! Compile-time diagnostics.
//!
//! Every failure while turning source text into bytecode is a
//! [`CompileError`]: a [`CompileErrorKind`] plus the span of the offending
//! token. Once a [`SourceFile`](cinder_ir::SourceFile) is attached the error
//! also carries its line/column and a rendered snippet of the surrounding
//! source. Compilation stops at the first error.

mod emitter;
mod error;
mod snippet;

pub use emitter::{ColorMode, TerminalEmitter};
pub use error::{CompileError, CompileErrorKind, CompileResult};
pub use snippet::render_snippet;
