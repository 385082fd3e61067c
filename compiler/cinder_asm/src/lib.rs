//! The Cinder assembler.
//!
//! Lowers the token tree produced by `cinder_lexer` into bytecode
//! [`Function`](cinder_value::Function)s. Lowering is a single recursive
//! pass that expands keyword forms into labels and jumps and folds whatever
//! is known at compile time:
//!
//! - literal-only lists, maps and operator applications become one `Push`
//! - names bound in the builtin or const scope become immediates
//! - calls to known callables become `CallDirect`
//!
//! The first error stops compilation.

mod assembler;
mod emit;
mod keywords;

use cinder_diagnostic::CompileResult;
use cinder_ir::SourceFile;
use cinder_value::{Scope, Script};

pub use assembler::{Assembler, GLOBAL_FUNCTION};

/// Lex and assemble a source file against a builtin scope.
#[tracing::instrument(level = "debug", skip_all, fields(source = file.name()))]
pub fn compile(file: &SourceFile, builtins: &Scope) -> CompileResult<Script> {
    let roots = cinder_lexer::lex(file)?;
    Assembler::new(file, builtins).assemble(&roots)
}

/// Compile text that has no file name.
pub fn compile_str(text: &str, builtins: &Scope) -> CompileResult<Script> {
    compile(&SourceFile::new("<input>", text), builtins)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
