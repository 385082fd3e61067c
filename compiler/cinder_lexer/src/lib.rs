//! Lexer for Cinder source text.
//!
//! Source is split into raw tokens by a logos-generated scanner, then folded
//! into a tree:
//! - `( ... )` becomes an expression (call or keyword form)
//! - `[ ... ]` becomes a list literal
//! - `{ ... }` becomes a map literal
//! - everything else is an atom: number, `true`/`false`, `null`, quoted
//!   string, or a variable (a label when it starts with `:`)
//!
//! `;` starts a comment running to the end of the line. An unterminated
//! quote runs to the end of input.

mod atom;
mod escape;
mod raw;
mod token;
mod tree;

use cinder_diagnostic::CompileResult;
use cinder_ir::SourceFile;

pub use atom::classify_word;
pub use escape::unescape;
pub use token::{Token, TokenKind};

/// Lex a whole source file into its root tokens.
///
/// Errors carry the file's location and snippet.
#[tracing::instrument(level = "debug", skip_all, fields(source = file.name()))]
pub fn lex(file: &SourceFile) -> CompileResult<Vec<Token>> {
    let tokens = tree::build(file.text()).map_err(|error| error.with_source(file))?;
    tracing::debug!(roots = tokens.len(), "lexed");
    Ok(tokens)
}

/// Lex text without an attached file name.
pub fn lex_str(text: &str) -> CompileResult<Vec<Token>> {
    lex(&SourceFile::new("<input>", text))
}
