//! Shared low-level types for the Cinder toolchain.
//!
//! Everything here is plain data with no knowledge of values or execution:
//! byte spans, source files with line tables, and the operator set the
//! assembler emits and the virtual machine dispatches on.

mod operator;
mod source;
mod span;

pub use operator::Operator;
pub use source::{LineOffsetTable, SourceFile, SourceLocation};
pub use span::Span;
