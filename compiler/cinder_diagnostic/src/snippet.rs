//! Source snippet rendering.

use std::fmt::Write;

use cinder_ir::{SourceFile, Span};

/// Render the line holding `span.start` with a caret underline.
///
/// ```text
///   |
/// 2 |   (set x 1)
///   |   ^^^^^^^^^
/// ```
///
/// Spans crossing a line end are underlined to the end of the first line.
pub fn render_snippet(file: &SourceFile, span: Span) -> String {
    let location = file.location(span);
    let Some(line_text) = file.line_text(location.line) else {
        return String::new();
    };

    let gutter = location.line.to_string();
    let pad = " ".repeat(gutter.len());
    let start_col = location.column.saturating_sub(1) as usize;

    let line_len = line_text.chars().count();
    let span_chars = file
        .text()
        .get(span.to_range())
        .map_or(0, |text| text.chars().count());
    let width = span_chars
        .min(line_len.saturating_sub(start_col))
        .max(1);

    let mut out = String::new();
    let _ = writeln!(out, "{pad} |");
    let _ = writeln!(out, "{gutter} | {line_text}");
    let _ = write!(
        out,
        "{pad} | {}{}",
        " ".repeat(start_col),
        "^".repeat(width)
    );
    out
}
