//! Human-readable compile error output with optional ANSI colors.

use std::io::{self, Write};

use crate::CompileError;

mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const BOLD: &str = "\x1b[1m";
    pub const GUTTER: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode for [`TerminalEmitter`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Use colors when the output is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

impl TerminalEmitter<io::Stderr> {
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }
}

/// Writes compile errors to a terminal-like sink.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_colored(&mut self, text: &str, color: &str) -> io::Result<()> {
        if self.colors {
            write!(self.writer, "{color}{text}{}", colors::RESET)
        } else {
            write!(self.writer, "{text}")
        }
    }

    /// Header, position, then the snippet with a colored gutter.
    pub fn emit(&mut self, error: &CompileError) -> io::Result<()> {
        self.write_colored("error", colors::ERROR)?;
        self.write_colored(&format!("[{}]", error.code()), colors::BOLD)?;
        writeln!(self.writer, ": {}", error.kind)?;

        self.write_colored("  -->", colors::GUTTER)?;
        writeln!(self.writer, " {}", error.position())?;

        for line in error.snippet.lines() {
            match line.split_once('|') {
                Some((gutter, rest)) => {
                    self.write_colored(&format!("{gutter}|"), colors::GUTTER)?;
                    if rest.trim_start().starts_with('^') {
                        self.write_colored(rest, colors::ERROR)?;
                    } else {
                        write!(self.writer, "{rest}")?;
                    }
                    writeln!(self.writer)?;
                }
                None => writeln!(self.writer, "{line}")?,
            }
        }
        writeln!(self.writer)?;
        self.writer.flush()
    }
}
