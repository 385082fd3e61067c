use std::fmt;

use cinder_ir::{SourceFile, SourceLocation, Span};

use crate::snippet::render_snippet;

/// Result alias for every compile-time pass.
pub type CompileResult<T> = Result<T, CompileError>;

/// What went wrong while lexing or assembling.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileErrorKind {
    // === Token tree ===
    #[error("unexpected closing `{found}`")]
    UnexpectedClose { found: char },
    #[error("expected `{expected}` to close this group, found `{found}`")]
    MismatchedClose { expected: char, found: char },
    #[error("unclosed `{open}`")]
    Unclosed { open: char },
    #[error("unrecognized input `{text}`")]
    InvalidToken { text: String },

    // === Forms ===
    #[error("`{form}` expects {expected} argument(s), found {found}")]
    WrongArgumentCount {
        form: String,
        expected: String,
        found: usize,
    },
    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: String },
    #[error("label `{0}` cannot take arguments")]
    LabelWithArguments(String),
    #[error("`{0}` is not callable")]
    NotCallable(String),
    #[error("map literal key `{0}` must be a string or a name")]
    InvalidMapKey(String),
    #[error("map literal has a key without a value")]
    MissingMapValue,

    // === Names ===
    #[error("cannot assign to constant `{0}`")]
    AssignToConstant(String),
    #[error("constant `{0}` is already defined")]
    ConstantRedefined(String),
    #[error("value of constant `{0}` is not known at compile time")]
    NotConstant(String),
    #[error("`{0}` is not an assignable name")]
    InvalidAssignTarget(String),
    #[error("parameter `{0}` is declared more than once")]
    DuplicateParameter(String),
    #[error("variadic parameter `{0}` must come last")]
    VariadicNotLast(String),

    // === Control flow ===
    #[error("`{0}` outside of a loop")]
    OutsideLoop(String),
    #[error("label `{0}` is declared more than once")]
    DuplicateLabel(String),
    #[error("unresolved label `{0}`")]
    UnresolvedLabel(String),
    #[error("`{0}` is not a valid jump target")]
    InvalidJumpTarget(String),
}

impl CompileErrorKind {
    /// Stable diagnostic code, shown in the error header.
    pub fn code(&self) -> &'static str {
        match self {
            CompileErrorKind::UnexpectedClose { .. } => "E0001",
            CompileErrorKind::MismatchedClose { .. } => "E0002",
            CompileErrorKind::Unclosed { .. } => "E0003",
            CompileErrorKind::InvalidToken { .. } => "E0004",
            CompileErrorKind::WrongArgumentCount { .. } => "E1001",
            CompileErrorKind::Expected { .. } => "E1002",
            CompileErrorKind::LabelWithArguments(_) => "E1003",
            CompileErrorKind::NotCallable(_) => "E1004",
            CompileErrorKind::InvalidMapKey(_) => "E1005",
            CompileErrorKind::MissingMapValue => "E1006",
            CompileErrorKind::AssignToConstant(_) => "E2001",
            CompileErrorKind::ConstantRedefined(_) => "E2002",
            CompileErrorKind::NotConstant(_) => "E2003",
            CompileErrorKind::InvalidAssignTarget(_) => "E2004",
            CompileErrorKind::DuplicateParameter(_) => "E2005",
            CompileErrorKind::VariadicNotLast(_) => "E2006",
            CompileErrorKind::OutsideLoop(_) => "E3001",
            CompileErrorKind::DuplicateLabel(_) => "E3002",
            CompileErrorKind::UnresolvedLabel(_) => "E3003",
            CompileErrorKind::InvalidJumpTarget(_) => "E3004",
        }
    }
}

/// A compile error with its source position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub span: Span,
    /// Name of the source the error came from, once attached.
    pub source_name: Option<String>,
    pub location: SourceLocation,
    /// Rendered source context; empty until a source is attached.
    pub snippet: String,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, span: Span) -> Self {
        CompileError {
            kind,
            span,
            source_name: None,
            location: SourceLocation::UNKNOWN,
            snippet: String::new(),
        }
    }

    /// Resolve the span against `file`, filling location and snippet.
    #[must_use]
    pub fn with_source(mut self, file: &SourceFile) -> Self {
        self.location = file.location(self.span);
        self.snippet = render_snippet(file, self.span);
        self.source_name = Some(file.name().to_owned());
        self
    }

    #[inline]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// The `name:line:col` position, or the raw span without a source.
    pub fn position(&self) -> String {
        match &self.source_name {
            Some(name) => format!("{name}:{}", self.location),
            None => format!("{:?}", self.span),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error[{}]: {}", self.code(), self.kind)?;
        write!(f, "  --> {}", self.position())?;
        if !self.snippet.is_empty() {
            write!(f, "\n{}", self.snippet)?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
