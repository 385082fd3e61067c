//! The token tree.

use cinder_ir::Span;
use cinder_stack::ensure_sufficient_stack;
use cinder_value::Value;

/// One node of the token tree, tagged with its source span.
#[derive(Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// An atom: number, boolean, null, string, or variable/label.
    Value(Value),
    /// `( ... )`
    Expression(Vec<Token>),
    /// `[ ... ]`
    List(Vec<Token>),
    /// `{ ... }`
    Map(Vec<Token>),
}

impl TokenKind {
    fn children_mut(&mut self) -> Option<&mut Vec<Token>> {
        match self {
            TokenKind::Expression(children)
            | TokenKind::List(children)
            | TokenKind::Map(children) => Some(children),
            TokenKind::Value(_) => None,
        }
    }
}

impl Clone for Token {
    fn clone(&self) -> Self {
        ensure_sufficient_stack(|| Token {
            kind: self.kind.clone(),
            span: self.span,
        })
    }
}

/// Dropping a tree tears it down with a worklist; drop glue would recurse
/// once per nesting level.
impl Drop for Token {
    fn drop(&mut self) {
        let Some(children) = self.kind.children_mut() else {
            return;
        };
        let mut pending = std::mem::take(children);
        while let Some(mut token) = pending.pop() {
            if let Some(children) = token.kind.children_mut() {
                pending.append(children);
            }
        }
    }
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match &self.kind {
            TokenKind::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Name of a bare variable or label atom.
    pub fn as_variable(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_variable)
    }

    /// Children of an expression.
    pub fn as_expression(&self) -> Option<&[Token]> {
        match &self.kind {
            TokenKind::Expression(children) => Some(children),
            _ => None,
        }
    }

    /// Short description for diagnostics.
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Value(Value::Variable(name)) => format!("`{}`", &**name),
            TokenKind::Value(value) => format!("{} `{value}`", value.type_name()),
            TokenKind::Expression(_) => "an expression".to_owned(),
            TokenKind::List(_) => "a list literal".to_owned(),
            TokenKind::Map(_) => "a map literal".to_owned(),
        }
    }
}
