//! Folding raw tokens into a tree.
//!
//! The builder keeps an explicit stack of open containers instead of
//! recursing, so nesting depth is bounded only by memory.

use cinder_diagnostic::{CompileError, CompileErrorKind, CompileResult};
use cinder_ir::Span;
use cinder_value::Value;
use logos::Logos;

use crate::atom::classify_word;
use crate::escape::quoted_body;
use crate::raw::{Delimiter, RawToken};
use crate::{Token, TokenKind};

struct Open {
    delimiter: Delimiter,
    start: u32,
    children: Vec<Token>,
}

impl Open {
    fn close(self, end: u32) -> Token {
        let span = Span::new(self.start, end);
        let kind = match self.delimiter {
            Delimiter::Paren => TokenKind::Expression(self.children),
            Delimiter::Bracket => TokenKind::List(self.children),
            Delimiter::Brace => TokenKind::Map(self.children),
        };
        Token::new(kind, span)
    }
}

pub(crate) fn build(source: &str) -> CompileResult<Vec<Token>> {
    let mut lexer = RawToken::lexer(source);
    let mut roots = Vec::new();
    let mut open: Vec<Open> = Vec::new();

    while let Some(raw) = lexer.next() {
        let span = Span::from_range(lexer.span());
        let slice = lexer.slice();

        let Ok(raw) = raw else {
            return Err(CompileError::new(
                CompileErrorKind::InvalidToken {
                    text: slice.to_owned(),
                },
                span,
            ));
        };

        if let Some(delimiter) = raw.opens() {
            open.push(Open {
                delimiter,
                start: span.start,
                children: Vec::new(),
            });
            continue;
        }

        let token = if let Some(delimiter) = raw.closes() {
            let Some(group) = open.pop() else {
                return Err(CompileError::new(
                    CompileErrorKind::UnexpectedClose {
                        found: delimiter.close_char(),
                    },
                    span,
                ));
            };
            if group.delimiter != delimiter {
                return Err(CompileError::new(
                    CompileErrorKind::MismatchedClose {
                        expected: group.delimiter.close_char(),
                        found: delimiter.close_char(),
                    },
                    span,
                ));
            }
            group.close(span.end)
        } else {
            let value = match raw {
                RawToken::DoubleQuoted => Value::string(quoted_body(slice, '"')),
                RawToken::SingleQuoted => Value::string(quoted_body(slice, '\'')),
                _ => classify_word(slice),
            };
            Token::new(TokenKind::Value(value), span)
        };

        match open.last_mut() {
            Some(parent) => parent.children.push(token),
            None => roots.push(token),
        }
    }

    if let Some(group) = open.pop() {
        let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
        return Err(CompileError::new(
            CompileErrorKind::Unclosed {
                open: group.delimiter.open_char(),
            },
            Span::new(group.start, end),
        ));
    }

    Ok(roots)
}
