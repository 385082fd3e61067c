//! Raw tokens produced by logos.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"(\s|;[^\n]*)+")]
pub(crate) enum RawToken {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    // Quoted text; a missing closing quote extends to end of input.
    #[regex(r#""([^"\\]|\\[\s\S])*"?"#)]
    DoubleQuoted,
    #[regex(r#"'([^'\\]|\\[\s\S])*'?"#)]
    SingleQuoted,

    #[regex(r#"[^\s()\[\]{};"']+"#)]
    Word,
}

/// Bracket pair of a container token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delimiter {
    Paren,
    Bracket,
    Brace,
}

impl Delimiter {
    pub(crate) fn open_char(self) -> char {
        match self {
            Delimiter::Paren => '(',
            Delimiter::Bracket => '[',
            Delimiter::Brace => '{',
        }
    }

    pub(crate) fn close_char(self) -> char {
        match self {
            Delimiter::Paren => ')',
            Delimiter::Bracket => ']',
            Delimiter::Brace => '}',
        }
    }
}

impl RawToken {
    pub(crate) fn opens(self) -> Option<Delimiter> {
        match self {
            RawToken::LParen => Some(Delimiter::Paren),
            RawToken::LBracket => Some(Delimiter::Bracket),
            RawToken::LBrace => Some(Delimiter::Brace),
            _ => None,
        }
    }

    pub(crate) fn closes(self) -> Option<Delimiter> {
        match self {
            RawToken::RParen => Some(Delimiter::Paren),
            RawToken::RBracket => Some(Delimiter::Bracket),
            RawToken::RBrace => Some(Delimiter::Brace),
            _ => None,
        }
    }
}
