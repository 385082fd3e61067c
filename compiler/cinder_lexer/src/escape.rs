//! Escape sequences in quoted text.
//!
//! Recognized escapes: `\"`, `\'`, `\\`, `\t`, `\r`, `\n`. Anything else
//! after a backslash is kept literally, backslash included.

#[inline]
fn resolve_escape(c: char) -> Option<char> {
    match c {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => None,
    }
}

/// Resolve the escapes in the body of a quoted string.
pub fn unescape(body: &str) -> String {
    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some(esc) => match resolve_escape(esc) {
                Some(resolved) => result.push(resolved),
                None => {
                    result.push('\\');
                    result.push(esc);
                }
            },
            None => result.push('\\'),
        }
    }

    result
}

/// Strip the quotes from a quoted slice and resolve its escapes.
///
/// The closing quote may be missing when the literal ran to end of input.
pub(crate) fn quoted_body(slice: &str, quote: char) -> String {
    let inner = slice.strip_prefix(quote).unwrap_or(slice);
    let inner = match inner.strip_suffix(quote) {
        // `"\"` is an escaped quote with no terminator, not a closed literal.
        Some(body) if !ends_with_escape(body) => body,
        _ => inner,
    };
    unescape(inner)
}

/// Does `body` end in an unpaired backslash?
fn ends_with_escape(body: &str) -> bool {
    body.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_escapes() {
        assert_eq!(unescape(r#"a\tb\nc\\d\"e\'f\rg"#), "a\tb\nc\\d\"e'f\rg");
    }

    #[test]
    fn test_unknown_escape_preserved() {
        assert_eq!(unescape(r"\q\x"), r"\q\x");
        assert_eq!(unescape("end\\"), "end\\");
    }

    #[test]
    fn test_quoted_body() {
        assert_eq!(quoted_body(r#""hi""#, '"'), "hi");
        assert_eq!(quoted_body(r#""say \"x\"""#, '"'), "say \"x\"");
        assert_eq!(quoted_body("'open", '\''), "open");
        assert_eq!(quoted_body(r#""tail\""#, '"'), "tail\"");
        assert_eq!(quoted_body(r#""""#, '"'), "");
        assert_eq!(quoted_body("\"", '"'), "");
    }
}
