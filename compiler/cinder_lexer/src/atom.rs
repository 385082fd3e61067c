//! Atom classification.

use cinder_value::Value;

/// Classify a bare word: number, `true`/`false`, `null`, else variable.
///
/// A word is only a number when it starts like one: a digit, or a sign
/// and/or `.` followed by a digit. This keeps `inf`, `NaN` and `-` names.
pub fn classify_word(word: &str) -> Value {
    if starts_numeric(word) {
        if let Ok(n) = word.parse::<f64>() {
            return Value::Number(n);
        }
    }
    match word {
        "true" => Value::TRUE,
        "false" => Value::FALSE,
        "null" => Value::Null,
        _ => Value::variable(word),
    }
}

fn starts_numeric(word: &str) -> bool {
    let rest = word.strip_prefix(['-', '+']).unwrap_or(word);
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    rest.starts_with(|c: char| c.is_ascii_digit())
}
