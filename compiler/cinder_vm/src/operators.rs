//! Binary and unary operators.
//!
//! The value set is closed, so dispatch is a direct match on the operator
//! and the operand kinds.

use cinder_ir::Operator;
use cinder_value::{type_mismatch, RuntimeError, RuntimeResult, Value};

/// Apply a binary operator.
///
/// Arithmetic needs two numbers and follows IEEE semantics. Comparisons use
/// the total value order, so any two values compare. `And`/`Or` need
/// booleans.
pub fn evaluate_binary(op: Operator, left: &Value, right: &Value) -> RuntimeResult<Value> {
    match op {
        Operator::Add | Operator::Sub | Operator::Mul | Operator::Div | Operator::Mod => {
            let (a, b) = (number(left)?, number(right)?);
            Ok(Value::Number(eval_number_binary(op, a, b)))
        }
        Operator::Equal => Ok(Value::Bool(left == right)),
        Operator::NotEqual => Ok(Value::Bool(left != right)),
        Operator::LessThan => Ok(Value::Bool(left < right)),
        Operator::LessEqual => Ok(Value::Bool(left <= right)),
        Operator::GreaterThan => Ok(Value::Bool(left > right)),
        Operator::GreaterEqual => Ok(Value::Bool(left >= right)),
        Operator::And => Ok(Value::Bool(boolean(left)? && boolean(right)?)),
        Operator::Or => Ok(Value::Bool(boolean(left)? || boolean(right)?)),
        _ => Err(not_binary(op)),
    }
}

fn eval_number_binary(op: Operator, a: f64, b: f64) -> f64 {
    match op {
        Operator::Add => a + b,
        Operator::Sub => a - b,
        Operator::Mul => a * b,
        Operator::Div => a / b,
        _ => a % b,
    }
}

/// Apply `Negate` or `Not`.
pub fn evaluate_unary(op: Operator, value: &Value) -> RuntimeResult<Value> {
    match op {
        Operator::Negate => Ok(Value::Number(-number(value)?)),
        Operator::Not => Ok(Value::Bool(!boolean(value)?)),
        _ => Err(not_binary(op)),
    }
}

#[inline]
pub(crate) fn number(value: &Value) -> RuntimeResult<f64> {
    value
        .as_number()
        .ok_or_else(|| type_mismatch("number", value.type_name()))
}

#[inline]
fn boolean(value: &Value) -> RuntimeResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| type_mismatch("bool", value.type_name()))
}

#[cold]
fn not_binary(op: Operator) -> RuntimeError {
    RuntimeError::custom(format!("`{op}` is not an operator instruction"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_value::RuntimeErrorKind;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn test_arithmetic() {
        let cases = [
            (Operator::Add, 7.0),
            (Operator::Sub, 3.0),
            (Operator::Mul, 10.0),
            (Operator::Div, 2.5),
            (Operator::Mod, 1.0),
        ];
        for (op, expected) in cases {
            assert_eq!(evaluate_binary(op, &num(5.0), &num(2.0)), Ok(num(expected)));
        }
        assert_eq!(
            evaluate_binary(Operator::Div, &num(1.0), &num(0.0)),
            Ok(num(f64::INFINITY))
        );
    }

    #[test]
    fn test_arithmetic_rejects_non_numbers() {
        let error = evaluate_binary(Operator::Add, &num(1.0), &Value::string("a")).err();
        assert_eq!(
            error.map(|e| e.kind),
            Some(RuntimeErrorKind::TypeMismatch {
                expected: "number",
                found: "string"
            })
        );
    }

    #[test]
    fn test_comparisons_use_total_order() {
        let lt = |a: &Value, b: &Value| evaluate_binary(Operator::LessThan, a, b);
        assert_eq!(lt(&num(1.0), &num(2.0)), Ok(Value::TRUE));
        assert_eq!(lt(&Value::Null, &num(-1.0)), Ok(Value::TRUE));
        assert_eq!(lt(&Value::string("b"), &Value::string("a")), Ok(Value::FALSE));
        assert_eq!(
            evaluate_binary(
                Operator::Equal,
                &Value::array(vec![num(1.0)]),
                &Value::array(vec![num(1.0)])
            ),
            Ok(Value::TRUE)
        );
    }

    #[test]
    fn test_boolean_ops() {
        assert_eq!(
            evaluate_binary(Operator::And, &Value::TRUE, &Value::FALSE),
            Ok(Value::FALSE)
        );
        assert_eq!(
            evaluate_binary(Operator::Or, &Value::FALSE, &Value::TRUE),
            Ok(Value::TRUE)
        );
        assert!(evaluate_binary(Operator::Or, &Value::FALSE, &num(1.0)).is_err());
        assert_eq!(evaluate_unary(Operator::Not, &Value::TRUE), Ok(Value::FALSE));
        assert_eq!(evaluate_unary(Operator::Negate, &num(2.0)), Ok(num(-2.0)));
    }
}
