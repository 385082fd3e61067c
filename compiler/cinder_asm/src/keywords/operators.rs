//! Arithmetic, comparison, boolean and string operators.

use cinder_diagnostic::CompileResult;
use cinder_ir::Operator;
use cinder_lexer::Token;
use cinder_value::Value;

use crate::assembler::Assembler;
use crate::emit::{self, as_constant, count, op_with, push, Code};

impl Assembler<'_> {
    /// `(+ a b c ...)` folds left to right: `((a + b) + c) ...`.
    ///
    /// `(- a)` negates. Literal numbers fold completely; otherwise any right
    /// operand known at compile time becomes the instruction's immediate.
    pub(super) fn lower_arithmetic(
        &mut self,
        op: Operator,
        token: &Token,
        args: &[Token],
    ) -> CompileResult<Code> {
        if let (Operator::Sub, [operand]) = (op, args) {
            let code = self.lower(operand)?;
            return Ok(match as_constant(&code).and_then(Value::as_number) {
                Some(n) => vec![push(Value::Number(-n), token.span)],
                None => {
                    let mut code = code;
                    code.push(emit::op(Operator::Negate, token.span));
                    code
                }
            });
        }
        if args.len() < 2 {
            return Err(self.arity_error(symbol(op), "at least 2", token));
        }

        let mut operands = Vec::with_capacity(args.len());
        for arg in args {
            operands.push(self.lower(arg)?);
        }

        let numbers: Option<Vec<f64>> = operands
            .iter()
            .map(|code| as_constant(code).and_then(Value::as_number))
            .collect();
        if let Some(numbers) = numbers {
            let folded = numbers
                .into_iter()
                .reduce(|lhs, rhs| fold(op, lhs, rhs))
                .unwrap_or_default();
            return Ok(vec![push(Value::Number(folded), token.span)]);
        }

        Ok(chain(op, operands, token))
    }

    /// `(< a b)`; folds when both sides are known.
    pub(super) fn lower_compare(
        &mut self,
        op: Operator,
        token: &Token,
        args: &[Token],
    ) -> CompileResult<Code> {
        let [lhs, rhs] = args else {
            return Err(self.arity_error(symbol(op), "2", token));
        };
        let lhs = self.lower(lhs)?;
        let rhs = self.lower(rhs)?;

        if let (Some(a), Some(b)) = (as_constant(&lhs), as_constant(&rhs)) {
            let result = match op {
                Operator::Equal => a == b,
                Operator::NotEqual => a != b,
                Operator::LessThan => a < b,
                Operator::LessEqual => a <= b,
                Operator::GreaterThan => a > b,
                _ => a >= b,
            };
            return Ok(vec![push(Value::Bool(result), token.span)]);
        }
        Ok(chain(op, vec![lhs, rhs], token))
    }

    /// `(&& a b ...)` / `(|| a b ...)`. Every operand is evaluated.
    pub(super) fn lower_logic(
        &mut self,
        op: Operator,
        token: &Token,
        args: &[Token],
    ) -> CompileResult<Code> {
        if args.len() < 2 {
            return Err(self.arity_error(symbol(op), "at least 2", token));
        }
        let mut operands = Vec::with_capacity(args.len());
        for arg in args {
            operands.push(self.lower(arg)?);
        }
        Ok(chain(op, operands, token))
    }

    pub(super) fn lower_not(&mut self, token: &Token, args: &[Token]) -> CompileResult<Code> {
        let [operand] = args else {
            return Err(self.arity_error("!", "1", token));
        };
        let mut code = self.lower(operand)?;
        if let Some(Value::Bool(b)) = as_constant(&code) {
            return Ok(vec![push(Value::Bool(!b), token.span)]);
        }
        code.push(emit::op(Operator::Not, token.span));
        Ok(code)
    }

    /// `($ a b ...)` concatenates the display text of its operands.
    pub(super) fn lower_concat(&mut self, token: &Token, args: &[Token]) -> CompileResult<Code> {
        let mut operands = Vec::with_capacity(args.len());
        for arg in args {
            operands.push(self.lower(arg)?);
        }

        let texts: Option<String> = operands
            .iter()
            .map(|code| as_constant(code).map(Value::display_value))
            .collect();
        if let Some(text) = texts {
            return Ok(vec![push(Value::string(text), token.span)]);
        }

        let mut code: Code = operands.into_iter().flatten().collect();
        code.push(op_with(
            Operator::StringConcat,
            count(args.len()),
            token.span,
        ));
        Ok(code)
    }
}

/// Emit `a b OP c OP ...`, moving constant right operands into immediates.
fn chain(op: Operator, operands: Vec<Code>, token: &Token) -> Code {
    let mut operands = operands.into_iter();
    let mut code = operands.next().unwrap_or_default();
    for operand in operands {
        match as_constant(&operand).cloned() {
            Some(value) => code.push(op_with(op, value, token.span)),
            None => {
                code.extend(operand);
                code.push(emit::op(op, token.span));
            }
        }
    }
    code
}

fn fold(op: Operator, lhs: f64, rhs: f64) -> f64 {
    match op {
        Operator::Add => lhs + rhs,
        Operator::Sub => lhs - rhs,
        Operator::Mul => lhs * rhs,
        Operator::Div => lhs / rhs,
        _ => lhs % rhs,
    }
}

/// Source spelling, for diagnostics.
fn symbol(op: Operator) -> &'static str {
    match op {
        Operator::Add => "+",
        Operator::Sub => "-",
        Operator::Mul => "*",
        Operator::Div => "/",
        Operator::Mod => "%",
        Operator::Equal => "==",
        Operator::NotEqual => "!=",
        Operator::LessThan => "<",
        Operator::LessEqual => "<=",
        Operator::GreaterThan => ">",
        Operator::GreaterEqual => ">=",
        Operator::And => "&&",
        Operator::Or => "||",
        other => other.name(),
    }
}
