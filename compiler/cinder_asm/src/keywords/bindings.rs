//! `set`, `define`, `const`, `++`, `--` and compound assignment.

use cinder_diagnostic::{CompileErrorKind, CompileResult};
use cinder_ir::Operator;
use cinder_lexer::{Token, TokenKind};
use cinder_value::Value;

use crate::assembler::Assembler;
use crate::emit::{as_constant, op_with, Code};

impl Assembler<'_> {
    /// `(set a b ... value)`: the value is lowered once, then each target
    /// takes one value from the stack, last target first.
    pub(super) fn lower_assignment(
        &mut self,
        op: Operator,
        token: &Token,
        args: &[Token],
    ) -> CompileResult<Code> {
        let Some((value, targets)) = args.split_last().filter(|(_, t)| !t.is_empty()) else {
            return Err(self.arity_error(op_form(op), "at least 2", token));
        };

        let mut names = Vec::with_capacity(targets.len());
        for target in targets {
            names.push(self.assignable_name(target)?);
        }

        let mut code = self.lower(value)?;
        for (name, target) in names.iter().zip(targets).rev() {
            code.push(op_with(op, Value::variable(*name), target.span));
        }
        Ok(code)
    }

    /// `(const name value)`: binds `name` at compile time. Emits nothing.
    pub(super) fn lower_const(&mut self, token: &Token, args: &[Token]) -> CompileResult<Code> {
        let [target, value] = args else {
            return Err(self.arity_error("const", "2", token));
        };
        let Some(name) = target.as_variable() else {
            return Err(self.error(
                CompileErrorKind::InvalidAssignTarget(target.describe()),
                target.span,
            ));
        };
        if self.consts.contains_local(name) {
            return Err(self.error(
                CompileErrorKind::ConstantRedefined(name.to_owned()),
                target.span,
            ));
        }
        let name = self.assignable_name(target)?;

        let code = self.lower(value)?;
        let Some(constant) = as_constant(&code) else {
            return Err(self.error(
                CompileErrorKind::NotConstant(name.to_owned()),
                value.span,
            ));
        };
        let _ = self.consts.define(name, constant.clone());
        Ok(Code::new())
    }

    /// `(++ name)` / `(-- name)`
    pub(super) fn lower_step(
        &mut self,
        op: Operator,
        token: &Token,
        args: &[Token],
    ) -> CompileResult<Code> {
        let [target] = args else {
            return Err(self.arity_error(op_form(op), "1", token));
        };
        let name = self.assignable_name(target)?;
        Ok(vec![op_with(op, Value::variable(name), token.span)])
    }

    /// `(+= name rhs)` is `(set name (+ name rhs))`.
    pub(super) fn lower_compound(
        &mut self,
        form: &str,
        token: &Token,
        args: &[Token],
    ) -> CompileResult<Code> {
        let [target, rhs] = args else {
            return Err(self.arity_error(&format!("{form}="), "2", token));
        };
        self.assignable_name(target)?;

        let synth = |kind| Token::new(kind, token.span);
        let operation = synth(TokenKind::Expression(vec![
            Token::new(TokenKind::Value(Value::variable(form)), token.span),
            target.clone(),
            rhs.clone(),
        ]));
        let rewritten = synth(TokenKind::Expression(vec![
            Token::new(TokenKind::Value(Value::variable("set")), token.span),
            target.clone(),
            operation,
        ]));
        self.lower(&rewritten)
    }
}

fn op_form(op: Operator) -> &'static str {
    match op {
        Operator::Define => "define",
        Operator::Inc => "++",
        Operator::Dec => "--",
        _ => "set",
    }
}
