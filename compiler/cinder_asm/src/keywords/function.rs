//! `(function [name] (params...) body...)`

use cinder_diagnostic::{CompileErrorKind, CompileResult};
use cinder_ir::Operator;
use cinder_lexer::{Token, TokenKind};
use cinder_value::{Capture, FunctionValue, Value, ANONYMOUS};

use crate::assembler::Assembler;
use crate::emit::{op_with, push, Code};

/// The parts of a function form.
struct Signature<'t> {
    name: Option<&'t str>,
    parameters: Vec<String>,
    body: &'t [Token],
}

impl Assembler<'_> {
    /// A nested or anonymous function literal.
    ///
    /// Named literals also bind their name in the current runtime scope.
    pub(super) fn lower_function(&mut self, token: &Token, args: &[Token]) -> CompileResult<Code> {
        let signature = self.signature(token, args)?;
        let name = signature.name.unwrap_or(ANONYMOUS);
        let function =
            self.compile_function(name, signature.parameters, signature.body, Capture::Lexical)?;

        let mut code = vec![push(Value::Function(function), token.span)];
        if let Some(name) = signature.name {
            code.push(op_with(Operator::Define, Value::variable(name), token.span));
        }
        Ok(code)
    }

    /// Compile a root-level named function and bind it as a constant.
    ///
    /// Returns `None` when `token` is not a named function form.
    pub(crate) fn hoisted_function(
        &mut self,
        token: &Token,
    ) -> CompileResult<Option<(String, FunctionValue)>> {
        let Some([head, args @ ..]) = token.as_expression() else {
            return Ok(None);
        };
        if head.as_variable() != Some("function") {
            return Ok(None);
        }
        let Some(name) = args.first().and_then(Token::as_variable) else {
            return Ok(None);
        };
        if self.consts.contains_local(name) {
            return Err(self.error(
                CompileErrorKind::ConstantRedefined(name.to_owned()),
                args[0].span,
            ));
        }

        let signature = self.signature(token, args)?;

        let function =
            self.compile_function(name, signature.parameters, signature.body, Capture::Global)?;
        // The const scope is private to this compile and never frozen.
        let _ = self.consts.define(name, Value::Function(function.clone()));
        Ok(Some((name.to_owned(), function)))
    }

    fn signature<'t>(&self, token: &Token, args: &'t [Token]) -> CompileResult<Signature<'t>> {
        let (name, rest) = match args.split_first() {
            Some((first, rest)) if first.as_variable().is_some() => {
                (Some(self.assignable_name(first)?), rest)
            }
            _ => (None, args),
        };
        let Some((params, body)) = rest.split_first() else {
            return Err(self.arity_error("function", "a parameter list and a body", token));
        };

        let list = match &params.kind {
            TokenKind::Expression(items) | TokenKind::List(items) => items,
            _ => {
                return Err(self.error(
                    CompileErrorKind::Expected {
                        expected: "a parameter list".to_owned(),
                        found: params.describe(),
                    },
                    params.span,
                ))
            }
        };

        let mut parameters: Vec<String> = Vec::with_capacity(list.len());
        for (i, param) in list.iter().enumerate() {
            let raw = param.as_variable().unwrap_or_default();
            let (bare, variadic) = match raw.strip_prefix("...") {
                Some(bare) => (bare, true),
                None => (raw, false),
            };
            let valid = !bare.is_empty()
                && !bare.starts_with(':')
                && !bare.contains('.')
                && !bare.starts_with("...");
            if !valid {
                return Err(self.error(
                    CompileErrorKind::InvalidAssignTarget(param.describe()),
                    param.span,
                ));
            }
            if variadic && i + 1 != list.len() {
                return Err(self.error(
                    CompileErrorKind::VariadicNotLast(bare.to_owned()),
                    param.span,
                ));
            }
            if self.is_constant_name(bare) {
                return Err(self.error(
                    CompileErrorKind::AssignToConstant(bare.to_owned()),
                    param.span,
                ));
            }
            let duplicate = parameters
                .iter()
                .any(|p| p.strip_prefix("...").unwrap_or(p) == bare);
            if duplicate {
                return Err(self.error(
                    CompileErrorKind::DuplicateParameter(bare.to_owned()),
                    param.span,
                ));
            }
            parameters.push(raw.to_owned());
        }

        Ok(Signature {
            name,
            parameters,
            body,
        })
    }
}
