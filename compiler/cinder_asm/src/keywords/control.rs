//! Control flow forms, desugared into labels and jumps.

use cinder_diagnostic::{CompileErrorKind, CompileResult};
use cinder_ir::Operator;
use cinder_lexer::Token;
use cinder_value::Value;

use crate::assembler::{Assembler, LoopLabels};
use crate::emit::{as_constant, is_literal_true, label, op, op_with, Code, Temp};

/// One arm of a `switch`; `None` conditions always match.
struct Clause {
    condition: Option<Code>,
    body: Code,
}

impl Assembler<'_> {
    /// `(loop cond body...)`
    ///
    /// ```text
    /// :start  cond  JumpFalse :end  body  Jump :start  :end
    /// ```
    pub(super) fn lower_loop(&mut self, token: &Token, args: &[Token]) -> CompileResult<Code> {
        let Some((condition, body)) = args.split_first() else {
            return Err(self.arity_error("loop", "at least 1", token));
        };
        let labels = LoopLabels {
            start: self.fresh_label("loop_start"),
            end: self.fresh_label("loop_end"),
        };

        let mut code = vec![label(labels.start.clone(), token.span)];
        let condition = self.lower(condition)?;
        if !is_literal_true(&condition) {
            code.extend(condition);
            code.push(jump_to(Operator::JumpFalse, &labels.end, token));
        }

        self.context().loops.push(labels.clone());
        let body = self.lower_block(body);
        self.context().loops.pop();
        code.extend(body?);

        code.push(jump_to(Operator::Jump, &labels.start, token));
        code.push(label(labels.end, token.span));
        Ok(code)
    }

    /// `(continue)` / `(break)`
    pub(super) fn lower_loop_exit(
        &mut self,
        form: &str,
        token: &Token,
        args: &[Token],
    ) -> CompileResult<Code> {
        if !args.is_empty() {
            return Err(self.arity_error(form, "0", token));
        }
        let innermost = self.context().loops.last().cloned();
        let Some(labels) = innermost else {
            return Err(self.error(CompileErrorKind::OutsideLoop(form.to_owned()), token.span));
        };
        let target = if form == "continue" {
            labels.start
        } else {
            labels.end
        };
        Ok(vec![jump_to(Operator::Jump, &target, token)])
    }

    /// `(if cond then [else])` and `(unless cond then [else])`.
    ///
    /// Both are a two-clause switch; `unless` branches on `true` instead.
    pub(super) fn lower_if(
        &mut self,
        form: &str,
        branch: Operator,
        token: &Token,
        args: &[Token],
    ) -> CompileResult<Code> {
        let (condition, then, otherwise) = match args {
            [condition, then] => (condition, then, None),
            [condition, then, otherwise] => (condition, then, Some(otherwise)),
            _ => return Err(self.arity_error(form, "2 or 3", token)),
        };

        let mut clauses = vec![Clause {
            condition: Some(self.lower(condition)?),
            body: self.lower(then)?,
        }];
        if let Some(otherwise) = otherwise {
            clauses.push(Clause {
                condition: None,
                body: self.lower(otherwise)?,
            });
        }
        Ok(self.emit_clauses(branch, clauses, token))
    }

    /// `(switch (cond body...) ...)`: the first matching clause runs.
    pub(super) fn lower_switch(&mut self, token: &Token, args: &[Token]) -> CompileResult<Code> {
        if args.is_empty() {
            return Err(self.arity_error("switch", "at least 1", token));
        }

        let mut clauses = Vec::with_capacity(args.len());
        for arg in args {
            let Some((condition, body)) = arg.as_expression().and_then(<[Token]>::split_first)
            else {
                return Err(self.error(
                    CompileErrorKind::Expected {
                        expected: "a `(condition body...)` clause".to_owned(),
                        found: arg.describe(),
                    },
                    arg.span,
                ));
            };
            clauses.push(Clause {
                condition: Some(self.lower(condition)?),
                body: self.lower_block(body)?,
            });
        }
        Ok(self.emit_clauses(Operator::JumpFalse, clauses, token))
    }

    fn emit_clauses(&mut self, branch: Operator, clauses: Vec<Clause>, token: &Token) -> Code {
        let end = self.fresh_label("switch_end");
        let last = clauses.len().saturating_sub(1);
        let always = Value::Bool(branch == Operator::JumpFalse);

        let mut code = Code::new();
        for (i, clause) in clauses.into_iter().enumerate() {
            let next = if i == last {
                end.clone()
            } else {
                self.fresh_label("switch_next")
            };

            if let Some(condition) = clause.condition {
                if as_constant(&condition) != Some(&always) {
                    code.extend(condition);
                    code.push(jump_to(branch, &next, token));
                }
            }
            code.extend(clause.body);
            if i != last {
                code.push(jump_to(Operator::Jump, &end, token));
                code.push(label(next, token.span));
            }
        }
        code.push(label(end, token.span));
        code
    }

    /// `(jump target)`: immediate when the target is a known label,
    /// otherwise the label is popped at run time.
    pub(super) fn lower_jump(&mut self, token: &Token, args: &[Token]) -> CompileResult<Code> {
        let [target] = args else {
            return Err(self.arity_error("jump", "1", token));
        };
        let mut code = self.lower(target)?;
        match as_constant(&code) {
            Some(value) if value.is_label() => {
                Ok(vec![op_with(Operator::Jump, value.clone(), token.span)])
            }
            Some(value) => Err(self.error(
                CompileErrorKind::InvalidJumpTarget(value.to_string()),
                target.span,
            )),
            None => {
                code.push(op(Operator::Jump, token.span));
                Ok(code)
            }
        }
    }

    /// `(return values...)`
    pub(super) fn lower_return(&mut self, token: &Token, args: &[Token]) -> CompileResult<Code> {
        let mut code = self.lower_block(args)?;
        code.push(op(Operator::Return, token.span));
        Ok(code)
    }
}

fn jump_to(op: Operator, target: &str, token: &Token) -> Temp {
    op_with(op, Value::variable(target), token.span)
}
