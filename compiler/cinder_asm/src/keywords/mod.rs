//! Keyword forms.
//!
//! Keywords are recognized by the head of an expression before any call
//! resolution, so they cannot be shadowed by builtins.

mod bindings;
mod control;
mod function;
mod operators;

use cinder_diagnostic::CompileResult;
use cinder_ir::Operator;
use cinder_lexer::Token;

use crate::assembler::Assembler;
use crate::emit::Code;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Keyword {
    Function,
    Set,
    Define,
    Const,
    Loop,
    Continue,
    Break,
    If,
    Unless,
    Switch,
    Jump,
    Return,
    /// `+ - * / %`
    Arithmetic(Operator),
    /// `== != < <= > >=`
    Compare(Operator),
    /// `&& ||`
    Logic(Operator),
    Not,
    Concat,
    Inc,
    Dec,
    /// `+= -= *= /= %= $=`, carrying the underlying form's name.
    Compound(&'static str),
}

impl Keyword {
    pub(crate) fn from_name(name: &str) -> Option<Keyword> {
        let keyword = match name {
            "function" => Keyword::Function,
            "set" => Keyword::Set,
            "define" => Keyword::Define,
            "const" => Keyword::Const,
            "loop" => Keyword::Loop,
            "continue" => Keyword::Continue,
            "break" => Keyword::Break,
            "if" => Keyword::If,
            "unless" => Keyword::Unless,
            "switch" => Keyword::Switch,
            "jump" => Keyword::Jump,
            "return" => Keyword::Return,
            "+" => Keyword::Arithmetic(Operator::Add),
            "-" => Keyword::Arithmetic(Operator::Sub),
            "*" => Keyword::Arithmetic(Operator::Mul),
            "/" => Keyword::Arithmetic(Operator::Div),
            "%" => Keyword::Arithmetic(Operator::Mod),
            "==" => Keyword::Compare(Operator::Equal),
            "!=" => Keyword::Compare(Operator::NotEqual),
            "<" => Keyword::Compare(Operator::LessThan),
            "<=" => Keyword::Compare(Operator::LessEqual),
            ">" => Keyword::Compare(Operator::GreaterThan),
            ">=" => Keyword::Compare(Operator::GreaterEqual),
            "&&" => Keyword::Logic(Operator::And),
            "||" => Keyword::Logic(Operator::Or),
            "!" => Keyword::Not,
            "$" => Keyword::Concat,
            "++" => Keyword::Inc,
            "--" => Keyword::Dec,
            "+=" => Keyword::Compound("+"),
            "-=" => Keyword::Compound("-"),
            "*=" => Keyword::Compound("*"),
            "/=" => Keyword::Compound("/"),
            "%=" => Keyword::Compound("%"),
            "$=" => Keyword::Compound("$"),
            _ => return None,
        };
        Some(keyword)
    }
}

impl Assembler<'_> {
    /// Expand a keyword form. `token` is the whole expression.
    pub(crate) fn lower_keyword(
        &mut self,
        keyword: Keyword,
        token: &Token,
        args: &[Token],
    ) -> CompileResult<Code> {
        match keyword {
            Keyword::Function => self.lower_function(token, args),
            Keyword::Set => self.lower_assignment(Operator::Set, token, args),
            Keyword::Define => self.lower_assignment(Operator::Define, token, args),
            Keyword::Const => self.lower_const(token, args),
            Keyword::Loop => self.lower_loop(token, args),
            Keyword::Continue => self.lower_loop_exit("continue", token, args),
            Keyword::Break => self.lower_loop_exit("break", token, args),
            Keyword::If => self.lower_if("if", Operator::JumpFalse, token, args),
            Keyword::Unless => self.lower_if("unless", Operator::JumpTrue, token, args),
            Keyword::Switch => self.lower_switch(token, args),
            Keyword::Jump => self.lower_jump(token, args),
            Keyword::Return => self.lower_return(token, args),
            Keyword::Arithmetic(op) => self.lower_arithmetic(op, token, args),
            Keyword::Compare(op) => self.lower_compare(op, token, args),
            Keyword::Logic(op) => self.lower_logic(op, token, args),
            Keyword::Not => self.lower_not(token, args),
            Keyword::Concat => self.lower_concat(token, args),
            Keyword::Inc => self.lower_step(Operator::Inc, token, args),
            Keyword::Dec => self.lower_step(Operator::Dec, token, args),
            Keyword::Compound(form) => self.lower_compound(form, token, args),
        }
    }
}
