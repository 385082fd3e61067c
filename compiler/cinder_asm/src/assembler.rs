//! Recursive lowering of the token tree.

use std::collections::BTreeMap;

use cinder_diagnostic::{CompileError, CompileErrorKind, CompileResult};
use cinder_ir::{Operator, SourceFile, Span};
use cinder_lexer::{Token, TokenKind};
use cinder_stack::ensure_sufficient_stack;
use cinder_value::{Capture, FunctionValue, PathSegment, Scope, Script, Value};

use crate::emit::{self, as_constant, count, op, op_with, push, Code};
use crate::keywords::Keyword;

/// Name of the function holding a script's top-level code.
pub const GLOBAL_FUNCTION: &str = "global";

/// Start and end labels of an enclosing loop.
#[derive(Clone, Debug)]
pub(crate) struct LoopLabels {
    pub(crate) start: String,
    pub(crate) end: String,
}

/// Per-function lowering state.
#[derive(Default)]
pub(crate) struct FunctionContext {
    pub(crate) loops: Vec<LoopLabels>,
}

/// Lowers the token tree of one source file into a [`Script`].
///
/// Names are resolved against a const scope chained onto the host's
/// builtin scope: known values are folded into immediates and known
/// callables become direct calls.
pub struct Assembler<'a> {
    pub(crate) file: &'a SourceFile,
    builtins: Scope,
    pub(crate) consts: Scope,
    pub(crate) contexts: Vec<FunctionContext>,
    next_label: usize,
}

impl<'a> Assembler<'a> {
    pub fn new(file: &'a SourceFile, builtins: &Scope) -> Self {
        Assembler {
            file,
            builtins: builtins.clone(),
            consts: Scope::with_parent(builtins),
            contexts: Vec::new(),
            next_label: 0,
        }
    }

    /// Lower all root tokens into the script's global function.
    ///
    /// Root-level named functions are hoisted: they become constants for
    /// every later use site, and a prologue defines them in the global
    /// scope so forward and recursive references resolve at run time.
    #[tracing::instrument(level = "debug", skip_all, fields(source = self.file.name()))]
    pub fn assemble(mut self, roots: &[Token]) -> CompileResult<Script> {
        self.contexts.push(FunctionContext::default());
        let mut prologue = Code::new();
        let mut body = Code::new();

        for token in roots {
            if let Some((name, function)) = self.hoisted_function(token)? {
                prologue.push(push(Value::Function(function), token.span));
                prologue.push(op_with(Operator::Define, Value::variable(name), token.span));
            } else {
                body.extend(self.lower(token)?);
            }
        }
        self.contexts.pop();

        prologue.extend(body);
        let main = emit::finish(self.file, GLOBAL_FUNCTION, Vec::new(), prologue)?;
        tracing::debug!(instructions = main.code().len(), "assembled");
        Ok(Script::new(main, self.builtins))
    }

    // Helpers

    pub(crate) fn error(&self, kind: CompileErrorKind, span: Span) -> CompileError {
        CompileError::new(kind, span).with_source(self.file)
    }

    pub(crate) fn arity_error(&self, form: &str, expected: &str, token: &Token) -> CompileError {
        let found = token.as_expression().map_or(0, |c| c.len().saturating_sub(1));
        self.error(
            CompileErrorKind::WrongArgumentCount {
                form: form.to_owned(),
                expected: expected.to_owned(),
                found,
            },
            token.span,
        )
    }

    /// A label no source text can collide with by accident.
    pub(crate) fn fresh_label(&mut self, hint: &str) -> String {
        self.next_label += 1;
        format!(":__{hint}{}", self.next_label)
    }

    pub(crate) fn context(&mut self) -> &mut FunctionContext {
        if self.contexts.is_empty() {
            self.contexts.push(FunctionContext::default());
        }
        let last = self.contexts.len() - 1;
        &mut self.contexts[last]
    }

    /// Is `name` bound at compile time, either as a const or a builtin?
    pub(crate) fn is_constant_name(&self, name: &str) -> bool {
        self.consts.get(name).is_some()
    }

    /// A plain variable name that may be written to at run time.
    pub(crate) fn assignable_name<'t>(&self, token: &'t Token) -> CompileResult<&'t str> {
        let name = token
            .as_variable()
            .filter(|name| {
                !name.starts_with(':') && !name.starts_with("...") && !name.contains('.')
            })
            .ok_or_else(|| {
                self.error(
                    CompileErrorKind::InvalidAssignTarget(token.describe()),
                    token.span,
                )
            })?;
        if self.is_constant_name(name) {
            return Err(self.error(
                CompileErrorKind::AssignToConstant(name.to_owned()),
                token.span,
            ));
        }
        Ok(name)
    }

    /// Resolve a name fully at compile time, following dotted properties.
    pub(crate) fn resolve_constant(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.consts.get(name) {
            return Some(value);
        }
        let (parent, path) = split_path(name)?;
        let value = self.consts.get(parent)?;
        value.get_path(&path).ok().cloned()
    }

    // Lowering

    /// Lower one token.
    pub(crate) fn lower(&mut self, token: &Token) -> CompileResult<Code> {
        ensure_sufficient_stack(|| match &token.kind {
            TokenKind::Value(value) => self.lower_value(value, token.span),
            TokenKind::List(items) => self.lower_list(items, token.span),
            TokenKind::Map(entries) => self.lower_map(entries, token.span),
            TokenKind::Expression(children) => self.lower_expression(token, children),
        })
    }

    /// Lower a sequence of statements in order.
    pub(crate) fn lower_block(&mut self, tokens: &[Token]) -> CompileResult<Code> {
        let mut code = Code::new();
        for token in tokens {
            code.extend(self.lower(token)?);
        }
        Ok(code)
    }

    fn lower_value(&mut self, value: &Value, span: Span) -> CompileResult<Code> {
        match value.as_variable() {
            Some(name) if !value.is_label() => Ok(self.lower_variable(name, span)),
            _ => Ok(vec![push(value.clone(), span)]),
        }
    }

    /// Lower a variable read, folding whatever is known at compile time.
    pub(crate) fn lower_variable(&mut self, name: &str, span: Span) -> Code {
        if let Some(inner) = name.strip_prefix("...").filter(|inner| !inner.is_empty()) {
            let mut code = self.lower_variable(inner, span);
            code.push(op(Operator::ToArgument, span));
            return code;
        }

        if let Some(value) = self.consts.get(name) {
            return vec![push(value, span)];
        }

        let Some((parent, path)) = split_path(name) else {
            return vec![op_with(Operator::Get, Value::variable(name), span)];
        };

        let mut code = Code::new();
        let mut remaining: &[PathSegment] = &path;
        match self.consts.get(parent) {
            Some(mut value) => {
                while let Some((segment, rest)) = remaining.split_first() {
                    let Some(next) = value.property(segment).cloned() else {
                        break;
                    };
                    value = next;
                    remaining = rest;
                }
                code.push(push(value, span));
            }
            None => code.push(op_with(Operator::Get, Value::variable(parent), span)),
        }
        if !remaining.is_empty() {
            let path = remaining.iter().map(PathSegment::to_value).collect();
            code.push(op_with(Operator::GetProperty, Value::array(path), span));
        }
        code
    }

    fn lower_list(&mut self, items: &[Token], span: Span) -> CompileResult<Code> {
        let mut parts = Vec::with_capacity(items.len());
        for item in items {
            parts.push(self.lower(item)?);
        }

        let constants: Option<Vec<Value>> =
            parts.iter().map(|code| as_constant(code).cloned()).collect();
        if let Some(values) = constants {
            return Ok(vec![push(Value::array(values), span)]);
        }

        let mut code: Code = parts.into_iter().flatten().collect();
        code.push(op_with(Operator::MakeArray, count(items.len()), span));
        Ok(code)
    }

    fn lower_map(&mut self, entries: &[Token], span: Span) -> CompileResult<Code> {
        if entries.len() % 2 == 1 {
            let key = &entries[entries.len() - 1];
            return Err(self.error(CompileErrorKind::MissingMapValue, key.span));
        }

        let mut pairs = Vec::with_capacity(entries.len() / 2);
        for pair in entries.chunks_exact(2) {
            let (key, value) = (&pair[0], &pair[1]);
            let key_text = match key.as_value() {
                Some(Value::String(text)) => (**text).clone(),
                Some(Value::Variable(name)) if !name.starts_with(':') => (**name).clone(),
                _ => {
                    return Err(
                        self.error(CompileErrorKind::InvalidMapKey(key.describe()), key.span)
                    )
                }
            };
            pairs.push((key_text, key.span, self.lower(value)?));
        }

        let constants: Option<BTreeMap<String, Value>> = pairs
            .iter()
            .map(|(key, _, code)| as_constant(code).map(|v| (key.clone(), v.clone())))
            .collect();
        if let Some(map) = constants {
            return Ok(vec![push(Value::object(map), span)]);
        }

        let count_pairs = pairs.len();
        let mut code = Code::new();
        for (key, key_span, value) in pairs {
            code.push(push(Value::string(key), key_span));
            code.extend(value);
        }
        code.push(op_with(Operator::MakeObject, count(count_pairs), span));
        Ok(code)
    }

    fn lower_expression(&mut self, token: &Token, children: &[Token]) -> CompileResult<Code> {
        let Some((head, args)) = children.split_first() else {
            return Ok(Code::new());
        };

        match &head.kind {
            TokenKind::Expression(_) => return self.lower_block(children),
            TokenKind::Value(value) if value.is_label() => {
                let name = value.as_variable().unwrap_or_default();
                if !args.is_empty() {
                    return Err(self.error(
                        CompileErrorKind::LabelWithArguments(name.to_owned()),
                        token.span,
                    ));
                }
                return Ok(vec![emit::label(name, head.span)]);
            }
            _ => {}
        }

        if let Some(keyword) = head.as_variable().and_then(Keyword::from_name) {
            return self.lower_keyword(keyword, token, args);
        }

        self.lower_call(token, head, args)
    }

    /// Arguments left to right, then a direct or dynamic call.
    fn lower_call(&mut self, token: &Token, head: &Token, args: &[Token]) -> CompileResult<Code> {
        let mut code = self.lower_block(args)?;
        let argc = count(args.len());

        let target = match head.as_variable() {
            Some(name) => self.resolve_constant(name),
            None => Some(match &head.kind {
                TokenKind::Value(value) => value.clone(),
                TokenKind::List(_) => Value::array(Vec::new()),
                _ => Value::object(BTreeMap::new()),
            }),
        };

        match target {
            Some(callee) if callee.is_callable() => {
                code.push(op_with(
                    Operator::CallDirect,
                    Value::array(vec![callee, argc]),
                    token.span,
                ));
            }
            Some(callee) => {
                let what = match head.as_variable() {
                    Some(name) => format!("`{name}` ({})", callee.type_name()),
                    None => head.describe(),
                };
                return Err(self.error(CompileErrorKind::NotCallable(what), head.span));
            }
            None => {
                let name = head.as_variable().unwrap_or_default();
                code.extend(self.lower_variable(name, head.span));
                code.push(op_with(Operator::Call, argc, token.span));
            }
        }
        Ok(code)
    }

    /// Compile a function literal's body into a function value.
    pub(crate) fn compile_function(
        &mut self,
        name: &str,
        parameters: Vec<String>,
        body: &[Token],
        capture: Capture,
    ) -> CompileResult<FunctionValue> {
        self.contexts.push(FunctionContext::default());
        let code = self.lower_block(body);
        self.contexts.pop();
        let function = emit::finish(self.file, name, parameters, code?)?;
        tracing::debug!(
            function = name,
            instructions = function.code().len(),
            "compiled function"
        );
        Ok(FunctionValue::new(function, capture))
    }
}

/// Split `a.b.0` into its parent name and property path.
///
/// Returns `None` for names without a dot or with an empty segment.
pub(crate) fn split_path(name: &str) -> Option<(&str, Vec<PathSegment>)> {
    let mut segments = name.split('.');
    let parent = segments.next()?;
    let path: Vec<PathSegment> = segments.map(PathSegment::parse).collect();
    let valid = !parent.is_empty()
        && !path.is_empty()
        && path
            .iter()
            .all(|segment| !matches!(segment, PathSegment::Key(key) if key.is_empty()));
    valid.then_some((parent, path))
}
