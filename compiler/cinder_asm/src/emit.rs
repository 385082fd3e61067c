//! Intermediate code and function finalization.
//!
//! Lowering produces [`Temp`] sequences: instructions still tagged with
//! their source span, interleaved with label markers. [`finish`] flattens a
//! sequence into a [`Function`], resolving labels to instruction indices.

use std::collections::BTreeMap;

use cinder_diagnostic::{CompileError, CompileErrorKind, CompileResult};
use cinder_ir::{Operator, SourceFile, Span};
use cinder_value::{CodeLine, DebugSymbols, Function, Value};

/// One lowered item.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Temp {
    Label { name: String, span: Span },
    Code { line: CodeLine, span: Span },
}

pub(crate) type Code = Vec<Temp>;

#[inline]
pub(crate) fn op(op: Operator, span: Span) -> Temp {
    Temp::Code {
        line: CodeLine::bare(op),
        span,
    }
}

#[inline]
pub(crate) fn op_with(op: Operator, operand: Value, span: Span) -> Temp {
    Temp::Code {
        line: CodeLine::with(op, operand),
        span,
    }
}

#[inline]
pub(crate) fn push(value: Value, span: Span) -> Temp {
    op_with(Operator::Push, value, span)
}

#[inline]
pub(crate) fn label(name: impl Into<String>, span: Span) -> Temp {
    Temp::Label {
        name: name.into(),
        span,
    }
}

/// Count operand as stored in `Call`, `MakeArray` and friends.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn count(n: usize) -> Value {
    Value::Number(n as f64)
}

/// Can `value` be baked into another compile-time constant?
///
/// Function literals that still need their defining scope cannot.
pub(crate) fn is_foldable(value: &Value) -> bool {
    match value {
        Value::Function(function) => !function.is_lexical(),
        _ => true,
    }
}

/// The value of code that is exactly one foldable `Push`.
pub(crate) fn as_constant(code: &[Temp]) -> Option<&Value> {
    match code {
        [Temp::Code { line, .. }] if line.op == Operator::Push => {
            line.operand.as_ref().filter(|value| is_foldable(value))
        }
        _ => None,
    }
}

/// Is `code` a literal `true`?
pub(crate) fn is_literal_true(code: &[Temp]) -> bool {
    matches!(as_constant(code), Some(Value::Bool(true)))
}

/// Flatten lowered code into an immutable function.
pub(crate) fn finish(
    file: &SourceFile,
    name: &str,
    parameters: Vec<String>,
    code: Code,
) -> CompileResult<Function> {
    let mut lines = Vec::with_capacity(code.len());
    let mut locations = Vec::with_capacity(code.len());
    let mut labels = BTreeMap::new();
    let mut jumps = Vec::new();

    for temp in code {
        match temp {
            Temp::Label { name, span } => {
                if labels.contains_key(&name) {
                    return Err(
                        CompileError::new(CompileErrorKind::DuplicateLabel(name), span)
                            .with_source(file),
                    );
                }
                tracing::trace!(label = %name, index = lines.len(), "label");
                labels.insert(name, lines.len());
            }
            Temp::Code { line, span } => {
                if line.op.is_jump() {
                    if let Some(target) = line.operand.as_ref().and_then(Value::as_variable) {
                        jumps.push((target.to_owned(), span));
                    }
                }
                locations.push(file.location(span));
                lines.push(line);
            }
        }
    }

    if let Some((target, span)) = jumps.into_iter().find(|(t, _)| !labels.contains_key(t)) {
        return Err(
            CompileError::new(CompileErrorKind::UnresolvedLabel(target), span).with_source(file),
        );
    }

    let symbols = DebugSymbols {
        source_name: file.name().to_owned(),
        locations,
    };
    Ok(Function::new(name, parameters, lines, labels, symbols))
}
