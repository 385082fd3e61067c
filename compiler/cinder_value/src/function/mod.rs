//! Compiled functions and function values.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use cinder_ir::{Operator, SourceLocation};

use crate::{Heap, Scope, Value};

/// Name given to functions declared without one.
pub const ANONYMOUS: &str = "anonymous";

/// One compiled instruction: operator plus optional immediate operand.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CodeLine {
    pub op: Operator,
    pub operand: Option<Value>,
}

impl CodeLine {
    #[inline]
    pub fn new(op: Operator, operand: Option<Value>) -> Self {
        CodeLine { op, operand }
    }

    #[inline]
    pub fn bare(op: Operator) -> Self {
        CodeLine { op, operand: None }
    }

    #[inline]
    pub fn with(op: Operator, operand: Value) -> Self {
        CodeLine {
            op,
            operand: Some(operand),
        }
    }
}

impl fmt::Display for CodeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Some(operand) => write!(f, "{} {operand}", self.op),
            None => write!(f, "{}", self.op),
        }
    }
}

/// Source positions aligned with a function's code, one per instruction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DebugSymbols {
    pub source_name: String,
    pub locations: Vec<SourceLocation>,
}

impl DebugSymbols {
    pub fn location(&self, index: usize) -> SourceLocation {
        self.locations
            .get(index)
            .copied()
            .unwrap_or(SourceLocation::UNKNOWN)
    }
}

/// An immutable compiled unit.
///
/// Equality and ordering are structural over name, parameters, code and
/// labels. Debug symbols do not take part.
#[derive(Clone, Debug)]
pub struct Function {
    name: String,
    parameters: Vec<String>,
    code: Vec<CodeLine>,
    labels: BTreeMap<String, usize>,
    symbols: DebugSymbols,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<String>,
        code: Vec<CodeLine>,
        labels: BTreeMap<String, usize>,
        symbols: DebugSymbols,
    ) -> Self {
        Function {
            name: name.into(),
            parameters,
            code,
            labels,
            symbols,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter names as declared; the last may be `...rest`.
    #[inline]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Positional parameters, without the variadic one.
    pub fn positional(&self) -> &[String] {
        match self.variadic() {
            Some(_) => &self.parameters[..self.parameters.len() - 1],
            None => &self.parameters,
        }
    }

    /// Binding name of the trailing `...rest` parameter, if any.
    pub fn variadic(&self) -> Option<&str> {
        self.parameters.last()?.strip_prefix("...")
    }

    #[inline]
    pub fn code(&self) -> &[CodeLine] {
        &self.code
    }

    #[inline]
    pub fn labels(&self) -> &BTreeMap<String, usize> {
        &self.labels
    }

    /// Instruction index of a `:label`.
    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    #[inline]
    pub fn symbols(&self) -> &DebugSymbols {
        &self.symbols
    }

    /// Human-readable listing, one instruction per line.
    pub fn disassemble(&self) -> String {
        let mut by_index: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
        for (label, index) in &self.labels {
            by_index.entry(*index).or_default().push(label);
        }
        let mut out = format!("function {} ({})\n", self.name, self.parameters.join(" "));
        for (i, line) in self.code.iter().enumerate() {
            for label in by_index.remove(&i).unwrap_or_default() {
                out.push_str(&format!("{label}\n"));
            }
            out.push_str(&format!("  {i:>4}  {line}\n"));
        }
        for labels in by_index.into_values() {
            for label in labels {
                out.push_str(&format!("{label}\n"));
            }
        }
        out
    }

    fn structure(&self) -> (&str, &[String], &[CodeLine], &BTreeMap<String, usize>) {
        (&self.name, &self.parameters, &self.code, &self.labels)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.structure() == other.structure()
    }
}

impl Eq for Function {}

impl PartialOrd for Function {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Function {
    fn cmp(&self, other: &Self) -> Ordering {
        self.structure().cmp(&other.structure())
    }
}

/// How a function value finds the parent scope of its call frames.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Capture {
    /// Top-level function: frames are parented to the global runtime scope.
    Global,
    /// Function literal not yet bound; the machine captures the current
    /// scope when the literal is pushed.
    Lexical,
    /// Closure over a runtime scope.
    Scope(Scope),
}

/// A first-class function: compiled code plus its captured scope.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FunctionValue {
    function: Heap<Function>,
    capture: Capture,
}

impl FunctionValue {
    pub fn new(function: Function, capture: Capture) -> Self {
        FunctionValue {
            function: Heap::new(function),
            capture,
        }
    }

    #[inline]
    pub fn function(&self) -> &Heap<Function> {
        &self.function
    }

    #[inline]
    pub fn capture(&self) -> &Capture {
        &self.capture
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.function.name()
    }

    /// Same code, closed over `scope`.
    #[must_use]
    pub fn bind(&self, scope: Scope) -> Self {
        FunctionValue {
            function: self.function.clone(),
            capture: Capture::Scope(scope),
        }
    }

    /// Does pushing this value need the current scope captured?
    #[inline]
    pub fn is_lexical(&self) -> bool {
        matches!(self.capture, Capture::Lexical)
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let capture = match &self.capture {
            Capture::Global => "global",
            Capture::Lexical => "lexical",
            Capture::Scope(_) => "closure",
        };
        write!(
            f,
            "{}({}) [{} instructions, {capture}]",
            self.function.name,
            self.function.parameters.join(" "),
            self.function.code.len()
        )
    }
}

impl From<FunctionValue> for Value {
    fn from(function: FunctionValue) -> Self {
        Value::Function(function)
    }
}
