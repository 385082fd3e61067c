//! Runtime values.
//!
//! `Value` is a closed sum type: every consumer matches exhaustively and
//! there is no extension point for new kinds. Heap payloads are shared via
//! [`Heap`] and never mutated, so cloning a value is always cheap and two
//! values can only differ structurally.
//!
//! Values are totally ordered (see `compare.rs`): first by kind, then
//! structurally within a kind. The same order backs the comparison
//! operators of the virtual machine.

mod compare;
mod heap;

use std::collections::BTreeMap;
use std::fmt;

use cinder_stack::ensure_sufficient_stack;

pub use heap::Heap;

use crate::{Arguments, BuiltinFunction, FunctionValue};

/// Runtime value of a Cinder script.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    /// Every number is a double.
    Number(f64),
    String(Heap<String>),
    Array(Heap<Vec<Value>>),
    /// Object keys are kept sorted, so iteration and display are deterministic.
    Object(Heap<BTreeMap<String, Value>>),
    /// A name reference. Names starting with `:` are labels.
    Variable(Heap<String>),
    Function(FunctionValue),
    Builtin(BuiltinFunction),
    /// Spread argument list; spliced into calls and arrays.
    Arguments(Arguments),
}

impl Value {
    pub const TRUE: Value = Value::Bool(true);
    pub const FALSE: Value = Value::Bool(false);

    // Factory Methods

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Heap::new(s.into()))
    }

    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(items))
    }

    #[inline]
    pub fn object(entries: BTreeMap<String, Value>) -> Self {
        Value::Object(Heap::new(entries))
    }

    /// Create a variable (or label, when prefixed with `:`) reference.
    #[inline]
    pub fn variable(name: impl Into<String>) -> Self {
        Value::Variable(Heap::new(name.into()))
    }

    #[inline]
    pub fn arguments(items: Vec<Value>) -> Self {
        Value::Arguments(Arguments::new(items))
    }

    // Accessors

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Elements of an array or argument list.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            Value::Arguments(args) => Some(&**args),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(&**map),
            _ => None,
        }
    }

    /// Name of a variable or label reference.
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Value::Variable(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Is this a `:label` reference?
    pub fn is_label(&self) -> bool {
        self.as_variable().is_some_and(|name| name.starts_with(':'))
    }

    /// Can this value be the target of a call?
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Builtin(_))
    }

    /// Get the type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Variable(name) if name.starts_with(':') => "label",
            Value::Variable(_) => "variable",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin",
            Value::Arguments(_) => "arguments",
        }
    }

    // Property Paths

    /// Look up one property step.
    ///
    /// Arrays and argument lists are indexed by position; objects by key,
    /// with an index segment used as its decimal key.
    pub fn property(&self, segment: &PathSegment) -> Option<&Value> {
        match (self, segment) {
            (Value::Array(_) | Value::Arguments(_), PathSegment::Index(i)) => {
                self.as_slice().and_then(|items| items.get(*i))
            }
            (Value::Object(map), PathSegment::Key(key)) => map.get(key.as_str()),
            (Value::Object(map), PathSegment::Index(i)) => map.get(i.to_string().as_str()),
            _ => None,
        }
    }

    /// Walk a property path, stopping at the first missing step.
    ///
    /// On failure returns the index of the segment that could not be resolved.
    pub fn get_path(&self, path: &[PathSegment]) -> Result<&Value, usize> {
        let mut current = self;
        for (i, segment) in path.iter().enumerate() {
            current = current.property(segment).ok_or(i)?;
        }
        Ok(current)
    }

    /// Text used by string concatenation: strings are not quoted.
    pub fn display_value(&self) -> String {
        match self {
            Value::String(s) => (**s).clone(),
            other => other.to_string(),
        }
    }
}

/// One step of a dotted property path such as `player.items.0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl PathSegment {
    /// Digit-only segments are indices, everything else is a key.
    pub fn parse(segment: &str) -> Self {
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = segment.parse() {
                return PathSegment::Index(index);
            }
        }
        PathSegment::Key(segment.to_owned())
    }

    /// Decode a segment stored in a compiled path operand.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= f64::from(u32::MAX) => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let index = *n as usize;
                Some(PathSegment::Index(index))
            }
            Value::String(key) => Some(PathSegment::Key((**key).clone())),
            _ => None,
        }
    }

    /// Encode a segment for a compiled path operand.
    pub fn to_value(&self) -> Value {
        match self {
            PathSegment::Index(i) => {
                #[allow(clippy::cast_precision_loss)]
                let index = *i as f64;
                Value::Number(index)
            }
            PathSegment::Key(key) => Value::string(key.as_str()),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{i}"),
            PathSegment::Key(key) => f.write_str(key),
        }
    }
}

// Conversions

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

// Trait Implementations

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::String(s) => write!(f, "String({:?})", &**s),
            Value::Array(items) => write!(f, "Array({:?})", &**items),
            Value::Object(map) => write!(f, "Object({:?})", &**map),
            Value::Variable(name) => write!(f, "Variable({})", &**name),
            Value::Function(func) => write!(f, "Function({func:?})"),
            Value::Builtin(builtin) => write!(f, "Builtin({builtin:?})"),
            Value::Arguments(args) => write!(f, "Arguments({:?})", &**args),
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ensure_sufficient_stack(|| match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{:?}", &**s),
            Value::Array(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            Value::Object(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Variable(name) => f.write_str(name),
            Value::Function(func) => write!(f, "<function {}>", func.name()),
            Value::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name()),
            Value::Arguments(args) => {
                write!(f, "...[")?;
                write_items(f, args)?;
                write!(f, "]")
            }
        })
    }
}
