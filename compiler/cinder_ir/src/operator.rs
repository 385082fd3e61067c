//! The bytecode operator set.
//!
//! Most operators take their operand either as the instruction's immediate
//! or, when the immediate is absent, from the top of the operand stack.

use std::fmt;

/// One virtual machine instruction kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    /// Push the immediate value.
    Push,
    /// Wrap an array into a spreadable argument list.
    ToArgument,
    /// Pop N values and push them as an array.
    MakeArray,
    /// Pop N key/value pairs and push them as an object.
    MakeObject,
    /// Read a variable through the scope chain.
    Get,
    /// Walk a property path on the value below.
    GetProperty,
    /// Bind a name in the current scope.
    Define,
    /// Overwrite the nearest existing binding of a name.
    Set,
    Jump,
    JumpTrue,
    JumpFalse,
    /// Call the function popped from the stack.
    Call,
    /// Call a function resolved at compile time.
    CallDirect,
    Return,
    /// Pop N values and push their concatenated text.
    StringConcat,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Negate,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    And,
    Or,
    Not,
    Inc,
    Dec,
}

impl Operator {
    /// Canonical instruction name, as rendered in stack traces.
    pub const fn name(self) -> &'static str {
        match self {
            Operator::Push => "Push",
            Operator::ToArgument => "ToArgument",
            Operator::MakeArray => "MakeArray",
            Operator::MakeObject => "MakeObject",
            Operator::Get => "Get",
            Operator::GetProperty => "GetProperty",
            Operator::Define => "Define",
            Operator::Set => "Set",
            Operator::Jump => "Jump",
            Operator::JumpTrue => "JumpTrue",
            Operator::JumpFalse => "JumpFalse",
            Operator::Call => "Call",
            Operator::CallDirect => "CallDirect",
            Operator::Return => "Return",
            Operator::StringConcat => "StringConcat",
            Operator::Add => "Add",
            Operator::Sub => "Sub",
            Operator::Mul => "Mul",
            Operator::Div => "Div",
            Operator::Mod => "Mod",
            Operator::Negate => "Negate",
            Operator::Equal => "Equal",
            Operator::NotEqual => "NotEqual",
            Operator::LessThan => "LessThan",
            Operator::LessEqual => "LessEqual",
            Operator::GreaterThan => "GreaterThan",
            Operator::GreaterEqual => "GreaterEqual",
            Operator::And => "And",
            Operator::Or => "Or",
            Operator::Not => "Not",
            Operator::Inc => "Inc",
            Operator::Dec => "Dec",
        }
    }

    /// Is this one of the three jump instructions?
    #[inline]
    pub const fn is_jump(self) -> bool {
        matches!(
            self,
            Operator::Jump | Operator::JumpTrue | Operator::JumpFalse
        )
    }

    /// Binary operators that accept their right operand as an immediate.
    #[inline]
    pub const fn is_binary(self) -> bool {
        matches!(
            self,
            Operator::Add
                | Operator::Sub
                | Operator::Mul
                | Operator::Div
                | Operator::Mod
                | Operator::Equal
                | Operator::NotEqual
                | Operator::LessThan
                | Operator::LessEqual
                | Operator::GreaterThan
                | Operator::GreaterEqual
                | Operator::And
                | Operator::Or
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
