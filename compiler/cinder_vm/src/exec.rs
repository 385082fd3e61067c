//! Instruction dispatch.

use std::collections::BTreeMap;

use cinder_ir::Operator;
use cinder_value::{
    invalid_jump_target, label_not_found, missing_operand, property_not_found,
    read_only_variable, type_mismatch, undefined_variable, AssignError, CodeLine, Machine,
    PathSegment, RuntimeResult, Value,
};

use crate::operators::{evaluate_binary, evaluate_unary, number};
use crate::VirtualMachine;

impl VirtualMachine {
    pub(crate) fn execute(&mut self, line: &CodeLine) -> RuntimeResult<()> {
        let operand = line.operand.as_ref();
        match line.op {
            Operator::Push => {
                let value = operand.ok_or_else(|| missing_operand(line.op))?;
                let value = match value {
                    Value::Function(function) if function.is_lexical() => {
                        Value::Function(function.bind(self.scope.clone()))
                    }
                    other => other.clone(),
                };
                self.push(value)
            }
            Operator::ToArgument => {
                let value = self.pop()?;
                let spread = match value {
                    Value::Array(items) => Value::arguments(items.into_inner()),
                    Value::Arguments(args) => Value::Arguments(args),
                    other => return Err(type_mismatch("array", other.type_name())),
                };
                self.push(spread)
            }
            Operator::MakeArray => {
                let count = self.count(line)?;
                let items = self.pop_arguments(count)?;
                self.push(Value::array(items))
            }
            Operator::MakeObject => {
                let count = self.count(line)?;
                let flat = self.pop_many(count * 2)?;
                let mut entries = BTreeMap::new();
                let mut flat = flat.into_iter();
                while let (Some(key), Some(value)) = (flat.next(), flat.next()) {
                    let Some(key) = key.as_str() else {
                        return Err(type_mismatch("string", key.type_name()));
                    };
                    entries.insert(key.to_owned(), value);
                }
                self.push(Value::object(entries))
            }
            Operator::Get => {
                let name = self.name(operand)?;
                let value = self
                    .scope
                    .get(&name)
                    .ok_or_else(|| undefined_variable(&name))?;
                self.push(value)
            }
            Operator::GetProperty => {
                let path = match operand {
                    Some(path) => path.clone(),
                    None => self.pop()?,
                };
                let target = self.pop()?;
                let value = walk_path(&target, &path)?;
                self.push(value)
            }
            Operator::Define => {
                let name = self.name(operand)?;
                let value = self.pop()?;
                self.scope
                    .define(name.as_str(), value)
                    .map_err(|_| read_only_variable(&name))
            }
            Operator::Set => {
                let name = self.name(operand)?;
                let value = self.pop()?;
                self.assign(&name, value)
            }
            Operator::Jump => {
                let target = self.jump_target(operand)?;
                self.pc = target;
                Ok(())
            }
            Operator::JumpTrue | Operator::JumpFalse => {
                let target = self.jump_target(operand)?;
                let condition = self.pop()?;
                let expected = Value::Bool(line.op == Operator::JumpTrue);
                if condition == expected {
                    self.pc = target;
                }
                Ok(())
            }
            Operator::Call => {
                let count = self.count(line)?;
                let callee = self.pop()?;
                let args = self.pop_arguments(count)?;
                self.invoke(callee, args)
            }
            Operator::CallDirect => {
                let (callee, count) = match operand.and_then(Value::as_slice) {
                    Some([callee, count]) => (callee.clone(), count_of(count)?),
                    _ => return Err(missing_operand(line.op)),
                };
                let args = self.pop_arguments(count)?;
                self.invoke(callee, args)
            }
            Operator::Return => {
                self.return_from_call();
                Ok(())
            }
            Operator::StringConcat => {
                let count = self.count(line)?;
                let parts = self.pop_many(count)?;
                let text: String = parts.iter().map(Value::display_value).collect();
                self.push(Value::string(text))
            }
            Operator::Negate | Operator::Not => {
                let value = self.pop()?;
                let result = evaluate_unary(line.op, &value)?;
                self.push(result)
            }
            Operator::Inc | Operator::Dec => {
                let delta = if line.op == Operator::Inc { 1.0 } else { -1.0 };
                match operand {
                    Some(Value::Variable(name)) => {
                        let current = self
                            .scope
                            .get(name)
                            .ok_or_else(|| undefined_variable(name))?;
                        let next = Value::Number(number(&current)? + delta);
                        self.assign(name, next)
                    }
                    Some(other) => Err(type_mismatch("variable", other.type_name())),
                    None => {
                        let n = self.pop_number()?;
                        self.push(Value::Number(n + delta))
                    }
                }
            }
            op => {
                let right = match operand {
                    Some(right) => right.clone(),
                    None => self.pop()?,
                };
                let left = self.pop()?;
                let result = evaluate_binary(op, &left, &right)?;
                self.push(result)
            }
        }
    }

    fn assign(&self, name: &str, value: Value) -> RuntimeResult<()> {
        self.scope.set(name, value).map_err(|error| match error {
            AssignError::Undefined => undefined_variable(name),
            AssignError::ReadOnly => read_only_variable(name),
        })
    }

    /// A variable name from the immediate, or popped when absent.
    fn name(&mut self, operand: Option<&Value>) -> RuntimeResult<String> {
        let value = match operand {
            Some(value) => value.clone(),
            None => self.pop()?,
        };
        match value.as_variable() {
            Some(name) => Ok(name.to_owned()),
            None => Err(type_mismatch("variable", value.type_name())),
        }
    }

    /// Resolve a label, from the immediate or popped, in the current function.
    fn jump_target(&mut self, operand: Option<&Value>) -> RuntimeResult<usize> {
        let target = match operand {
            Some(value) => value.clone(),
            None => self.pop()?,
        };
        let Some(label) = target.as_variable().filter(|_| target.is_label()) else {
            return Err(invalid_jump_target(target.type_name()));
        };
        self.function
            .as_ref()
            .and_then(|function| function.label(label))
            .ok_or_else(|| label_not_found(label))
    }

    fn count(&self, line: &CodeLine) -> RuntimeResult<usize> {
        line.operand
            .as_ref()
            .ok_or_else(|| missing_operand(line.op))
            .and_then(count_of)
    }
}

fn count_of(value: &Value) -> RuntimeResult<usize> {
    match PathSegment::from_value(value) {
        Some(PathSegment::Index(n)) => Ok(n),
        _ => Err(type_mismatch("count", value.type_name())),
    }
}

/// Follow a compiled property path (an array of keys and indices).
fn walk_path(target: &Value, path: &Value) -> RuntimeResult<Value> {
    let Some(segments) = path.as_slice() else {
        return Err(type_mismatch("array", path.type_name()));
    };
    let mut current = target;
    for raw in segments {
        let Some(segment) = PathSegment::from_value(raw) else {
            return Err(type_mismatch("property", raw.type_name()));
        };
        current = current
            .property(&segment)
            .ok_or_else(|| property_not_found(&segment, current.type_name()))?;
    }
    Ok(current.clone())
}
