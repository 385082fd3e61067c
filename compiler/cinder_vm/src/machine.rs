//! Machine state and the host-driven run loop.

use cinder_value::{
    stack_overflow, stack_underflow, type_mismatch, Function, Heap, Machine, RuntimeResult, Scope,
    Script, StackTrace, TraceEntry, Value,
};

use crate::VmConfig;

/// Caller state saved across a call.
#[derive(Clone, Debug)]
pub(crate) struct ScopeFrame {
    /// Index of the instruction after the call.
    pub(crate) pc: usize,
    pub(crate) function: Heap<Function>,
    pub(crate) scope: Scope,
}

/// A single-threaded bytecode interpreter.
///
/// The machine executes one instruction per [`step`](Self::step). Its whole
/// continuation is the operand stack, the saved frames and the program
/// counter, so a host may stop stepping at any point (or a builtin may
/// [`pause`](Machine::pause) it) and continue later.
///
/// Runtime errors are fail-stop: the failing step halts the machine and
/// returns the error with a stack trace attached.
pub struct VirtualMachine {
    config: VmConfig,
    pub(crate) stack: Vec<Value>,
    pub(crate) frames: Vec<ScopeFrame>,
    pub(crate) function: Option<Heap<Function>>,
    pub(crate) scope: Scope,
    pub(crate) global: Scope,
    pub(crate) pc: usize,
    running: bool,
    paused: bool,
}

impl VirtualMachine {
    pub fn new(config: VmConfig) -> Self {
        let global = Scope::new();
        VirtualMachine {
            config,
            stack: Vec::new(),
            frames: Vec::new(),
            function: None,
            scope: global.clone(),
            global,
            pc: 0,
            running: false,
            paused: false,
        }
    }

    /// Reset all state and start executing `script`'s global function.
    #[tracing::instrument(level = "debug", skip_all, fields(function = script.main().name()))]
    pub fn load_script(&mut self, script: &Script) {
        self.stack.clear();
        self.frames.clear();
        self.global = Scope::with_parent(script.builtins());
        self.scope = self.global.clone();
        self.function = Some(script.main().clone());
        self.pc = 0;
        self.running = true;
        self.paused = false;
        tracing::debug!(
            instructions = script.main().code().len(),
            "script loaded"
        );
    }

    /// Execute one instruction.
    ///
    /// Does nothing while halted or paused. Stepping past the end of a
    /// function returns from it.
    pub fn step(&mut self) -> RuntimeResult<()> {
        if !self.running || self.paused {
            return Ok(());
        }
        let Some(function) = self.function.clone() else {
            self.running = false;
            return Ok(());
        };
        let Some(line) = function.code().get(self.pc) else {
            self.return_from_call();
            return Ok(());
        };
        self.pc += 1;

        self.execute(line).map_err(|error| {
            let error = error.with_trace(self.stack_trace());
            tracing::debug!(%error, "halted on error");
            self.running = false;
            error
        })
    }

    /// Step until the machine halts or pauses.
    pub fn run(&mut self) -> RuntimeResult<()> {
        while self.running && !self.paused {
            self.step()?;
        }
        Ok(())
    }

    /// Step at most `limit` times; returns how many steps ran.
    pub fn run_steps(&mut self, limit: usize) -> RuntimeResult<usize> {
        let mut steps = 0;
        while steps < limit && self.running && !self.paused {
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Clear a pause set by a builtin or the host.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    #[inline]
    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// The operand stack, bottom first.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn peek(&self) -> Option<&Value> {
        self.stack.last()
    }

    /// Take the top of the stack, typically a value returned by the script.
    pub fn pop_result(&mut self) -> Option<Value> {
        self.stack.pop()
    }

    /// The runtime scope holding the script's top-level definitions.
    pub fn global_scope(&self) -> &Scope {
        &self.global
    }

    /// Number of saved call frames.
    pub fn call_depth(&self) -> usize {
        self.frames.len()
    }

    /// Trace of the current instruction and every saved caller, innermost
    /// first.
    pub fn stack_trace(&self) -> StackTrace {
        let current = self
            .function
            .as_ref()
            .map(|function| (function, self.pc.saturating_sub(1)));
        let callers = self
            .frames
            .iter()
            .rev()
            .map(|frame| (&frame.function, frame.pc.saturating_sub(1)));

        let entries = current
            .into_iter()
            .chain(callers)
            .map(|(function, index)| {
                let line = function.code().get(index);
                TraceEntry {
                    function: function.name().to_owned(),
                    index,
                    location: function.symbols().location(index),
                    op: line.map_or(cinder_ir::Operator::Return, |line| line.op),
                    operand: line.and_then(|line| line.operand.clone()),
                }
            })
            .collect();
        StackTrace::new(entries)
    }

    // Operand stack

    pub(crate) fn pop(&mut self) -> RuntimeResult<Value> {
        self.stack.pop().ok_or_else(stack_underflow)
    }

    /// Pop `count` values, returned in push order.
    pub(crate) fn pop_many(&mut self, count: usize) -> RuntimeResult<Vec<Value>> {
        if count > self.stack.len() {
            return Err(stack_underflow());
        }
        let at = self.stack.len() - count;
        Ok(self.stack.split_off(at))
    }

    pub(crate) fn pop_number(&mut self) -> RuntimeResult<f64> {
        let value = self.pop()?;
        value
            .as_number()
            .ok_or_else(|| type_mismatch("number", value.type_name()))
    }
}

impl Default for VirtualMachine {
    fn default() -> Self {
        VirtualMachine::new(VmConfig::default())
    }
}

impl Machine for VirtualMachine {
    fn push(&mut self, value: Value) -> RuntimeResult<()> {
        if self.stack.len() >= self.config.stack_size {
            return Err(stack_overflow(self.config.stack_size));
        }
        self.stack.push(value);
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn halt(&mut self) {
        self.running = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
