/// Resource limits of one machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VmConfig {
    /// Operand stack capacity, in values.
    pub stack_size: usize,
    /// Maximum number of saved call frames.
    pub call_stack_size: usize,
}

impl VmConfig {
    pub const DEFAULT_STACK_SIZE: usize = 1024;
    pub const DEFAULT_CALL_STACK_SIZE: usize = 256;

    #[must_use]
    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    #[must_use]
    pub fn with_call_stack_size(mut self, call_stack_size: usize) -> Self {
        self.call_stack_size = call_stack_size;
        self
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            stack_size: Self::DEFAULT_STACK_SIZE,
            call_stack_size: Self::DEFAULT_CALL_STACK_SIZE,
        }
    }
}
