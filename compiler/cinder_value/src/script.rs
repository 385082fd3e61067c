use crate::{Function, Heap, Scope};

/// A compiled unit: the global function plus the builtin scope it was
/// compiled against.
#[derive(Clone, Debug)]
pub struct Script {
    main: Heap<Function>,
    builtins: Scope,
}

impl Script {
    pub fn new(main: Function, builtins: Scope) -> Self {
        Script {
            main: Heap::new(main),
            builtins,
        }
    }

    /// The global function executed on load.
    #[inline]
    pub fn main(&self) -> &Heap<Function> {
        &self.main
    }

    #[inline]
    pub fn builtins(&self) -> &Scope {
        &self.builtins
    }
}
