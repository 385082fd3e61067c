//! Parent-linked name bindings.
//!
//! One `Scope` type serves three roles, composed by lookup chain:
//! - the builtin scope, populated by the host and then frozen
//! - the assembler's const scope, chained onto the builtin scope
//! - runtime scopes, one per call frame, parented to the lexically
//!   enclosing scope so that closures see their defining environment
//!
//! `define` always writes the nearest scope. `set` walks to the first scope
//! that already owns the name and fails if none does.

use std::cell::{Ref, RefCell, RefMut};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::{BuiltinFunction, Machine, RuntimeResult, Value, Arguments};

/// Error returned by [`Scope::set`] and [`Scope::define`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// The owning scope is frozen.
    ReadOnly,
    /// Name not found in any scope.
    Undefined,
}

/// A single-threaded shared cell for scope data.
///
/// All scope allocations go through [`LocalScope::new`]; the wrapper has
/// the same layout as `Rc<RefCell<T>>`.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Address of the shared allocation, used as scope identity.
    #[inline]
    fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &RefCell<T> {
        &self.0
    }
}

/// The bindings of one scope.
#[derive(Default)]
pub struct Bindings {
    names: FxHashMap<String, Value>,
    parent: Option<Scope>,
    read_only: bool,
}

/// Handle to a scope. Clones share the same bindings.
///
/// Scopes compare by identity, never by contents.
#[derive(Clone)]
pub struct Scope(LocalScope<Bindings>);

impl Scope {
    /// A new root scope.
    pub fn new() -> Self {
        Scope(LocalScope::new(Bindings::default()))
    }

    /// A new empty scope whose lookups fall back to `parent`.
    pub fn with_parent(parent: &Scope) -> Self {
        Scope(LocalScope::new(Bindings {
            parent: Some(parent.clone()),
            ..Bindings::default()
        }))
    }

    pub fn parent(&self) -> Option<Scope> {
        self.0.borrow().parent.clone()
    }

    /// Make this scope immutable. Later `define`/`set` calls targeting it fail.
    pub fn freeze(&self) {
        self.0.borrow_mut().read_only = true;
    }

    pub fn is_read_only(&self) -> bool {
        self.0.borrow().read_only
    }

    /// Bind `name` in this scope, shadowing any ancestor binding.
    pub fn define(&self, name: impl Into<String>, value: Value) -> Result<(), AssignError> {
        let mut bindings = self.0.borrow_mut();
        if bindings.read_only {
            return Err(AssignError::ReadOnly);
        }
        bindings.names.insert(name.into(), value);
        Ok(())
    }

    /// Register a host callback under `name`.
    pub fn define_builtin<F>(
        &self,
        name: &str,
        arity: Option<usize>,
        func: F,
    ) -> Result<(), AssignError>
    where
        F: Fn(&mut dyn Machine, Arguments) -> RuntimeResult<()> + 'static,
    {
        self.define(name, Value::Builtin(BuiltinFunction::new(name, arity, func)))
    }

    /// Overwrite the nearest existing binding of `name`.
    pub fn set(&self, name: &str, value: Value) -> Result<(), AssignError> {
        let owner = self.owner(name).ok_or(AssignError::Undefined)?;
        let mut bindings = owner.0.borrow_mut();
        if bindings.read_only {
            return Err(AssignError::ReadOnly);
        }
        bindings.names.insert(name.to_owned(), value);
        Ok(())
    }

    /// Look `name` up through the whole chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let next = {
                let bindings = current.0.borrow();
                if let Some(value) = bindings.names.get(name) {
                    return Some(value.clone());
                }
                bindings.parent.clone()?
            };
            current = next;
        }
    }

    /// Look `name` up in this scope only.
    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.0.borrow().names.get(name).cloned()
    }

    pub fn contains_local(&self, name: &str) -> bool {
        self.0.borrow().names.contains_key(name)
    }

    /// The nearest scope in the chain that binds `name`.
    pub fn owner(&self, name: &str) -> Option<Scope> {
        let mut current = self.clone();
        loop {
            let next = {
                let bindings = current.0.borrow();
                if bindings.names.contains_key(name) {
                    None
                } else {
                    Some(bindings.parent.clone()?)
                }
            };
            match next {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    /// Names bound directly in this scope, sorted.
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.0.borrow().names.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of scopes from here to the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.parent();
        while let Some(scope) = current {
            depth += 1;
            current = scope.parent();
        }
        depth
    }

    #[inline]
    pub fn ptr_eq(a: &Scope, b: &Scope) -> bool {
        LocalScope::ptr_eq(&a.0, &b.0)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::new()
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        Scope::ptr_eq(self, other)
    }
}

impl Eq for Scope {}

impl PartialOrd for Scope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scope {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.addr().cmp(&other.0.addr())
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Bindings may hold closures over this very scope; print names only.
        let bindings = self.0.borrow();
        write!(
            f,
            "Scope({} bindings, depth {}{})",
            bindings.names.len(),
            self.depth(),
            if bindings.read_only { ", frozen" } else { "" }
        )
    }
}
