use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use cinder_stack::ensure_sufficient_stack;

/// Shared, immutable heap payload of a [`Value`](super::Value).
///
/// The constructor is crate-private: values are built through the factory
/// methods on `Value`, `Arguments`, `FunctionValue` and `Script`.
///
/// The handle is `None` only while it is being dropped.
pub struct Heap<T: ?Sized>(Option<Rc<T>>);

impl<T> Heap<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Some(Rc::new(value)))
    }
}

impl<T: ?Sized> Heap<T> {
    /// Do both handles point at the same allocation?
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        match (&a.0, &b.0) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T: Clone> Heap<T> {
    /// Take the payload, cloning only when it is shared.
    pub fn into_inner(mut self) -> T {
        match self.0.take() {
            Some(rc) => Rc::try_unwrap(rc).unwrap_or_else(|shared| (*shared).clone()),
            None => unreachable!("heap handle taken before drop"),
        }
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(self.0.clone())
    }
}

/// Releasing the last handle to a nested array or object drops its children
/// in turn, one native frame per level. Grow the stack before that happens.
impl<T: ?Sized> Drop for Heap<T> {
    fn drop(&mut self) {
        if let Some(rc) = self.0.take() {
            if Rc::strong_count(&rc) == 1 {
                ensure_sufficient_stack(move || drop(rc));
            }
        }
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        match &self.0 {
            Some(rc) => rc,
            None => unreachable!("heap handle taken before drop"),
        }
    }
}

impl<T: ?Sized + PartialEq> PartialEq for Heap<T> {
    fn eq(&self, other: &Self) -> bool {
        Heap::ptr_eq(self, other) || **self == **other
    }
}

impl<T: ?Sized + Eq> Eq for Heap<T> {}

impl<T: ?Sized + Ord> PartialOrd for Heap<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: ?Sized + Ord> Ord for Heap<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        if Heap::ptr_eq(self, other) {
            return Ordering::Equal;
        }
        (**self).cmp(&**other)
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}
