//! Stack growth for recursive passes.
//!
//! The assembler's lowering, token cloning, value comparison and display,
//! and the release of nested value payloads all recurse once per nesting
//! level of the script. A script with tens of thousands of nested brackets
//! must not abort the host process, so each of those recursive entry points
//! is wrapped in [`ensure_sufficient_stack`]. The token-tree builder and
//! token drop use explicit worklists instead.
//!
//! On native targets the `stacker` crate allocates a fresh segment whenever
//! less than [`RED_ZONE`] bytes remain. On `wasm32` the closure runs directly.

/// Remaining stack below which a new segment is allocated.
pub const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
pub const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, growing the stack first if it is nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Remaining stack space in bytes, when the platform can report it.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}

#[cfg(test)]
mod tests;
