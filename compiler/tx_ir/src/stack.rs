//! Stack growth for deep tree recursion.
//!
//! Traversal and deep copy recurse once per tree level; generated code can
//! nest expressions far deeper than a thread's default stack allows.

/// Remaining stack below which we switch to a fresh segment (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
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
