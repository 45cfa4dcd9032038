//! Handle newtypes.
//!
//! Every wrapper the translator hands out is addressed by a 32-bit handle.
//! Handle equality is wrapper identity: downstream passes deduplicate and
//! compare types and elements by handle alone.

use std::fmt;

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create a handle from a raw index.
            #[inline]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw `u32` value.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Get the raw value as a `usize` index.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

define_handle!(
    /// Identity of a `Type` wrapper in the binding cache.
    TypeId,
    "TypeId"
);

define_handle!(
    /// Identity of an `Element` wrapper in the binding cache.
    ElementId,
    "ElementId"
);

define_handle!(
    /// Identity of a native binding produced by the host analyzer.
    BindingId,
    "BindingId"
);

define_handle!(
    /// Index of a node in a [`Tree`](crate::Tree).
    NodeId,
    "NodeId"
);

/// Convert an arena length into a `u32` handle index.
///
/// # Panics
/// Panics if the arena outgrew the handle space.
#[inline]
pub(crate) fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what}: {len} exceeds u32::MAX"))
}
