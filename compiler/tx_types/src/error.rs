//! Contract violations raised by the binding cache.
//!
//! None of these are user errors. They mean the host analyzer or an earlier
//! pass handed the cache something the binding model does not allow.

use tx_ir::InternError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    #[error("no element kind for {binding}")]
    UnknownElementBinding { binding: String },

    #[error("{binding} is not a type binding")]
    NotATypeBinding { binding: String },

    #[error("{binding} is not a method binding")]
    NotAMethodBinding { binding: String },

    #[error("{binding} is not a package binding")]
    NotAPackageBinding { binding: String },

    #[error("{binding} is not an annotation binding")]
    NotAnAnnotationBinding { binding: String },

    #[error("binding {id:?} is not in the binding table")]
    DanglingBinding { id: tx_ir::BindingId },

    #[error("{handle} does not belong to the current cache generation")]
    StaleHandle { handle: String },

    #[error("expected a {expected} element, found {found} element `{name}`")]
    WrongElementKind {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("array binding {binding} has no component type")]
    MalformedArrayBinding { binding: String },

    #[error("`{name}` is not a primitive type")]
    NotPrimitive { name: String },

    #[error("wrapper handle space exhausted at base {base}")]
    HandleSpaceExhausted { base: u32 },

    #[error(transparent)]
    Intern(#[from] InternError),
}
