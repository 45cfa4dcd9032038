//! Semantic bridge between host bindings and the translator's model.
//!
//! The host analyzer describes the program as native bindings
//! ([`BindingTable`]). The [`BindingCache`] wraps each binding into at most
//! one [`TypeData`] and one [`ElementData`] per run, handing out `TypeId` and
//! `ElementId` handles whose equality is wrapper identity. Passes also
//! conjure synthetic elements and types for runtime-only artifacts; those
//! carry a `Generated`/`Synthetic` origin and never enter the binding maps.
//!
//! # Crate Dependencies
//!
//! `tx_types` depends only on `tx_ir` (names and handles). Nothing here
//! knows about tree nodes or passes.

mod binding;
mod cache;
mod element;
mod error;
mod generation;
mod primitive;
mod ty;

pub use binding::{
    AnnotationBinding, Binding, BindingData, BindingKind, BindingTable, GeneratedBinding,
    GeneratedKind, MethodBinding, Modifiers, PackageBinding, TypeBinding, TypeFlags,
    VariableBinding,
};
pub use cache::{BindingCache, PackageDecl};
pub use element::{AnnotationMirror, ElementData, ElementKind, ElementOrigin};
pub use error::ContractViolation;
pub use primitive::PrimitiveKind;
pub use ty::{TypeData, TypeKind, TypeOrigin};
