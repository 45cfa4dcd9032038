//! Type wrappers.

use tx_ir::{BindingId, ElementId, Name, TypeId};

use crate::PrimitiveKind;

/// The static type a [`TypeId`] denotes.
///
/// Handles are the identity; two `TypeData` with equal fields but different
/// handles are distinct wrappers (e.g. the same binding wrapped before and
/// after a reset).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeData {
    pub kind: TypeKind,
    pub origin: TypeOrigin,
}

/// Closed set of type variants.
///
/// `Native` and `Pointer` only exist for interop with the target runtime.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Array { component: TypeId },
    Declared { name: Name },
    Primitive(PrimitiveKind),
    TypeVariable { name: Name },
    Wildcard { bound: Option<TypeId> },
    Intersection { bounds: Vec<TypeId> },
    Executable { params: Vec<TypeId>, return_type: TypeId },
    /// Target-native scalar known only by its spelling (`id`, `NSUInteger`).
    Native { name: Name },
    Pointer { pointee: TypeId },
    NoType,
    NullType,
}

impl TypeKind {
    pub fn is_array(&self) -> bool {
        matches!(self, TypeKind::Array { .. })
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeKind::Primitive(_))
    }
}

/// What a type wrapper stands for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeOrigin {
    /// Wraps a host type binding (or, for executable types, a method binding).
    Native(BindingId),
    /// Type of a generated element: the declared type of a generated type
    /// element, or the executable type of a generated method.
    Generated(ElementId),
    /// Pure synthetic data, structurally interned.
    Synthetic,
}

pub(crate) static NO_TYPE_DATA: TypeData = TypeData {
    kind: TypeKind::NoType,
    origin: TypeOrigin::Synthetic,
};

pub(crate) static NULL_TYPE_DATA: TypeData = TypeData {
    kind: TypeKind::NullType,
    origin: TypeOrigin::Synthetic,
};
