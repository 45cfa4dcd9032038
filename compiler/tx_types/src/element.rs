//! Element wrappers.

use tx_ir::{BindingId, ElementId, Name, TypeId};

use crate::Modifiers;

/// A named program entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementData {
    /// Simple name. For methods created from a selector this is the part
    /// before the first `:`.
    pub name: Name,
    pub kind: ElementKind,
    pub origin: ElementOrigin,
    pub modifiers: Modifiers,
    pub enclosing: Option<ElementId>,
    /// Declared type of a type element, field type of a variable, or the
    /// executable type of a host method. Generated methods compute theirs on
    /// demand (see `BindingCache::executable_type_of`).
    pub ty: Option<TypeId>,
    pub annotations: Vec<AnnotationMirror>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Type,
    Executable {
        /// Full selector for generated runtime methods.
        selector: Option<Name>,
        /// Parameter elements of generated methods. Host methods only carry
        /// parameter types, in their executable type.
        parameters: Vec<ElementId>,
        return_type: TypeId,
    },
    Variable {
        is_field: bool,
    },
    Package,
    TypeParameter,
}

impl ElementKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ElementKind::Type => "type",
            ElementKind::Executable { .. } => "executable",
            ElementKind::Variable { .. } => "variable",
            ElementKind::Package => "package",
            ElementKind::TypeParameter => "type parameter",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementOrigin {
    Native(BindingId),
    /// Fabricated by the translator; never reachable through the binding map.
    Generated,
}

/// An annotation attached to an element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnnotationMirror {
    /// The host annotation binding.
    pub binding: BindingId,
    pub annotation_type: TypeId,
}
