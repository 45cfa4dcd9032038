//! Synthetic elements and types.
//!
//! Passes conjure these for runtime-only artifacts: the array support
//! classes, their factory methods and fields, interop scalars such as `id`.
//! Elements created here have a `Generated` origin and never enter the
//! binding-to-element map.

use tx_ir::{ElementId, Name, TypeId};

use super::{fatal, BindingCache};
use crate::{
    BindingTable, ContractViolation, ElementData, ElementKind, ElementOrigin, Modifiers,
    PrimitiveKind, TypeData, TypeKind, TypeOrigin,
};

impl BindingCache {
    /// Intern a structural synthetic type so equal shapes share one handle.
    pub(super) fn intern_synthetic(&mut self, kind: TypeKind) -> TypeId {
        if let Some(&ty) = self.synthetic_types.get(&kind) {
            return ty;
        }
        let ty = TypeId::new(self.types.push(TypeData {
            kind: kind.clone(),
            origin: TypeOrigin::Synthetic,
        }));
        self.synthetic_types.insert(kind, ty);
        ty
    }

    fn push_generated(&mut self, name: Name, kind: ElementKind) -> ElementId {
        ElementId::new(self.elements.push(ElementData {
            name,
            kind,
            origin: ElementOrigin::Generated,
            modifiers: Modifiers::empty(),
            enclosing: None,
            ty: None,
            annotations: Vec::new(),
        }))
    }

    fn generated_mut(&mut self, element: ElementId) -> &mut ElementData {
        match self.elements.get_mut(element.raw()) {
            Some(data) => data,
            None => fatal(&ContractViolation::StaleHandle {
                handle: format!("{element:?}"),
            }),
        }
    }

    /// A generated class or interface with its own declared type.
    pub fn new_type_element(
        &mut self,
        name: &str,
        enclosing: Option<ElementId>,
        modifiers: Modifiers,
    ) -> ElementId {
        let name = self.intern_name(name);
        let element = self.push_generated(name, ElementKind::Type);
        let ty = TypeId::new(self.types.push(TypeData {
            kind: TypeKind::Declared { name },
            origin: TypeOrigin::Generated(element),
        }));
        let data = self.generated_mut(element);
        data.enclosing = enclosing;
        data.modifiers = modifiers;
        data.ty = Some(ty);
        tracing::trace!(?element, ?ty, "generated type element");
        element
    }

    /// A generated method identified by its full runtime selector.
    ///
    /// The element name is the selector up to its first `:`.
    pub fn new_method_with_selector(
        &mut self,
        selector: &str,
        declaring: ElementId,
        return_type: TypeId,
        modifiers: Modifiers,
    ) -> ElementId {
        let name = selector.split(':').next().unwrap_or(selector);
        let name = self.intern_name(name);
        let selector = self.intern_name(selector);
        let element = self.push_generated(
            name,
            ElementKind::Executable {
                selector: Some(selector),
                parameters: Vec::new(),
                return_type,
            },
        );
        let data = self.generated_mut(element);
        data.enclosing = Some(declaring);
        data.modifiers = modifiers;
        element
    }

    /// Append a parameter to a generated method.
    pub fn try_new_parameter(
        &mut self,
        method: ElementId,
        name: &str,
        ty: TypeId,
    ) -> Result<ElementId, ContractViolation> {
        let method_data = self.try_element(method)?;
        if !matches!(method_data.kind, ElementKind::Executable { .. }) {
            return Err(ContractViolation::WrongElementKind {
                name: self.name_str(method_data.name).to_owned(),
                expected: "executable",
                found: method_data.kind.describe(),
            });
        }
        let name = self.try_intern_name(Some(name))?;
        let param = self.push_generated(name, ElementKind::Variable { is_field: false });
        let data = self.generated_mut(param);
        data.enclosing = Some(method);
        data.ty = Some(ty);
        if let ElementKind::Executable { parameters, .. } = &mut self.generated_mut(method).kind {
            parameters.push(param);
        }
        self.generated_executables.remove(&method);
        Ok(param)
    }

    pub fn new_parameter(&mut self, method: ElementId, name: &str, ty: TypeId) -> ElementId {
        self.try_new_parameter(method, name, ty)
            .unwrap_or_else(|err| fatal(&err))
    }

    /// A generated field declared on `declaring`.
    pub fn new_field(
        &mut self,
        name: &str,
        ty: TypeId,
        declaring: ElementId,
        modifiers: Modifiers,
    ) -> ElementId {
        let name = self.intern_name(name);
        let field = self.push_generated(name, ElementKind::Variable { is_field: true });
        let data = self.generated_mut(field);
        data.enclosing = Some(declaring);
        data.ty = Some(ty);
        data.modifiers = modifiers;
        field
    }

    /// The generated package element named `name`, one per name per run.
    pub fn new_package_element(&mut self, name: Name) -> ElementId {
        if let Some(&element) = self.generated_packages.get(&name) {
            return element;
        }
        let element = self.push_generated(name, ElementKind::Package);
        self.generated_packages.insert(name, element);
        element
    }

    /// A target-native scalar type such as `id`.
    pub fn native_type(&mut self, name: &str) -> TypeId {
        let name = self.intern_name(name);
        self.intern_synthetic(TypeKind::Native { name })
    }

    pub fn pointer_type(&mut self, pointee: TypeId) -> TypeId {
        self.intern_synthetic(TypeKind::Pointer { pointee })
    }

    /// Array type over `component` with no host binding behind it.
    pub fn synthetic_array_type(&mut self, component: TypeId) -> TypeId {
        self.intern_synthetic(TypeKind::Array { component })
    }

    /// The wrapper of a primitive's host binding.
    pub fn primitive_type(&mut self, table: &BindingTable, kind: PrimitiveKind) -> TypeId {
        self.wrap_native_type(table, table.primitive(kind))
    }

    /// Executable type of a method element.
    ///
    /// Host methods carry theirs from wrapping. Generated methods build one
    /// from their current parameters, cached until a parameter is added.
    pub fn try_executable_type_of(&mut self, method: ElementId) -> Result<TypeId, ContractViolation> {
        let data = self.try_element(method)?;
        let ElementKind::Executable {
            parameters,
            return_type,
            ..
        } = &data.kind
        else {
            return Err(ContractViolation::WrongElementKind {
                name: self.name_str(data.name).to_owned(),
                expected: "executable",
                found: data.kind.describe(),
            });
        };
        if let Some(ty) = data.ty {
            return Ok(ty);
        }
        if let Some(&ty) = self.generated_executables.get(&method) {
            return Ok(ty);
        }
        let return_type = *return_type;
        let params = parameters
            .iter()
            .map(|&param| {
                self.try_element(param)
                    .map(|p| p.ty.unwrap_or(Self::NO_TYPE))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let ty = TypeId::new(self.types.push(TypeData {
            kind: TypeKind::Executable {
                params,
                return_type,
            },
            origin: TypeOrigin::Generated(method),
        }));
        self.generated_executables.insert(method, ty);
        Ok(ty)
    }

    pub fn executable_type_of(&mut self, method: ElementId) -> TypeId {
        self.try_executable_type_of(method)
            .unwrap_or_else(|err| fatal(&err))
    }
}
