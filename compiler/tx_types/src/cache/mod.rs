//! Binding cache.
//!
//! Maps host bindings to at most one type wrapper and one element wrapper per
//! run. A method binding owns two independent slots: its element (in
//! `element_cache`) and its executable type (in `executable_cache`).
//!
//! Every fallible operation comes in two forms. `try_*` returns the
//! [`ContractViolation`]; the plain form treats it as an internal error,
//! logs it and panics. Absent inputs (`None`) are not errors and come back as
//! `None`.

mod synthetic;

use rustc_hash::FxHashMap;
use tx_ir::{BindingId, ElementId, Name, StringInterner, TypeId};

use crate::generation::Generation;
use crate::ty::{NO_TYPE_DATA, NULL_TYPE_DATA};
use crate::{
    AnnotationMirror, Binding, BindingKind, BindingTable, ContractViolation, ElementData,
    ElementKind, ElementOrigin, GeneratedBinding, GeneratedKind, Modifiers, PrimitiveKind,
    TypeBinding, TypeData, TypeFlags, TypeKind, TypeOrigin,
};

/// The package declaration a package element is wrapped from.
///
/// Host package bindings carry no annotations; the declaration's resolved
/// annotation bindings are passed alongside.
#[derive(Copy, Clone, Debug)]
pub struct PackageDecl<'a> {
    pub binding: BindingId,
    pub annotations: &'a [BindingId],
}

/// Identity-preserving wrapper cache for one translation run.
pub struct BindingCache {
    names: StringInterner,
    types: Generation<TypeData>,
    elements: Generation<ElementData>,
    type_cache: FxHashMap<BindingId, TypeId>,
    executable_cache: FxHashMap<BindingId, TypeId>,
    element_cache: FxHashMap<BindingId, ElementId>,
    /// Structurally interned synthetic types (`Native`, `Pointer`, arrays).
    synthetic_types: FxHashMap<TypeKind, TypeId>,
    /// Executable types of generated methods, dropped when a parameter is added.
    generated_executables: FxHashMap<ElementId, TypeId>,
    generated_packages: FxHashMap<Name, ElementId>,
}

impl BindingCache {
    /// The "no type" wrapper (e.g. of a statement). Valid across resets.
    pub const NO_TYPE: TypeId = TypeId::new(0);
    /// Type of the `null` literal. Valid across resets.
    pub const NULL_TYPE: TypeId = TypeId::new(1);

    const FIRST_TYPE: u32 = 2;

    pub fn new() -> Self {
        Self {
            names: StringInterner::new(),
            types: Generation::starting_at(Self::FIRST_TYPE),
            elements: Generation::starting_at(0),
            type_cache: FxHashMap::default(),
            executable_cache: FxHashMap::default(),
            element_cache: FxHashMap::default(),
            synthetic_types: FxHashMap::default(),
            generated_executables: FxHashMap::default(),
            generated_packages: FxHashMap::default(),
        }
    }

    /// Drop every wrapper.
    ///
    /// Handles issued before the reset become stale; wrapping the same
    /// binding again yields a new, distinct handle. Interned names are keyed
    /// by content and survive, so identifiers are stored once per process.
    pub fn reset(&mut self) {
        tracing::debug!(
            types = self.type_cache.len(),
            elements = self.element_cache.len(),
            "resetting binding cache"
        );
        self.types.reset();
        self.elements.reset();
        self.type_cache.clear();
        self.executable_cache.clear();
        self.element_cache.clear();
        self.synthetic_types.clear();
        self.generated_executables.clear();
        self.generated_packages.clear();
    }

    // --- Names ---

    /// Intern a name; a missing string is a contract violation.
    pub fn try_intern_name(&self, s: Option<&str>) -> Result<Name, ContractViolation> {
        Ok(self.names.try_intern_opt(s)?)
    }

    pub fn intern_name(&self, s: &str) -> Name {
        self.names.intern(s)
    }

    pub fn name_str(&self, name: Name) -> &'static str {
        self.names.lookup(name)
    }

    pub fn names(&self) -> &StringInterner {
        &self.names
    }

    // --- Types ---

    /// Wrap a type binding, creating its wrapper on first sight.
    ///
    /// A host binding may carry several type flags at once. They are tried
    /// in a fixed order: array, intersection, primitive (native interop,
    /// then `void`, then value primitives), type variable, wildcard, and
    /// finally declared.
    pub fn try_wrap_type(
        &mut self,
        table: &BindingTable,
        binding: Option<&Binding>,
    ) -> Result<Option<TypeId>, ContractViolation> {
        let Some(binding) = binding else {
            return Ok(None);
        };
        let ty = match binding {
            Binding::Native(id) => self.try_wrap_native_type(table, *id)?,
            Binding::Generated(GeneratedBinding {
                element,
                kind: GeneratedKind::Type,
                ..
            }) => self
                .try_element(*element)?
                .ty
                .ok_or_else(|| not_a_type(table, binding))?,
            Binding::NativeType(name) => self.intern_synthetic(TypeKind::Native { name: *name }),
            Binding::Pointer(pointee) => {
                let pointee = self
                    .try_wrap_type(table, pointee.as_deref())?
                    .unwrap_or(Self::NULL_TYPE);
                self.intern_synthetic(TypeKind::Pointer { pointee })
            }
            Binding::Generated(_) | Binding::GeneratedPackage(_) => {
                return Err(not_a_type(table, binding));
            }
        };
        Ok(Some(ty))
    }

    pub fn wrap_type(&mut self, table: &BindingTable, binding: Option<&Binding>) -> Option<TypeId> {
        self.try_wrap_type(table, binding)
            .unwrap_or_else(|err| fatal(&err))
    }

    /// Wrap a host type binding known to be present.
    pub fn try_wrap_native_type(
        &mut self,
        table: &BindingTable,
        id: BindingId,
    ) -> Result<TypeId, ContractViolation> {
        if let Some(&ty) = self.type_cache.get(&id) {
            return Ok(ty);
        }
        let binding = type_binding(table, id)?;
        let kind = self.type_kind_of(table, id, binding)?;
        let ty = TypeId::new(self.types.push(TypeData {
            kind,
            origin: TypeOrigin::Native(id),
        }));
        tracing::trace!(?id, ?ty, name = %binding.name, "wrapped type binding");
        self.type_cache.insert(id, ty);
        Ok(ty)
    }

    pub fn wrap_native_type(&mut self, table: &BindingTable, id: BindingId) -> TypeId {
        self.try_wrap_native_type(table, id)
            .unwrap_or_else(|err| fatal(&err))
    }

    fn type_kind_of(
        &mut self,
        table: &BindingTable,
        id: BindingId,
        binding: &TypeBinding,
    ) -> Result<TypeKind, ContractViolation> {
        let flags = binding.flags;
        let kind = if flags.contains(TypeFlags::ARRAY) {
            let component = binding
                .component
                .ok_or_else(|| ContractViolation::MalformedArrayBinding {
                    binding: describe(table, &Binding::Native(id)),
                })?;
            TypeKind::Array {
                component: self.try_wrap_native_type(table, component)?,
            }
        } else if flags.contains(TypeFlags::INTERSECTION) {
            let bounds = binding
                .bounds
                .iter()
                .map(|&bound| self.try_wrap_native_type(table, bound))
                .collect::<Result<_, _>>()?;
            TypeKind::Intersection { bounds }
        } else if flags.contains(TypeFlags::PRIMITIVE) {
            if flags.contains(TypeFlags::NATIVE) {
                TypeKind::Native {
                    name: self.try_intern_name(Some(&binding.name))?,
                }
            } else if binding.binary_name == "V" {
                TypeKind::NoType
            } else {
                let mut chars = binding.binary_name.chars();
                match (chars.next().and_then(PrimitiveKind::from_descriptor), chars.next()) {
                    (Some(kind), None) => TypeKind::Primitive(kind),
                    _ => {
                        return Err(ContractViolation::NotPrimitive {
                            name: binding.name.clone(),
                        })
                    }
                }
            }
        } else if flags.contains(TypeFlags::TYPE_VARIABLE) {
            TypeKind::TypeVariable {
                name: self.try_intern_name(Some(&binding.name))?,
            }
        } else if flags.contains(TypeFlags::WILDCARD) {
            let bound = match binding.bounds.first() {
                Some(&bound) => Some(self.try_wrap_native_type(table, bound)?),
                None => None,
            };
            TypeKind::Wildcard { bound }
        } else {
            TypeKind::Declared {
                name: self.try_intern_name(Some(&binding.name))?,
            }
        };
        Ok(kind)
    }

    /// Wrap the executable type of a host method binding.
    ///
    /// Independent of the method's element: the same binding has one element
    /// and one executable type.
    pub fn try_wrap_executable_type(
        &mut self,
        table: &BindingTable,
        method: Option<BindingId>,
    ) -> Result<Option<TypeId>, ContractViolation> {
        let Some(id) = method else {
            return Ok(None);
        };
        if let Some(&ty) = self.executable_cache.get(&id) {
            return Ok(Some(ty));
        }
        let Some(BindingKind::Method(binding)) = table.get(id).map(|b| &b.kind) else {
            return Err(ContractViolation::NotAMethodBinding {
                binding: describe(table, &Binding::Native(id)),
            });
        };
        let params = binding
            .parameter_types
            .iter()
            .map(|&param| self.try_wrap_native_type(table, param))
            .collect::<Result<_, _>>()?;
        let return_type = match binding.return_type {
            Some(ret) => self.try_wrap_native_type(table, ret)?,
            None => Self::NO_TYPE,
        };
        let ty = TypeId::new(self.types.push(TypeData {
            kind: TypeKind::Executable {
                params,
                return_type,
            },
            origin: TypeOrigin::Native(id),
        }));
        tracing::trace!(?id, ?ty, name = %binding.name, "wrapped executable type");
        self.executable_cache.insert(id, ty);
        Ok(Some(ty))
    }

    pub fn wrap_executable_type(
        &mut self,
        table: &BindingTable,
        method: Option<BindingId>,
    ) -> Option<TypeId> {
        self.try_wrap_executable_type(table, method)
            .unwrap_or_else(|err| fatal(&err))
    }

    // --- Elements ---

    /// Wrap any binding into its element.
    ///
    /// Bindings of generated elements resolve straight to that element
    /// without touching the cache.
    pub fn try_wrap_element(
        &mut self,
        table: &BindingTable,
        binding: Option<&Binding>,
    ) -> Result<Option<ElementId>, ContractViolation> {
        let Some(binding) = binding else {
            return Ok(None);
        };
        let element = match binding {
            Binding::Native(id) => self.try_wrap_native_element(table, *id)?,
            Binding::Generated(generated) => {
                self.try_element(generated.element)?;
                generated.element
            }
            Binding::GeneratedPackage(name) => self.new_package_element(*name),
            Binding::NativeType(_) | Binding::Pointer(_) => {
                return Err(ContractViolation::UnknownElementBinding {
                    binding: describe(table, binding),
                });
            }
        };
        Ok(Some(element))
    }

    pub fn wrap_element(
        &mut self,
        table: &BindingTable,
        binding: Option<&Binding>,
    ) -> Option<ElementId> {
        self.try_wrap_element(table, binding)
            .unwrap_or_else(|err| fatal(&err))
    }

    fn try_wrap_native_element(
        &mut self,
        table: &BindingTable,
        id: BindingId,
    ) -> Result<ElementId, ContractViolation> {
        if let Some(&element) = self.element_cache.get(&id) {
            return Ok(element);
        }
        let data = table
            .get(id)
            .ok_or(ContractViolation::DanglingBinding { id })?;
        let element = match &data.kind {
            BindingKind::Method(method) => {
                let enclosing = self.wrap_enclosing(table, method.declaring)?;
                let ty = self.try_wrap_executable_type(table, Some(id))?;
                let return_type = match method.return_type {
                    Some(ret) => self.try_wrap_native_type(table, ret)?,
                    None => Self::NO_TYPE,
                };
                ElementData {
                    name: self.try_intern_name(Some(&method.name))?,
                    kind: ElementKind::Executable {
                        selector: None,
                        parameters: Vec::new(),
                        return_type,
                    },
                    origin: ElementOrigin::Native(id),
                    modifiers: method.modifiers,
                    enclosing,
                    ty,
                    annotations: self.mirrors(table, &method.annotations)?,
                }
            }
            BindingKind::Package(package) => ElementData {
                name: self.try_intern_name(Some(&package.name))?,
                kind: ElementKind::Package,
                origin: ElementOrigin::Native(id),
                modifiers: Modifiers::empty(),
                enclosing: None,
                ty: None,
                annotations: Vec::new(),
            },
            BindingKind::Type(ty) => {
                let kind = if ty.flags.contains(TypeFlags::TYPE_VARIABLE) {
                    ElementKind::TypeParameter
                } else {
                    ElementKind::Type
                };
                ElementData {
                    name: self.try_intern_name(Some(simple_name(&ty.name)))?,
                    kind,
                    origin: ElementOrigin::Native(id),
                    modifiers: ty.modifiers,
                    enclosing: self.wrap_enclosing(table, ty.declaring)?,
                    ty: Some(self.try_wrap_native_type(table, id)?),
                    annotations: self.mirrors(table, &ty.annotations)?,
                }
            }
            BindingKind::Variable(var) => {
                let ty = match var.ty {
                    Some(ty) => Some(self.try_wrap_native_type(table, ty)?),
                    None => None,
                };
                ElementData {
                    name: self.try_intern_name(Some(&var.name))?,
                    kind: ElementKind::Variable {
                        is_field: var.is_field,
                    },
                    origin: ElementOrigin::Native(id),
                    modifiers: var.modifiers,
                    enclosing: self.wrap_enclosing(table, var.declaring)?,
                    ty,
                    annotations: self.mirrors(table, &var.annotations)?,
                }
            }
            BindingKind::Annotation(_) => {
                return Err(ContractViolation::UnknownElementBinding {
                    binding: data.describe(id),
                });
            }
        };
        let kind = element.kind.describe();
        let element = ElementId::new(self.elements.push(element));
        tracing::trace!(?id, ?element, kind, "wrapped element binding");
        self.element_cache.insert(id, element);
        Ok(element)
    }

    fn wrap_enclosing(
        &mut self,
        table: &BindingTable,
        declaring: Option<BindingId>,
    ) -> Result<Option<ElementId>, ContractViolation> {
        declaring
            .map(|id| self.try_wrap_native_element(table, id))
            .transpose()
    }

    fn mirrors(
        &mut self,
        table: &BindingTable,
        annotations: &[BindingId],
    ) -> Result<Vec<AnnotationMirror>, ContractViolation> {
        annotations
            .iter()
            .map(|&id| {
                let Some(BindingKind::Annotation(annotation)) = table.get(id).map(|b| &b.kind)
                else {
                    return Err(ContractViolation::NotAnAnnotationBinding {
                        binding: describe(table, &Binding::Native(id)),
                    });
                };
                Ok(AnnotationMirror {
                    binding: id,
                    annotation_type: self.try_wrap_native_type(table, annotation.annotation_type)?,
                })
            })
            .collect()
    }

    /// Wrap a package element and attach the declaration's annotations the
    /// first time they are seen.
    ///
    /// Enrichment happens once: an element that already carries annotations
    /// is returned unchanged.
    pub fn try_wrap_package_element_from_declaration(
        &mut self,
        table: &BindingTable,
        decl: &PackageDecl<'_>,
    ) -> Result<ElementId, ContractViolation> {
        let element = self
            .try_wrap_package_element(table, Some(&Binding::Native(decl.binding)))?
            .ok_or(ContractViolation::DanglingBinding { id: decl.binding })?;
        if self.try_element(element)?.annotations.is_empty() && !decl.annotations.is_empty() {
            let mirrors = self.mirrors(table, decl.annotations)?;
            tracing::debug!(?element, count = mirrors.len(), "attached package annotations");
            if let Some(data) = self.elements.get_mut(element.raw()) {
                data.annotations = mirrors;
            }
        }
        Ok(element)
    }

    pub fn wrap_package_element_from_declaration(
        &mut self,
        table: &BindingTable,
        decl: &PackageDecl<'_>,
    ) -> ElementId {
        self.try_wrap_package_element_from_declaration(table, decl)
            .unwrap_or_else(|err| fatal(&err))
    }

    // --- Typed element wrappers ---

    pub fn try_wrap_type_element(
        &mut self,
        table: &BindingTable,
        binding: Option<&Binding>,
    ) -> Result<Option<ElementId>, ContractViolation> {
        self.wrap_checked(table, binding, "type", |kind| {
            matches!(kind, ElementKind::Type | ElementKind::TypeParameter)
        })
    }

    pub fn try_wrap_executable_element(
        &mut self,
        table: &BindingTable,
        binding: Option<&Binding>,
    ) -> Result<Option<ElementId>, ContractViolation> {
        self.wrap_checked(table, binding, "executable", |kind| {
            matches!(kind, ElementKind::Executable { .. })
        })
    }

    pub fn try_wrap_variable_element(
        &mut self,
        table: &BindingTable,
        binding: Option<&Binding>,
    ) -> Result<Option<ElementId>, ContractViolation> {
        self.wrap_checked(table, binding, "variable", |kind| {
            matches!(kind, ElementKind::Variable { .. })
        })
    }

    pub fn try_wrap_package_element(
        &mut self,
        table: &BindingTable,
        binding: Option<&Binding>,
    ) -> Result<Option<ElementId>, ContractViolation> {
        self.wrap_checked(table, binding, "package", |kind| {
            matches!(kind, ElementKind::Package)
        })
    }

    fn wrap_checked(
        &mut self,
        table: &BindingTable,
        binding: Option<&Binding>,
        expected: &'static str,
        accepts: impl Fn(&ElementKind) -> bool,
    ) -> Result<Option<ElementId>, ContractViolation> {
        let Some(element) = self.try_wrap_element(table, binding)? else {
            return Ok(None);
        };
        let data = self.try_element(element)?;
        if accepts(&data.kind) {
            Ok(Some(element))
        } else {
            Err(ContractViolation::WrongElementKind {
                name: self.name_str(data.name).to_owned(),
                expected,
                found: data.kind.describe(),
            })
        }
    }

    // --- Unwrapping ---

    /// The binding an element stands for.
    ///
    /// Host elements give back their stored binding. Generated elements give
    /// a freshly built synthetic binding of the matching family.
    pub fn try_unwrap(
        &self,
        element: Option<ElementId>,
    ) -> Result<Option<Binding>, ContractViolation> {
        let Some(element) = element else {
            return Ok(None);
        };
        let data = self.try_element(element)?;
        let binding = match (data.origin, &data.kind) {
            (ElementOrigin::Native(id), _) => Binding::Native(id),
            (ElementOrigin::Generated, ElementKind::Variable { .. }) => {
                generated(element, GeneratedKind::Variable, data.name)
            }
            (ElementOrigin::Generated, ElementKind::Executable { .. }) => {
                generated(element, GeneratedKind::Method, data.name)
            }
            (ElementOrigin::Generated, ElementKind::Type | ElementKind::TypeParameter) => {
                generated(element, GeneratedKind::Type, data.name)
            }
            (ElementOrigin::Generated, ElementKind::Package) => Binding::GeneratedPackage(data.name),
        };
        Ok(Some(binding))
    }

    pub fn unwrap(&self, element: Option<ElementId>) -> Option<Binding> {
        self.try_unwrap(element).unwrap_or_else(|err| fatal(&err))
    }

    /// Unwrap an element expected to be a type.
    pub fn try_unwrap_type_element(
        &self,
        element: Option<ElementId>,
    ) -> Result<Option<Binding>, ContractViolation> {
        self.unwrap_checked(element, "type", |kind| {
            matches!(kind, ElementKind::Type | ElementKind::TypeParameter)
        })
    }

    pub fn try_unwrap_variable_element(
        &self,
        element: Option<ElementId>,
    ) -> Result<Option<Binding>, ContractViolation> {
        self.unwrap_checked(element, "variable", |kind| {
            matches!(kind, ElementKind::Variable { .. })
        })
    }

    pub fn try_unwrap_executable_element(
        &self,
        element: Option<ElementId>,
    ) -> Result<Option<Binding>, ContractViolation> {
        self.unwrap_checked(element, "executable", |kind| {
            matches!(kind, ElementKind::Executable { .. })
        })
    }

    fn unwrap_checked(
        &self,
        element: Option<ElementId>,
        expected: &'static str,
        accepts: impl Fn(&ElementKind) -> bool,
    ) -> Result<Option<Binding>, ContractViolation> {
        if let Some(id) = element {
            let data = self.try_element(id)?;
            if !accepts(&data.kind) {
                return Err(ContractViolation::WrongElementKind {
                    name: self.name_str(data.name).to_owned(),
                    expected,
                    found: data.kind.describe(),
                });
            }
        }
        self.try_unwrap(element)
    }

    /// The binding behind any type wrapper, including the method binding of
    /// an executable type.
    pub fn try_unwrap_to_binding(
        &self,
        table: &BindingTable,
        ty: Option<TypeId>,
    ) -> Result<Option<Binding>, ContractViolation> {
        let Some(ty) = ty else {
            return Ok(None);
        };
        let data = self.try_type_data(ty)?;
        let binding = match (&data.kind, data.origin) {
            (TypeKind::Native { name }, _) => Some(Binding::NativeType(*name)),
            (TypeKind::Pointer { pointee }, _) => {
                let pointee = self.try_unwrap_to_type_binding(table, Some(*pointee))?;
                Some(Binding::Pointer(pointee.map(Box::new)))
            }
            (_, TypeOrigin::Native(id)) => Some(Binding::Native(id)),
            (TypeKind::Executable { .. }, TypeOrigin::Generated(method)) => {
                let name = self.try_element(method)?.name;
                Some(generated(method, GeneratedKind::Method, name))
            }
            (_, TypeOrigin::Generated(element)) => {
                let name = self.try_element(element)?.name;
                Some(generated(element, GeneratedKind::Type, name))
            }
            (TypeKind::NoType, TypeOrigin::Synthetic) => Some(Binding::Native(table.void())),
            (TypeKind::Array { component }, TypeOrigin::Synthetic) => {
                match self.try_unwrap_to_type_binding(table, Some(*component))? {
                    Some(Binding::Native(component)) => {
                        table.find_array_of(component).map(Binding::Native)
                    }
                    _ => None,
                }
            }
            (_, TypeOrigin::Synthetic) => None,
        };
        Ok(binding)
    }

    pub fn unwrap_to_binding(&self, table: &BindingTable, ty: Option<TypeId>) -> Option<Binding> {
        self.try_unwrap_to_binding(table, ty)
            .unwrap_or_else(|err| fatal(&err))
    }

    /// The type binding behind a type wrapper, or `None` if the wrapper
    /// resolves to something other than a type binding.
    pub fn try_unwrap_to_type_binding(
        &self,
        table: &BindingTable,
        ty: Option<TypeId>,
    ) -> Result<Option<Binding>, ContractViolation> {
        let binding = self.try_unwrap_to_binding(table, ty)?;
        Ok(binding.filter(|binding| match binding {
            Binding::Native(id) => {
                matches!(table.get(*id).map(|b| &b.kind), Some(BindingKind::Type(_)))
            }
            Binding::Generated(generated) => generated.kind == GeneratedKind::Type,
            Binding::NativeType(_) | Binding::Pointer(_) => true,
            Binding::GeneratedPackage(_) => false,
        }))
    }

    pub fn unwrap_to_type_binding(
        &self,
        table: &BindingTable,
        ty: Option<TypeId>,
    ) -> Option<Binding> {
        self.try_unwrap_to_type_binding(table, ty)
            .unwrap_or_else(|err| fatal(&err))
    }

    /// The host binding of an annotation mirror.
    pub fn unwrap_annotation(&self, mirror: &AnnotationMirror) -> Binding {
        Binding::Native(mirror.binding)
    }

    // --- Accessors ---

    pub fn try_type_data(&self, ty: TypeId) -> Result<&TypeData, ContractViolation> {
        match ty {
            Self::NO_TYPE => Ok(&NO_TYPE_DATA),
            Self::NULL_TYPE => Ok(&NULL_TYPE_DATA),
            _ => self
                .types
                .get(ty.raw())
                .ok_or_else(|| ContractViolation::StaleHandle {
                    handle: format!("{ty:?}"),
                }),
        }
    }

    pub fn type_data(&self, ty: TypeId) -> &TypeData {
        self.try_type_data(ty).unwrap_or_else(|err| fatal(&err))
    }

    pub fn try_element(&self, element: ElementId) -> Result<&ElementData, ContractViolation> {
        self.elements
            .get(element.raw())
            .ok_or_else(|| ContractViolation::StaleHandle {
                handle: format!("{element:?}"),
            })
    }

    pub fn element(&self, element: ElementId) -> &ElementData {
        self.try_element(element).unwrap_or_else(|err| fatal(&err))
    }

    pub fn element_name(&self, element: ElementId) -> &'static str {
        self.name_str(self.element(element).name)
    }

    /// Component type of an array type.
    pub fn component_type(&self, ty: TypeId) -> Option<TypeId> {
        match self.type_data(ty).kind {
            TypeKind::Array { component } => Some(component),
            _ => None,
        }
    }

    pub fn is_array(&self, ty: TypeId) -> bool {
        self.type_data(ty).kind.is_array()
    }

    pub fn is_primitive(&self, ty: TypeId) -> bool {
        self.type_data(ty).kind.is_primitive()
    }

    pub fn primitive_kind(&self, ty: TypeId) -> Option<PrimitiveKind> {
        match self.type_data(ty).kind {
            TypeKind::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// Plural category used in runtime array selectors (`Ints`, `Booleans`).
    pub fn try_category_name(&self, ty: TypeId) -> Result<&'static str, ContractViolation> {
        self.primitive_kind(ty)
            .map(PrimitiveKind::category_name)
            .ok_or_else(|| ContractViolation::NotPrimitive {
                name: self.type_display(ty),
            })
    }

    /// Source-style rendering of a type, for diagnostics.
    pub fn type_display(&self, ty: TypeId) -> String {
        let Ok(data) = self.try_type_data(ty) else {
            return format!("<stale {ty:?}>");
        };
        match &data.kind {
            TypeKind::Array { component } => format!("{}[]", self.type_display(*component)),
            TypeKind::Declared { name }
            | TypeKind::TypeVariable { name }
            | TypeKind::Native { name } => self.name_str(*name).to_owned(),
            TypeKind::Primitive(kind) => kind.keyword().to_owned(),
            TypeKind::Wildcard { bound: None } => "?".to_owned(),
            TypeKind::Wildcard { bound: Some(bound) } => {
                format!("? extends {}", self.type_display(*bound))
            }
            TypeKind::Intersection { bounds } => bounds
                .iter()
                .map(|b| self.type_display(*b))
                .collect::<Vec<_>>()
                .join(" & "),
            TypeKind::Executable {
                params,
                return_type,
            } => {
                let params: Vec<_> = params.iter().map(|p| self.type_display(*p)).collect();
                format!("({}) -> {}", params.join(", "), self.type_display(*return_type))
            }
            TypeKind::Pointer { pointee } => format!("{} *", self.type_display(*pointee)),
            TypeKind::NoType => "void".to_owned(),
            TypeKind::NullType => "null".to_owned(),
        }
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

impl Default for BindingCache {
    fn default() -> Self {
        Self::new()
    }
}

fn generated(element: ElementId, kind: GeneratedKind, name: Name) -> Binding {
    Binding::Generated(GeneratedBinding {
        element,
        kind,
        name,
    })
}

fn type_binding(table: &BindingTable, id: BindingId) -> Result<&TypeBinding, ContractViolation> {
    match table.get(id) {
        Some(data) => match &data.kind {
            BindingKind::Type(binding) => Ok(binding),
            _ => Err(ContractViolation::NotATypeBinding {
                binding: data.describe(id),
            }),
        },
        None => Err(ContractViolation::DanglingBinding { id }),
    }
}

fn not_a_type(table: &BindingTable, binding: &Binding) -> ContractViolation {
    ContractViolation::NotATypeBinding {
        binding: describe(table, binding),
    }
}

/// Last segment of a qualified name.
fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

fn describe(table: &BindingTable, binding: &Binding) -> String {
    match binding {
        Binding::Native(id) => match table.get(*id) {
            Some(data) => data.describe(*id),
            None => format!("dangling {id:?}"),
        },
        Binding::Generated(generated) => {
            format!("generated {:?} binding for {:?}", generated.kind, generated.element)
        }
        Binding::GeneratedPackage(name) => format!("generated package binding {name:?}"),
        Binding::NativeType(name) => format!("native type binding {name:?}"),
        Binding::Pointer(Some(pointee)) => format!("pointer to {}", describe(table, pointee)),
        Binding::Pointer(None) => "pointer to an unresolved type".to_owned(),
    }
}

/// Report an internal contract violation and abort the run.
#[cold]
#[track_caller]
pub(crate) fn fatal(err: &ContractViolation) -> ! {
    tracing::error!(%err, "binding cache contract violation");
    panic!("binding cache contract violation: {err}")
}

#[cfg(test)]
mod tests;
