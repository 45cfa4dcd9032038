//! Native binding model.
//!
//! This is the surface the host analyzer fills in: one [`BindingData`] per
//! program entity, addressed by a stable [`BindingId`]. The translator never
//! mutates a binding; it only reads facts from it and uses its id as a cache
//! key.
//!
//! [`Binding`] is the value the cache consumes and `unwrap` produces. Besides
//! host bindings it covers the synthetic bindings the translator fabricates
//! for generated elements and interop types.

use tx_ir::{BindingId, ElementId, Name};

use crate::PrimitiveKind;

bitflags::bitflags! {
    /// Facts about a type binding. Several may hold at once; the cache
    /// resolves overlaps by a fixed priority.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u16 {
        const ARRAY = 1 << 0;
        const INTERSECTION = 1 << 1;
        const PRIMITIVE = 1 << 2;
        /// Interop marker for target-native scalar types.
        const NATIVE = 1 << 3;
        const TYPE_VARIABLE = 1 << 4;
        const WILDCARD = 1 << 5;
        const INTERFACE = 1 << 6;
        const ENUM = 1 << 7;
    }
}

bitflags::bitflags! {
    /// Declaration modifiers.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
    }
}

/// A host type binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeBinding {
    /// Fully qualified source name (`java.lang.String`, `int`, `T`).
    pub name: String,
    /// Binary descriptor (`Ljava/lang/String;`, `I`, `V`, `[I`).
    pub binary_name: String,
    pub flags: TypeFlags,
    /// Element type of an array binding.
    pub component: Option<BindingId>,
    /// Intersection members, or the bound of a wildcard.
    pub bounds: Vec<BindingId>,
    /// Enclosing type or package.
    pub declaring: Option<BindingId>,
    pub modifiers: Modifiers,
    pub annotations: Vec<BindingId>,
}

impl TypeBinding {
    fn bare(name: &str, binary_name: String, flags: TypeFlags) -> Self {
        Self {
            name: name.to_owned(),
            binary_name,
            flags,
            component: None,
            bounds: Vec::new(),
            declaring: None,
            modifiers: Modifiers::empty(),
            annotations: Vec::new(),
        }
    }

    /// A class or interface named by its qualified name.
    pub fn declared(qualified_name: &str) -> Self {
        let binary = format!("L{};", qualified_name.replace('.', "/"));
        Self::bare(qualified_name, binary, TypeFlags::empty())
    }

    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::bare(kind.keyword(), kind.descriptor().to_string(), TypeFlags::PRIMITIVE)
    }

    pub fn void() -> Self {
        Self::bare("void", "V".to_owned(), TypeFlags::PRIMITIVE)
    }

    /// A target-native scalar (e.g. `id`, `NSUInteger`) exposed to the host as a primitive.
    pub fn native(name: &str) -> Self {
        Self::bare(name, name.to_owned(), TypeFlags::PRIMITIVE | TypeFlags::NATIVE)
    }

    pub fn type_variable(name: &str) -> Self {
        Self::bare(name, format!("T{name};"), TypeFlags::TYPE_VARIABLE)
    }

    pub fn wildcard(bound: Option<BindingId>) -> Self {
        let mut binding = Self::bare("?", "*".to_owned(), TypeFlags::WILDCARD);
        binding.bounds.extend(bound);
        binding
    }

    pub fn intersection(bounds: Vec<BindingId>) -> Self {
        let mut binding = Self::bare("", String::new(), TypeFlags::INTERSECTION);
        binding.bounds = bounds;
        binding
    }

    #[must_use]
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_declaring(mut self, declaring: BindingId) -> Self {
        self.declaring = Some(declaring);
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: Vec<BindingId>) -> Self {
        self.annotations = annotations;
        self
    }
}

/// A host method binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodBinding {
    pub name: String,
    pub declaring: Option<BindingId>,
    /// `None` for constructors.
    pub return_type: Option<BindingId>,
    pub parameter_types: Vec<BindingId>,
    pub modifiers: Modifiers,
    pub annotations: Vec<BindingId>,
}

/// A host variable binding (field, parameter or local).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableBinding {
    pub name: String,
    pub ty: Option<BindingId>,
    pub declaring: Option<BindingId>,
    pub is_field: bool,
    pub modifiers: Modifiers,
    pub annotations: Vec<BindingId>,
}

/// A host package binding. Hosts do not attach package annotations here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageBinding {
    pub name: String,
}

/// A resolved annotation use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotationBinding {
    pub annotation_type: BindingId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingKind {
    Type(TypeBinding),
    Method(MethodBinding),
    Variable(VariableBinding),
    Package(PackageBinding),
    Annotation(AnnotationBinding),
}

impl BindingKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            BindingKind::Type(_) => "type",
            BindingKind::Method(_) => "method",
            BindingKind::Variable(_) => "variable",
            BindingKind::Package(_) => "package",
            BindingKind::Annotation(_) => "annotation",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingData {
    pub kind: BindingKind,
}

impl BindingData {
    /// Human-readable description for diagnostics.
    pub fn describe(&self, id: BindingId) -> String {
        let name = match &self.kind {
            BindingKind::Type(t) => t.name.as_str(),
            BindingKind::Method(m) => m.name.as_str(),
            BindingKind::Variable(v) => v.name.as_str(),
            BindingKind::Package(p) => p.name.as_str(),
            BindingKind::Annotation(_) => "@",
        };
        format!("{} binding `{name}` ({id:?})", self.kind.kind_name())
    }
}

/// Arena of host bindings.
///
/// Primitive and `void` bindings are registered at construction so every
/// table agrees on them.
#[derive(Clone, Debug)]
pub struct BindingTable {
    bindings: Vec<BindingData>,
    primitives: [BindingId; 8],
    void: BindingId,
}

impl BindingTable {
    pub fn new() -> Self {
        let mut bindings = Vec::with_capacity(64);
        let mut register = |binding: TypeBinding| {
            let id = BindingId::new(to_raw(bindings.len()));
            bindings.push(BindingData {
                kind: BindingKind::Type(binding),
            });
            id
        };
        let primitives = PrimitiveKind::ALL.map(|kind| register(TypeBinding::primitive(kind)));
        let void = register(TypeBinding::void());
        Self {
            bindings,
            primitives,
            void,
        }
    }

    pub fn add(&mut self, kind: BindingKind) -> BindingId {
        let id = BindingId::new(to_raw(self.bindings.len()));
        self.bindings.push(BindingData { kind });
        id
    }

    pub fn add_type(&mut self, binding: TypeBinding) -> BindingId {
        self.add(BindingKind::Type(binding))
    }

    pub fn add_method(&mut self, binding: MethodBinding) -> BindingId {
        self.add(BindingKind::Method(binding))
    }

    pub fn add_variable(&mut self, binding: VariableBinding) -> BindingId {
        self.add(BindingKind::Variable(binding))
    }

    pub fn add_package(&mut self, name: &str) -> BindingId {
        self.add(BindingKind::Package(PackageBinding {
            name: name.to_owned(),
        }))
    }

    pub fn add_annotation(&mut self, annotation_type: BindingId) -> BindingId {
        self.add(BindingKind::Annotation(AnnotationBinding { annotation_type }))
    }

    /// The array binding whose component is `component`, registering it if
    /// the host has not produced one yet.
    pub fn array_of(&mut self, component: BindingId) -> BindingId {
        if let Some(existing) = self.find_array_of(component) {
            return existing;
        }
        let (name, binary) = match self.get(component).map(|b| &b.kind) {
            Some(BindingKind::Type(t)) => (format!("{}[]", t.name), format!("[{}", t.binary_name)),
            _ => (String::from("?[]"), String::from("[?")),
        };
        let mut binding = TypeBinding::bare(&name, binary, TypeFlags::ARRAY);
        binding.component = Some(component);
        self.add_type(binding)
    }

    /// Existing array binding over `component`, if any.
    pub fn find_array_of(&self, component: BindingId) -> Option<BindingId> {
        self.bindings.iter().enumerate().find_map(|(i, b)| match &b.kind {
            BindingKind::Type(t)
                if t.flags.contains(TypeFlags::ARRAY) && t.component == Some(component) =>
            {
                Some(BindingId::new(to_raw(i)))
            }
            _ => None,
        })
    }

    #[inline]
    pub fn get(&self, id: BindingId) -> Option<&BindingData> {
        self.bindings.get(id.index())
    }

    pub fn primitive(&self, kind: PrimitiveKind) -> BindingId {
        self.primitives[kind as usize]
    }

    pub fn void(&self) -> BindingId {
        self.void
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::new()
    }
}

fn to_raw(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("binding table exceeded u32::MAX entries"))
}

/// Which family a generated binding belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeneratedKind {
    Type,
    Method,
    Variable,
}

/// Synthetic binding standing for a generated element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeneratedBinding {
    pub element: ElementId,
    pub kind: GeneratedKind,
    pub name: Name,
}

/// A binding handed to or produced by the cache.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    /// Host binding.
    Native(BindingId),
    /// Binding of a generated variable, method or type element.
    Generated(GeneratedBinding),
    /// Binding of a generated package.
    GeneratedPackage(Name),
    /// Interop type known only by its target spelling.
    NativeType(Name),
    /// Pointer to the wrapped type binding; `None` when the pointee has no
    /// type binding (a synthetic array without a host binding, `null`).
    Pointer(Option<Box<Binding>>),
}

impl Binding {
    /// Recognizes bindings the translator fabricated itself.
    pub fn is_generated(&self) -> bool {
        !matches!(self, Binding::Native(_))
    }
}

impl From<BindingId> for Binding {
    fn from(id: BindingId) -> Self {
        Binding::Native(id)
    }
}
