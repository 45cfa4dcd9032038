//! Runtime type environment.
//!
//! Owns the synthetic elements for the runtime classes lowered code calls
//! into (`IOSIntArray`, `IOSObjectArray`, `IOSClass`, ...) and the interop
//! scalar `id`. One environment lives for one translation run.

use rustc_hash::FxHashMap;
use tx_ir::{ElementId, Name, TypeId};
use tx_types::{Binding, BindingCache, BindingTable, Modifiers, PrimitiveKind};

/// Runtime class backing arrays of a primitive component.
fn primitive_array_class(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Boolean => "IOSBooleanArray",
        PrimitiveKind::Byte => "IOSByteArray",
        PrimitiveKind::Char => "IOSCharArray",
        PrimitiveKind::Short => "IOSShortArray",
        PrimitiveKind::Int => "IOSIntArray",
        PrimitiveKind::Long => "IOSLongArray",
        PrimitiveKind::Float => "IOSFloatArray",
        PrimitiveKind::Double => "IOSDoubleArray",
    }
}

pub struct TypeEnv<'a> {
    bindings: &'a BindingTable,
    cache: &'a mut BindingCache,
    primitive_arrays: [ElementId; 8],
    object_array: ElementId,
    ios_class: ElementId,
    id_type: TypeId,
    /// Generated runtime methods by declaring class and selector.
    methods: FxHashMap<(ElementId, Name), ElementId>,
    /// Generated `size` fields by array class.
    size_fields: FxHashMap<ElementId, ElementId>,
}

impl<'a> TypeEnv<'a> {
    pub fn new(bindings: &'a BindingTable, cache: &'a mut BindingCache) -> Self {
        let public = Modifiers::PUBLIC;
        let primitive_arrays = PrimitiveKind::ALL
            .map(|kind| cache.new_type_element(primitive_array_class(kind), None, public));
        let object_array = cache.new_type_element("IOSObjectArray", None, public);
        let ios_class = cache.new_type_element("IOSClass", None, public);
        let id_type = cache.native_type("id");
        tracing::debug!(?object_array, ?ios_class, "created runtime array classes");
        Self {
            bindings,
            cache,
            primitive_arrays,
            object_array,
            ios_class,
            id_type,
            methods: FxHashMap::default(),
            size_fields: FxHashMap::default(),
        }
    }

    pub fn bindings(&self) -> &BindingTable {
        self.bindings
    }

    pub fn cache(&self) -> &BindingCache {
        &*self.cache
    }

    pub fn cache_mut(&mut self) -> &mut BindingCache {
        &mut *self.cache
    }

    /// The runtime class holding arrays of `component`: one per primitive
    /// kind, `IOSObjectArray` for everything else.
    pub fn resolve_array_type(&self, component: TypeId) -> ElementId {
        match self.cache.primitive_kind(component) {
            Some(kind) => self.primitive_arrays[kind as usize],
            None => self.object_array,
        }
    }

    pub fn object_array_element(&self) -> ElementId {
        self.object_array
    }

    pub fn ios_class_element(&self) -> ElementId {
        self.ios_class
    }

    /// Declared type of a runtime class element.
    pub fn class_type(&self, class: ElementId) -> TypeId {
        self.cache.element(class).ty.unwrap_or(BindingCache::NO_TYPE)
    }

    pub fn ios_class_type(&self) -> TypeId {
        self.class_type(self.ios_class)
    }

    pub fn id_type(&self) -> TypeId {
        self.id_type
    }

    pub fn int_type(&mut self) -> TypeId {
        self.cache.primitive_type(self.bindings, PrimitiveKind::Int)
    }

    pub fn boolean_type(&mut self) -> TypeId {
        self.cache.primitive_type(self.bindings, PrimitiveKind::Boolean)
    }

    pub fn pointer_type(&mut self, pointee: TypeId) -> TypeId {
        self.cache.pointer_type(pointee)
    }

    /// Array type over `component`, preferring the host's own array binding.
    pub fn array_type(&mut self, component: TypeId) -> TypeId {
        let host = match self.cache.unwrap_to_type_binding(self.bindings, Some(component)) {
            Some(Binding::Native(id)) => self.bindings.find_array_of(id),
            _ => None,
        };
        match host {
            Some(array) => self.cache.wrap_native_type(self.bindings, array),
            None => self.cache.synthetic_array_type(component),
        }
    }

    /// A runtime method, created on first use of `selector` on `class`.
    ///
    /// `params` are `(name, type)` pairs, appended only on creation.
    pub fn runtime_method(
        &mut self,
        class: ElementId,
        selector: &str,
        return_type: TypeId,
        modifiers: Modifiers,
        params: &[(&str, TypeId)],
    ) -> ElementId {
        let key = (class, self.cache.intern_name(selector));
        if let Some(&method) = self.methods.get(&key) {
            return method;
        }
        let method = self
            .cache
            .new_method_with_selector(selector, class, return_type, modifiers);
        for &(name, ty) in params {
            self.cache.new_parameter(method, name, ty);
        }
        tracing::trace!(?method, selector, "generated runtime method");
        self.methods.insert(key, method);
        method
    }

    /// The `size` field of a runtime array class.
    pub fn size_field(&mut self, class: ElementId) -> ElementId {
        if let Some(&field) = self.size_fields.get(&class) {
            return field;
        }
        let int = self.int_type();
        let field = self.cache.new_field("size", int, class, Modifiers::PUBLIC);
        self.size_fields.insert(class, field);
        field
    }
}
