use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::{MethodBinding, VariableBinding};
use tx_ir::InternError;

struct Fixture {
    table: BindingTable,
    string: BindingId,
    string_array: BindingId,
    length: BindingId,
    concat: BindingId,
    package: BindingId,
}

fn fixture() -> Fixture {
    let mut table = BindingTable::new();
    let package = table.add_package("java.lang");
    let string = table.add_type(TypeBinding::declared("java.lang.String").with_declaring(package));
    let string_array = table.array_of(string);
    let int = table.primitive(PrimitiveKind::Int);
    let length = table.add_variable(VariableBinding {
        name: "count".to_owned(),
        ty: Some(int),
        declaring: Some(string),
        is_field: true,
        modifiers: Modifiers::PRIVATE | Modifiers::FINAL,
        annotations: Vec::new(),
    });
    let concat = table.add_method(MethodBinding {
        name: "concat".to_owned(),
        declaring: Some(string),
        return_type: Some(string),
        parameter_types: vec![string],
        modifiers: Modifiers::PUBLIC,
        annotations: Vec::new(),
    });
    Fixture {
        table,
        string,
        string_array,
        length,
        concat,
        package,
    }
}

fn native(id: BindingId) -> Binding {
    Binding::Native(id)
}

#[test]
fn wrapping_twice_yields_the_same_wrapper() {
    let fx = fixture();
    let mut cache = BindingCache::new();

    let a = cache.wrap_type(&fx.table, Some(&native(fx.string)));
    let b = cache.wrap_type(&fx.table, Some(&native(fx.string)));
    assert!(a.is_some());
    assert_eq!(a, b);

    let e1 = cache.wrap_element(&fx.table, Some(&native(fx.length)));
    let e2 = cache.wrap_element(&fx.table, Some(&native(fx.length)));
    assert!(e1.is_some());
    assert_eq!(e1, e2);
}

#[test]
fn absent_inputs_propagate_as_none() {
    let fx = fixture();
    let mut cache = BindingCache::new();
    assert_eq!(cache.wrap_type(&fx.table, None), None);
    assert_eq!(cache.wrap_element(&fx.table, None), None);
    assert_eq!(cache.wrap_executable_type(&fx.table, None), None);
    assert_eq!(cache.unwrap(None), None);
    assert_eq!(cache.unwrap_to_type_binding(&fx.table, None), None);
}

#[test]
fn reset_produces_fresh_wrappers() {
    let fx = fixture();
    let mut cache = BindingCache::new();
    let before = cache.wrap_native_type(&fx.table, fx.string);
    let element_before = cache.wrap_element(&fx.table, Some(&native(fx.string)));

    cache.reset();
    assert!(cache.try_type_data(before).is_err());

    let after = cache.wrap_native_type(&fx.table, fx.string);
    let element_after = cache.wrap_element(&fx.table, Some(&native(fx.string)));
    assert_ne!(before, after);
    assert_ne!(element_before, element_after);
    assert_eq!(cache.type_display(after), "java.lang.String");
}

#[test]
fn names_survive_reset_with_shared_storage() {
    let mut cache = BindingCache::new();
    let name = cache.intern_name("java.lang.String");
    let text = cache.name_str(name).as_ptr();
    let interned = cache.names().len();

    for _ in 0..3 {
        cache.reset();
        let again = cache.intern_name("java.lang.String");
        assert_eq!(again, name);
        assert_eq!(cache.name_str(again).as_ptr(), text);
    }
    assert_eq!(cache.names().len(), interned);
}

#[test]
fn reset_on_empty_cache_is_harmless() {
    let mut cache = BindingCache::new();
    cache.reset();
    cache.reset();
    assert_eq!(cache.type_count(), 0);
    assert_eq!(cache.type_data(BindingCache::NO_TYPE).kind, TypeKind::NoType);
}

#[test]
fn type_variants_follow_binding_flags() {
    let mut table = BindingTable::new();
    let object = table.add_type(TypeBinding::declared("java.lang.Object"));
    let runnable = table.add_type(
        TypeBinding::declared("java.lang.Runnable").with_flags(TypeFlags::INTERFACE),
    );
    let t = table.add_type(TypeBinding::type_variable("T"));
    let wildcard = table.add_type(TypeBinding::wildcard(Some(object)));
    let both = table.add_type(TypeBinding::intersection(vec![object, runnable]));
    let mut cache = BindingCache::new();

    let object_ty = cache.wrap_native_type(&table, object);
    let runnable_ty = cache.wrap_native_type(&table, runnable);
    let t_ty = cache.wrap_native_type(&table, t);
    let wildcard_ty = cache.wrap_native_type(&table, wildcard);
    let both_ty = cache.wrap_native_type(&table, both);
    let void_ty = cache.wrap_native_type(&table, table.void());
    let long_ty = cache.primitive_type(&table, PrimitiveKind::Long);

    assert!(matches!(cache.type_data(t_ty).kind, TypeKind::TypeVariable { .. }));
    assert_eq!(
        cache.type_data(wildcard_ty).kind,
        TypeKind::Wildcard {
            bound: Some(object_ty)
        }
    );
    assert_eq!(
        cache.type_data(both_ty).kind,
        TypeKind::Intersection {
            bounds: vec![object_ty, runnable_ty]
        }
    );
    assert_eq!(cache.type_data(void_ty).kind, TypeKind::NoType);
    assert_ne!(void_ty, BindingCache::NO_TYPE);
    assert_eq!(cache.primitive_kind(long_ty), Some(PrimitiveKind::Long));
    assert_eq!(cache.type_display(wildcard_ty), "? extends java.lang.Object");
}

#[test]
fn native_interop_marker_wins_over_primitive() {
    let mut table = BindingTable::new();
    let id = table.add_type(TypeBinding::native("id"));
    let mut cache = BindingCache::new();

    let ty = cache.wrap_native_type(&table, id);
    let TypeKind::Native { name } = cache.type_data(ty).kind else {
        panic!("expected a native type, got {:?}", cache.type_data(ty));
    };
    assert_eq!(cache.name_str(name), "id");
    assert!(!cache.is_primitive(ty));

    // Interop types unwrap to a synthetic binding, not the host one.
    assert_eq!(
        cache.unwrap_to_type_binding(&table, Some(ty)),
        Some(Binding::NativeType(name))
    );
}

#[test]
fn array_flag_wins_over_everything_else() {
    let mut table = BindingTable::new();
    let int = table.primitive(PrimitiveKind::Int);
    let ints = table.array_of(int);
    let mut odd = TypeBinding::declared("int[]").with_flags(TypeFlags::ARRAY | TypeFlags::PRIMITIVE);
    odd.component = Some(int);
    let odd = table.add_type(odd);
    let mut cache = BindingCache::new();

    let ints_ty = cache.wrap_native_type(&table, ints);
    let odd_ty = cache.wrap_native_type(&table, odd);
    assert!(cache.is_array(ints_ty));
    assert!(cache.is_array(odd_ty));
    assert_eq!(cache.component_type(odd_ty), cache.component_type(ints_ty));
    assert_eq!(cache.type_display(ints_ty), "int[]");
}

#[test]
fn array_without_component_is_a_contract_violation() {
    let mut table = BindingTable::new();
    let broken = table.add_type(TypeBinding::declared("Broken[]").with_flags(TypeFlags::ARRAY));
    let mut cache = BindingCache::new();
    assert!(matches!(
        cache.try_wrap_native_type(&table, broken),
        Err(ContractViolation::MalformedArrayBinding { .. })
    ));
}

#[test]
fn method_binding_has_separate_element_and_executable_type() {
    let fx = fixture();
    let mut cache = BindingCache::new();

    let method = cache.wrap_element(&fx.table, Some(&native(fx.concat)));
    let exec = cache.wrap_executable_type(&fx.table, Some(fx.concat));
    let Some(method) = method else {
        panic!("method binding did not wrap");
    };
    assert_eq!(cache.element(method).ty, exec);
    assert_eq!(cache.wrap_executable_type(&fx.table, Some(fx.concat)), exec);
    assert_eq!(cache.element_name(method), "concat");

    let string = cache.wrap_native_type(&fx.table, fx.string);
    let Some(exec) = exec else {
        panic!("method binding has no executable type");
    };
    assert_eq!(
        cache.type_data(exec).kind,
        TypeKind::Executable {
            params: vec![string],
            return_type: string,
        }
    );
    assert!(matches!(
        cache.try_wrap_type(&fx.table, Some(&native(fx.concat))),
        Err(ContractViolation::NotATypeBinding { .. })
    ));

    // The executable type unwraps to the method, which is not a type binding.
    assert_eq!(
        cache.unwrap_to_binding(&fx.table, Some(exec)),
        Some(native(fx.concat))
    );
    assert_eq!(cache.unwrap_to_type_binding(&fx.table, Some(exec)), None);
}

#[test]
fn host_elements_round_trip() {
    let fx = fixture();
    let mut cache = BindingCache::new();
    for id in [fx.string, fx.length, fx.concat, fx.package, fx.string_array] {
        let element = cache.wrap_element(&fx.table, Some(&native(id)));
        assert_eq!(cache.unwrap(element), Some(native(id)));
    }
}

#[test]
fn elements_record_kind_and_enclosing() {
    let fx = fixture();
    let mut cache = BindingCache::new();
    let field = cache.try_wrap_variable_element(&fx.table, Some(&native(fx.length)));
    let Ok(Some(field)) = field else {
        panic!("field did not wrap: {field:?}");
    };
    let data = cache.element(field).clone();
    assert_eq!(data.kind, ElementKind::Variable { is_field: true });
    assert_eq!(data.modifiers, Modifiers::PRIVATE | Modifiers::FINAL);

    let string = cache.wrap_element(&fx.table, Some(&native(fx.string)));
    assert_eq!(data.enclosing, string);
    let Some(string) = string else {
        panic!("type binding did not wrap");
    };
    assert_eq!(cache.element_name(string), "String");
    let package = cache.element(string).enclosing;
    assert_eq!(package, cache.wrap_element(&fx.table, Some(&native(fx.package))));
}

#[test]
fn typed_wrappers_reject_other_kinds() {
    let fx = fixture();
    let mut cache = BindingCache::new();
    let err = cache.try_wrap_type_element(&fx.table, Some(&native(fx.length)));
    assert!(matches!(
        err,
        Err(ContractViolation::WrongElementKind {
            expected: "type",
            found: "variable",
            ..
        })
    ));
    assert!(cache
        .try_wrap_executable_element(&fx.table, Some(&native(fx.concat)))
        .is_ok());
}

#[test]
fn type_variable_binding_wraps_to_type_parameter() {
    let mut table = BindingTable::new();
    let t = table.add_type(TypeBinding::type_variable("T"));
    let mut cache = BindingCache::new();
    let element = cache.wrap_element(&table, Some(&native(t)));
    let Some(element) = element else {
        panic!("type variable did not wrap");
    };
    assert_eq!(cache.element(element).kind, ElementKind::TypeParameter);
}

#[test]
fn annotation_binding_has_no_element_kind() {
    let mut table = BindingTable::new();
    let deprecated = table.add_type(TypeBinding::declared("java.lang.Deprecated"));
    let annotation = table.add_annotation(deprecated);
    let mut cache = BindingCache::new();
    assert!(matches!(
        cache.try_wrap_element(&table, Some(&native(annotation))),
        Err(ContractViolation::UnknownElementBinding { .. })
    ));
}

#[test]
#[should_panic(expected = "binding cache contract violation")]
fn fatal_form_panics_on_contract_violation() {
    let mut table = BindingTable::new();
    let deprecated = table.add_type(TypeBinding::declared("java.lang.Deprecated"));
    let annotation = table.add_annotation(deprecated);
    let mut cache = BindingCache::new();
    cache.wrap_element(&table, Some(&native(annotation)));
}

#[test]
fn null_name_is_a_contract_violation() {
    let cache = BindingCache::new();
    assert_eq!(
        cache.try_intern_name(None),
        Err(ContractViolation::Intern(InternError::NullName))
    );
    let a = cache.try_intern_name(Some("size"));
    assert_eq!(a, Ok(cache.intern_name("size")));
}

#[test]
fn package_declaration_enriches_once() {
    let mut table = BindingTable::new();
    let pkg = table.add_package("com.example");
    let marker = table.add_type(TypeBinding::declared("com.example.Marker"));
    let other = table.add_type(TypeBinding::declared("com.example.Other"));
    let first = table.add_annotation(marker);
    let second = table.add_annotation(other);
    let mut cache = BindingCache::new();

    let plain = cache.wrap_element(&table, Some(&native(pkg)));
    let Some(plain) = plain else {
        panic!("package did not wrap");
    };
    assert!(cache.element(plain).annotations.is_empty());

    let decl = PackageDecl {
        binding: pkg,
        annotations: &[first],
    };
    let enriched = cache.wrap_package_element_from_declaration(&table, &decl);
    assert_eq!(enriched, plain);
    let mirrors = cache.element(plain).annotations.clone();
    assert_eq!(mirrors.len(), 1);
    assert_eq!(cache.unwrap_annotation(&mirrors[0]), native(first));
    assert_eq!(
        mirrors[0].annotation_type,
        cache.wrap_native_type(&table, marker)
    );

    // A second declaration does not overwrite what is already attached.
    let again = PackageDecl {
        binding: pkg,
        annotations: &[second],
    };
    cache.wrap_package_element_from_declaration(&table, &again);
    assert_eq!(cache.element(plain).annotations, mirrors);
}

#[test]
fn generated_elements_unwrap_to_synthetic_bindings() {
    let table = BindingTable::new();
    let mut cache = BindingCache::new();
    let int = cache.primitive_type(&table, PrimitiveKind::Int);
    let class = cache.new_type_element("IOSIntArray", None, Modifiers::PUBLIC);
    let size = cache.new_field("size", int, class, Modifiers::PUBLIC);
    let method = cache.new_method_with_selector(
        "arrayWithLength:",
        class,
        BindingCache::NO_TYPE,
        Modifiers::STATIC,
    );

    let Some(Binding::Generated(field)) = cache.unwrap(Some(size)) else {
        panic!("generated field did not unwrap to a generated binding");
    };
    assert_eq!(field.kind, GeneratedKind::Variable);
    assert_eq!(cache.name_str(field.name), "size");

    let Some(Binding::Generated(factory)) = cache.unwrap(Some(method)) else {
        panic!("generated method did not unwrap to a generated binding");
    };
    assert_eq!(factory.kind, GeneratedKind::Method);
    assert_eq!(cache.name_str(factory.name), "arrayWithLength");

    // Generated bindings resolve straight back to their element.
    let back = cache.wrap_element(&table, Some(&Binding::Generated(factory)));
    assert_eq!(back, Some(method));
    assert_eq!(cache.element_count(), 3);

    let class_binding = cache.unwrap(Some(class));
    let class_ty = cache.wrap_type(&table, class_binding.as_ref());
    assert_eq!(class_ty, cache.element(class).ty);
}

#[test]
fn generated_packages_are_deduplicated_by_name() {
    let table = BindingTable::new();
    let mut cache = BindingCache::new();
    let name = cache.intern_name("com.google.j2objc");
    let a = cache.wrap_element(&table, Some(&Binding::GeneratedPackage(name)));
    let b = cache.wrap_element(&table, Some(&Binding::GeneratedPackage(name)));
    assert_eq!(a, b);
    assert_eq!(cache.unwrap(a), Some(Binding::GeneratedPackage(name)));
}

#[test]
fn generated_method_type_tracks_parameters() {
    let table = BindingTable::new();
    let mut cache = BindingCache::new();
    let int = cache.primitive_type(&table, PrimitiveKind::Int);
    let class = cache.new_type_element("IOSIntArray", None, Modifiers::PUBLIC);
    let method = cache.new_method_with_selector("arrayWithLength:", class, int, Modifiers::STATIC);

    let empty = cache.executable_type_of(method);
    assert_eq!(cache.executable_type_of(method), empty);

    let param = cache.new_parameter(method, "length", int);
    let with_param = cache.executable_type_of(method);
    assert_ne!(empty, with_param);
    assert_eq!(
        cache.type_data(with_param).kind,
        TypeKind::Executable {
            params: vec![int],
            return_type: int,
        }
    );
    assert_eq!(cache.element(param).enclosing, Some(method));
    assert_eq!(
        cache.unwrap_to_binding(&table, Some(with_param)),
        cache.unwrap(Some(method))
    );
    assert!(cache.try_new_parameter(class, "x", int).is_err());
}

#[test]
fn synthetic_types_are_structurally_shared() {
    let mut table = BindingTable::new();
    let string = table.add_type(TypeBinding::declared("java.lang.String"));
    let mut cache = BindingCache::new();
    let string_ty = cache.wrap_native_type(&table, string);

    let id = cache.native_type("id");
    assert_eq!(cache.native_type("id"), id);
    let ptr = cache.pointer_type(string_ty);
    assert_eq!(cache.pointer_type(string_ty), ptr);
    assert_eq!(cache.type_display(ptr), "java.lang.String *");
    assert_eq!(
        cache.unwrap_to_type_binding(&table, Some(ptr)),
        Some(Binding::Pointer(Some(Box::new(native(string)))))
    );
    assert_eq!(
        cache.wrap_type(&table, Some(&Binding::Pointer(Some(Box::new(native(string)))))),
        Some(ptr)
    );

    // No host array binding yet, so the synthetic array has none to unwrap to.
    let strings = cache.synthetic_array_type(string_ty);
    assert_eq!(cache.synthetic_array_type(string_ty), strings);
    assert_eq!(cache.unwrap_to_type_binding(&table, Some(strings)), None);
    let host_array = table.array_of(string);
    assert_eq!(
        cache.unwrap_to_type_binding(&table, Some(strings)),
        Some(native(host_array))
    );
}

#[test]
fn pointer_to_unresolved_type_still_unwraps_to_a_pointer() {
    let mut table = BindingTable::new();
    let string = table.add_type(TypeBinding::declared("java.lang.String"));
    let mut cache = BindingCache::new();
    let string_ty = cache.wrap_native_type(&table, string);

    let strings = cache.synthetic_array_type(string_ty);
    let to_array = cache.pointer_type(strings);
    assert_eq!(
        cache.unwrap_to_type_binding(&table, Some(to_array)),
        Some(Binding::Pointer(None))
    );

    let to_null = cache.pointer_type(BindingCache::NULL_TYPE);
    assert_eq!(
        cache.unwrap_to_binding(&table, Some(to_null)),
        Some(Binding::Pointer(None))
    );
    assert_eq!(
        cache.wrap_type(&table, Some(&Binding::Pointer(None))),
        Some(to_null)
    );

    // Once the host has the array binding, the pointee resolves.
    let host_array = table.array_of(string);
    assert_eq!(
        cache.unwrap_to_type_binding(&table, Some(to_array)),
        Some(Binding::Pointer(Some(Box::new(native(host_array)))))
    );
}

#[test]
fn category_names_require_primitives() {
    let fx = fixture();
    let mut cache = BindingCache::new();
    let int = cache.primitive_type(&fx.table, PrimitiveKind::Int);
    let string = cache.wrap_native_type(&fx.table, fx.string);
    assert_eq!(cache.try_category_name(int), Ok("Ints"));
    assert!(matches!(
        cache.try_category_name(string),
        Err(ContractViolation::NotPrimitive { .. })
    ));
}

proptest! {
    #[test]
    fn identity_holds_until_reset(picks in prop::collection::vec(0usize..8, 1..20)) {
        let table = BindingTable::new();
        let mut cache = BindingCache::new();
        let first: Vec<_> = picks
            .iter()
            .map(|&i| cache.primitive_type(&table, PrimitiveKind::ALL[i]))
            .collect();
        let second: Vec<_> = picks
            .iter()
            .map(|&i| cache.primitive_type(&table, PrimitiveKind::ALL[i]))
            .collect();
        prop_assert_eq!(&first, &second);

        cache.reset();
        for (&i, old) in picks.iter().zip(&first) {
            let fresh = cache.primitive_type(&table, PrimitiveKind::ALL[i]);
            prop_assert_ne!(fresh, *old);
        }
    }
}
