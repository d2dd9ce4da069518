//! Unit tests for the environment bridge.

use crate::types::types::{FuncType, InterfaceType, StructField, StructType, Type};

use super::{
    environment::{Binding, Environment},
    table::TypeTable,
};

fn user() -> Type {
    StructType::new(
        "User",
        vec![StructField::new("Name", Type::String), StructField::new("Age", Type::INTEGER)],
    )
    .into_type()
}

#[test]
fn test_lookup_variable() {
    let table = TypeTable::new().with_variable("count", Type::INTEGER);

    assert_eq!(table.lookup("count"), Some(Binding::new(Type::INTEGER)));
    assert_eq!(table.lookup("missing"), None);
}

#[test]
fn test_method_receiver_is_prepended() {
    let table = TypeTable::new().with_method(
        &user(),
        "Greet",
        FuncType::new(vec![Type::String], vec![Type::String], false),
    );

    let method = table.find_method(&user(), "Greet").unwrap();
    let func = method.ty.as_func().unwrap();
    assert_eq!(func.ins, vec![user(), Type::String]);
    assert_eq!(method.index, 0);

    // Pointer receivers share the method table of their struct.
    assert!(table.find_method(&Type::pointer_to(user()), "Greet").is_some());
    assert!(table.find_method(&user(), "Missing").is_none());
    assert!(table.find_method(&Type::INTEGER, "Greet").is_none());
}

#[test]
fn test_interface_methods_have_no_receiver() {
    let stringer = InterfaceType::new(
        "Stringer",
        vec![("String".to_string(), FuncType::new(vec![], vec![Type::String], false))],
    )
    .into_type();

    let method = TypeTable::new().find_method(&stringer, "String").unwrap();
    assert!(method.ty.as_func().unwrap().ins.is_empty());
}

#[test]
fn test_find_field_through_pointer() {
    let table = TypeTable::new();
    let field = table.find_field(&Type::pointer_to(user()), "Age").unwrap();

    assert_eq!(field.ty, Type::INTEGER);
    assert_eq!(field.index, vec![1]);
}

#[test]
fn test_from_struct_binds_fields_and_methods() {
    let env = StructType::new(
        "Env",
        vec![StructField::new("Name", Type::String), StructField::embedded(user())],
    );
    let table = TypeTable::from_struct(
        &env,
        vec![(
            "Double".to_string(),
            FuncType::new(vec![Type::INTEGER], vec![Type::INTEGER], false),
        )],
    );

    // Direct field shadows the promoted User.Name.
    let name = table.lookup("Name").unwrap();
    assert_eq!(name.ty, Type::String);
    assert_eq!(name.field_index, vec![0]);
    assert!(!name.ambiguous);

    let age = table.lookup("Age").unwrap();
    assert_eq!(age.ty, Type::INTEGER);
    assert_eq!(age.field_index, vec![1, 1]);

    let double = table.lookup("Double").unwrap();
    assert!(double.method);
    assert_eq!(double.method_index, 0);
    assert_eq!(double.ty.as_func().unwrap().ins.len(), 2);
}

#[test]
fn test_from_struct_marks_ambiguous_promotions() {
    let a = StructType::new("A", vec![StructField::new("Id", Type::INTEGER)]).into_type();
    let b = StructType::new("B", vec![StructField::new("Id", Type::String)]).into_type();
    let env = StructType::new("Env", vec![StructField::embedded(a), StructField::embedded(b)]);

    let table = TypeTable::from_struct(&env, vec![]);
    assert!(table.lookup("Id").unwrap().ambiguous);
    assert!(!table.lookup("A").unwrap().ambiguous);
}

#[test]
fn test_resolve_overload_first_match() {
    let time_add = FuncType::new(vec![Type::Time, Type::Duration], vec![Type::Time], false);
    let int_add = FuncType::new(vec![Type::INTEGER, Type::INTEGER], vec![Type::String], false);
    let table = TypeTable::new()
        .with_variable("TimeAdd", time_add.into_type())
        .with_variable("IntAdd", int_add.into_type());
    let candidates = vec!["Missing".to_string(), "TimeAdd".to_string(), "IntAdd".to_string()];

    assert_eq!(
        table.resolve_overload(&candidates, &Type::INTEGER, &Type::INTEGER),
        Some(Type::String)
    );
    assert_eq!(
        table.resolve_overload(&candidates, &Type::Time, &Type::Duration),
        Some(Type::Time)
    );
    assert_eq!(table.resolve_overload(&candidates, &Type::String, &Type::String), None);
}

#[test]
fn test_resolve_overload_skips_method_receiver() {
    let env = StructType::new("Env", vec![]);
    let table = TypeTable::from_struct(
        &env,
        vec![(
            "Concat".to_string(),
            FuncType::new(vec![Type::String, Type::INTEGER], vec![Type::String], false),
        )],
    );

    assert_eq!(
        table.resolve_overload(&["Concat".to_string()], &Type::String, &Type::INTEGER),
        Some(Type::String)
    );
}
