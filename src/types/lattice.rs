use super::types::{Field, FloatKind, Kind, StructType, Type};

pub type TypeMatcher = fn(&Type) -> bool;

pub fn is_integer(t: &Type) -> bool {
    matches!(t, Type::Int(_))
}

pub fn is_float(t: &Type) -> bool {
    matches!(t, Type::Float(_))
}

pub fn is_number(t: &Type) -> bool {
    is_integer(t) || is_float(t)
}

pub fn is_bool(t: &Type) -> bool {
    matches!(t, Type::Bool)
}

pub fn is_string(t: &Type) -> bool {
    matches!(t, Type::String)
}

/// True for the empty interface and for named interfaces.
pub fn is_any(t: &Type) -> bool {
    matches!(t, Type::Any | Type::Interface(_))
}

pub fn is_time(t: &Type) -> bool {
    matches!(t, Type::Time)
}

pub fn is_duration(t: &Type) -> bool {
    matches!(t, Type::Duration)
}

pub fn is_nil(t: &Type) -> bool {
    matches!(t, Type::Nil)
}

pub fn is_array(t: &Type) -> bool {
    match t {
        Type::Pointer(elem) => is_array(elem),
        Type::Array(_) => true,
        _ => false,
    }
}

pub fn is_map(t: &Type) -> bool {
    match t {
        Type::Pointer(elem) => is_map(elem),
        Type::Map(_, _) => true,
        _ => false,
    }
}

pub fn is_struct(t: &Type) -> bool {
    match t {
        Type::Pointer(elem) => is_struct(elem),
        Type::Struct(_) => true,
        _ => false,
    }
}

pub fn is_func(t: &Type) -> bool {
    match t {
        Type::Pointer(elem) => is_func(elem),
        Type::Func(_) => true,
        _ => false,
    }
}

pub fn matches_any(t: &Type, fns: &[TypeMatcher]) -> bool {
    fns.iter().any(|f| f(t))
}

/// Optimistic acceptance of statically-unknown operands: both sides are
/// `Any`, or one side is `Any` and the other satisfies one of `fns`.
pub fn dual_any_of(l: &Type, r: &Type, fns: &[TypeMatcher]) -> bool {
    if is_any(l) && is_any(r) {
        return true;
    }
    if is_any(l) && matches_any(r, fns) {
        return true;
    }
    if is_any(r) && matches_any(l, fns) {
        return true;
    }
    false
}

/// Result type of an arithmetic operator over two numeric operands.
///
/// The rule is kind based: differing integer widths give the generic
/// integer, never the wider width.
pub fn numeric_promote(a: &Type, b: &Type) -> Type {
    if a.kind() == b.kind() {
        return a.clone();
    }
    if is_float(a) || is_float(b) {
        return Type::Float(FloatKind::Float64);
    }
    Type::INTEGER
}

/// Strips pointer layers off scalars.
///
/// Returns the resulting type and whether a copy-dereference happened.
/// Pointers to aggregates (struct, map, array) are kept as they are.
pub fn deref(t: &Type) -> (Type, bool) {
    if is_any(t) {
        return (t.clone(), true);
    }

    let mut current = t;
    let mut found = false;
    while let Type::Pointer(elem) = current {
        match elem.kind() {
            Kind::Struct | Kind::Map | Kind::Array => return (current.clone(), false),
            _ => {
                found = true;
                current = elem;
            }
        }
    }

    (current.clone(), found)
}

/// Removes every pointer layer regardless of the pointee.
pub fn strip_pointers(t: &Type) -> &Type {
    match t {
        Type::Pointer(elem) => strip_pointers(elem),
        _ => t,
    }
}

pub fn is_nullable(t: &Type) -> bool {
    matches!(
        t,
        Type::Nil
            | Type::Pointer(_)
            | Type::Map(_, _)
            | Type::Array(_)
            | Type::Func(_)
            | Type::Error
            | Type::Interface(_)
            | Type::Any
    )
}

pub fn assignable(from: &Type, to: &Type) -> bool {
    if is_any(from) || is_any(to) {
        return true;
    }
    if is_nil(from) {
        return is_nullable(to);
    }
    match (from, to) {
        (Type::Func(a), Type::Func(b)) => {
            a.variadic == b.variadic
                && a.ins.len() == b.ins.len()
                && a.outs.len() == b.outs.len()
                && a.ins.iter().zip(b.ins.iter()).all(|(x, y)| x == y)
                && a.outs.iter().zip(b.outs.iter()).all(|(x, y)| x == y)
        }
        _ => from == to,
    }
}

/// Looks a field up by name.
///
/// Direct fields are searched first; only then embedded members, in
/// declaration order, so a direct field always shadows a promoted one.
pub fn fetch_field(st: &StructType, name: &str) -> Option<Field> {
    for (i, field) in st.fields.iter().enumerate() {
        if field.name == name {
            return Some(Field {
                ty: field.ty.clone(),
                index: vec![i],
            });
        }
    }

    for (i, anon) in st.fields.iter().enumerate() {
        if !anon.anonymous {
            continue;
        }
        if let Some(inner) = strip_pointers(&anon.ty).as_struct() {
            if let Some(mut found) = fetch_field(inner, name) {
                found.index.insert(0, i);
                return Some(found);
            }
        }
    }

    None
}
