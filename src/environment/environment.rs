use crate::types::{
    lattice::{fetch_field, strip_pointers},
    types::{Field, Method, Type},
};

/// What a free identifier resolves to in the host environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub ty: Type,
    /// The name resolves to more than one candidate.
    pub ambiguous: bool,
    /// The identifier is a method of the environment itself.
    pub method: bool,
    pub method_index: usize,
    pub field_index: Vec<usize>,
}

impl Binding {
    pub fn new(ty: Type) -> Self {
        Binding {
            ty,
            ambiguous: false,
            method: false,
            method_index: 0,
            field_index: vec![],
        }
    }

    pub fn field(ty: Type, field_index: Vec<usize>) -> Self {
        Binding {
            field_index,
            ..Binding::new(ty)
        }
    }

    pub fn method(ty: Type, method_index: usize) -> Self {
        Binding {
            method: true,
            method_index,
            ..Binding::new(ty)
        }
    }

    pub fn ambiguous() -> Self {
        Binding {
            ambiguous: true,
            ..Binding::new(Type::Any)
        }
    }
}

pub trait Environment: Send + Sync {
    /// Resolves a free identifier.
    fn lookup(&self, name: &str) -> Option<Binding>;

    /// Resolves a method on `ty`. Methods on concrete types carry their
    /// receiver as the first input; interface methods do not.
    fn find_method(&self, ty: &Type, name: &str) -> Option<Method>;

    /// Resolves a struct field, direct fields before promoted ones.
    fn find_field(&self, ty: &Type, name: &str) -> Option<Field> {
        strip_pointers(ty)
            .as_struct()
            .and_then(|st| fetch_field(st, name))
    }

    /// Picks the first candidate function taking exactly `(left, right)`
    /// and returns its result type.
    fn resolve_overload(&self, candidates: &[String], left: &Type, right: &Type) -> Option<Type> {
        for name in candidates {
            let Some(binding) = self.lookup(name) else {
                continue;
            };
            let Some(func) = binding.ty.as_func() else {
                continue;
            };

            let ins = if binding.method && !func.ins.is_empty() {
                &func.ins[1..]
            } else {
                &func.ins[..]
            };

            if ins.len() == 2 && ins[0] == *left && ins[1] == *right {
                if let Some(out) = func.outs.first() {
                    return Some(out.clone());
                }
            }
        }

        None
    }
}
