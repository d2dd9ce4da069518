use std::collections::HashMap;

use crate::types::{
    lattice::strip_pointers,
    types::{FuncType, Method, StructType, Type},
};

use super::environment::{Binding, Environment};

/// Environment built from explicitly registered metadata.
///
/// Variables map names to bindings; methods are registered per type name
/// with the receiver already prepended to their inputs.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    variables: HashMap<String, Binding>,
    methods: HashMap<String, Vec<(String, Type)>>,
}

impl TypeTable {
    pub fn new() -> Self {
        TypeTable::default()
    }

    pub fn with_variable(mut self, name: &str, ty: Type) -> Self {
        self.variables.insert(name.to_string(), Binding::new(ty));
        self
    }

    pub fn with_binding(mut self, name: &str, binding: Binding) -> Self {
        self.variables.insert(name.to_string(), binding);
        self
    }

    /// Registers a method on a named struct type. `func` is the signature
    /// as seen by callers; the receiver is added here.
    pub fn with_method(mut self, receiver: &Type, name: &str, func: FuncType) -> Self {
        self.add_method(receiver, name, func);
        self
    }

    fn add_method(&mut self, receiver: &Type, name: &str, func: FuncType) -> (usize, Type) {
        let type_name = receiver.type_name().unwrap_or_default().to_string();

        let mut ins = Vec::with_capacity(func.ins.len() + 1);
        ins.push(receiver.clone());
        ins.extend(func.ins);

        let ty = FuncType::new(ins, func.outs, func.variadic).into_type();
        let methods = self.methods.entry(type_name).or_default();
        methods.push((name.to_string(), ty.clone()));
        (methods.len() - 1, ty)
    }

    /// Builds the table for an environment struct.
    ///
    /// Direct fields are bound with their index path; fields promoted from
    /// embedded members are bound unless a direct field shadows them, and
    /// a name promoted from two embedded members is ambiguous. `methods`
    /// become identifiers marked as bound methods.
    pub fn from_struct(env: &StructType, methods: Vec<(String, FuncType)>) -> Self {
        let mut table = TypeTable {
            variables: fields_from_struct(env),
            methods: HashMap::new(),
        };

        let receiver = env.clone().into_type();
        for (name, func) in methods {
            let (index, ty) = table.add_method(&receiver, &name, func);
            table.variables.insert(name, Binding::method(ty, index));
        }

        table
    }
}

fn fields_from_struct(st: &StructType) -> HashMap<String, Binding> {
    let mut types = HashMap::new();
    let mut promoted: HashMap<String, Binding> = HashMap::new();

    for (i, field) in st.fields.iter().enumerate() {
        if field.anonymous {
            if let Some(inner) = strip_pointers(&field.ty).as_struct() {
                for (name, mut binding) in fields_from_struct(inner) {
                    if promoted.contains_key(&name) {
                        promoted.insert(name, Binding::ambiguous());
                    } else {
                        binding.field_index.insert(0, i);
                        promoted.insert(name, binding);
                    }
                }
            }
        }
        types.insert(field.name.clone(), Binding::field(field.ty.clone(), vec![i]));
    }

    for (name, binding) in promoted {
        types.entry(name).or_insert(binding);
    }

    types
}

impl Environment for TypeTable {
    fn lookup(&self, name: &str) -> Option<Binding> {
        self.variables.get(name).cloned()
    }

    fn find_method(&self, ty: &Type, name: &str) -> Option<Method> {
        if let Type::Interface(iface) = ty {
            return iface
                .methods
                .iter()
                .position(|(method, _)| method == name)
                .map(|index| Method {
                    ty: iface.methods[index].1.clone().into_type(),
                    index,
                });
        }

        let methods = self.methods.get(ty.type_name()?)?;
        methods
            .iter()
            .position(|(method, _)| method == name)
            .map(|index| Method {
                ty: methods[index].1.clone(),
                index,
            })
    }
}
