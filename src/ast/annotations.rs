use regex::Regex;

use crate::types::types::Type;

use super::ast::NodeId;

/// Everything the checker writes back about one node for the compiler.
#[derive(Debug, Clone, Default)]
pub struct NodeAnnotation {
    /// Inferred static type.
    pub ty: Option<Type>,
    /// The value must be dereferenced at runtime.
    pub deref: bool,
    /// Resolves to a bound method (identifier, member or call).
    pub method: bool,
    pub method_index: usize,
    /// Field path through embedded structs.
    pub field_index: Vec<usize>,
    /// Resolved property name of a member access.
    pub name: Option<String>,
    /// Pattern precompiled for `matches` with a literal right operand.
    pub regex: Option<Regex>,
    /// Variadic `func(...any) any` call that can skip argument conversion.
    pub fast: bool,
    /// Index into the fast-dispatch catalog; 0 means none.
    pub typed: usize,
}

/// Checker output keyed by node id.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    entries: Vec<NodeAnnotation>,
}

impl Annotations {
    pub fn with_len(len: usize) -> Self {
        Annotations {
            entries: vec![NodeAnnotation::default(); len],
        }
    }

    /// Drops previous output and resizes for a tree of `len` nodes.
    pub fn reset(&mut self, len: usize) {
        self.entries.clear();
        self.entries.resize(len, NodeAnnotation::default());
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeAnnotation> {
        self.entries.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeAnnotation {
        if id.0 >= self.entries.len() {
            self.entries.resize(id.0 + 1, NodeAnnotation::default());
        }
        &mut self.entries[id.0]
    }

    pub fn set_type(&mut self, id: NodeId, ty: Type) {
        self.get_mut(id).ty = Some(ty);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
