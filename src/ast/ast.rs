use std::collections::BTreeMap;

use crate::{types::types::Type, Span};

use super::annotations::Annotations;

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// An opaque precomputed constant, usually produced by constant folding.
///
/// It carries its own runtime type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn type_of(&self) -> Type {
        match self {
            Value::Nil => Type::Nil,
            Value::Bool(_) => Type::Bool,
            Value::Integer(_) => Type::INTEGER,
            Value::Float(_) => Type::FLOAT,
            Value::String(_) => Type::String,
            Value::Array(_) => Type::any_array(),
            Value::Map(_) => Type::any_map(),
        }
    }
}

/// Expression node variants
///
/// Children are referenced by id; the checker never changes a node, it
/// only writes into the tree's [`Annotations`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Nil,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Constant(Value),
    Identifier(String),
    Unary {
        operator: String,
        node: NodeId,
    },
    Binary {
        operator: String,
        left: NodeId,
        right: NodeId,
    },
    /// Optional-chaining wrapper around a member chain.
    Chain(NodeId),
    /// `a.b` or `a[b]`. For `a.b` the property is a `String` node.
    Member {
        node: NodeId,
        property: NodeId,
        optional: bool,
    },
    Slice {
        node: NodeId,
        from: Option<NodeId>,
        to: Option<NodeId>,
    },
    Call {
        callee: NodeId,
        arguments: Vec<NodeId>,
    },
    /// `name(...)` in the standard namespace or `ns.name(...)`.
    Builtin {
        namespace: String,
        name: String,
        arguments: Vec<NodeId>,
    },
    Closure(NodeId),
    /// `#`, the current element inside a collection closure.
    Pointer,
    Conditional {
        cond: NodeId,
        exp1: NodeId,
        exp2: NodeId,
    },
    Array(Vec<NodeId>),
    /// Map literal; every entry is a `Pair` node.
    Map(Vec<NodeId>),
    Pair {
        key: NodeId,
        value: NodeId,
    },
}

/// Expression tree
///
/// Nodes live in an arena and are addressed by [`NodeId`]; `spans` is
/// parallel to `nodes`. Checker output goes to `annotations`.
#[derive(Debug, Clone)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub spans: Vec<Span>,
    pub root: NodeId,
    pub annotations: Annotations,
}

impl Tree {
    pub fn new() -> Self {
        Tree {
            nodes: vec![],
            spans: vec![],
            root: NodeId(0),
            annotations: Annotations::default(),
        }
    }

    /// Adds a node and returns its id. The last pushed node becomes the root.
    pub fn push(&mut self, node: Node, span: Span) -> NodeId {
        self.nodes.push(node);
        self.spans.push(span);
        self.root = NodeId(self.nodes.len() - 1);
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn span(&self, id: NodeId) -> &Span {
        &self.spans[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inferred type of a node after checking.
    pub fn type_of(&self, id: NodeId) -> Option<&Type> {
        self.annotations.get(id).and_then(|a| a.ty.as_ref())
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}
