//! Unit tests for builtin members, driven through a scripted visitor.

use std::collections::HashMap;

use crate::{
    ast::ast::NodeId,
    errors::errors::ErrorImpl,
    types::types::{FuncType, Type},
};

use super::{
    member::{ArgumentKind, BuiltinCall, ExternVisitor, Info, Member, Namespace},
    registry::{Registry, REGISTRY},
};

/// Answers `visit` from a fixed table and records everything else.
#[derive(Default)]
struct ScriptedVisitor {
    types: HashMap<NodeId, Type>,
    errors: Vec<(NodeId, ErrorImpl)>,
    collections: Vec<Type>,
    /// Collection stack observed while visiting each node.
    seen: HashMap<NodeId, Vec<Type>>,
}

impl ScriptedVisitor {
    fn with(types: Vec<(usize, Type)>) -> Self {
        ScriptedVisitor {
            types: types.into_iter().map(|(id, ty)| (NodeId(id), ty)).collect(),
            ..Default::default()
        }
    }
}

impl ExternVisitor for ScriptedVisitor {
    fn visit(&mut self, node: NodeId) -> (Type, Info) {
        self.seen.insert(node, self.collections.clone());
        (self.types.get(&node).cloned().unwrap_or(Type::Any), Info::default())
    }

    fn error(&mut self, node: NodeId, error: ErrorImpl) -> (Type, Info) {
        self.errors.push((node, error));
        (Type::Any, Info::default())
    }

    fn push_collection(&mut self, collection: Type) {
        self.collections.push(collection);
    }

    fn pop_collection(&mut self) {
        self.collections.pop();
    }
}

fn run(namespace: &str, name: &str, arguments: &[NodeId], v: &mut ScriptedVisitor) -> Type {
    let call = BuiltinCall {
        id: NodeId(99),
        namespace,
        name,
        arguments,
    };
    let (ty, _) = REGISTRY.get(namespace).unwrap().check(v, &call);
    ty
}

fn closure(output: Type) -> Type {
    FuncType::new(vec![Type::Any], vec![output], false).into_type()
}

#[test]
fn test_default_registry_contents() {
    let registry = Registry::with_defaults();

    assert_eq!(registry.len(), 2);
    let filter = registry.standard("filter").unwrap();
    assert_eq!(filter.arguments, &[ArgumentKind::Expression, ArgumentKind::Closure]);
    assert_eq!(filter.argument_kind(5), ArgumentKind::Expression);

    let pi = registry.get("math").unwrap().get("pi").unwrap();
    assert!(!pi.callable);
    assert!(registry.get("strings").is_none());
}

#[test]
fn test_unknown_member() {
    let mut v = ScriptedVisitor::default();
    run("math", "floor", &[], &mut v);

    assert_eq!(
        v.errors,
        vec![(
            NodeId(99),
            ErrorImpl::UnknownBuiltin {
                namespace: "math".to_string(),
                name: "floor".to_string()
            }
        )]
    );
}

#[test]
fn test_len() {
    let mut v = ScriptedVisitor::with(vec![(0, Type::String), (1, Type::Bool)]);

    assert_eq!(run("", "len", &[NodeId(0)], &mut v), Type::INTEGER);
    assert_eq!(run("", "len", &[NodeId(2)], &mut v), Type::Any);
    assert!(v.errors.is_empty());

    run("", "len", &[NodeId(1)], &mut v);
    assert_eq!(
        v.errors[0].1.to_string(),
        "invalid argument for len (type bool)"
    );
}

#[test]
fn test_filter_keeps_element_type() {
    let mut v = ScriptedVisitor::with(vec![
        (0, Type::array_of(Type::INTEGER)),
        (1, closure(Type::Bool)),
    ]);

    let ty = run("", "filter", &[NodeId(0), NodeId(1)], &mut v);

    assert_eq!(ty, Type::array_of(Type::INTEGER));
    assert!(v.errors.is_empty());
    // The closure saw the collection, and the stack is balanced again.
    assert_eq!(v.seen[&NodeId(1)], vec![Type::array_of(Type::INTEGER)]);
    assert!(v.collections.is_empty());
}

#[test]
fn test_filter_over_any_is_generic_array() {
    let mut v = ScriptedVisitor::with(vec![(1, closure(Type::Any))]);

    assert_eq!(run("", "filter", &[NodeId(0), NodeId(1)], &mut v), Type::any_array());
}

#[test]
fn test_map_collects_closure_output() {
    let mut v = ScriptedVisitor::with(vec![
        (0, Type::array_of(Type::INTEGER)),
        (1, closure(Type::String)),
    ]);

    assert_eq!(
        run("", "map", &[NodeId(0), NodeId(1)], &mut v),
        Type::array_of(Type::String)
    );
}

#[test]
fn test_reducers_and_count() {
    for name in ["all", "none", "any", "one"] {
        let mut v = ScriptedVisitor::with(vec![(1, closure(Type::Bool))]);
        assert_eq!(run("", name, &[NodeId(0), NodeId(1)], &mut v), Type::Bool);
    }

    let mut v = ScriptedVisitor::with(vec![(1, closure(Type::Bool))]);
    assert_eq!(run("", "count", &[NodeId(0), NodeId(1)], &mut v), Type::INTEGER);
}

#[test]
fn test_collection_errors() {
    let mut v = ScriptedVisitor::with(vec![(0, Type::String)]);
    run("", "all", &[NodeId(0), NodeId(1)], &mut v);
    assert_eq!(
        v.errors[0],
        (
            NodeId(0),
            ErrorImpl::BuiltinTakesArray {
                builtin: "all".to_string(),
                received: "string".to_string()
            }
        )
    );

    let mut v = ScriptedVisitor::with(vec![(1, closure(Type::INTEGER))]);
    run("", "count", &[NodeId(0), NodeId(1)], &mut v);
    assert_eq!(
        v.errors[0].1,
        ErrorImpl::ClosureShouldReturnBool {
            received: "int".to_string()
        }
    );

    let mut v = ScriptedVisitor::with(vec![(1, Type::INTEGER)]);
    run("", "map", &[NodeId(0), NodeId(1)], &mut v);
    assert_eq!(v.errors[0], (NodeId(1), ErrorImpl::ClosureSignature));

    let mut v = ScriptedVisitor::default();
    run("", "filter", &[NodeId(0)], &mut v);
    assert!(matches!(v.errors[0].1, ErrorImpl::BuiltinArity { .. }));
}

#[test]
fn test_math_abs() {
    let mut v = ScriptedVisitor::with(vec![
        (0, Type::INTEGER),
        (1, Type::FLOAT),
        (2, Type::String),
    ]);

    assert_eq!(run("math", "abs", &[NodeId(0)], &mut v), Type::INTEGER);
    assert_eq!(run("math", "abs", &[NodeId(1)], &mut v), Type::FLOAT);
    assert!(v.errors.is_empty());

    run("math", "abs", &[NodeId(2)], &mut v);
    assert_eq!(
        v.errors[0].1.to_string(),
        "math.abs expects a number as input - got: string"
    );

    run("math", "abs", &[], &mut v);
    assert_eq!(v.errors[1].1.to_string(), "math.abs expects one number as input");
}

#[test]
fn test_math_pi() {
    let mut v = ScriptedVisitor::default();

    assert_eq!(run("math", "pi", &[], &mut v), Type::FLOAT);
    assert!(v.errors.is_empty());

    run("math", "pi", &[NodeId(0)], &mut v);
    assert_eq!(
        v.errors[0].1.to_string(),
        "math.pi is a constant - it cannot be invoked"
    );
}

fn check_answer(v: &mut dyn ExternVisitor, call: &BuiltinCall) -> (Type, Info) {
    for argument in call.arguments {
        v.visit(*argument);
    }
    (Type::INTEGER, Info::default())
}

fn call<'a>(name: &'a str, arguments: &'a [NodeId]) -> BuiltinCall<'a> {
    BuiltinCall {
        id: NodeId(7),
        namespace: "answers",
        name,
        arguments,
    }
}

#[test]
fn test_constant_with_arguments_skips_its_routine() {
    let namespace = Namespace::new(
        "answers",
        vec![
            Member::constant("answer", check_answer),
            Member::function("ask", &[ArgumentKind::Expression], check_answer),
        ],
    );
    let mut v = ScriptedVisitor::default();
    assert_eq!(namespace.check(&mut v, &call("answer", &[])).0, Type::INTEGER);
    assert_eq!(namespace.check(&mut v, &call("ask", &[NodeId(1)])).0, Type::INTEGER);
    assert!(v.errors.is_empty());
    assert!(v.seen.contains_key(&NodeId(1)));

    let (ty, _) = namespace.check(&mut v, &call("answer", &[NodeId(2)]));
    assert_eq!(ty, Type::Any);
    assert!(!v.seen.contains_key(&NodeId(2)));
    assert_eq!(
        v.errors,
        vec![(
            NodeId(7),
            ErrorImpl::ConstantInvoked {
                constant: "answers.answer".to_string()
            }
        )]
    );
}
