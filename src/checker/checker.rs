use std::sync::Arc;

use regex::Regex;
use tracing::{debug, instrument, trace};

use crate::{
    ast::{
        annotations::Annotations,
        ast::{Node, NodeId, Tree},
    },
    builtin::member::{BuiltinCall, ExternVisitor, Info},
    errors::errors::{Error, ErrorImpl},
    types::{
        lattice::{
            assignable, deref, dual_any_of, fetch_field, is_any, is_array, is_bool, is_duration,
            is_integer, is_map, is_nil, is_number, is_string, is_struct, is_time, matches_any,
            numeric_promote, strip_pointers,
        },
        types::{FuncType, Type},
    },
    Position, Span,
};

use super::config::Config;

/// Deepest node nesting the visitor descends into.
pub const MAX_DEPTH: usize = 256;

/// Infers the type of every node of `tree`, writing the results and the
/// resolution metadata into `tree.annotations`.
///
/// Checking never stops at the first problem: the first diagnostic is
/// kept, the failing node becomes `Any` and the walk goes on so the rest
/// of the tree is still annotated.
#[instrument(skip_all, fields(nodes = tree.len()))]
pub fn check(tree: &mut Tree, config: &Config) -> Result<Type, Error> {
    let Tree {
        nodes,
        spans,
        root,
        annotations,
    } = tree;
    let root = *root;

    annotations.reset(nodes.len());
    if nodes.is_empty() {
        return Ok(Type::Nil);
    }

    debug!(typed = config.env.is_some(), strict = config.strict, "checking expression");

    let mut visitor = CheckVisitor {
        config,
        nodes,
        spans,
        annotations,
        collections: vec![],
        parents: vec![],
        err: None,
    };

    let (ty, _) = visitor.visit(root);

    if let Some(err) = visitor.err {
        debug!(error = %err, "check failed");
        return Err(err);
    }

    if let Some(expect) = config.expect {
        let satisfied = if expect.is_number() {
            is_number(&ty)
        } else {
            ty.kind() == expect
        };

        if !satisfied && !is_any(&ty) {
            return Err(Error::new(
                ErrorImpl::UnexpectedResultType {
                    expected: expect.to_string(),
                    received: ty.to_string(),
                },
                position_of(spans, root),
            ));
        }
    }

    debug!(root = %ty, "check finished");
    Ok(ty)
}

fn position_of(spans: &[Span], id: NodeId) -> Position {
    spans
        .get(id.0)
        .map(|span| span.start.clone())
        .unwrap_or_else(Position::null)
}

struct CheckVisitor<'a> {
    config: &'a Config,
    nodes: &'a [Node],
    spans: &'a [Span],
    annotations: &'a mut Annotations,
    /// Collections whose closures are being checked, innermost last.
    collections: Vec<Type>,
    /// Nodes currently being visited, innermost last.
    parents: Vec<NodeId>,
    err: Option<Error>,
}

impl<'a> CheckVisitor<'a> {
    fn visit(&mut self, id: NodeId) -> (Type, Info) {
        if self.parents.len() >= MAX_DEPTH {
            let (ty, info) = self.error(id, ErrorImpl::NestingTooDeep { limit: MAX_DEPTH });
            self.annotations.set_type(id, ty.clone());
            return (ty, info);
        }

        self.parents.push(id);

        let nodes = self.nodes;
        let (ty, info) = match &nodes[id.0] {
            Node::Nil => (Type::Nil, Info::default()),
            Node::Bool(_) => (Type::Bool, Info::default()),
            Node::Integer(_) => (Type::INTEGER, Info::default()),
            Node::Float(_) => (Type::FLOAT, Info::default()),
            Node::String(_) => (Type::String, Info::default()),
            Node::Constant(value) => (value.type_of(), Info::default()),
            Node::Identifier(name) => self.visit_identifier(id, name),
            Node::Unary { operator, node } => self.visit_unary(id, operator, *node),
            Node::Binary {
                operator,
                left,
                right,
            } => self.visit_binary(id, operator, *left, *right),
            Node::Chain(node) => self.visit(*node),
            Node::Member { node, property, .. } => self.visit_member(id, *node, *property),
            Node::Slice { node, from, to } => self.visit_slice(id, *node, *from, *to),
            Node::Call { callee, arguments } => self.visit_call(id, *callee, arguments),
            Node::Builtin {
                namespace,
                name,
                arguments,
            } => self.visit_builtin(id, namespace, name, arguments),
            Node::Closure(body) => {
                let (ty, _) = self.visit(*body);
                (Type::func(vec![Type::Any], vec![ty], false), Info::default())
            }
            Node::Pointer => self.visit_pointer(id),
            Node::Conditional { cond, exp1, exp2 } => {
                self.visit_conditional(*cond, *exp1, *exp2)
            }
            Node::Array(elements) => {
                for element in elements {
                    self.visit(*element);
                }
                (Type::any_array(), Info::default())
            }
            Node::Map(pairs) => {
                for pair in pairs {
                    self.visit(*pair);
                }
                (Type::any_map(), Info::default())
            }
            Node::Pair { key, value } => {
                self.visit(*key);
                self.visit(*value);
                (Type::Nil, Info::default())
            }
        };

        self.parents.pop();
        self.annotations.set_type(id, ty.clone());
        (ty, info)
    }

    fn error(&mut self, id: NodeId, error: ErrorImpl) -> (Type, Info) {
        if self.err.is_none() {
            trace!(node = id.0, %error, "recording diagnostic");
            self.err = Some(Error::new(error, position_of(self.spans, id)));
        }
        (Type::Any, Info::default())
    }

    fn visit_identifier(&mut self, id: NodeId, name: &str) -> (Type, Info) {
        let config = self.config;

        let Some(env) = &config.env else {
            self.annotations.get_mut(id).deref = true;
            return (Type::Any, Info::default());
        };

        match env.lookup(name) {
            Some(binding) if binding.ambiguous => self.error(
                id,
                ErrorImpl::AmbiguousIdentifier {
                    name: name.to_string(),
                },
            ),
            Some(binding) => {
                let (ty, copied) = deref(&binding.ty);

                let annotation = self.annotations.get_mut(id);
                annotation.deref = copied;
                annotation.method = binding.method;
                annotation.method_index = binding.method_index;
                annotation.field_index = binding.field_index;

                (
                    ty,
                    Info {
                        is_method: binding.method,
                    },
                )
            }
            None if !config.strict => (
                config.default_type.clone().unwrap_or(Type::Any),
                Info::default(),
            ),
            None => self.error(
                id,
                ErrorImpl::UnknownName {
                    name: name.to_string(),
                },
            ),
        }
    }

    fn visit_unary(&mut self, id: NodeId, operator: &str, node: NodeId) -> (Type, Info) {
        let (t, _) = self.visit(node);

        match operator {
            "!" | "not" => {
                if is_bool(&t) || is_any(&t) {
                    return (Type::Bool, Info::default());
                }
            }
            "+" | "-" => {
                if is_number(&t) {
                    return (t, Info::default());
                }
                if is_any(&t) {
                    return (Type::Any, Info::default());
                }
            }
            _ => {
                return self.error(
                    id,
                    ErrorImpl::UnknownOperator {
                        operator: operator.to_string(),
                    },
                )
            }
        }

        self.error(
            id,
            ErrorImpl::InvalidUnaryOperation {
                operator: operator.to_string(),
                operand: t.to_string(),
            },
        )
    }

    fn visit_binary(
        &mut self,
        id: NodeId,
        operator: &str,
        left: NodeId,
        right: NodeId,
    ) -> (Type, Info) {
        let (l, _) = self.visit(left);
        let (r, _) = self.visit(right);

        let config = self.config;
        if let (Some(candidates), Some(env)) = (config.operators.get(operator), &config.env) {
            if let Some(ty) = env.resolve_overload(candidates, &l, &r) {
                return (ty, Info::default());
            }
        }

        let bool_type = (Type::Bool, Info::default());

        match operator {
            "==" | "!=" => {
                if is_number(&l) && is_number(&r) {
                    return bool_type;
                }
                if is_nil(&l) || is_nil(&r) {
                    return bool_type;
                }
                if l.kind() == r.kind() {
                    return bool_type;
                }
                if is_any(&l) || is_any(&r) {
                    return bool_type;
                }
            }

            "or" | "||" | "and" | "&&" => {
                if is_bool(&l) && is_bool(&r) {
                    return bool_type;
                }
                if dual_any_of(&l, &r, &[is_bool]) {
                    return bool_type;
                }
            }

            "<" | ">" | ">=" | "<=" => {
                if is_number(&l) && is_number(&r) {
                    return bool_type;
                }
                if is_string(&l) && is_string(&r) {
                    return bool_type;
                }
                if is_time(&l) && is_time(&r) {
                    return bool_type;
                }
                if dual_any_of(&l, &r, &[is_number, is_string, is_time]) {
                    return bool_type;
                }
            }

            "-" => {
                if is_number(&l) && is_number(&r) {
                    return (numeric_promote(&l, &r), Info::default());
                }
                if is_time(&l) && is_time(&r) {
                    return (Type::Duration, Info::default());
                }
                if dual_any_of(&l, &r, &[is_number, is_time]) {
                    return (Type::Any, Info::default());
                }
            }

            "/" | "*" => {
                if is_number(&l) && is_number(&r) {
                    return (numeric_promote(&l, &r), Info::default());
                }
                if dual_any_of(&l, &r, &[is_number]) {
                    return (Type::Any, Info::default());
                }
            }

            "**" | "^" => {
                if (is_number(&l) && is_number(&r)) || dual_any_of(&l, &r, &[is_number]) {
                    return (Type::FLOAT, Info::default());
                }
            }

            "%" => {
                if is_integer(&l) && is_integer(&r) {
                    return (numeric_promote(&l, &r), Info::default());
                }
                if dual_any_of(&l, &r, &[is_integer]) {
                    return (Type::Any, Info::default());
                }
            }

            "+" => {
                if is_number(&l) && is_number(&r) {
                    return (numeric_promote(&l, &r), Info::default());
                }
                if is_string(&l) && is_string(&r) {
                    return (Type::String, Info::default());
                }
                if (is_time(&l) && is_duration(&r)) || (is_duration(&l) && is_time(&r)) {
                    return (Type::Time, Info::default());
                }
                if dual_any_of(&l, &r, &[is_number, is_string, is_time, is_duration]) {
                    return (Type::Any, Info::default());
                }
            }

            "in" => {
                if (is_string(&l) || is_any(&l)) && is_struct(&r) {
                    return bool_type;
                }
                if is_map(&r) || is_array(&r) {
                    return bool_type;
                }
                if is_any(&l) && matches_any(&r, &[is_string, is_array, is_map]) {
                    return bool_type;
                }
                if is_any(&l) && is_any(&r) {
                    return bool_type;
                }
                if is_any(&r) {
                    return bool_type;
                }
            }

            "matches" => {
                let nodes = self.nodes;
                if let Node::String(pattern) = &nodes[right.0] {
                    match Regex::new(pattern) {
                        Ok(regex) => {
                            trace!(%pattern, "compiled pattern");
                            self.annotations.get_mut(id).regex = Some(regex);
                        }
                        Err(err) => {
                            return self.error(
                                id,
                                ErrorImpl::InvalidPattern {
                                    message: err.to_string(),
                                },
                            )
                        }
                    }
                }
                if is_string(&l) && is_string(&r) {
                    return bool_type;
                }
                if dual_any_of(&l, &r, &[is_string]) {
                    return bool_type;
                }
            }

            "contains" | "startsWith" | "endsWith" => {
                if is_string(&l) && is_string(&r) {
                    return bool_type;
                }
                if dual_any_of(&l, &r, &[is_string]) {
                    return bool_type;
                }
            }

            ".." => {
                if (is_integer(&l) && is_integer(&r)) || dual_any_of(&l, &r, &[is_integer]) {
                    return (Type::array_of(Type::INTEGER), Info::default());
                }
            }

            _ => {
                return self.error(
                    id,
                    ErrorImpl::UnknownOperator {
                        operator: operator.to_string(),
                    },
                )
            }
        }

        self.error(
            id,
            ErrorImpl::InvalidBinaryOperation {
                operator: operator.to_string(),
                left: l.to_string(),
                right: r.to_string(),
            },
        )
    }

    fn visit_member(&mut self, id: NodeId, node: NodeId, property: NodeId) -> (Type, Info) {
        let (base, _) = self.visit(node);
        let (prop, _) = self.visit(property);

        let config = self.config;
        let nodes = self.nodes;
        let name = match &nodes[property.0] {
            Node::String(name) => Some(name.as_str()),
            _ => None,
        };

        // Methods shadow fields of the same name, whatever the base is.
        if let (Some(name), Some(env)) = (name, &config.env) {
            if let Some(method) = env.find_method(&base, name) {
                let annotation = self.annotations.get_mut(id);
                annotation.method = true;
                annotation.method_index = method.index;
                annotation.name = Some(name.to_string());

                // Interface methods carry no receiver.
                let is_method = !matches!(base, Type::Interface(_));
                return (method.ty, Info { is_method });
            }
        }

        let base = match base {
            Type::Pointer(elem) => *elem,
            base => base,
        };

        match &base {
            Type::Any | Type::Interface(_) => {
                self.annotations.get_mut(id).deref = true;
                return (Type::Any, Info::default());
            }

            Type::Map(key, elem) => {
                if !assignable(&prop, key) {
                    return self.error(
                        property,
                        ErrorImpl::MapKeyMismatch {
                            key: prop.to_string(),
                            map: base.to_string(),
                        },
                    );
                }
                let (ty, copied) = deref(elem);
                self.annotations.get_mut(id).deref = copied;
                return (ty, Info::default());
            }

            Type::Array(elem) => {
                if !is_integer(&prop) && !is_any(&prop) {
                    return self.error(
                        property,
                        ErrorImpl::NonIntegerIndex {
                            received: prop.to_string(),
                        },
                    );
                }
                let (ty, copied) = deref(elem);
                self.annotations.get_mut(id).deref = copied;
                return (ty, Info::default());
            }

            Type::Struct(st) => {
                if let Some(name) = name {
                    let field = match &config.env {
                        Some(env) => env.find_field(&base, name),
                        None => fetch_field(st, name),
                    };

                    if let Some(field) = field {
                        let (ty, copied) = deref(&field.ty);
                        let annotation = self.annotations.get_mut(id);
                        annotation.deref = copied;
                        annotation.field_index = field.index;
                        annotation.name = Some(name.to_string());
                        return (ty, Info::default());
                    }

                    return self.missing_member(id, &base, name);
                }
            }

            Type::Nil => {
                if let Some(name) = name {
                    return self.missing_member(id, &base, name);
                }
            }

            _ => {}
        }

        self.error(
            id,
            ErrorImpl::UndefinedIndex {
                base: base.to_string(),
                property: prop.to_string(),
            },
        )
    }

    /// A missing name is reported as a method when the member is itself
    /// being called, possibly through an optional chain.
    fn missing_member(&mut self, id: NodeId, base: &Type, name: &str) -> (Type, Info) {
        let nodes = self.nodes;
        let mut child = id;
        let mut called = false;

        for parent in self.parents.iter().rev().skip(1) {
            match &nodes[parent.0] {
                Node::Chain(inner) if *inner == child => child = *parent,
                Node::Call { callee, .. } => {
                    called = *callee == child;
                    break;
                }
                _ => break,
            }
        }

        let error = if called {
            ErrorImpl::NoSuchMethod {
                base: base.to_string(),
                name: name.to_string(),
            }
        } else {
            ErrorImpl::NoSuchField {
                base: base.to_string(),
                name: name.to_string(),
            }
        };

        self.error(id, error)
    }

    fn visit_slice(
        &mut self,
        id: NodeId,
        node: NodeId,
        from: Option<NodeId>,
        to: Option<NodeId>,
    ) -> (Type, Info) {
        let (t, _) = self.visit(node);

        if !matches!(
            t,
            Type::Any | Type::Interface(_) | Type::String | Type::Array(_)
        ) {
            return self.error(
                id,
                ErrorImpl::CannotSlice {
                    received: t.to_string(),
                },
            );
        }

        for bound in [from, to].into_iter().flatten() {
            let (bound_type, _) = self.visit(bound);
            if !is_integer(&bound_type) && !is_any(&bound_type) {
                return self.error(
                    bound,
                    ErrorImpl::NonIntegerSliceIndex {
                        received: bound_type.to_string(),
                    },
                );
            }
        }

        (t, Info::default())
    }

    fn visit_call(&mut self, id: NodeId, callee: NodeId, arguments: &[NodeId]) -> (Type, Info) {
        let (callee_type, callee_info) = self.visit(callee);

        let nodes = self.nodes;
        let mut target = callee;
        while let Node::Chain(inner) = &nodes[target.0] {
            target = *inner;
        }

        let name = match &nodes[target.0] {
            Node::Identifier(name) => name.clone(),
            Node::Member { property, .. } => match &nodes[property.0] {
                Node::String(name) => name.clone(),
                _ => String::from("function"),
            },
            _ => String::from("function"),
        };

        match &callee_type {
            Type::Any | Type::Interface(_) => {
                for argument in arguments {
                    self.visit(*argument);
                }
                (Type::Any, Info::default())
            }
            Type::Func(func) => {
                let func = Arc::clone(func);

                let annotation = self.annotations.get_mut(id);
                annotation.method = callee_info.is_method;
                annotation.fast = is_fast(&func, callee_info.is_method);

                self.check_func(id, &func, callee_info.is_method, &name, arguments)
            }
            _ => self.error(
                id,
                ErrorImpl::NotCallable {
                    received: callee_type.to_string(),
                },
            ),
        }
    }

    /// Checks arguments against `func` and returns its first output.
    fn check_func(
        &mut self,
        id: NodeId,
        func: &FuncType,
        method: bool,
        name: &str,
        arguments: &[NodeId],
    ) -> (Type, Info) {
        if func.outs.is_empty() {
            return self.error(
                id,
                ErrorImpl::NoReturnValue {
                    function: name.to_string(),
                },
            );
        }
        if func.outs.len() > 2 {
            return self.error(
                id,
                ErrorImpl::TooManyReturnValues {
                    function: name.to_string(),
                },
            );
        }

        // A bound method's receiver is not written by the caller.
        let offset = usize::from(method);
        let num_in = func.ins.len().saturating_sub(offset);

        if func.variadic {
            if arguments.len() + 1 < num_in {
                return self.error(
                    id,
                    ErrorImpl::MissingArguments {
                        function: name.to_string(),
                    },
                );
            }
        } else if arguments.len() > num_in {
            return self.error(
                id,
                ErrorImpl::UnexpectedArguments {
                    function: name.to_string(),
                },
            );
        } else if arguments.len() < num_in {
            return self.error(
                id,
                ErrorImpl::MissingArguments {
                    function: name.to_string(),
                },
            );
        }

        for (i, argument) in arguments.iter().enumerate() {
            let (mut t, _) = self.visit(*argument);

            let expected = match func.variadic && i + 1 >= num_in {
                true => func.ins.last().and_then(Type::elem),
                false => func.ins.get(i + offset),
            };
            let expected = expected.cloned().unwrap_or(Type::Any);

            if is_integer(&t) && is_number(&expected) && self.is_integer_literal_tree(*argument) {
                self.coerce_literals(*argument, &expected);
                t = expected.clone();
            }

            if !assignable(&t, &expected) {
                return self.error(
                    *argument,
                    ErrorImpl::ArgumentTypeMatchError {
                        function: name.to_string(),
                        expected: expected.to_string(),
                        received: t.to_string(),
                    },
                );
            }
        }

        if !func.variadic {
            if let Some(index) = self.find_func_type(func, arguments) {
                trace!(function = name, index, "fast dispatch");
                self.annotations.get_mut(id).typed = index;
            }
        }

        (func.outs[0].clone(), Info::default())
    }

    /// An integer literal, or `+`/`-` or `+ - * /` built only from them.
    fn is_integer_literal_tree(&self, id: NodeId) -> bool {
        match &self.nodes[id.0] {
            Node::Integer(_) => true,
            Node::Unary { operator, node } if operator == "+" || operator == "-" => {
                self.is_integer_literal_tree(*node)
            }
            Node::Binary {
                operator,
                left,
                right,
            } if matches!(operator.as_str(), "+" | "-" | "*" | "/") => {
                self.is_integer_literal_tree(*left) && self.is_integer_literal_tree(*right)
            }
            _ => false,
        }
    }

    /// Retypes a literal tree to the numeric type it is passed as. The
    /// value is not range checked.
    fn coerce_literals(&mut self, id: NodeId, ty: &Type) {
        self.annotations.set_type(id, ty.clone());

        let nodes = self.nodes;
        match &nodes[id.0] {
            Node::Unary { node, .. } => self.coerce_literals(*node, ty),
            Node::Binary { left, right, .. } => {
                self.coerce_literals(*left, ty);
                self.coerce_literals(*right, ty);
            }
            _ => {}
        }
    }

    /// First catalog entry (index 0 excluded) whose outputs equal the
    /// callee's and whose inputs equal the argument types.
    fn find_func_type(&self, func: &FuncType, arguments: &[NodeId]) -> Option<usize> {
        self.config
            .func_types
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, typed)| {
                typed.outs == func.outs
                    && typed.ins.len() == arguments.len()
                    && typed.ins.iter().zip(arguments).all(|(input, argument)| {
                        self.annotations
                            .get(*argument)
                            .and_then(|a| a.ty.as_ref())
                            .is_some_and(|ty| ty == input)
                    })
            })
            .map(|(index, _)| index)
    }

    fn visit_builtin(
        &mut self,
        id: NodeId,
        namespace: &str,
        name: &str,
        arguments: &[NodeId],
    ) -> (Type, Info) {
        let config = self.config;

        let Some(space) = config.registry.get(namespace) else {
            return self.error(
                id,
                ErrorImpl::UnknownNamespace {
                    namespace: namespace.to_string(),
                },
            );
        };

        let call = BuiltinCall {
            id,
            namespace,
            name,
            arguments,
        };
        space.check(self, &call)
    }

    fn visit_pointer(&mut self, id: NodeId) -> (Type, Info) {
        let Some(collection) = self.collections.last() else {
            return self.error(id, ErrorImpl::PointerOutsideClosure);
        };

        match collection {
            Type::Any | Type::Interface(_) => (Type::Any, Info::default()),
            Type::Array(elem) => (elem.as_ref().clone(), Info::default()),
            Type::Pointer(_) if is_array(collection) => {
                let elem = strip_pointers(collection)
                    .elem()
                    .cloned()
                    .unwrap_or(Type::Any);
                (elem, Info::default())
            }
            _ => {
                let received = collection.to_string();
                self.error(id, ErrorImpl::NotAnArray { received })
            }
        }
    }

    fn visit_conditional(&mut self, cond: NodeId, exp1: NodeId, exp2: NodeId) -> (Type, Info) {
        let (c, _) = self.visit(cond);
        if !is_bool(&c) && !is_any(&c) {
            return self.error(
                cond,
                ErrorImpl::NonBoolCondition {
                    received: c.to_string(),
                },
            );
        }

        let (t1, _) = self.visit(exp1);
        let (t2, _) = self.visit(exp2);

        let ty = match (is_nil(&t1), is_nil(&t2)) {
            (true, false) => t2,
            (false, true) | (true, true) => t1,
            (false, false) if assignable(&t1, &t2) => t1,
            _ => Type::Any,
        };
        (ty, Info::default())
    }
}

/// Variadic `func(...any) any` or `func(...any) (any, error)`, after the
/// receiver of a bound method.
fn is_fast(func: &FuncType, method: bool) -> bool {
    let num_in = if method { 2 } else { 1 };
    if !func.variadic || func.ins.len() != num_in {
        return false;
    }

    let outs_match = match func.outs.as_slice() {
        [out] => is_any(out),
        [out, err] => is_any(out) && *err == Type::Error,
        _ => false,
    };

    outs_match
        && matches!(func.ins.last(), Some(Type::Array(elem)) if is_any(elem))
}

impl ExternVisitor for CheckVisitor<'_> {
    fn visit(&mut self, node: NodeId) -> (Type, Info) {
        CheckVisitor::visit(self, node)
    }

    fn error(&mut self, node: NodeId, error: ErrorImpl) -> (Type, Info) {
        CheckVisitor::error(self, node, error)
    }

    fn push_collection(&mut self, collection: Type) {
        self.collections.push(collection);
    }

    fn pop_collection(&mut self) {
        self.collections.pop();
    }
}
