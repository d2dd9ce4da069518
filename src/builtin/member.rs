use std::collections::HashMap;

use crate::{ast::ast::NodeId, errors::errors::ErrorImpl, types::types::Type};

/// Side information returned next to a node's type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Info {
    /// The value is a bound method; its receiver takes the first input.
    pub is_method: bool,
}

/// The part of the checker a builtin member may use.
pub trait ExternVisitor {
    /// Checks a child node and returns its type.
    fn visit(&mut self, node: NodeId) -> (Type, Info);

    /// Records a diagnostic unless one was recorded already. Always
    /// returns `Any` so checking can continue.
    fn error(&mut self, node: NodeId, error: ErrorImpl) -> (Type, Info);

    /// Makes `collection` the innermost context for `#`.
    fn push_collection(&mut self, collection: Type);

    fn pop_collection(&mut self);
}

/// How the parser reads one argument of a builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    Expression,
    /// Wrapped in a closure; `#` refers to the current element.
    Closure,
}

/// A builtin call as seen by a member's checking routine.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinCall<'a> {
    pub id: NodeId,
    pub namespace: &'a str,
    pub name: &'a str,
    pub arguments: &'a [NodeId],
}

impl BuiltinCall<'_> {
    /// Qualified name used in diagnostics.
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.to_string()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

pub type CheckFn = fn(&mut dyn ExternVisitor, &BuiltinCall) -> (Type, Info);

#[derive(Debug, Clone)]
pub struct Member {
    pub name: &'static str,
    /// Constants are not callable.
    pub callable: bool,
    pub arguments: &'static [ArgumentKind],
    pub check: CheckFn,
}

impl Member {
    pub const fn function(
        name: &'static str,
        arguments: &'static [ArgumentKind],
        check: CheckFn,
    ) -> Self {
        Member {
            name,
            callable: true,
            arguments,
            check,
        }
    }

    pub const fn constant(name: &'static str, check: CheckFn) -> Self {
        Member {
            name,
            callable: false,
            arguments: &[],
            check,
        }
    }

    /// Argument shape at `index`; arguments past the declared shape are
    /// plain expressions.
    pub fn argument_kind(&self, index: usize) -> ArgumentKind {
        self.arguments
            .get(index)
            .copied()
            .unwrap_or(ArgumentKind::Expression)
    }
}

#[derive(Debug, Clone)]
pub struct Namespace {
    pub name: String,
    members: HashMap<&'static str, Member>,
}

impl Namespace {
    pub fn new(name: &str, members: Vec<Member>) -> Self {
        Namespace {
            name: name.to_string(),
            members: members.into_iter().map(|m| (m.name, m)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// Runs the checking routine of the member named by `call`. Constants
    /// given arguments are rejected before their routine runs.
    pub fn check(&self, v: &mut dyn ExternVisitor, call: &BuiltinCall) -> (Type, Info) {
        match self.get(call.name) {
            Some(member) if !member.callable && !call.arguments.is_empty() => v.error(
                call.id,
                ErrorImpl::ConstantInvoked {
                    constant: call.qualified_name(),
                },
            ),
            Some(member) => (member.check)(v, call),
            None => v.error(
                call.id,
                ErrorImpl::UnknownBuiltin {
                    namespace: call.namespace.to_string(),
                    name: call.name.to_string(),
                },
            ),
        }
    }
}
