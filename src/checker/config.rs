use std::{collections::HashMap, sync::Arc};

use crate::{
    builtin::registry::{Registry, REGISTRY},
    environment::environment::Environment,
    types::types::{FuncType, Kind, Type},
};

use super::func_types::FUNC_TYPES;

/// Everything a check depends on besides the tree.
///
/// Without an environment the check is untyped: every identifier is
/// `Any` and is dereferenced at runtime.
#[derive(Clone)]
pub struct Config {
    pub env: Option<Arc<dyn Environment>>,
    /// Unknown identifiers are errors instead of `default_type`.
    pub strict: bool,
    pub default_type: Option<Type>,
    pub expect: Option<Kind>,
    /// Operator symbol to candidate overload function names.
    pub operators: HashMap<String, Vec<String>>,
    /// Fast-dispatch catalog; index 0 is reserved.
    pub func_types: Arc<Vec<FuncType>>,
    pub registry: Arc<Registry>,
}

impl Config {
    pub fn new() -> Self {
        Config {
            env: None,
            strict: false,
            default_type: None,
            expect: None,
            operators: HashMap::new(),
            func_types: Arc::clone(&FUNC_TYPES),
            registry: Arc::clone(&REGISTRY),
        }
    }

    pub fn with_env(mut self, env: impl Environment + 'static) -> Self {
        self.env = Some(Arc::new(env));
        self
    }

    pub fn with_shared_env(mut self, env: Arc<dyn Environment>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_default_type(mut self, ty: Type) -> Self {
        self.default_type = Some(ty);
        self
    }

    pub fn expect(mut self, kind: Kind) -> Self {
        self.expect = Some(kind);
        self
    }

    /// Adds overload candidates for `symbol`, tried in order.
    pub fn with_operator(mut self, symbol: &str, names: &[&str]) -> Self {
        self.operators
            .entry(symbol.to_string())
            .or_default()
            .extend(names.iter().map(|name| name.to_string()));
        self
    }

    pub fn with_func_types(mut self, func_types: Vec<FuncType>) -> Self {
        self.func_types = Arc::new(func_types);
        self
    }

    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}
