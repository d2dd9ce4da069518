use std::{collections::HashMap, sync::Arc};

use lazy_static::lazy_static;
use tracing::debug;

use super::{
    math::math_namespace,
    member::{Member, Namespace},
    standard::std_namespace,
};

lazy_static! {
    /// Standard and math namespaces, built once and never mutated.
    pub static ref REGISTRY: Arc<Registry> = {
        let registry = Registry::with_defaults();
        debug!(namespaces = registry.len(), "builtin registry initialised");
        Arc::new(registry)
    };
}

/// Namespaces keyed by name; `""` is the standard namespace.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    namespaces: HashMap<String, Namespace>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Registry::new();
        registry.register(std_namespace());
        registry.register(math_namespace());
        registry
    }

    /// Adds a namespace, replacing one registered under the same name.
    pub fn register(&mut self, namespace: Namespace) {
        self.namespaces.insert(namespace.name.clone(), namespace);
    }

    pub fn get(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    /// Member of the standard namespace, used to recognise `name(...)`.
    pub fn standard(&self, name: &str) -> Option<&Member> {
        self.get("").and_then(|ns| ns.get(name))
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}
