//! Builtin namespaces and their members.
//!
//! A namespace groups library functions and constants under a name (the
//! empty name is the unqualified standard library). Each member carries
//! its own checking routine, called through the narrow
//! [`member::ExternVisitor`] surface so members never see the checker
//! itself.
//!
//! - `member` - members, namespaces and the visitor callback surface
//! - `registry` - the process-wide registry of namespaces
//! - `standard` - `len`, `all`, `none`, `any`, `one`, `filter`, `map`, `count`
//! - `math` - `math.abs`, `math.pi`

pub mod math;
pub mod member;
pub mod registry;
pub mod standard;

#[cfg(test)]
mod tests;
