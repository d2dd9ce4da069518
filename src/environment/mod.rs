//! Host environment bridge.
//!
//! The checker never inspects host data directly. It asks an
//! [`environment::Environment`] which type a free identifier has, which
//! fields and methods a type exposes, and which operator overload applies.
//! [`table::TypeTable`] is the registered-metadata implementation.

pub mod environment;
pub mod table;

#[cfg(test)]
mod tests;
