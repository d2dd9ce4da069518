//! Static type vocabulary and the lattice rules over it.
//!
//! This module defines the closed set of types the checker reasons about
//! and the pure helpers used by every checking rule:
//!
//! - Kind classification predicates (`is_number`, `is_array`, ...)
//! - Numeric promotion for arithmetic operators
//! - The `Any` escape used for statically-unknown operands
//! - Pointer dereferencing and assignability
//! - Struct field lookup through embedded members

pub mod lattice;
pub mod types;
