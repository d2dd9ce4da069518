//! Parser module for building the expression tree.
//!
//! This module contains the parser that transforms a stream of tokens
//! into a [`Tree`](crate::ast::ast::Tree). It uses a Pratt parser with
//! operator precedence and handles:
//!
//! - Literals, identifiers, array and map literals
//! - Unary, binary, range and conditional operators
//! - Member access, optional chaining, indexing and slicing
//! - Calls, and builtin calls recognised from the builtin registry
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;

#[cfg(test)]
mod tests;
