//! Error types and error handling for the checker.
//!
//! This module defines the single diagnostic type produced by the lexer,
//! the parser and the checking pass. It includes:
//!
//! - Error structures with source position information
//! - One variant per diagnostic, grouped by binding, arity, type mismatch,
//!   structural, usage and expectation errors
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions

pub mod errors;
