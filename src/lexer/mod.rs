//! Lexical analysis for expressions.
//!
//! This module contains the lexer (tokenizer) that converts an expression
//! into a stream of tokens for parsing. It handles:
//!
//! - Tokenization using an ordered table of anchored regex patterns
//! - Keywords, identifiers, integer, float and string literals, operators
//! - Token position tracking for error reporting
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
