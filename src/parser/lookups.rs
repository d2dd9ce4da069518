use std::collections::HashMap;

use crate::{ast::ast::NodeId, errors::errors::Error, lexer::tokens::TokenKind};

use super::{expr::*, parser::Parser};

/// Precedence levels, lowest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Conditional,
    Or,
    And,
    Relational,
    Range,
    Additive,
    Multiplicative,
    Unary,
    Exponent,
    Postfix,
    Primary,
}

pub type NUDHandler = fn(&mut Parser) -> Result<NodeId, Error>;
pub type LEDHandler = fn(&mut Parser, NodeId, BindingPower) -> Result<NodeId, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.led(TokenKind::Question, BindingPower::Conditional, parse_conditional_expr);

    // Logical
    parser.led(TokenKind::Or, BindingPower::Or, parse_binary_expr);
    parser.led(TokenKind::And, BindingPower::And, parse_binary_expr);

    // Relational
    parser.led(TokenKind::Equals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::In, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Not, BindingPower::Relational, parse_not_in_expr);
    parser.led(TokenKind::Matches, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Contains, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::StartsWith, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::EndsWith, BindingPower::Relational, parse_binary_expr);

    parser.led(TokenKind::DotDot, BindingPower::Range, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Percent, BindingPower::Multiplicative, parse_binary_expr);

    parser.led(TokenKind::StarStar, BindingPower::Exponent, parse_exponent_expr);
    parser.led(TokenKind::Caret, BindingPower::Exponent, parse_exponent_expr);

    // Postfix
    parser.led(TokenKind::OpenParen, BindingPower::Postfix, parse_call_expr);
    parser.led(TokenKind::Dot, BindingPower::Postfix, parse_member_expr);
    parser.led(TokenKind::QuestionDot, BindingPower::Postfix, parse_member_expr);
    parser.led(TokenKind::OpenBracket, BindingPower::Postfix, parse_index_expr);

    // Literals and symbols
    parser.nud(TokenKind::Integer, parse_primary_expr);
    parser.nud(TokenKind::Float, parse_primary_expr);
    parser.nud(TokenKind::String, parse_primary_expr);
    parser.nud(TokenKind::Nil, parse_primary_expr);
    parser.nud(TokenKind::True, parse_primary_expr);
    parser.nud(TokenKind::False, parse_primary_expr);
    parser.nud(TokenKind::Hash, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_identifier_expr);
    parser.nud(TokenKind::Not, parse_prefix_expr);
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::Plus, parse_prefix_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::OpenBracket, parse_array_expr);
    parser.nud(TokenKind::OpenCurly, parse_map_expr);
}

// Lookup tables inside parser struct, so it's easier
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
