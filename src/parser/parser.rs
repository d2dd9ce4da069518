//! Parser implementation for building the expression tree.
//!
//! The parser is a Pratt parser with NUD/LED handlers. It maintains lookup
//! tables for:
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix and postfix expressions
//! - Binding powers for operator precedence

use std::{collections::HashMap, sync::Arc};

use tracing::trace;

use crate::{
    ast::ast::{Node, NodeId, Tree},
    builtin::registry::{Registry, REGISTRY},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    expr::parse_expr,
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler,
        NUDLookup,
    },
};

/// Deepest expression nesting the parser descends into.
pub const MAX_DEPTH: usize = 256;

/// Parsing state: the token stream, the lookup tables and the tree being
/// built.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Nesting of `parse_expr` calls in progress.
    pub depth: usize,
    file: Arc<String>,
    nud_lookup: NUDLookup,
    led_lookup: LEDLookup,
    binding_power_lookup: BPLookup,
    /// Builtins are recognised from the registered namespaces.
    pub registry: Arc<Registry>,
    pub tree: Tree,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>, file: Arc<String>, registry: Arc<Registry>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EOF) {
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span::null(),
            });
        }

        Parser {
            tokens,
            pos: 0,
            depth: 0,
            file,
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            registry,
            tree: Tree::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous token. The
    /// final EOF token is never passed.
    pub fn advance(&mut self) -> &Token {
        let current = self.pos;
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: token.value.clone(),
                        message: format!("expected {}", expected_kind),
                    },
                    token.span.start.clone(),
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix or postfix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token. Tokens
    /// that are also infix operators keep their infix binding power.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    pub fn push(&mut self, node: Node, span: Span) -> NodeId {
        self.tree.push(node, span)
    }

    pub fn span_of(&self, id: NodeId) -> &Span {
        self.tree.span(id)
    }

    /// Error for the current token.
    pub fn unexpected(&self) -> Error {
        let token = self.current_token();
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: token.value.clone(),
            },
            token.span.start.clone(),
        )
    }
}

/// Parses a token stream into an expression tree, recognising the
/// builtins of the process-wide registry.
pub fn parse(tokens: Vec<Token>, file: Arc<String>) -> Result<Tree, Error> {
    parse_with_registry(tokens, file, Arc::clone(&REGISTRY))
}

pub fn parse_with_registry(
    tokens: Vec<Token>,
    file: Arc<String>,
    registry: Arc<Registry>,
) -> Result<Tree, Error> {
    let mut parser = Parser::new(tokens, file, registry);
    create_token_lookups(&mut parser);

    let root = parse_expr(&mut parser, BindingPower::Default)?;

    if parser.has_tokens() {
        return Err(parser.unexpected());
    }

    let mut tree = parser.tree;
    tree.root = root;
    trace!(nodes = tree.len(), file = %parser.file, "parsed expression");

    Ok(tree)
}
