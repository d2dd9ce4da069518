use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

macro_rules! pattern {
    ($regex:literal, $handler:expr) => {
        RegexPattern {
            regex: Regex::new($regex).unwrap(),
            handler: $handler,
        }
    };
}

lazy_static! {
    // Tried in order; longer operators come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern!(r"^\s+", skip_handler),
        pattern!(r"^//[^\n]*", skip_handler),
        pattern!(r"^[a-zA-Z_$][a-zA-Z0-9_$]*", symbol_handler),
        pattern!(r"^(?:[0-9][0-9_]*\.[0-9][0-9_]*(?:[eE][+-]?[0-9]+)?|[0-9][0-9_]*[eE][+-]?[0-9]+)", float_handler),
        pattern!(r"^(?:0[xX][0-9a-fA-F_]+|[0-9][0-9_]*)", integer_handler),
        pattern!(r#"^"(?:[^"\\]|\\.)*""#, string_handler),
        pattern!(r"^'(?:[^'\\]|\\.)*'", string_handler),
        pattern!(r"^\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern!(r"^\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        pattern!(r"^\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern!(r"^\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern!(r"^\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern!(r"^\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern!(r"^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern!(r"^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern!(r"^!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        pattern!(r"^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern!(r"^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern!(r"^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern!(r"^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern!(r"^\|\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern!(r"^&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern!(r"^\.\.", MK_DEFAULT_HANDLER!(TokenKind::DotDot, "..")),
        pattern!(r"^\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern!(r"^\?\.", MK_DEFAULT_HANDLER!(TokenKind::QuestionDot, "?.")),
        pattern!(r"^\?", MK_DEFAULT_HANDLER!(TokenKind::Question, "?")),
        pattern!(r"^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern!(r"^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern!(r"^#", MK_DEFAULT_HANDLER!(TokenKind::Hash, "#")),
        pattern!(r"^\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern!(r"^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern!(r"^\*\*", MK_DEFAULT_HANDLER!(TokenKind::StarStar, "**")),
        pattern!(r"^\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern!(r"^\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
        pattern!(r"^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern!(r"^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Arc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = Arc::new(file.unwrap_or_else(|| String::from("shell")));

        Lexer {
            pos: 0,
            tokens: vec![],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Span of the next `len` bytes.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: Position(self.pos as u32, Arc::clone(&self.file)),
            end: Position((self.pos + len) as u32, Arc::clone(&self.file)),
        }
    }

    fn matched(&self, regex: &Regex) -> String {
        regex
            .find(self.remainder())
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    lexer.advance_n(matched.len());
}

fn integer_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);

    lexer.push(MK_TOKEN!(
        TokenKind::Integer,
        matched.clone(),
        lexer.span_of(matched.len())
    ));
    lexer.advance_n(matched.len());
}

fn float_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);

    lexer.push(MK_TOKEN!(
        TokenKind::Float,
        matched.clone(),
        lexer.span_of(matched.len())
    ));
    lexer.advance_n(matched.len());
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let string_literal = unescape(&matched[1..matched.len() - 1]);

    lexer.push(MK_TOKEN!(
        TokenKind::String,
        string_literal,
        lexer.span_of(matched.len())
    ));
    lexer.advance_n(matched.len());
}

fn unescape(literal: &str) -> String {
    let mut result = String::new();
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek().copied() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some(quote @ ('\\' | '"' | '\'')) => result.push(quote),
            Some('x') => {
                chars.next();
                let mut hex = String::new();
                while hex.len() < 2 {
                    match chars.peek() {
                        Some(ch) if ch.is_ascii_hexdigit() => {
                            hex.push(*ch);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => {
                        result.push_str("\\x");
                        result.push_str(&hex);
                    }
                }
                continue;
            }
            // Unknown escapes and a trailing backslash are kept as written.
            _ => {
                result.push(ch);
                continue;
            }
        }
        chars.next();
    }

    result
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = lexer.matched(regex);
    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, value.clone(), lexer.span_of(value.len())));
    lexer.advance_n(value.len());
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let Some(pattern) = PATTERNS.iter().find(|p| p.regex.is_match(lex.remainder())) else {
            return Err(Error::new(
                ErrorImpl::UnrecognisedToken {
                    token: lex.at().to_string(),
                },
                Position(lex.pos as u32, Arc::clone(&lex.file)),
            ));
        };

        (pattern.handler)(&mut lex, &pattern.regex);
    }

    let eof_span = lex.span_of(0);
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), eof_span));
    trace!(tokens = lex.tokens.len(), "tokenized");

    Ok(lex.tokens)
}
