use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("nil", TokenKind::Nil);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("not", TokenKind::Not);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("in", TokenKind::In);
        map.insert("matches", TokenKind::Matches);
        map.insert("contains", TokenKind::Contains);
        map.insert("startsWith", TokenKind::StartsWith);
        map.insert("endsWith", TokenKind::EndsWith);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Integer,
    Float,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Equals,    // ==
    NotEquals, // !=
    Not,       // ! or not

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,  // || or or
    And, // && or and

    Dot,
    DotDot,
    QuestionDot,
    Question,
    Colon,
    Comma,
    Hash,

    Plus,
    Dash,
    Star,
    StarStar,
    Caret,
    Slash,
    Percent,

    // Reserved
    Nil,
    True,
    False,
    In,
    Matches,
    Contains,
    StartsWith,
    EndsWith,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::String | TokenKind::Identifier | TokenKind::Integer | TokenKind::Float => {
                write!(f, "{} ({})", self.kind, self.value)
            }
            _ => write!(f, "{}", self.kind),
        }
    }
}

impl Token {
    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }
}
