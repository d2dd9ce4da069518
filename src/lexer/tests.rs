//! Unit tests for the lexer module.
//!
//! Covers keywords, identifiers, numeric and string literals, operators,
//! comments and error cases.

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.expr".to_string()))
        .unwrap()
        .iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("nil true false not and or in matches contains startsWith endsWith"),
        vec![
            TokenKind::Nil,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Not,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::In,
            TokenKind::Matches,
            TokenKind::Contains,
            TokenKind::StartsWith,
            TokenKind::EndsWith,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize("foo baz_123 _under $env".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].value, "baz_123");
    assert_eq!(tokens[2].value, "_under");
    assert_eq!(tokens[3].value, "$env");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize("42 3.14 1e3 0x1F 1_000".to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Float);
    assert_eq!(tokens[3].kind, TokenKind::Integer);
    assert_eq!(tokens[3].value, "0x1F");
    assert_eq!(tokens[4].kind, TokenKind::Integer);
    assert_eq!(tokens[4].value, "1_000");
}

#[test]
fn test_range_is_not_a_float() {
    assert_eq!(
        kinds("1..5"),
        vec![
            TokenKind::Integer,
            TokenKind::DotDot,
            TokenKind::Integer,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_tokenize_strings() {
    let tokens = tokenize(r#""hello\n" 'it\'s' "\x41""#.to_string(), None).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello\n");
    assert_eq!(tokens[1].value, "it's");
    assert_eq!(tokens[2].value, "A");
}

#[test]
fn test_string_span_covers_quotes() {
    let tokens = tokenize(r#"a + "bc""#.to_string(), None).unwrap();

    assert_eq!(tokens[2].span.start.0, 4);
    assert_eq!(tokens[2].span.end.0, 8);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("== != ! < <= > >= || && .. . ?. ? : , # + - ** * ^ / %"),
        vec![
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Not,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::Or,
            TokenKind::And,
            TokenKind::DotDot,
            TokenKind::Dot,
            TokenKind::QuestionDot,
            TokenKind::Question,
            TokenKind::Colon,
            TokenKind::Comma,
            TokenKind::Hash,
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::StarStar,
            TokenKind::Star,
            TokenKind::Caret,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_brackets() {
    assert_eq!(
        kinds("( ) [ ] { }"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        kinds("a // trailing comment\n+ b"),
        vec![
            TokenKind::Identifier,
            TokenKind::Plus,
            TokenKind::Identifier,
            TokenKind::EOF
        ]
    );
}

#[test]
fn test_unrecognised_token() {
    let err = tokenize("a @ b".to_string(), None).unwrap_err();

    assert_eq!(err.get_error_name(), "UnrecognisedToken");
    assert_eq!(err.get_position().0, 2);
}

#[test]
fn test_unterminated_string() {
    let err = tokenize("\"abc".to_string(), None).unwrap_err();

    assert_eq!(err.get_error_name(), "UnrecognisedToken");
    assert_eq!(err.get_position().0, 0);
}

#[test]
fn test_empty_source() {
    assert_eq!(kinds(""), vec![TokenKind::EOF]);
}
