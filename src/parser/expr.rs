use std::sync::Arc;

use crate::{
    ast::ast::{Node, NodeId},
    builtin::member::ArgumentKind,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    lookups::BindingPower,
    parser::{Parser, MAX_DEPTH},
};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<NodeId, Error> {
    if parser.depth >= MAX_DEPTH {
        return Err(Error::new(
            ErrorImpl::NestingTooDeep { limit: MAX_DEPTH },
            parser.get_position(),
        ));
    }

    parser.depth += 1;
    let result = parse_nested_expr(parser, bp);
    parser.depth -= 1;

    result
}

fn parse_nested_expr(parser: &mut Parser, bp: BindingPower) -> Result<NodeId, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected());
    };

    let mut left = nud_fn(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = parser
            .get_bp_lookup()
            .get(&token_kind)
            .copied()
            .unwrap_or(BindingPower::Default);
        if next_bp <= bp {
            break;
        }

        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected());
        };
        left = led_fn(parser, left, next_bp)?;
    }

    Ok(left)
}

fn span_between(parser: &Parser, start: NodeId, end: NodeId) -> Span {
    Span {
        start: parser.span_of(start).start.clone(),
        end: parser.span_of(end).end.clone(),
    }
}

fn parse_integer(literal: &str) -> Option<i64> {
    let digits = literal.replace('_', "");
    match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16).ok(),
        None => digits.parse().ok(),
    }
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let token = parser.current_token().clone();

    let node = match token.kind {
        TokenKind::Integer => match parse_integer(&token.value) {
            Some(value) => Node::Integer(value),
            None => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::Float => match token.value.replace('_', "").parse() {
            Ok(value) => Node::Float(value),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::String => Node::String(token.value),
        TokenKind::Nil => Node::Nil,
        TokenKind::True => Node::Bool(true),
        TokenKind::False => Node::Bool(false),
        TokenKind::Hash => Node::Pointer,
        _ => return Err(parser.unexpected()),
    };

    parser.advance();
    Ok(parser.push(node, token.span))
}

/// Identifiers, plus builtins: `name(...)` for the standard namespace
/// and `ns.name` or `ns.name(...)` for a registered namespace.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let token = parser.advance().clone();
    let next = parser.current_token_kind();

    if next == TokenKind::OpenParen && parser.registry.standard(&token.value).is_some() {
        return parse_builtin(parser, String::new(), token.value, token.span);
    }

    let is_namespace = !token.value.is_empty() && parser.registry.get(&token.value).is_some();
    if next == TokenKind::Dot && is_namespace {
        parser.advance();
        let name = parser.expect(TokenKind::Identifier)?;
        let span = Span {
            start: token.span.start,
            end: name.span.end,
        };
        return parse_builtin(parser, token.value, name.value, span);
    }

    Ok(parser.push(Node::Identifier(token.value), token.span))
}

fn parse_builtin(
    parser: &mut Parser,
    namespace: String,
    name: String,
    mut span: Span,
) -> Result<NodeId, Error> {
    let registry = Arc::clone(&parser.registry);
    let member = registry.get(&namespace).and_then(|ns| ns.get(&name));

    let mut arguments = vec![];
    if parser.current_token_kind() == TokenKind::OpenParen {
        parser.advance();

        while parser.current_token_kind() != TokenKind::CloseParen {
            if !arguments.is_empty() {
                parser.expect(TokenKind::Comma)?;
            }

            let kind = member
                .map(|member| member.argument_kind(arguments.len()))
                .unwrap_or(ArgumentKind::Expression);
            let argument = match kind {
                ArgumentKind::Expression => parse_expr(parser, BindingPower::Default)?,
                ArgumentKind::Closure => parse_closure(parser)?,
            };
            arguments.push(argument);
        }

        span.end = parser.expect(TokenKind::CloseParen)?.span.end;
    }

    Ok(parser.push(
        Node::Builtin {
            namespace,
            name,
            arguments,
        },
        span,
    ))
}

/// `{ body }` or a bare expression, wrapped in a closure node.
fn parse_closure(parser: &mut Parser) -> Result<NodeId, Error> {
    if parser.current_token_kind() == TokenKind::OpenCurly {
        let open = parser.advance().clone();
        let body = parse_expr(parser, BindingPower::Default)?;
        let close = parser.expect(TokenKind::CloseCurly)?;

        return Ok(parser.push(
            Node::Closure(body),
            Span {
                start: open.span.start,
                end: close.span.end,
            },
        ));
    }

    let body = parse_expr(parser, BindingPower::Default)?;
    let span = parser.span_of(body).clone();
    Ok(parser.push(Node::Closure(body), span))
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: NodeId,
    bp: BindingPower,
) -> Result<NodeId, Error> {
    let operator_token = parser.advance().clone();
    let right = parse_expr(parser, bp)?;

    let span = span_between(parser, left, right);
    Ok(parser.push(
        Node::Binary {
            operator: operator_token.value,
            left,
            right,
        },
        span,
    ))
}

/// Right associative: `2 ** 3 ** 2` is `2 ** (3 ** 2)`.
pub fn parse_exponent_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    let operator_token = parser.advance().clone();
    let right = parse_expr(parser, BindingPower::Unary)?;

    let span = span_between(parser, left, right);
    Ok(parser.push(
        Node::Binary {
            operator: operator_token.value,
            left,
            right,
        },
        span,
    ))
}

/// `a not in b` becomes `!(a in b)`.
pub fn parse_not_in_expr(
    parser: &mut Parser,
    left: NodeId,
    bp: BindingPower,
) -> Result<NodeId, Error> {
    parser.advance();
    parser.expect(TokenKind::In)?;
    let right = parse_expr(parser, bp)?;

    let span = span_between(parser, left, right);
    let inner = parser.push(
        Node::Binary {
            operator: String::from("in"),
            left,
            right,
        },
        span.clone(),
    );

    Ok(parser.push(
        Node::Unary {
            operator: String::from("!"),
            node: inner,
        },
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    let span = Span {
        start: operator_token.span.start,
        end: parser.span_of(rhs).end.clone(),
    };
    Ok(parser.push(
        Node::Unary {
            operator: operator_token.value,
            node: rhs,
        },
        span,
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_conditional_expr(
    parser: &mut Parser,
    cond: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    parser.advance();
    let exp1 = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let exp2 = parse_expr(parser, BindingPower::Default)?;

    let span = span_between(parser, cond, exp2);
    Ok(parser.push(Node::Conditional { cond, exp1, exp2 }, span))
}

pub fn parse_call_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    parser.advance();

    let mut arguments = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        if !arguments.is_empty() {
            parser.expect(TokenKind::Comma)?;
        }
        arguments.push(parse_expr(parser, BindingPower::Default)?);
    }

    let close = parser.expect(TokenKind::CloseParen)?;
    let span = Span {
        start: parser.span_of(left).start.clone(),
        end: close.span.end,
    };

    Ok(parser.push(
        Node::Call {
            callee: left,
            arguments,
        },
        span,
    ))
}

/// `a.b` and `a?.b`; the optional form is wrapped in a chain node.
pub fn parse_member_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    let operator = parser.advance().clone();
    let optional = operator.kind == TokenKind::QuestionDot;
    let name = parser.expect(TokenKind::Identifier)?;

    let property = parser.push(Node::String(name.value), name.span.clone());
    let span = Span {
        start: parser.span_of(left).start.clone(),
        end: name.span.end,
    };
    let member = parser.push(
        Node::Member {
            node: left,
            property,
            optional,
        },
        span.clone(),
    );

    if optional {
        return Ok(parser.push(Node::Chain(member), span));
    }

    Ok(member)
}

/// `a[b]`, `a[x:y]`, `a[:y]`, `a[x:]` and `a[:]`.
pub fn parse_index_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    parser.advance();

    let from = if parser.current_token_kind() == TokenKind::Colon {
        None
    } else {
        Some(parse_expr(parser, BindingPower::Default)?)
    };

    if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        let to = if parser.current_token_kind() == TokenKind::CloseBracket {
            None
        } else {
            Some(parse_expr(parser, BindingPower::Default)?)
        };

        let close = parser.expect(TokenKind::CloseBracket)?;
        let span = Span {
            start: parser.span_of(left).start.clone(),
            end: close.span.end,
        };
        return Ok(parser.push(
            Node::Slice {
                node: left,
                from,
                to,
            },
            span,
        ));
    }

    let close = parser.expect(TokenKind::CloseBracket)?;
    let Some(property) = from else {
        return Err(parser.unexpected());
    };
    let span = Span {
        start: parser.span_of(left).start.clone(),
        end: close.span.end,
    };

    Ok(parser.push(
        Node::Member {
            node: left,
            property,
            optional: false,
        },
        span,
    ))
}

pub fn parse_array_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let open = parser.advance().clone();

    let mut elements = vec![];
    while parser.current_token_kind() != TokenKind::CloseBracket {
        elements.push(parse_expr(parser, BindingPower::Default)?);
        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    let close = parser.expect(TokenKind::CloseBracket)?;
    Ok(parser.push(
        Node::Array(elements),
        Span {
            start: open.span.start,
            end: close.span.end,
        },
    ))
}

/// `{key: value, ...}`; bare identifier and string keys become string nodes.
pub fn parse_map_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let open = parser.advance().clone();

    let mut pairs = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        let key = match parser.current_token_kind() {
            TokenKind::Identifier | TokenKind::String => {
                let token = parser.advance().clone();
                parser.push(Node::String(token.value), token.span)
            }
            _ => parse_expr(parser, BindingPower::Default)?,
        };

        parser.expect(TokenKind::Colon)?;
        let value = parse_expr(parser, BindingPower::Default)?;

        let span = span_between(parser, key, value);
        pairs.push(parser.push(Node::Pair { key, value }, span));

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    let close = parser.expect(TokenKind::CloseCurly)?;
    Ok(parser.push(
        Node::Map(pairs),
        Span {
            start: open.span.start,
            end: close.span.end,
        },
    ))
}
