//! Unit tests for the parser module.
//!
//! Covers precedence and associativity, member access and optional
//! chaining, indexing and slicing, builtins and their closures, literals
//! and parse errors.

use std::sync::Arc;

use crate::{
    ast::ast::{Node, NodeId, Tree},
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
};

use super::parser::{parse, MAX_DEPTH};

fn parse_source(source: &str) -> Result<Tree, Error> {
    let tokens = tokenize(source.to_string(), Some("test.expr".to_string()))?;
    parse(tokens, Arc::new("test.expr".to_string()))
}

fn root(tree: &Tree) -> &Node {
    tree.node(tree.root)
}

fn binary(tree: &Tree, id: NodeId) -> (&str, NodeId, NodeId) {
    match tree.node(id) {
        Node::Binary {
            operator,
            left,
            right,
        } => (operator.as_str(), *left, *right),
        other => panic!("expected binary node, got {:?}", other),
    }
}

#[test]
fn test_parse_literals() {
    let tree = parse_source("42").unwrap();
    assert_eq!(root(&tree), &Node::Integer(42));

    let tree = parse_source("0x1F").unwrap();
    assert_eq!(root(&tree), &Node::Integer(31));

    let tree = parse_source("1_000").unwrap();
    assert_eq!(root(&tree), &Node::Integer(1000));

    let tree = parse_source("2.5").unwrap();
    assert_eq!(root(&tree), &Node::Float(2.5));

    let tree = parse_source("'text'").unwrap();
    assert_eq!(root(&tree), &Node::String("text".to_string()));

    assert_eq!(root(&parse_source("nil").unwrap()), &Node::Nil);
    assert_eq!(root(&parse_source("true").unwrap()), &Node::Bool(true));
}

#[test]
fn test_integer_overflow_is_a_parse_error() {
    let err = parse_source("99999999999999999999").unwrap_err();

    assert_eq!(err.get_error_name(), "NumberParseError");
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let tree = parse_source("1 + 2 * 3").unwrap();

    let (operator, left, right) = binary(&tree, tree.root);
    assert_eq!(operator, "+");
    assert_eq!(tree.node(left), &Node::Integer(1));
    assert_eq!(binary(&tree, right).0, "*");
}

#[test]
fn test_subtraction_is_left_associative() {
    let tree = parse_source("10 - 3 - 2").unwrap();

    let (operator, left, right) = binary(&tree, tree.root);
    assert_eq!(operator, "-");
    assert_eq!(binary(&tree, left).0, "-");
    assert_eq!(tree.node(right), &Node::Integer(2));
}

#[test]
fn test_exponent_is_right_associative() {
    let tree = parse_source("2 ** 3 ** 2").unwrap();

    let (operator, left, right) = binary(&tree, tree.root);
    assert_eq!(operator, "**");
    assert_eq!(tree.node(left), &Node::Integer(2));
    assert_eq!(binary(&tree, right).0, "**");
}

#[test]
fn test_unary_minus_before_binary() {
    let tree = parse_source("-1 + 2").unwrap();

    let (operator, left, _) = binary(&tree, tree.root);
    assert_eq!(operator, "+");
    assert!(matches!(tree.node(left), Node::Unary { operator, .. } if operator == "-"));
}

#[test]
fn test_logical_precedence() {
    let tree = parse_source("a or b and c == d").unwrap();

    let (operator, _, right) = binary(&tree, tree.root);
    assert_eq!(operator, "or");
    let (operator, _, right) = binary(&tree, right);
    assert_eq!(operator, "and");
    assert_eq!(binary(&tree, right).0, "==");
}

#[test]
fn test_range_binds_tighter_than_comparison() {
    let tree = parse_source("x in 1..10").unwrap();

    let (operator, _, right) = binary(&tree, tree.root);
    assert_eq!(operator, "in");
    assert_eq!(binary(&tree, right).0, "..");
}

#[test]
fn test_not_in_becomes_negated_in() {
    let tree = parse_source("a not in b").unwrap();

    let Node::Unary { operator, node } = root(&tree) else {
        panic!("expected unary root");
    };
    assert_eq!(operator, "!");
    assert_eq!(binary(&tree, *node).0, "in");
}

#[test]
fn test_grouping_overrides_precedence() {
    let tree = parse_source("(1 + 2) * 3").unwrap();

    let (operator, left, _) = binary(&tree, tree.root);
    assert_eq!(operator, "*");
    assert_eq!(binary(&tree, left).0, "+");
}

#[test]
fn test_conditional() {
    let tree = parse_source("a ? 1 : b ? 2 : 3").unwrap();

    let Node::Conditional { exp2, .. } = root(&tree) else {
        panic!("expected conditional root");
    };
    assert!(matches!(tree.node(*exp2), Node::Conditional { .. }));
}

#[test]
fn test_member_property_is_a_string() {
    let tree = parse_source("user.Name").unwrap();

    let Node::Member {
        node,
        property,
        optional,
    } = root(&tree)
    else {
        panic!("expected member root");
    };
    assert_eq!(tree.node(*node), &Node::Identifier("user".to_string()));
    assert_eq!(tree.node(*property), &Node::String("Name".to_string()));
    assert!(!optional);
}

#[test]
fn test_optional_member_is_chained() {
    let tree = parse_source("user?.Name").unwrap();

    let Node::Chain(member) = root(&tree) else {
        panic!("expected chain root");
    };
    assert!(matches!(
        tree.node(*member),
        Node::Member { optional: true, .. }
    ));
}

#[test]
fn test_index_and_slice() {
    let tree = parse_source("items[0]").unwrap();
    assert!(matches!(root(&tree), Node::Member { optional: false, .. }));

    let tree = parse_source("items[1:2]").unwrap();
    assert!(matches!(
        root(&tree),
        Node::Slice {
            from: Some(_),
            to: Some(_),
            ..
        }
    ));

    let tree = parse_source("items[:2]").unwrap();
    assert!(matches!(
        root(&tree),
        Node::Slice {
            from: None,
            to: Some(_),
            ..
        }
    ));

    let tree = parse_source("items[1:]").unwrap();
    assert!(matches!(
        root(&tree),
        Node::Slice {
            from: Some(_),
            to: None,
            ..
        }
    ));
}

#[test]
fn test_call_with_arguments() {
    let tree = parse_source("add(1, 2)").unwrap();

    let Node::Call { callee, arguments } = root(&tree) else {
        panic!("expected call root");
    };
    assert_eq!(tree.node(*callee), &Node::Identifier("add".to_string()));
    assert_eq!(arguments.len(), 2);
}

#[test]
fn test_method_call() {
    let tree = parse_source("user.Greet('hi')").unwrap();

    let Node::Call { callee, arguments } = root(&tree) else {
        panic!("expected call root");
    };
    assert!(matches!(tree.node(*callee), Node::Member { .. }));
    assert_eq!(arguments.len(), 1);
}

#[test]
fn test_standard_builtin_with_closure() {
    let tree = parse_source("filter(numbers, # > 1)").unwrap();

    let Node::Builtin {
        namespace,
        name,
        arguments,
    } = root(&tree)
    else {
        panic!("expected builtin root");
    };
    assert_eq!(namespace, "");
    assert_eq!(name, "filter");
    assert_eq!(arguments.len(), 2);
    assert_eq!(
        tree.node(arguments[0]),
        &Node::Identifier("numbers".to_string())
    );

    let Node::Closure(body) = tree.node(arguments[1]) else {
        panic!("expected closure argument");
    };
    let (operator, left, _) = binary(&tree, *body);
    assert_eq!(operator, ">");
    assert_eq!(tree.node(left), &Node::Pointer);
}

#[test]
fn test_braced_closure() {
    let tree = parse_source("all(numbers, { # > 0 })").unwrap();

    let Node::Builtin { arguments, .. } = root(&tree) else {
        panic!("expected builtin root");
    };
    assert!(matches!(tree.node(arguments[1]), Node::Closure(_)));
}

#[test]
fn test_len_argument_is_not_a_closure() {
    let tree = parse_source("len(items)").unwrap();

    let Node::Builtin { arguments, .. } = root(&tree) else {
        panic!("expected builtin root");
    };
    assert_eq!(
        tree.node(arguments[0]),
        &Node::Identifier("items".to_string())
    );
}

#[test]
fn test_builtin_name_without_call_is_identifier() {
    let tree = parse_source("len + 1").unwrap();

    let (_, left, _) = binary(&tree, tree.root);
    assert_eq!(tree.node(left), &Node::Identifier("len".to_string()));
}

#[test]
fn test_namespaced_builtins() {
    let tree = parse_source("math.abs(-3)").unwrap();
    let Node::Builtin {
        namespace,
        name,
        arguments,
    } = root(&tree)
    else {
        panic!("expected builtin root");
    };
    assert_eq!(namespace, "math");
    assert_eq!(name, "abs");
    assert_eq!(arguments.len(), 1);

    let tree = parse_source("math.pi").unwrap();
    assert!(matches!(
        root(&tree),
        Node::Builtin { name, arguments, .. } if name == "pi" && arguments.is_empty()
    ));

    let tree = parse_source("math.pi(1)").unwrap();
    assert!(matches!(
        root(&tree),
        Node::Builtin { arguments, .. } if arguments.len() == 1
    ));
}

#[test]
fn test_array_and_map_literals() {
    let tree = parse_source("[1, 2, 3,]").unwrap();
    let Node::Array(elements) = root(&tree) else {
        panic!("expected array root");
    };
    assert_eq!(elements.len(), 3);

    let tree = parse_source("{name: 'a', \"age\": 2}").unwrap();
    let Node::Map(pairs) = root(&tree) else {
        panic!("expected map root");
    };
    assert_eq!(pairs.len(), 2);
    let Node::Pair { key, .. } = tree.node(pairs[0]) else {
        panic!("expected pair");
    };
    assert_eq!(tree.node(*key), &Node::String("name".to_string()));
}

#[test]
fn test_spans_cover_operands() {
    let tree = parse_source("foo + bar").unwrap();
    let span = tree.span(tree.root);

    assert_eq!(span.start.0, 0);
    assert_eq!(span.end.0, 9);
}

#[test]
fn test_root_is_the_outermost_node() {
    let tree = parse_source("a ? b : c").unwrap();

    assert!(matches!(root(&tree), Node::Conditional { .. }));
    assert_eq!(tree.len(), 4);
}

#[test]
fn test_trailing_tokens_are_rejected() {
    let err = parse_source("1 2").unwrap_err();

    assert_eq!(err.get_error_name(), "UnexpectedToken");
    assert_eq!(err.get_position().0, 2);
}

#[test]
fn test_unclosed_call() {
    let err = parse_source("add(1, 2").unwrap_err();

    assert_eq!(err.get_error_name(), "UnexpectedTokenDetailed");
}

#[test]
fn test_missing_operand() {
    let err = parse_source("1 +").unwrap_err();

    assert_eq!(err.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_empty_source_is_rejected() {
    assert!(parse_source("").is_err());
}

#[test]
fn test_nesting_limit() {
    let source = format!("{}1", "- ".repeat(MAX_DEPTH + 100));
    let err = parse_source(&source).unwrap_err();
    assert_eq!(
        err.get_impl(),
        &ErrorImpl::NestingTooDeep { limit: MAX_DEPTH }
    );
    assert_eq!(err.get_position().0 as usize, MAX_DEPTH * 2);

    let source = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
    let err = parse_source(&source).unwrap_err();
    assert_eq!(err.get_error_name(), "NestingTooDeep");

    let source = format!("{}a{}", "(".repeat(100), ")".repeat(100));
    let tree = parse_source(&source).unwrap();
    assert_eq!(root(&tree), &Node::Identifier("a".to_string()));
}
