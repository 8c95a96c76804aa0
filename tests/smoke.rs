// ObjgScript smoke tests for tokenizer and parser
// Covers: token shapes, comments, string errors, operator grouping, statement shapes

use objgscript::{LexError, Node, ParseError, TokenKind, parse_program, tokenize};

fn kinds_and_text(source: &str) -> Vec<(TokenKind, String)> {
    tokenize(source)
        .unwrap()
        .into_iter()
        .map(|token| (token.kind, token.text))
        .collect()
}

fn num(text: &str) -> Node {
    Node::Number(text.to_string())
}

#[test]
fn test_arithmetic_tokens() {
    assert_eq!(
        kinds_and_text("1+2*3"),
        vec![
            (TokenKind::Number, "1".to_string()),
            (TokenKind::Operation, "+".to_string()),
            (TokenKind::Number, "2".to_string()),
            (TokenKind::Operation, "*".to_string()),
            (TokenKind::Number, "3".to_string()),
        ]
    );
}

#[test]
fn test_comment_is_skipped() {
    assert_eq!(
        kinds_and_text("#comment\n1"),
        vec![(TokenKind::Number, "1".to_string())]
    );
}

#[test]
fn test_unterminated_string() {
    assert!(matches!(
        tokenize("'abc"),
        Err(LexError::UnterminatedString { .. })
    ));
}

#[test]
fn test_operator_grouping_absorbs_the_right() {
    let program = parse_program("1*2+3;").unwrap();
    assert_eq!(
        program.statements,
        vec![Node::operation(
            '*',
            num("1"),
            Node::operation('+', num("2"), num("3"))
        )]
    );
}

#[test]
fn test_function_definition() {
    let program = parse_program("f = {@(a,b) a + b}; f(3,4);").unwrap();
    assert_eq!(program.statements.len(), 2);
    match &program.statements[0] {
        Node::Assignment { target, value } => {
            assert_eq!(target, "f");
            match &**value {
                Node::Function { params, body } => {
                    assert_eq!(&params[..], &["a".to_string(), "b".to_string()][..]);
                    assert_eq!(body.len(), 1);
                }
                other => panic!("expected function literal, found {other:?}"),
            }
        }
        other => panic!("expected assignment, found {other:?}"),
    }
    assert!(matches!(&program.statements[1], Node::Call { args, .. } if args.len() == 2));
}

#[test]
fn test_assignment_target_must_be_symbol() {
    assert!(matches!(
        parse_program("'x' = 1;"),
        Err(ParseError::InvalidAssignmentTarget { .. })
    ));
}

#[test]
fn test_unexpected_token_is_named() {
    let err = parse_program("x = );").unwrap_err();
    assert!(
        err.to_string().contains("')'"),
        "expected the offending kind in {err}"
    );
}

#[test]
fn test_premature_end_names_expectation() {
    let err = parse_program("f = {@(a) a").unwrap_err();
    match err {
        ParseError::UnexpectedEndOfInput { expected, .. } => assert_eq!(expected, "';' or '}'"),
        other => panic!("expected end-of-input error, found {other:?}"),
    }
}
