//! Builds expression trees from validated token streams.
//!
//! The public entry point is [`build_tree`]. Its precondition is a token
//! stream that already passed the validation pipeline; a parse failure
//! here therefore indicates a broken collaborator contract, and is
//! reported as a tree-builder diagnostic (E1xx) rather than a user error.
//!
//! Grammar (standard precedence, `^` right-associative, `-` also unary):
//!
//! ```text
//! expression     = additive
//! additive       = multiplicative (("+" | "-") multiplicative)*
//! multiplicative = power (("*" | "/") power)*
//! power          = unary ("^" power)?
//! unary          = "-" unary | primary
//! primary        = number | name "(" arguments ")" | name | "(" expression ")"
//! arguments      = (expression ("," expression)*)?
//! ```

use winnow::{
    Parser as _,
    combinator::{alt, delimited, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use arbor_core::tree::{BinaryOp, ExprTree, NodeId, NodeKind};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// Expression shape assembled during descent, lowered into the arena once
/// the whole stream is consumed.
enum Ast<'src> {
    Number(f64),
    Variable(&'src str),
    Negate(Box<Ast<'src>>),
    Binary(BinaryOp, Box<Ast<'src>>, Box<Ast<'src>>),
    Call(&'src str, Vec<Ast<'src>>),
}

/// Parse a numeric literal token
fn number<'src>(input: &mut Input<'src>) -> IResult<f64> {
    any.verify_map(|t: &PositionedToken<'_>| match &t.token {
        Token::Number(value) => Some(*value),
        _ => None,
    })
    .parse_next(input)
}

/// Parse an identifier token
fn name<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    any.verify_map(|t: &PositionedToken<'src>| match &t.token {
        Token::Identifier(name) => Some(*name),
        _ => None,
    })
    .parse_next(input)
}

fn left_paren<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|t: &PositionedToken<'_>| matches!(t.token, Token::LeftParen))
        .void()
        .parse_next(input)
}

fn right_paren<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|t: &PositionedToken<'_>| matches!(t.token, Token::RightParen))
        .void()
        .parse_next(input)
}

fn comma<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|t: &PositionedToken<'_>| matches!(t.token, Token::Comma))
        .void()
        .parse_next(input)
}

fn minus<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|t: &PositionedToken<'_>| matches!(t.token, Token::Minus))
        .void()
        .parse_next(input)
}

fn caret<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|t: &PositionedToken<'_>| matches!(t.token, Token::Caret))
        .void()
        .parse_next(input)
}

fn additive_op<'src>(input: &mut Input<'src>) -> IResult<BinaryOp> {
    any.verify_map(|t: &PositionedToken<'_>| match &t.token {
        Token::Plus => Some(BinaryOp::Add),
        Token::Minus => Some(BinaryOp::Sub),
        _ => None,
    })
    .parse_next(input)
}

fn multiplicative_op<'src>(input: &mut Input<'src>) -> IResult<BinaryOp> {
    any.verify_map(|t: &PositionedToken<'_>| match &t.token {
        Token::Star => Some(BinaryOp::Mul),
        Token::Slash => Some(BinaryOp::Div),
        _ => None,
    })
    .parse_next(input)
}

fn expression<'src>(input: &mut Input<'src>) -> IResult<Ast<'src>> {
    additive(input)
}

/// Left-associative `+` / `-` chain
fn additive<'src>(input: &mut Input<'src>) -> IResult<Ast<'src>> {
    let mut lhs = multiplicative(input)?;

    loop {
        let checkpoint = input.checkpoint();
        match additive_op(input) {
            Ok(op) => {
                let rhs = multiplicative(input)?;
                lhs = Ast::Binary(op, Box::new(lhs), Box::new(rhs));
            }
            Err(_) => {
                input.reset(&checkpoint);
                break;
            }
        }
    }

    Ok(lhs)
}

/// Left-associative `*` / `/` chain
fn multiplicative<'src>(input: &mut Input<'src>) -> IResult<Ast<'src>> {
    let mut lhs = power(input)?;

    loop {
        let checkpoint = input.checkpoint();
        match multiplicative_op(input) {
            Ok(op) => {
                let rhs = power(input)?;
                lhs = Ast::Binary(op, Box::new(lhs), Box::new(rhs));
            }
            Err(_) => {
                input.reset(&checkpoint);
                break;
            }
        }
    }

    Ok(lhs)
}

/// Right-associative `^`
fn power<'src>(input: &mut Input<'src>) -> IResult<Ast<'src>> {
    let base = unary(input)?;

    let checkpoint = input.checkpoint();
    match caret(input) {
        Ok(()) => {
            let exponent = power(input)?;
            Ok(Ast::Binary(
                BinaryOp::Pow,
                Box::new(base),
                Box::new(exponent),
            ))
        }
        Err(_) => {
            input.reset(&checkpoint);
            Ok(base)
        }
    }
}

/// Unary minus chains (`--i` is negate-of-negate)
fn unary<'src>(input: &mut Input<'src>) -> IResult<Ast<'src>> {
    let checkpoint = input.checkpoint();
    match minus(input) {
        Ok(()) => {
            let operand = unary(input)?;
            Ok(Ast::Negate(Box::new(operand)))
        }
        Err(_) => {
            input.reset(&checkpoint);
            primary(input)
        }
    }
}

/// Parenthesized, comma-separated call arguments (possibly none)
fn arguments<'src>(input: &mut Input<'src>) -> IResult<Vec<Ast<'src>>> {
    delimited(left_paren, separated(0.., expression, comma), right_paren).parse_next(input)
}

/// Function call: `name ( arguments )`
fn call<'src>(input: &mut Input<'src>) -> IResult<Ast<'src>> {
    (name, arguments)
        .map(|(callee, args)| Ast::Call(callee, args))
        .parse_next(input)
}

fn primary<'src>(input: &mut Input<'src>) -> IResult<Ast<'src>> {
    alt((
        // Call must come before the plain name alternative
        call,
        name.map(Ast::Variable),
        number.map(Ast::Number),
        delimited(left_paren, expression, right_paren),
    ))
    .parse_next(input)
}

/// Build an expression tree from a validated token stream.
///
/// # Errors
///
/// Returns a `ParseError` with an E100 (unexpected token) or E101
/// (incomplete expression) diagnostic when the stream does not form a
/// single complete expression. With the validation precondition honored
/// this does not happen for user input.
pub fn build_tree(tokens: &[PositionedToken<'_>]) -> Result<ExprTree, ParseError> {
    let mut input = TokenSlice::new(tokens);

    let ast = match expression(&mut input) {
        Ok(ast) => ast,
        Err(_) => return Err(error_at(&input, tokens).into()),
    };

    if !input.is_empty() {
        return Err(error_at(&input, tokens).into());
    }

    Ok(lower(ast))
}

/// Produce a diagnostic for the stream position the parser stopped at.
fn error_at(input: &Input<'_>, tokens: &[PositionedToken<'_>]) -> Diagnostic {
    let remaining = input.eof_offset();
    if remaining == 0 {
        let end = tokens.last().map(|t| t.span.end()).unwrap_or(0);
        Diagnostic::error("expression ended unexpectedly")
            .with_code(ErrorCode::E101)
            .with_label(Span::new(end..end), "more input expected")
    } else {
        let offending = &tokens[tokens.len() - remaining];
        Diagnostic::error(format!("unexpected token `{offending}`"))
            .with_code(ErrorCode::E100)
            .with_label(offending.span, "cannot be parsed here")
    }
}

/// Lower the parsed expression into an arena tree.
fn lower(ast: Ast<'_>) -> ExprTree {
    let mut tree = ExprTree::new();
    let root = lower_node(&mut tree, ast);
    tree.set_root(root).expect("fresh tree has no root yet");
    tree
}

fn lower_node(tree: &mut ExprTree, ast: Ast<'_>) -> NodeId {
    match ast {
        Ast::Number(value) => tree.push(NodeKind::Number(value)),
        Ast::Variable(name) => tree.push(NodeKind::Variable(name.to_string())),
        Ast::Negate(operand) => {
            let id = tree.push(NodeKind::Negate);
            let child = lower_node(tree, *operand);
            attach(tree, id, child);
            id
        }
        Ast::Binary(op, lhs, rhs) => {
            let id = tree.push(NodeKind::Operator(op));
            let lhs = lower_node(tree, *lhs);
            attach(tree, id, lhs);
            let rhs = lower_node(tree, *rhs);
            attach(tree, id, rhs);
            id
        }
        Ast::Call(name, args) => {
            let id = tree.push(NodeKind::Call(name.to_string()));
            for arg in args {
                let child = lower_node(tree, arg);
                attach(tree, id, child);
            }
            id
        }
    }
}

fn attach(tree: &mut ExprTree, parent: NodeId, child: NodeId) {
    tree.connect(parent, child)
        .expect("freshly lowered nodes are detached and cannot form cycles");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan;

    fn tree_of(source: &str) -> ExprTree {
        let (tokens, diagnostics) = scan(source);
        assert!(diagnostics.is_empty(), "bad test input `{source}`");
        build_tree(&tokens).expect("test input should build")
    }

    #[test]
    fn test_simple_sum_shape() {
        let tree = tree_of("a+b");
        let root = tree.root().unwrap();

        assert_eq!(tree.kind(root), &NodeKind::Operator(BinaryOp::Add));
        let children = tree.children(root);
        assert_eq!(children.len(), 2);
        assert_eq!(tree.label(children[0]), "a");
        assert_eq!(tree.label(children[1]), "b");
        assert_eq!(tree.node_count(), 3);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_single_operand() {
        let tree = tree_of("x");
        let root = tree.root().unwrap();
        assert!(tree.is_leaf(root));
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_precedence() {
        // a + (b*c), not (a+b) * c
        let tree = tree_of("a+b*c");
        let root = tree.root().unwrap();

        assert_eq!(tree.kind(root), &NodeKind::Operator(BinaryOp::Add));
        let children = tree.children(root);
        assert_eq!(tree.label(children[0]), "a");
        assert_eq!(tree.kind(children[1]), &NodeKind::Operator(BinaryOp::Mul));
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        // (a-b) - c
        let tree = tree_of("a-b-c");
        let root = tree.root().unwrap();

        assert_eq!(tree.kind(root), &NodeKind::Operator(BinaryOp::Sub));
        let children = tree.children(root);
        assert_eq!(tree.kind(children[0]), &NodeKind::Operator(BinaryOp::Sub));
        assert_eq!(tree.label(children[1]), "c");
    }

    #[test]
    fn test_power_is_right_associative() {
        // 2 ^ (3^4)
        let tree = tree_of("2^3^4");
        let root = tree.root().unwrap();

        assert_eq!(tree.kind(root), &NodeKind::Operator(BinaryOp::Pow));
        let children = tree.children(root);
        assert_eq!(tree.label(children[0]), "2");
        assert_eq!(tree.kind(children[1]), &NodeKind::Operator(BinaryOp::Pow));
    }

    #[test]
    fn test_parentheses_override_precedence() {
        // (a+b) * c
        let tree = tree_of("(a+b)*c");
        let root = tree.root().unwrap();

        assert_eq!(tree.kind(root), &NodeKind::Operator(BinaryOp::Mul));
        let children = tree.children(root);
        assert_eq!(tree.kind(children[0]), &NodeKind::Operator(BinaryOp::Add));
    }

    #[test]
    fn test_unary_minus_chain() {
        let tree = tree_of("--i");
        let root = tree.root().unwrap();

        assert_eq!(tree.kind(root), &NodeKind::Negate);
        let inner = tree.children(root)[0];
        assert_eq!(tree.kind(inner), &NodeKind::Negate);
        let leaf = tree.children(inner)[0];
        assert_eq!(tree.label(leaf), "i");
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_function_call() {
        let tree = tree_of("f(a, b+c)");
        let root = tree.root().unwrap();

        assert_eq!(tree.kind(root), &NodeKind::Call("f".to_string()));
        let children = tree.children(root);
        assert_eq!(children.len(), 2);
        assert_eq!(tree.label(children[0]), "a");
        assert_eq!(tree.kind(children[1]), &NodeKind::Operator(BinaryOp::Add));
    }

    #[test]
    fn test_nullary_call() {
        let tree = tree_of("f()");
        let root = tree.root().unwrap();
        assert_eq!(tree.kind(root), &NodeKind::Call("f".to_string()));
        assert!(tree.is_leaf(root));
    }

    #[test]
    fn test_large_expression_counts() {
        // 8 leaves + 7 operators
        let tree = tree_of("a+b+c+d+e+f+g+h");
        assert_eq!(tree.node_count(), 15);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_incomplete_expression_error() {
        let (tokens, _) = scan("a+");
        let err = build_tree(&tokens).unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E101));
    }

    #[test]
    fn test_trailing_token_error() {
        let (tokens, _) = scan("a b");
        let err = build_tree(&tokens).unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_empty_stream_error() {
        let err = build_tree(&[]).unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E101));
    }
}
