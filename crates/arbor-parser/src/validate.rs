//! Structural validation of token streams.
//!
//! Before a tree is built, the token stream runs through an ordered chain
//! of single-purpose validation stages. Each stage inspects the full
//! sequence and reports problems into a shared [`DiagnosticCollector`];
//! stages never abort the chain themselves, so one run surfaces every
//! problem in the expression at once.
//!
//! The chain is an explicit ordered list owned by [`ValidationPipeline`]
//! rather than stages wired to successors: construction order is a
//! configuration value, each stage runs exactly once per pass, and any
//! subset of stages can be assembled for testing via
//! [`ValidationPipeline::from_stages`].
//!
//! The standard order is significant: start shape, then parenthesis
//! balance, then argument separators, then operator placement, then end
//! shape. Later stages are written so that problems already reported by an
//! earlier stage (an unbalanced parenthesis, an unknown character) do not
//! trip them again as cascading noise.

use log::debug;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// One check in the validation chain.
///
/// Implementations inspect the whole token sequence and emit zero or more
/// diagnostics; they hold no mutable state of their own and depend on
/// nothing besides the collector handed to them.
pub trait ValidationStage {
    /// Stage name used in logs.
    fn name(&self) -> &'static str;

    /// Inspect `tokens` and report problems into `diagnostics`.
    fn check(&self, tokens: &[PositionedToken<'_>], diagnostics: &mut DiagnosticCollector);
}

/// Whether the pipeline keeps running stages once an error is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Run every stage and report everything found.
    #[default]
    ContinueOnError,
    /// Stop after the first stage that reports an error.
    StopOnFirstError,
}

/// An ordered chain of validation stages.
pub struct ValidationPipeline {
    stages: Vec<Box<dyn ValidationStage>>,
    mode: ValidationMode,
}

impl ValidationPipeline {
    /// The standard chain, in its fixed order.
    pub fn standard() -> Self {
        Self::from_stages(vec![
            Box::new(ExpressionStart),
            Box::new(BalancedParentheses),
            Box::new(ArgumentSeparators),
            Box::new(OperatorPlacement),
            Box::new(ExpressionEnd),
        ])
    }

    /// Build a pipeline from an explicit stage list.
    ///
    /// Useful for exercising a single stage (or any sub-chain) in
    /// isolation.
    pub fn from_stages(stages: Vec<Box<dyn ValidationStage>>) -> Self {
        Self {
            stages,
            mode: ValidationMode::default(),
        }
    }

    /// Set the error-handling mode.
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Run all stages into an existing collector.
    ///
    /// Lets the caller merge validation diagnostics with diagnostics from
    /// other phases (e.g. the scanner) into a single report.
    pub fn run(&self, tokens: &[PositionedToken<'_>], diagnostics: &mut DiagnosticCollector) {
        for stage in &self.stages {
            debug!(stage = stage.name(); "Running validation stage");
            stage.check(tokens, diagnostics);
            if self.mode == ValidationMode::StopOnFirstError && diagnostics.has_errors() {
                debug!(stage = stage.name(); "Stopping validation after first error");
                break;
            }
        }
    }

    /// Validate a token stream.
    ///
    /// Returns `Ok(())` when no stage reported an error, otherwise the
    /// full accumulated set of diagnostics.
    pub fn validate(&self, tokens: &[PositionedToken<'_>]) -> Result<(), ParseError> {
        let mut diagnostics = DiagnosticCollector::new();
        self.run(tokens, &mut diagnostics);
        diagnostics.finish()
    }
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

/// Checks that the expression opens with a token that can start one.
#[derive(Debug, Default)]
pub struct ExpressionStart;

impl ValidationStage for ExpressionStart {
    fn name(&self) -> &'static str {
        "expression-start"
    }

    fn check(&self, tokens: &[PositionedToken<'_>], diagnostics: &mut DiagnosticCollector) {
        let Some(first) = tokens.first() else {
            diagnostics.emit(
                Diagnostic::error("expression is empty")
                    .with_code(ErrorCode::E200)
                    .with_label(Span::default(), "nothing to parse"),
            );
            return;
        };

        let valid = matches!(
            first.token,
            Token::Number(_)
                | Token::Identifier(_)
                | Token::Unknown(_)
                | Token::LeftParen
                | Token::Minus
        );
        if !valid {
            diagnostics.emit(
                Diagnostic::error(format!("expression cannot start with `{first}`"))
                    .with_code(ErrorCode::E200)
                    .with_label(first.span, "invalid leading token")
                    .with_help("an expression starts with an operand, `(` or a unary `-`"),
            );
        }
    }
}

/// Checks that every `(` has a matching `)` and flags empty pairs.
#[derive(Debug, Default)]
pub struct BalancedParentheses;

impl ValidationStage for BalancedParentheses {
    fn name(&self) -> &'static str {
        "balanced-parentheses"
    }

    fn check(&self, tokens: &[PositionedToken<'_>], diagnostics: &mut DiagnosticCollector) {
        let mut open: Vec<Span> = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            match token.token {
                Token::LeftParen => {
                    open.push(token.span);

                    // `()` is only meaningful as a nullary call
                    let next_is_close = tokens
                        .get(i + 1)
                        .is_some_and(|t| matches!(t.token, Token::RightParen));
                    let follows_call_head = i > 0
                        && matches!(tokens[i - 1].token, Token::Identifier(_));
                    if next_is_close && !follows_call_head {
                        diagnostics.emit(
                            Diagnostic::error("parentheses enclose nothing")
                                .with_code(ErrorCode::E203)
                                .with_label(token.span.union(tokens[i + 1].span), "empty group")
                                .with_help("put an expression between `(` and `)`"),
                        );
                    }
                }
                Token::RightParen => {
                    if open.pop().is_none() {
                        diagnostics.emit(
                            Diagnostic::error("unexpected closing parenthesis")
                                .with_code(ErrorCode::E202)
                                .with_label(token.span, "no matching `(`"),
                        );
                    }
                }
                _ => {}
            }
        }

        for span in open {
            diagnostics.emit(
                Diagnostic::error("unclosed parenthesis")
                    .with_code(ErrorCode::E201)
                    .with_label(span, "opened here")
                    .with_help("add a matching `)`"),
            );
        }
    }
}

/// Checks that `,` appears only between the arguments of a function call.
#[derive(Debug, Default)]
pub struct ArgumentSeparators;

impl ValidationStage for ArgumentSeparators {
    fn name(&self) -> &'static str {
        "argument-separators"
    }

    fn check(&self, tokens: &[PositionedToken<'_>], diagnostics: &mut DiagnosticCollector) {
        // One entry per open paren: true when it opens a call argument list
        let mut open_is_call: Vec<bool> = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            match token.token {
                Token::LeftParen => {
                    let is_call = i > 0 && matches!(tokens[i - 1].token, Token::Identifier(_));
                    open_is_call.push(is_call);
                }
                Token::RightParen => {
                    open_is_call.pop();
                }
                Token::Comma => match open_is_call.last() {
                    Some(true) => {
                        let after_gap = i == 0
                            || matches!(tokens[i - 1].token, Token::LeftParen | Token::Comma);
                        if after_gap {
                            diagnostics.emit(
                                Diagnostic::error("missing argument before `,`")
                                    .with_code(ErrorCode::E204)
                                    .with_label(token.span, "separator without argument"),
                            );
                        }

                        let before_close = tokens
                            .get(i + 1)
                            .is_none_or(|t| matches!(t.token, Token::RightParen));
                        if before_close {
                            diagnostics.emit(
                                Diagnostic::error("missing argument after `,`")
                                    .with_code(ErrorCode::E204)
                                    .with_label(token.span, "separator without argument"),
                            );
                        }
                    }
                    _ => {
                        diagnostics.emit(
                            Diagnostic::error("argument separator outside a function call")
                                .with_code(ErrorCode::E204)
                                .with_label(token.span, "`,` is only valid between call arguments")
                                .with_help(
                                    "write function calls as `name(argument, argument)`",
                                ),
                        );
                    }
                },
                _ => {}
            }
        }
    }
}

/// Checks that every operator has operands on the sides that need them and
/// that no two operands sit next to each other without an operator.
///
/// Unary `-` is exempt on the left, so chains like `--i` are legal.
/// Unknown tokens count as operands here: a character the scanner already
/// reported must not also produce placement errors.
#[derive(Debug, Default)]
pub struct OperatorPlacement;

impl ValidationStage for OperatorPlacement {
    fn name(&self) -> &'static str {
        "operator-placement"
    }

    fn check(&self, tokens: &[PositionedToken<'_>], diagnostics: &mut DiagnosticCollector) {
        for (i, token) in tokens.iter().enumerate() {
            let prev = i.checked_sub(1).map(|j| &tokens[j].token);
            let next = tokens.get(i + 1).map(|t| &t.token);

            match token.token {
                Token::Plus | Token::Star | Token::Slash | Token::Caret => {
                    // A missing left operand at the very start is the start
                    // stage's finding, not ours.
                    let left_ok = match prev {
                        None => true,
                        Some(t) => t.is_operand() || matches!(t, Token::RightParen),
                    };
                    if !left_ok {
                        diagnostics.emit(
                            Diagnostic::error(format!("operator `{token}` has no left operand"))
                                .with_code(ErrorCode::E205)
                                .with_label(token.span, "expected an operand before this"),
                        );
                    }

                    if !right_operand_follows(next) {
                        diagnostics.emit(
                            Diagnostic::error(format!("operator `{token}` has no right operand"))
                                .with_code(ErrorCode::E205)
                                .with_label(token.span, "expected an operand after this"),
                        );
                    }
                }
                Token::Minus => {
                    if !right_operand_follows(next) {
                        diagnostics.emit(
                            Diagnostic::error("operator `-` has no right operand")
                                .with_code(ErrorCode::E205)
                                .with_label(token.span, "expected an operand after this"),
                        );
                    }
                }
                Token::Number(_) | Token::Identifier(_) | Token::RightParen => {
                    let adjacent = matches!(
                        next,
                        Some(Token::Number(_) | Token::Identifier(_) | Token::LeftParen)
                    );
                    let call_head = matches!(token.token, Token::Identifier(_))
                        && matches!(next, Some(Token::LeftParen));
                    if adjacent && !call_head {
                        let next_token = &tokens[i + 1];
                        diagnostics.emit(
                            Diagnostic::error(format!(
                                "missing operator between `{token}` and `{next_token}`"
                            ))
                            .with_code(ErrorCode::E206)
                            .with_label(token.span.union(next_token.span), "adjacent operands")
                            .with_help("insert an operator such as `*` between them"),
                        );
                    }
                }
                _ => {}
            }
        }
    }
}

/// A right operand follows if the next token can begin an operand.
/// `None` (end of input) is left to the end stage.
fn right_operand_follows(next: Option<&Token<'_>>) -> bool {
    match next {
        None => true,
        Some(t) => t.is_operand() || matches!(t, Token::LeftParen | Token::Minus),
    }
}

/// Checks that the expression closes with a token that can end one.
///
/// A trailing `(` is deliberately not reported here: the parentheses stage
/// already flags it as unclosed.
#[derive(Debug, Default)]
pub struct ExpressionEnd;

impl ValidationStage for ExpressionEnd {
    fn name(&self) -> &'static str {
        "expression-end"
    }

    fn check(&self, tokens: &[PositionedToken<'_>], diagnostics: &mut DiagnosticCollector) {
        let Some(last) = tokens.last() else {
            return;
        };

        if last.token.is_operator() || matches!(last.token, Token::Comma) {
            diagnostics.emit(
                Diagnostic::error(format!("expression cannot end with `{last}`"))
                    .with_code(ErrorCode::E207)
                    .with_label(last.span, "dangling token")
                    .with_help("add an operand to finish the expression"),
            );
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::lexer::scan;

    /// Grammatically valid expressions of bounded depth: leaves combined
    /// with binary operators, grouping, unary minus and function calls.
    fn expression_strategy() -> impl Strategy<Value = String> {
        let leaf = prop_oneof![
            "[a-z]{1,3}",
            (0u32..10_000).prop_map(|n| n.to_string()),
        ];

        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                (
                    inner.clone(),
                    prop_oneof![Just("+"), Just("-"), Just("*"), Just("/"), Just("^")],
                    inner.clone(),
                )
                    .prop_map(|(lhs, op, rhs)| format!("{lhs}{op}{rhs}")),
                inner.clone().prop_map(|e| format!("({e})")),
                inner.clone().prop_map(|e| format!("-{e}")),
                ("[a-z]{1,3}", proptest::collection::vec(inner, 1..3))
                    .prop_map(|(f, args)| format!("{f}({})", args.join(","))),
            ]
        })
    }

    fn check_valid_expression(expr: &str) -> Result<(), TestCaseError> {
        let (tokens, scan_diagnostics) = scan(expr);
        prop_assert!(
            scan_diagnostics.is_empty(),
            "`{expr}` produced lexical errors: {scan_diagnostics:?}"
        );

        let result = ValidationPipeline::standard().validate(&tokens);
        prop_assert!(
            result.is_ok(),
            "`{expr}` failed validation: {:?}",
            result.err()
        );
        Ok(())
    }

    proptest! {
        #[test]
        fn valid_expressions_validate_cleanly(expr in expression_strategy()) {
            check_valid_expression(&expr)?;
        }
    }
}
