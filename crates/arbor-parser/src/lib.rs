//! Parsing front end for Arbor expressions.
//!
//! Raw expression text flows through three phases:
//!
//! 1. [`scan`] — error-recovering lexical analysis into positioned tokens;
//! 2. [`ValidationPipeline`] — an ordered chain of structural checks over
//!    the token stream, accumulating every problem instead of stopping at
//!    the first;
//! 3. [`build_tree`] — precedence parsing of the validated stream into an
//!    arena-backed [`ExprTree`].
//!
//! [`parse`] runs all three and merges scanner and validation diagnostics
//! into a single [`error::ParseError`] so callers report everything at
//! once.

pub mod error;

mod lexer;
mod parser;
mod span;
mod tokens;
mod validate;

pub use lexer::scan;
pub use parser::build_tree;
pub use span::Span;
pub use tokens::{PositionedToken, Token};
pub use validate::{
    ArgumentSeparators, BalancedParentheses, ExpressionEnd, ExpressionStart, OperatorPlacement,
    ValidationMode, ValidationPipeline, ValidationStage,
};

use log::debug;

use arbor_core::tree::ExprTree;

use crate::error::{DiagnosticCollector, ParseError};

/// Parse source text into an expression tree.
///
/// Scans, validates and builds in one call. The tree builder only runs
/// when scanning and validation produced no errors.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying every diagnostic from the scanner and
/// the validation pipeline together.
pub fn parse(source: &str, mode: ValidationMode) -> Result<ExprTree, ParseError> {
    let (tokens, scan_diagnostics) = scan(source);
    debug!(
        token_count = tokens.len(),
        lexical_errors = scan_diagnostics.len();
        "Scanned source",
    );

    let mut diagnostics = DiagnosticCollector::new();
    for diagnostic in scan_diagnostics {
        diagnostics.emit(diagnostic);
    }

    ValidationPipeline::standard()
        .with_mode(mode)
        .run(&tokens, &mut diagnostics);
    debug!(diagnostics_len = diagnostics.len(); "Validation finished");
    diagnostics.finish()?;

    build_tree(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_valid_expression() {
        let tree = parse("a+b", ValidationMode::ContinueOnError).unwrap();
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_parse_merges_scan_and_validation_diagnostics() {
        let err = parse("a $ (", ValidationMode::ContinueOnError).unwrap_err();
        let codes: Vec<ErrorCode> = err.diagnostics().iter().filter_map(|d| d.code()).collect();

        assert!(codes.contains(&ErrorCode::E001), "missing scanner code: {codes:?}");
        assert!(codes.contains(&ErrorCode::E201), "missing validation code: {codes:?}");
    }

    #[test]
    fn test_parse_empty_source() {
        let err = parse("", ValidationMode::ContinueOnError).unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E200));
    }

    #[test]
    fn test_parse_stop_on_first_error() {
        let err = parse("+(a", ValidationMode::StopOnFirstError).unwrap_err();
        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E200));
    }
}
