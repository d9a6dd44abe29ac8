//! Error and diagnostic system for the Arbor parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! The system is built around the [`Diagnostic`] type, a single error or
//! warning with an optional error code, source locations, and help text.
//! Structural problems are accumulated, never raised one at a time; the
//! full batch is wrapped in a [`ParseError`] so a caller sees every
//! problem in an expression at once.
//!
//! # Example
//!
//! ```
//! # use arbor_parser::error::{Diagnostic, ErrorCode};
//! # use arbor_parser::Span;
//!
//! let span = Span::new(4..5);
//!
//! let diag = Diagnostic::error("expression cannot end with `+`")
//!     .with_code(ErrorCode::E207)
//!     .with_label(span, "dangling operator")
//!     .with_help("add an operand after the operator");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
