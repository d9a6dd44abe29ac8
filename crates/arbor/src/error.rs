//! Error types for Arbor operations.
//!
//! This module provides the main error type [`ArborError`] which wraps the
//! error conditions that can occur while turning expression text into a
//! drawn tree.

use std::io;

use thiserror::Error;

use arbor_core::tree::TreeError;
use arbor_parser::error::ParseError;

use crate::{export, layout::LayoutError};

/// The main error type for Arbor operations.
///
/// The `Parse` variant carries the full accumulated diagnostic batch along
/// with the source it refers to, so callers can render every problem in an
/// expression at once. `Tree` and `Layout` indicate a broken collaborator
/// contract, never a user-input error: the draw request is aborted with no
/// partial visual state.
#[derive(Debug, Error)]
pub enum ArborError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("tree invariant violated: {0}")]
    Tree(#[from] TreeError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<export::Error> for ArborError {
    fn from(error: export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl ArborError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
