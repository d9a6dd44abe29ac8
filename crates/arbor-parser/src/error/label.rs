//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// The role a label plays within a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelStyle {
    /// Points at the location of the problem itself.
    Primary,
    /// Provides supporting context at another location.
    Secondary,
}

/// A labeled span in source code.
///
/// Labels attach messages to specific locations in the source, helping
/// users understand where problems occurred and why.
#[derive(Debug, Clone)]
pub struct Label {
    style: LabelStyle,
    span: Span,
    message: String,
}

impl Label {
    /// Create a primary label pointing at the problem location.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            style: LabelStyle::Primary,
            span,
            message: message.into(),
        }
    }

    /// Create a secondary label providing supporting context.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            style: LabelStyle::Secondary,
            span,
            message: message.into(),
        }
    }

    /// Get the span this label points at.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the label's message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.style == LabelStyle::Primary
    }

    /// Returns true if this is a secondary label.
    pub fn is_secondary(&self) -> bool {
        self.style == LabelStyle::Secondary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_label() {
        let label = Label::primary(Span::new(3..7), "here");
        assert!(label.is_primary());
        assert!(!label.is_secondary());
        assert_eq!(label.span(), Span::new(3..7));
        assert_eq!(label.message(), "here");
    }

    #[test]
    fn test_secondary_label() {
        let label = Label::secondary(Span::new(0..1), "opened here");
        assert!(label.is_secondary());
    }
}
