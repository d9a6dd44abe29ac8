//! Adapts Arbor errors for miette's graphical report handler.
//!
//! A parse failure carries a whole batch of diagnostics; each one becomes
//! its own [`Reportable`] with the expression source attached, so the
//! terminal output shows every problem with its own labeled span. Other
//! error kinds render as a single message without source.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, LabeledSpan, NamedSource, Severity as MietteSeverity,
    SourceCode, SourceSpan,
};

use arbor::ArborError;
use arbor_parser::error::{Diagnostic, Severity};

/// A single diagnostic prepared for graphical rendering.
#[derive(Debug)]
pub struct Reportable {
    message: String,
    code: Option<String>,
    help: Option<String>,
    severity: MietteSeverity,
    labels: Vec<LabeledSpan>,
    source: Option<NamedSource<String>>,
}

impl fmt::Display for Reportable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Reportable {}

impl MietteDiagnostic for Reportable {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|code| Box::new(code) as Box<dyn fmt::Display + 'a>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(self.severity)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.source.as_ref().map(|source| source as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Box::new(self.labels.iter().cloned()))
        }
    }
}

/// Convert an error into independently renderable diagnostics.
pub fn to_reportables(error: &ArborError) -> Vec<Reportable> {
    match error {
        ArborError::Parse { err, src } => err
            .diagnostics()
            .iter()
            .map(|diagnostic| from_diagnostic(diagnostic, src))
            .collect(),
        other => vec![Reportable {
            message: other.to_string(),
            code: None,
            help: None,
            severity: MietteSeverity::Error,
            labels: Vec::new(),
            source: None,
        }],
    }
}

fn from_diagnostic(diagnostic: &Diagnostic, src: &str) -> Reportable {
    let labels = diagnostic
        .labels()
        .iter()
        .map(|label| {
            LabeledSpan::new_with_span(
                Some(label.message().to_string()),
                SourceSpan::new(label.span().start().into(), label.span().len()),
            )
        })
        .collect();

    Reportable {
        message: diagnostic.message().to_string(),
        code: diagnostic.code().map(|code| code.to_string()),
        help: diagnostic.help().map(str::to_string),
        severity: match diagnostic.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        },
        labels,
        source: Some(NamedSource::new("expression", src.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use arbor::{SceneBuilder, config::AppConfig};

    use super::*;

    #[test]
    fn test_parse_error_yields_one_reportable_per_diagnostic() {
        let builder = SceneBuilder::new(AppConfig::default());
        let err = builder.parse("a+(b").unwrap_err();

        let reportables = to_reportables(&err);
        assert!(!reportables.is_empty());
        for reportable in &reportables {
            assert!(reportable.source_code().is_some());
            assert!(reportable.labels().is_some());
        }
    }

    #[test]
    fn test_other_errors_yield_single_reportable() {
        let err = ArborError::Config("bad config".to_string());
        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        assert!(reportables[0].source_code().is_none());
        assert_eq!(reportables[0].to_string(), "configuration error: bad config");
    }
}
