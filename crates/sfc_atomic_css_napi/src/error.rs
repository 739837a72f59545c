use std::sync::Arc;

use napi_derive::napi;

use oxc_diagnostics::{NamedSource, OxcDiagnostic};
use sfc_atomic_css::{DiagnosticLabel, TransformError};

#[napi(object, use_nullable = true)]
#[derive(Clone)]
pub struct TransformErrorInfo {
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<ErrorLabel>,
    pub help_message: Option<String>,
    pub codeframe: Option<String>,
}

impl TransformErrorInfo {
    pub fn from_diagnostics(
        filename: &str,
        source_text: &str,
        diagnostics: Vec<OxcDiagnostic>,
    ) -> Vec<Self> {
        if diagnostics.is_empty() {
            return vec![];
        }
        let source = Arc::new(NamedSource::new(filename, source_text.to_string()));
        diagnostics
            .into_iter()
            .map(|e| Self::from_diagnostic(source_text, &source, e))
            .collect()
    }

    /// Errors raised after parsing: unsupported export shapes, malformed
    /// metadata lists and patch failures.
    pub fn from_transform_error(
        filename: &str,
        source_text: &str,
        error: &TransformError,
    ) -> Vec<Self> {
        match error {
            // Parse failures are reported from the parser's own diagnostics.
            TransformError::Parse(diagnostics) => diagnostics
                .iter()
                .map(|diagnostic| Self {
                    severity: Severity::Error,
                    message: diagnostic.message.clone(),
                    labels: diagnostic.labels.iter().map(ErrorLabel::from).collect(),
                    help_message: diagnostic.help.clone(),
                    codeframe: None,
                })
                .collect(),
            other => Self::from_diagnostics(filename, source_text, vec![other.to_oxc_diagnostic()]),
        }
    }

    pub fn from_diagnostic(
        source_text: &str,
        named_source: &Arc<NamedSource<String>>,
        diagnostic: OxcDiagnostic,
    ) -> Self {
        let severity = Severity::from(diagnostic.severity);
        let message = diagnostic.message.to_string();
        let help_message = diagnostic.help.as_ref().map(ToString::to_string);
        let labels = diagnostic
            .labels
            .as_ref()
            .map(|labels| {
                labels
                    .iter()
                    .map(|label| DiagnosticLabel::from_labeled_span(label, source_text))
                    .map(|label| ErrorLabel::from(&label))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        let codeframe = diagnostic.with_source_code(Arc::clone(named_source));
        Self {
            severity,
            message,
            labels,
            help_message,
            codeframe: Some(format!("{codeframe:?}")),
        }
    }
}

#[napi(object, use_nullable = true)]
#[derive(Clone)]
pub struct ErrorLabel {
    pub message: Option<String>,
    pub start: u32,
    pub end: u32,
    /// 1-based line number in the source.
    pub line: u32,
    /// 0-based column number in the source.
    pub column: u32,
}

impl From<&DiagnosticLabel> for ErrorLabel {
    fn from(label: &DiagnosticLabel) -> Self {
        Self {
            message: label.text.clone(),
            start: label.start,
            end: label.end,
            line: label.line,
            column: label.column,
        }
    }
}

#[napi(string_enum)]
#[derive(Clone)]
pub enum Severity {
    Error,
    Warning,
    Advice,
}

impl From<oxc_diagnostics::Severity> for Severity {
    fn from(value: oxc_diagnostics::Severity) -> Self {
        match value {
            oxc_diagnostics::Severity::Error => Self::Error,
            oxc_diagnostics::Severity::Warning => Self::Warning,
            oxc_diagnostics::Severity::Advice => Self::Advice,
        }
    }
}
