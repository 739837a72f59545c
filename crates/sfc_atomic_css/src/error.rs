//! Errors that abort the transform of a single module.

use oxc_diagnostics::OxcDiagnostic;
use oxc_span::Span;
use thiserror::Error;

use crate::diagnostic::Diagnostic;
use crate::patcher::PatchError;

/// A fatal transform failure. No output is produced for the module.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The module source could not be parsed.
    #[error("failed to parse module ({} errors)", .0.len())]
    Parse(Vec<Diagnostic>),

    /// The default export is neither a bare identifier nor a call to the
    /// export helper.
    #[error("unsupported default export shape")]
    UnsupportedExportShape { span: Span },

    /// The export helper's metadata list contains something other than
    /// `[key, value]` pairs.
    #[error("malformed export metadata entry: {reason}")]
    MalformedMetadataEntry { span: Span, reason: &'static str },

    #[error(transparent)]
    Patch(#[from] PatchError),
}

impl TransformError {
    /// The source span of the offending node, when there is one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnsupportedExportShape { span } | Self::MalformedMetadataEntry { span, .. } => {
                Some(*span)
            }
            Self::Parse(_) | Self::Patch(_) => None,
        }
    }

    /// Convert into oxc's diagnostic type so callers can render a code frame.
    pub fn to_oxc_diagnostic(&self) -> OxcDiagnostic {
        let diagnostic = OxcDiagnostic::error(self.to_string());
        let diagnostic = match self {
            Self::UnsupportedExportShape { .. } => diagnostic.with_help(
                "Expected `export default <identifier>` or `export default _export_sfc(<identifier>, [...])`",
            ),
            Self::MalformedMetadataEntry { .. } => {
                diagnostic.with_help("Each metadata entry must be a `[\"key\", value]` pair")
            }
            Self::Parse(_) | Self::Patch(_) => diagnostic,
        };
        match self.span() {
            Some(span) => diagnostic.with_label(span),
            None => diagnostic,
        }
    }

    /// Flatten into user-facing diagnostics.
    pub fn into_diagnostics(self, source_text: &str) -> Vec<Diagnostic> {
        match self {
            Self::Parse(diagnostics) => diagnostics,
            other => vec![Diagnostic::from_oxc(source_text, &other.to_oxc_diagnostic())],
        }
    }
}
