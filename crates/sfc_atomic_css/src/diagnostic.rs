//! Error reports, positioned in the module source.
//!
//! Everything the transform reports aborts the module, so there is no
//! severity: a [`Diagnostic`] is always an error.

use oxc_diagnostics::{LabeledSpan, OxcDiagnostic};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub help: Option<String>,
    pub labels: Vec<DiagnosticLabel>,
}

/// A byte range of the source. `line` (1-based) and `column` (0-based, in
/// characters) locate `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLabel {
    pub text: Option<String>,
    pub start: u32,
    pub end: u32,
    pub line: u32,
    pub column: u32,
}

impl DiagnosticLabel {
    pub fn new(text: Option<String>, start: u32, end: u32, source_text: &str) -> Self {
        let (line, column) = line_column(source_text, start);
        Self {
            text,
            start,
            end,
            line,
            column,
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn from_labeled_span(label: &LabeledSpan, source_text: &str) -> Self {
        let start = label.offset() as u32;
        let end = (label.offset() + label.len()) as u32;
        Self::new(label.label().map(ToString::to_string), start, end, source_text)
    }
}

impl Diagnostic {
    pub fn from_oxc(source_text: &str, diagnostic: &OxcDiagnostic) -> Self {
        Self {
            message: diagnostic.message.to_string(),
            help: diagnostic.help.as_ref().map(ToString::to_string),
            labels: diagnostic
                .labels
                .iter()
                .flatten()
                .map(|label| DiagnosticLabel::from_labeled_span(label, source_text))
                .collect(),
        }
    }
}

fn line_column(source_text: &str, offset: u32) -> (u32, u32) {
    let mut end = (offset as usize).min(source_text.len());
    while !source_text.is_char_boundary(end) {
        end -= 1;
    }
    let before = &source_text[..end];
    let line_start = before.rfind('\n').map_or(0, |index| index + 1);
    let line = before.bytes().filter(|byte| *byte == b'\n').count() + 1;
    let column = before[line_start..].chars().count();
    (
        u32::try_from(line).unwrap_or(u32::MAX),
        u32::try_from(column).unwrap_or(u32::MAX),
    )
}
