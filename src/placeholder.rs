//! Placeholder labels for the static rendering of a template
//!
//! Every directive kind has a rendering rule, so translation is total.
//! Placeholders are written as `[[LABEL]]`.

use crate::parser::ast::{Directive, DirectiveKind, Span};
use crate::parser::scanner::{CLOSE_MARKER, OPEN_MARKER};

pub const PLACEHOLDER_OPEN: &str = "[[";
pub const PLACEHOLDER_CLOSE: &str = "]]";

/// The bare label for a directive, e.g. `DATE: YYYY-MM-DD`
pub fn label(directive: &Directive) -> String {
    match directive.kind {
        DirectiveKind::Date => {
            format!("DATE: {}", neutralize(directive.first().unwrap_or("format")))
        }
        DirectiveKind::Prompt => format!(
            "PROMPT: {} (default: {})",
            neutralize(directive.first().unwrap_or_default()),
            neutralize(directive.second().unwrap_or("none"))
        ),
        DirectiveKind::SystemInfo => {
            format!("SYSTEM: {}", neutralize(directive.first().unwrap_or("info")))
        }
        DirectiveKind::Conditional => {
            format!("CONDITIONAL: {}", neutralize(directive.raw.trim()))
        }
        DirectiveKind::Other => format!("UNKNOWN: {}", neutralize(directive.raw.trim())),
    }
}

/// The bracketed placeholder for a directive, e.g. `[[DATE: YYYY-MM-DD]]`
pub fn translate(directive: &Directive) -> String {
    format!("{}{}{}", PLACEHOLDER_OPEN, label(directive), PLACEHOLDER_CLOSE)
}

/// Break up directive and placeholder markers inside label text.
///
/// Keeps static content free of `<%` and keeps every label inside exactly
/// one `[[...]]` pair.
fn neutralize(text: &str) -> String {
    let markers = [OPEN_MARKER, CLOSE_MARKER, PLACEHOLDER_OPEN, PLACEHOLDER_CLOSE];
    let mut out = text.to_string();
    // `]]]` becomes `] ]]` after one pass, so repeat until nothing matches
    while let Some(marker) = markers.iter().find(|m| out.contains(**m)) {
        let (head, tail) = marker.split_at(1);
        out = out.replace(marker, &format!("{} {}", head, tail));
    }
    out
}

/// A placeholder found in text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Span of the whole placeholder, brackets included
    pub span: Span,
    pub label: String,
}

/// Re-scan text for `[[...]]` placeholders, left to right, non-overlapping.
///
/// Any bracket pair counts, including ones the user wrote by hand.
pub fn scan_placeholders(text: &str) -> Vec<Placeholder> {
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = text[cursor..].find(PLACEHOLDER_OPEN) {
        let start = cursor + rel;
        let body = start + PLACEHOLDER_OPEN.len();
        let Some(close) = text[body..].find(PLACEHOLDER_CLOSE) else {
            break;
        };
        // A label ending in `]` is followed by `]]]`; the last two close it
        let mut close_at = body + close;
        while text[close_at + PLACEHOLDER_CLOSE.len()..].starts_with(']') {
            close_at += 1;
        }
        let end = close_at + PLACEHOLDER_CLOSE.len();
        found.push(Placeholder {
            span: start..end,
            label: text[body..close_at].to_string(),
        });
        cursor = end;
    }

    found
}
