//! Locates `<% ... %>` spans in template text

use crate::parser::ast::Span;

pub const OPEN_MARKER: &str = "<%";
pub const CLOSE_MARKER: &str = "%>";

/// Characters that may follow `<%` as part of the open marker
const OPEN_MODIFIERS: [char; 4] = ['_', '-', '*', '+'];
/// Characters that may precede `%>` as part of the close marker
const CLOSE_MODIFIERS: [char; 2] = ['_', '-'];

/// A raw directive span before classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDirective {
    /// Whole directive, markers included
    pub span: Span,
    /// Text between the markers, marker modifiers excluded
    pub interior: Span,
    /// False when the input ended before a closing `%>`
    pub terminated: bool,
}

/// Scan left to right for non-overlapping directive spans.
///
/// Quotes inside a directive are honoured so a `%>` within a string literal
/// does not end the directive early. If a quote is never closed before the
/// next `<%`, the first plain `%>` closes the directive instead. Without any `%>` the directive
/// runs to the end of the input.
pub fn scan(text: &str) -> Vec<RawDirective> {
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = text[cursor..].find(OPEN_MARKER) {
        let start = cursor + rel;
        let mut body_start = start + OPEN_MARKER.len();
        if let Some(c) = text[body_start..].chars().next() {
            if OPEN_MODIFIERS.contains(&c) {
                body_start += c.len_utf8();
            }
        }

        let close = find_close_quoted(text, body_start)
            .or_else(|| text[body_start..].find(CLOSE_MARKER).map(|i| body_start + i));

        let directive = match close {
            Some(close_at) => {
                let body_end = strip_close_modifier(text, body_start, close_at);
                RawDirective {
                    span: start..close_at + CLOSE_MARKER.len(),
                    interior: body_start..body_end,
                    terminated: true,
                }
            }
            None => RawDirective {
                span: start..text.len(),
                interior: body_start..text.len(),
                terminated: false,
            },
        };

        cursor = directive.span.end;
        found.push(directive);
    }

    found
}

/// End of the interior once a `_` or `-` close modifier is dropped.
///
/// The modifier must stand apart from the code before it, so
/// `my_key_%>` keeps its `_`.
fn strip_close_modifier(text: &str, body_start: usize, close_at: usize) -> usize {
    let mut body = text[body_start..close_at].chars();
    match body.next_back() {
        Some(c) if CLOSE_MODIFIERS.contains(&c) => {
            let detached = body.next_back().map_or(true, char::is_whitespace);
            if detached {
                close_at - c.len_utf8()
            } else {
                close_at
            }
        }
        _ => close_at,
    }
}

/// Find the byte offset of the closing marker, skipping quoted strings.
///
/// Gives up at the next `<%`, quoted or not: a quote left open by one
/// directive must not swallow the text and directives after it.
fn find_close_quoted(text: &str, from: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut chars = text[from..].char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '<' && matches!(chars.peek(), Some((_, '%'))) {
            return None;
        }
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' | '`' => quote = Some(c),
                '%' if matches!(chars.peek(), Some((_, '>'))) => return Some(from + i),
                _ => {}
            },
        }
    }

    None
}
