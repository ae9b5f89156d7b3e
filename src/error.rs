//! Error and diagnostic types

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::ast::Span;
use crate::parser::lexer::Token;

/// A syntax error inside a directive interior
#[derive(Error, Debug, Clone, PartialEq)]
#[error("syntax error at {span:?}: {message}")]
pub struct SyntaxError {
    pub span: Span,
    pub message: String,
    pub expected: Vec<String>,
}

impl SyntaxError {
    /// Shift the span by `offset`, e.g. from interior to document coordinates
    pub fn offset(mut self, offset: usize) -> Self {
        self.span = self.span.start + offset..self.span.end + offset;
        self
    }
}

impl<'a> From<chumsky::error::Rich<'a, Token>> for SyntaxError {
    fn from(err: chumsky::error::Rich<'a, Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of directive".to_string(),
                };
                format!("unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of directive".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        SyntaxError {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &Token) -> String {
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::String(s) => format!("string \"{}\"", s),
        Token::Number(n) => format!("number {}", n),
        Token::Operator(op) => format!("operator '{}'", op),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::BracketOpen => "'['".to_string(),
        Token::BracketClose => "']'".to_string(),
        Token::BraceOpen => "'{'".to_string(),
        Token::BraceClose => "'}'".to_string(),
        Token::Comma => "','".to_string(),
        Token::Dot => "'.'".to_string(),
        Token::Unknown => "unrecognised character".to_string(),
    }
}

/// Why a directive was classified as unknown
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// `<%` with no closing `%>`
    Unterminated,
    /// The interior is not a `path(args)` call
    Syntax(SyntaxError),
    /// The call path is not in the directive table
    UnknownPath(String),
}

/// A non-fatal finding about a directive, in dynamic-content coordinates.
///
/// Diagnostics never block a build; the directive they describe still gets
/// an `UNKNOWN` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub span: Span,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn message(&self) -> String {
        match &self.kind {
            DiagnosticKind::Unterminated => "directive is missing its closing '%>'".to_string(),
            DiagnosticKind::Syntax(err) => format!("malformed directive: {}", err.message),
            DiagnosticKind::UnknownPath(path) => format!("unknown directive '{}'", path),
        }
    }

    /// Format the diagnostic with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let message = self.message();

        let (label_span, label_message) = match &self.kind {
            DiagnosticKind::Syntax(err) if !err.expected.is_empty() => (
                err.span.clone(),
                format!("{}\nExpected: {}", err.message, err.expected.join(", ")),
            ),
            DiagnosticKind::Syntax(err) => (err.span.clone(), err.message.clone()),
            _ => (self.span.clone(), message.clone()),
        };

        let written = Report::build(ReportKind::Warning, filename, self.span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, label_span))
                    .with_message(label_message)
                    .with_color(Color::Yellow),
            )
            .with_note("an UNKNOWN placeholder is used in the static version")
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{}: {}", filename, message),
        }
    }
}
