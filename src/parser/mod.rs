//! Directive parser
//!
//! Scans template text for `<% ... %>` directives and classifies each one.
//! Parsing never fails: anything unrecognised or malformed becomes an
//! [`DirectiveKind::Other`] token carrying its raw text, so no input is lost.

pub mod ast;
mod grammar;
pub mod lexer;
pub mod scanner;

pub use ast::*;
pub use grammar::parse_call;

use tracing::debug;

use crate::directives::DirectiveTable;
use crate::error::{Diagnostic, DiagnosticKind};
use lexer::Token;
use scanner::RawDirective;

/// Parse template text with the default directive table
pub fn parse(text: &str) -> Vec<Directive> {
    parse_with_table(text, &DirectiveTable::default())
}

/// Parse template text with a custom directive table
pub fn parse_with_table(text: &str, table: &DirectiveTable) -> Vec<Directive> {
    parse_with_diagnostics(text, table).0
}

/// Parse template text, also reporting why any directive fell back to `Other`
pub fn parse_with_diagnostics(
    text: &str,
    table: &DirectiveTable,
) -> (Vec<Directive>, Vec<Diagnostic>) {
    let mut directives = Vec::new();
    let mut diagnostics = Vec::new();

    for raw in scanner::scan(text) {
        let (directive, diagnostic) = classify(text, &raw, table);
        debug!(
            kind = %directive.kind,
            start = directive.span.start,
            end = directive.span.end,
            "parsed directive"
        );
        directives.push(directive);
        diagnostics.extend(diagnostic);
    }

    (directives, diagnostics)
}

fn classify(
    text: &str,
    raw: &RawDirective,
    table: &DirectiveTable,
) -> (Directive, Option<Diagnostic>) {
    let interior = &text[raw.interior.clone()];
    let trimmed = interior.trim().to_string();

    let opaque = |kind: DirectiveKind| Directive {
        kind,
        span: raw.span.clone(),
        parameters: vec![trimmed.clone()],
        raw: trimmed.clone(),
    };

    if !raw.terminated {
        let diagnostic = Diagnostic {
            span: raw.span.clone(),
            kind: DiagnosticKind::Unterminated,
        };
        return (opaque(DirectiveKind::Other), Some(diagnostic));
    }

    if starts_with_conditional(interior, table) {
        return (opaque(DirectiveKind::Conditional), None);
    }

    match parse_call(interior) {
        Ok(call) => {
            let segments = call.segments();
            match table.classify(&segments) {
                Some(kind @ (DirectiveKind::Conditional | DirectiveKind::Other)) => {
                    (opaque(kind), None)
                }
                Some(kind) => {
                    let parameters = call
                        .args
                        .as_deref()
                        .unwrap_or_default()
                        .iter()
                        .map(|span| argument_value(&interior[span.clone()]))
                        .collect();
                    let directive = Directive {
                        kind,
                        span: raw.span.clone(),
                        parameters,
                        raw: trimmed.clone(),
                    };
                    (directive, None)
                }
                None => {
                    let diagnostic = Diagnostic {
                        span: raw.span.clone(),
                        kind: DiagnosticKind::UnknownPath(segments.join(".")),
                    };
                    (opaque(DirectiveKind::Other), Some(diagnostic))
                }
            }
        }
        Err(errors) => {
            let diagnostic = errors.into_iter().next().map(|err| Diagnostic {
                span: raw.span.clone(),
                kind: DiagnosticKind::Syntax(err.offset(raw.interior.start)),
            });
            (opaque(DirectiveKind::Other), diagnostic)
        }
    }
}

/// Whether the interior opens, continues, or closes a conditional block.
///
/// Leading `}` tokens are skipped so `} else {` counts; a bare `}` closes a block.
fn starts_with_conditional(interior: &str, table: &DirectiveTable) -> bool {
    let mut tokens = lexer::lex(interior).map(|(tok, _)| tok).peekable();
    let closes_block = tokens.peek() == Some(&Token::BraceClose);

    match tokens.find(|tok| *tok != Token::BraceClose) {
        Some(Token::Ident(word)) => table.is_conditional(&word),
        Some(_) => false,
        None => closes_block,
    }
}

/// A lone string literal yields its contents; anything else its trimmed source
fn argument_value(source: &str) -> String {
    let mut tokens = lexer::lex(source).map(|(tok, _)| tok);
    match (tokens.next(), tokens.next()) {
        (Some(Token::String(s)), None) => s,
        _ => source.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<DirectiveKind> {
        parse(text).into_iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_parse_date() {
        let directives = parse(r#"Today: <% tp.date.now("YYYY-MM-DD") %>"#);
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].kind, DirectiveKind::Date);
        assert_eq!(directives[0].parameters, vec!["YYYY-MM-DD".to_string()]);
        assert_eq!(directives[0].span, 7..38);
    }

    #[test]
    fn test_parse_prompt_with_default() {
        let directives = parse(r#"<% tp.system.prompt("Enter mood", "neutral") %>"#);
        assert_eq!(directives[0].kind, DirectiveKind::Prompt);
        assert_eq!(
            directives[0].parameters,
            vec!["Enter mood".to_string(), "neutral".to_string()]
        );
    }

    #[test]
    fn test_parse_system_info_without_arguments() {
        let directives = parse("<% tp.file.title %>");
        assert_eq!(directives[0].kind, DirectiveKind::SystemInfo);
        assert!(directives[0].parameters.is_empty());
        assert_eq!(directives[0].raw, "tp.file.title");
    }

    #[test]
    fn test_parse_conditionals() {
        let text = r#"<%* if (tp.file.title === "x") { %>yes<%* } else { %>no<%* } %>"#;
        assert_eq!(
            kinds(text),
            vec![
                DirectiveKind::Conditional,
                DirectiveKind::Conditional,
                DirectiveKind::Conditional,
            ]
        );
        let directives = parse(text);
        assert_eq!(directives[0].raw, r#"if (tp.file.title === "x") {"#);
        assert_eq!(directives[0].parameters, vec![directives[0].raw.clone()]);
    }

    #[test]
    fn test_non_string_arguments_keep_source_text() {
        let directives = parse(r#"<% tp.date.now("YYYY-MM-DD", -7, tp.file.title) %>"#);
        assert_eq!(
            directives[0].parameters,
            vec![
                "YYYY-MM-DD".to_string(),
                "-7".to_string(),
                "tp.file.title".to_string()
            ]
        );
    }

    #[test]
    fn test_unknown_path_is_other_with_raw_parameter() {
        let table = DirectiveTable::default();
        let (directives, diagnostics) =
            parse_with_diagnostics("<% tp.web.daily_quote() %>", &table);
        assert_eq!(directives[0].kind, DirectiveKind::Other);
        assert_eq!(directives[0].parameters, vec!["tp.web.daily_quote()".to_string()]);
        assert_eq!(
            diagnostics[0].kind,
            DiagnosticKind::UnknownPath("tp.web.daily_quote".to_string())
        );
    }

    #[test]
    fn test_malformed_directive_is_other() {
        let table = DirectiveTable::default();
        let text = r#"x <% tp.date.now("YYYY") + 1 %>"#;
        let (directives, diagnostics) = parse_with_diagnostics(text, &table);
        assert_eq!(directives[0].kind, DirectiveKind::Other);
        assert_eq!(directives[0].raw, r#"tp.date.now("YYYY") + 1"#);
        match &diagnostics[0].kind {
            DiagnosticKind::Syntax(err) => assert!(err.span.start >= 5),
            other => panic!("Expected syntax diagnostic, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_directive() {
        let table = DirectiveTable::default();
        let (directives, diagnostics) =
            parse_with_diagnostics(r#"Title <% tp.date.now("YYYY""#, &table);
        assert_eq!(directives.len(), 1);
        assert_eq!(directives[0].kind, DirectiveKind::Other);
        assert_eq!(directives[0].raw, r#"tp.date.now("YYYY""#);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Unterminated);
    }

    #[test]
    fn test_recognised_directives_have_no_diagnostics() {
        let table = DirectiveTable::default();
        let (_, diagnostics) = parse_with_diagnostics(
            r#"<% tp.date.now() %> <% tp.system.prompt("a") %> <%* if (x) { %>"#,
            &table,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_custom_table() {
        let table = DirectiveTable::from_str(
            r#"
roots = ["tp"]
[paths]
"web" = "system_info"
"#,
        )
        .expect("Should parse");
        let directives = parse_with_table(r#"<% tp.web.random_picture("200x200") %>"#, &table);
        assert_eq!(directives[0].kind, DirectiveKind::SystemInfo);
        assert_eq!(directives[0].parameters, vec!["200x200".to_string()]);
    }

    #[test]
    fn test_stray_quote_keeps_later_directives() {
        let text = r#"<% don't %> A <% tp.date.now("YYYY") %> it's <% tp.file.title %>"#;
        assert_eq!(
            kinds(text),
            vec![
                DirectiveKind::Other,
                DirectiveKind::Date,
                DirectiveKind::SystemInfo,
            ]
        );
    }

    #[test]
    fn test_trailing_underscore_belongs_to_identifier() {
        let directives = parse("<% tp.frontmatter.my_key_%>");
        assert_eq!(directives[0].kind, DirectiveKind::SystemInfo);
        assert_eq!(directives[0].raw, "tp.frontmatter.my_key_");
    }

    #[test]
    fn test_text_without_directives() {
        assert!(parse("# Daily note\n\nNothing dynamic here.").is_empty());
    }
}
