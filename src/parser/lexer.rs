//! Lexer for directive interiors using logos

use logos::Logos;

use crate::parser::ast::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Delimiters
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    // Literals
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r#""([^"\\]|\\.)*""#, unquote)]
    #[regex(r#"'([^'\\]|\\.)*'"#, unquote)]
    #[regex(r#"`([^`\\]|\\.)*`"#, unquote)]
    String(String),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    /// Operator run such as `+`, `===` or `=>`
    #[regex(r"[-+*/%!=<>&|?:;^~]+", |lex| lex.slice().to_string())]
    Operator(String),

    /// Input the lexer could not classify
    Unknown,
}

fn unquote(lex: &mut logos::Lexer<Token>) -> String {
    let s = lex.slice();
    s[1..s.len() - 1].to_string()
}

impl Token {
    /// Tokens that open or close a group or separate arguments
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Token::ParenOpen
                | Token::ParenClose
                | Token::BracketOpen
                | Token::BracketClose
                | Token::BraceOpen
                | Token::BraceClose
                | Token::Comma
        )
    }
}

/// Lex input string into tokens with spans.
///
/// Unlexable input becomes `Token::Unknown` instead of being dropped, so a
/// malformed interior never parses as a clean call.
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .map(|(tok, span)| (tok.unwrap_or(Token::Unknown), span))
}
