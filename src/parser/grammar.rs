//! Call grammar for directive interiors using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::SyntaxError;
use crate::parser::ast::{Call, Spanned};
use crate::parser::lexer::Token;

/// Parse a directive interior as `path.to.function(arg, ...)`
///
/// Spans in the result are relative to `input`.
pub fn parse_call(input: &str) -> Result<Call, Vec<SyntaxError>> {
    let len = input.len();

    let token_iter = crate::parser::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Split (Token, SimpleSpan) into token and span parts
    let token_stream =
        Stream::from_iter(token_iter).map((len..len).into(), |(t, s): (_, _)| (t, s));

    call_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn call_parser<'a, I>() -> impl Parser<'a, I, Call, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let segment = select! {
        Token::Ident(s) => s,
    }
    .map_with(|s, e| Spanned::new(s, span_range(&e.span())));

    let path = segment
        .separated_by(just(Token::Dot))
        .at_least(1)
        .collect::<Vec<_>>();

    // A token tree is one non-structural token or a balanced group. Commas
    // inside a group belong to the group, not to the argument list.
    let token_tree = recursive(|tree| {
        let inner = choice((tree, just(Token::Comma).ignored())).repeated();
        choice((
            inner
                .clone()
                .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)),
            inner
                .clone()
                .delimited_by(just(Token::BracketOpen), just(Token::BracketClose)),
            inner.delimited_by(just(Token::BraceOpen), just(Token::BraceClose)),
            any()
                .filter(|t: &Token| !t.is_structural() && *t != Token::Unknown)
                .ignored(),
        ))
        .boxed()
    });

    let argument = token_tree
        .repeated()
        .at_least(1)
        .map_with(|_, e| span_range(&e.span()));

    let arguments = argument
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

    path.then(arguments.or_not())
        .then_ignore(end())
        .map(|(path, args)| Call { path, args })
}
