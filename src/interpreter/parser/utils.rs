use std::iter::Peekable;

use crate::{
    ast::Position,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{FunctionNames, ParseResult},
            function::parse_function_phrase,
        },
    },
};

/// The position of the next token, or the default position at the end of
/// input.
pub(in crate::interpreter::parser) fn next_position<'a, I>(tokens: &mut Peekable<I>) -> Position
    where I: Iterator<Item = &'a (Token, Position)>
{
    tokens.peek().map(|(_, position)| *position).unwrap_or_default()
}

/// Whether the next token ends a statement: a separator, a closing brace, or
/// the end of input.
pub(in crate::interpreter::parser) fn is_statement_end<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, Position)>
{
    matches!(tokens.peek(), None | Some((Token::Separator | Token::RBrace, _)))
}

/// Whether the next token ends an expression. Besides statement ends, `)`
/// closes a parenthesised expression and `:` closes a guard.
pub(in crate::interpreter::parser) fn is_expression_end<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, Position)>
{
    is_statement_end(tokens) || matches!(tokens.peek(), Some((Token::RParen | Token::Colon, _)))
}

/// Whether the upcoming tokens begin a function.
///
/// A parenthesis begins a function when everything up to the matching `)`
/// parses as one, so this may look arbitrarily far ahead.
pub(in crate::interpreter::parser) fn starts_function<'a, I>(tokens: &Peekable<I>,
                                                             names: &FunctionNames)
                                                             -> bool
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let mut lookahead = tokens.clone();
    match lookahead.next() {
        Some((Token::Primitive(_) | Token::Del | Token::LBrace | Token::JotDot, _)) => true,
        Some((Token::Name(name), _)) => names.contains(name),
        Some((Token::LParen, _)) => {
            parse_function_phrase(&mut lookahead, &mut names.clone()).is_ok()
            && matches!(lookahead.peek(), Some((Token::RParen, _)))
        },
        _ => false,
    }
}

/// Whether the upcoming tokens begin an array: a literal, a data name, `⍺`,
/// `⍵`, or a parenthesised expression.
pub(in crate::interpreter::parser) fn starts_array<'a, I>(tokens: &Peekable<I>,
                                                          names: &FunctionNames)
                                                          -> bool
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let mut lookahead = tokens.clone();
    match lookahead.peek() {
        Some((Token::Number(_)
              | Token::Text(_)
              | Token::SystemName(_)
              | Token::Alpha
              | Token::Omega,
              _)) => true,
        Some((Token::Name(name), _)) => !names.contains(name),
        Some((Token::LParen, _)) => !starts_function(tokens, names),
        _ => false,
    }
}

/// Consumes a `)` or reports the unclosed `(` at `open`.
pub(in crate::interpreter::parser) fn expect_closing_paren<'a, I>(tokens: &mut Peekable<I>,
                                                                  open: Position)
                                                                  -> ParseResult<()>
    where I: Iterator<Item = &'a (Token, Position)>
{
    match tokens.next() {
        Some((Token::RParen, _)) => Ok(()),
        _ => Err(ParseError::ExpectedClosingParen { position: open }),
    }
}

/// The error for a token that cannot appear where it was found.
pub(in crate::interpreter::parser) fn unexpected<'a, I>(tokens: &mut Peekable<I>) -> ParseError
    where I: Iterator<Item = &'a (Token, Position)>
{
    match tokens.peek() {
        Some((Token::Assign, position)) => {
            ParseError::InvalidAssignmentTarget { position: *position }
        },
        Some((token, position)) => ParseError::UnexpectedToken { token:    token.to_string(),
                                                                 position: *position, },
        None => ParseError::UnexpectedEndOfInput { position: Position::default() },
    }
}
