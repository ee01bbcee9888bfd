use std::iter::Peekable;

use crate::{
    ast::{Expr, OperandExpr, Position},
    error::ParseError,
    interpreter::{
        evaluator::core::{ALPHA, OMEGA},
        lexer::Token,
        parser::{
            core::{FunctionNames, ParseResult},
            function::{into_function, parse_function_phrase, parse_operators},
            utils::{
                expect_closing_paren, is_expression_end, next_position, starts_array,
                starts_function, unexpected,
            },
        },
    },
};

/// Parses a data expression.
///
/// Functions take everything to their right as their right argument, so
/// `2×3+4` is `2×(3+4)`. The left argument is the single strand directly
/// before the function.
///
/// Grammar:
/// ```text
///     expression := name "←" expression
///                 | phrase expression
///                 | strand (operators expression | phrase expression)?
/// ```
///
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
/// - `names`: Names that denote functions. Data assignments remove their
///   target.
///
/// # Returns
/// The parsed [`Expr`], or `TooDeeplyNested` if calls nest past the limit.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>,
                               names: &mut FunctionNames)
                               -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let position = next_position(tokens);
    names.nested(position, |names| expression(tokens, names))
}

fn expression<'a, I>(tokens: &mut Peekable<I>, names: &mut FunctionNames) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let mut lookahead = tokens.clone();
    if let (Some((Token::Name(name) | Token::SystemName(name), position)), Some((Token::Assign, _))) =
        (lookahead.next(), lookahead.next())
    {
        tokens.next();
        tokens.next();
        let value = parse_expression(tokens, names)?;
        names.remove(name);
        return Ok(Expr::Assignment { name:     name.clone(),
                                     value:    Box::new(value),
                                     position: *position, });
    }

    if starts_function(tokens, names) {
        let position = next_position(tokens);
        let function = parse_function_phrase(tokens, names)?;
        let omega = parse_argument(tokens, names, position)?;
        return Ok(Expr::MonadicCall { function: Box::new(function),
                                      omega: Box::new(omega),
                                      position });
    }

    if !starts_array(tokens, names) {
        return Err(unexpected(tokens));
    }
    let left = parse_strand(tokens, names)?;

    let dyadic = starts_function(tokens, names);
    match tokens.peek() {
        Some((Token::MonadicOp(_) | Token::DyadicOp(_), position)) => {
            let position = *position;
            let function = into_function(parse_operators(tokens, names, OperandExpr::Array(left))?,
                                         position)?;
            let omega = parse_argument(tokens, names, position)?;
            Ok(Expr::MonadicCall { function: Box::new(function),
                                   omega: Box::new(omega),
                                   position })
        },
        Some((Token::Assign, position)) => {
            Err(ParseError::InvalidAssignmentTarget { position: *position })
        },
        _ if dyadic => {
            let position = next_position(tokens);
            let function = parse_function_phrase(tokens, names)?;
            let omega = parse_argument(tokens, names, position)?;
            Ok(Expr::DyadicCall { function: Box::new(function),
                                  alpha: Box::new(left),
                                  omega: Box::new(omega),
                                  position })
        },
        _ => Ok(left),
    }
}

/// Parses the right argument of the function at `function`.
fn parse_argument<'a, I>(tokens: &mut Peekable<I>,
                         names: &mut FunctionNames,
                         function: Position)
                         -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    if is_expression_end(tokens) {
        let position = tokens.peek().map_or(function, |(_, position)| *position);
        return Err(ParseError::MissingArgument { position });
    }
    parse_expression(tokens, names)
}

/// Parses one or more adjacent array atoms. A single atom is returned as is;
/// several form an [`Expr::Strand`].
pub fn parse_strand<'a, I>(tokens: &mut Peekable<I>, names: &mut FunctionNames) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let position = next_position(tokens);
    let mut items = vec![parse_array_atom(tokens, names)?];
    while starts_array(tokens, names) {
        items.push(parse_array_atom(tokens, names)?);
    }

    if items.len() == 1 {
        return Ok(items.remove(0));
    }
    Ok(Expr::Strand { items, position })
}

/// Parses a literal, a data name, `⍺`, `⍵` or a parenthesised expression.
pub fn parse_array_atom<'a, I>(tokens: &mut Peekable<I>,
                               names: &mut FunctionNames)
                               -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let Some((token, position)) = tokens.next() else {
        return Err(ParseError::UnexpectedEndOfInput { position: Position::default() });
    };
    let position = *position;

    match token {
        Token::Number(value) => Ok(Expr::Number { value: *value,
                                                  position }),
        Token::Text(value) => Ok(Expr::Text { value: value.clone(),
                                              position }),
        Token::Name(name) | Token::SystemName(name) => Ok(Expr::Variable { name: name.clone(),
                                                                           position }),
        Token::Alpha => Ok(Expr::Variable { name: ALPHA.to_string(),
                                            position }),
        Token::Omega => Ok(Expr::Variable { name: OMEGA.to_string(),
                                            position }),
        Token::LParen => {
            let expr = parse_expression(tokens, names)?;
            expect_closing_paren(tokens, position)?;
            Ok(expr)
        },
        other => Err(ParseError::UnexpectedToken { token: other.to_string(),
                                                   position }),
    }
}
