use std::iter::Peekable;

use crate::{
    ast::{Position, Statement},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{FunctionNames, ParseResult},
            expression::parse_expression,
            function::parse_function_phrase,
            utils::{is_statement_end, next_position},
        },
    },
};

/// Parses statements until the end of input or, inside an anonymous function,
/// until the closing brace.
///
/// Grammar: `statements := separator* (statement separator+)* statement?`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the first statement.
/// - `names`: Names that denote functions.
/// - `enclosing`: The position of the opening `{` when parsing a function
///   body, `None` at top level.
///
/// # Errors
/// `ExpectedClosingBrace` if a function body is not closed, and any error
/// from the statements themselves.
pub fn parse_statements<'a, I>(tokens: &mut Peekable<I>,
                               names: &mut FunctionNames,
                               enclosing: Option<Position>)
                               -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let mut statements = Vec::new();

    loop {
        while let Some((Token::Separator, _)) = tokens.peek() {
            tokens.next();
        }

        match (tokens.peek(), enclosing) {
            (None, None) => break,
            (None, Some(open)) => return Err(ParseError::ExpectedClosingBrace { position: open }),
            (Some((Token::RBrace, _)), Some(_)) => {
                tokens.next();
                break;
            },
            (Some((Token::RBrace, position)), None) => {
                return Err(ParseError::UnexpectedToken { token:    "}".to_string(),
                                                         position: *position, });
            },
            _ => {},
        }

        statements.push(parse_statement(tokens, names)?);

        if !is_statement_end(tokens) {
            let (token, position) = tokens.peek().map(|(t, p)| (t.to_string(), *p)).unwrap_or_default();
            return Err(ParseError::UnexpectedToken { token, position });
        }
    }

    Ok(statements)
}

/// Parses a single statement.
///
/// Handles, in order of precedence:
/// - function assignment `name ← function`,
/// - a bare function `+/`,
/// - a guard `condition : statement`,
/// - a data expression, including data assignment.
///
/// Whether the right side of `←` is a function is decided by trying to parse
/// one up to the end of the statement.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>,
                              names: &mut FunctionNames)
                              -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let mut lookahead = tokens.clone();
    if let (Some((Token::Name(name) | Token::SystemName(name), position)), Some((Token::Assign, _))) =
        (lookahead.next(), lookahead.next())
    {
        let mut speculative = names.clone();
        if let Ok(function) = parse_function_phrase(&mut lookahead, &mut speculative)
           && is_statement_end(&mut lookahead)
        {
            *tokens = lookahead;
            *names = speculative;
            names.insert(name.clone());
            return Ok(Statement::FunctionAssignment { name: name.clone(),
                                                      function,
                                                      position: *position });
        }
    }

    let mut lookahead = tokens.clone();
    let mut speculative = names.clone();
    if let Ok(function) = parse_function_phrase(&mut lookahead, &mut speculative)
       && is_statement_end(&mut lookahead)
    {
        *tokens = lookahead;
        *names = speculative;
        return Ok(Statement::Function(function));
    }

    let position = next_position(tokens);
    let expr = parse_expression(tokens, names)?;

    if let Some((Token::Colon, _)) = tokens.peek() {
        tokens.next();
        let consequent = names.nested(position, |names| parse_statement(tokens, names))?;
        return Ok(Statement::Conditional { condition: expr,
                                           consequent: Box::new(consequent),
                                           position });
    }

    Ok(Statement::Expression(expr))
}
