use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{Block, FuncExpr, MonadicOperator, OperandExpr, Position},
    error::ParseError,
    interpreter::{
        evaluator::core::SELF_REFERENCE,
        lexer::Token,
        parser::{
            core::{FunctionNames, ParseResult},
            expression::{parse_array_atom, parse_strand},
            statement::parse_statements,
            utils::{expect_closing_paren, next_position, starts_array, starts_function, unexpected},
        },
    },
};

/// Parses a function phrase: an operand followed by any number of operators.
///
/// Operators bind left to right with long left scope, so `+.×/` is
/// `(+.×)/`. The phrase may start with an array only if an operator turns it
/// into a function, as in `2∘×`.
///
/// Grammar:
/// ```text
///     phrase  := operand (monadic_op | dyadic_op right)*
///     operand := function_atom | strand
///     right   := function_atom | array_atom
/// ```
///
/// # Errors
/// Returns a `ParseError` if the tokens do not form a function.
pub fn parse_function_phrase<'a, I>(tokens: &mut Peekable<I>,
                                    names: &mut FunctionNames)
                                    -> ParseResult<FuncExpr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let position = next_position(tokens);
    names.nested(position, |names| function_phrase(tokens, names, position))
}

fn function_phrase<'a, I>(tokens: &mut Peekable<I>,
                          names: &mut FunctionNames,
                          position: Position)
                          -> ParseResult<FuncExpr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let operand = if starts_function(tokens, names) {
        OperandExpr::Function(parse_function_atom(tokens, names)?)
    } else if starts_array(tokens, names) {
        OperandExpr::Array(parse_strand(tokens, names)?)
    } else {
        return Err(unexpected(tokens));
    };

    into_function(parse_operators(tokens, names, operand)?, position)
}

/// Applies the operators that follow `operand`, if any.
pub fn parse_operators<'a, I>(tokens: &mut Peekable<I>,
                              names: &mut FunctionNames,
                              operand: OperandExpr)
                              -> ParseResult<OperandExpr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let mut operand = operand;
    loop {
        match tokens.peek() {
            Some((Token::MonadicOp(operator), position)) => {
                tokens.next();
                operand = OperandExpr::Function(FuncExpr::MonadicOperator { operator: *operator,
                                                                            operand:  Box::new(operand),
                                                                            position: *position, });
            },
            Some((Token::DyadicOp(operator), position)) => {
                tokens.next();
                let right = if starts_function(tokens, names) {
                    OperandExpr::Function(parse_function_atom(tokens, names)?)
                } else if starts_array(tokens, names) {
                    OperandExpr::Array(parse_array_atom(tokens, names)?)
                } else {
                    return Err(ParseError::MissingOperand { operator: operator.to_string(),
                                                            position: *position, });
                };
                operand = OperandExpr::Function(FuncExpr::DyadicOperator { operator: *operator,
                                                                           left:     Box::new(operand),
                                                                           right:    Box::new(right),
                                                                           position: *position, });
            },
            _ => return Ok(operand),
        }
    }
}

/// Unwraps an operand that must be a function.
pub(in crate::interpreter::parser) fn into_function(operand: OperandExpr,
                                                    position: Position)
                                                    -> ParseResult<FuncExpr> {
    match operand {
        OperandExpr::Function(function) => Ok(function),
        OperandExpr::Array(_) => Err(ParseError::Other { message: "Expected a function".to_string(),
                                                         position }),
    }
}

/// Parses a single function without trailing operators: a primitive, a
/// function name, `∇`, an anonymous function, a parenthesised function phrase,
/// or an outer product `∘.f`.
fn parse_function_atom<'a, I>(tokens: &mut Peekable<I>,
                              names: &mut FunctionNames)
                              -> ParseResult<FuncExpr>
    where I: Iterator<Item = &'a (Token, Position)> + Clone
{
    let Some((token, position)) = tokens.next() else {
        return Err(ParseError::UnexpectedEndOfInput { position: Position::default() });
    };
    let position = *position;

    match token {
        Token::Primitive(primitive) => Ok(FuncExpr::Primitive { primitive: *primitive,
                                                                position }),
        Token::Name(name) => Ok(FuncExpr::Reference { name: name.clone(),
                                                      position }),
        Token::Del => Ok(FuncExpr::Reference { name: SELF_REFERENCE.to_string(),
                                               position }),
        Token::LBrace => {
            // Local bindings must not change how the enclosing scope parses.
            let statements = parse_statements(tokens, &mut names.clone(), Some(position))?;
            Ok(FuncExpr::Anonymous { body: Rc::new(Block { statements,
                                                           position }),
                                     position })
        },
        Token::LParen => {
            let function = parse_function_phrase(tokens, names)?;
            expect_closing_paren(tokens, position)?;
            Ok(function)
        },
        Token::JotDot => {
            if !starts_function(tokens, names) {
                return Err(ParseError::MissingOperand { operator: "∘.".to_string(),
                                                        position });
            }
            let operand = names.nested(position, |names| parse_function_atom(tokens, names))?;
            Ok(FuncExpr::MonadicOperator { operator: MonadicOperator::OuterProduct,
                                           operand: Box::new(OperandExpr::Function(operand)),
                                           position })
        },
        other => Err(ParseError::UnexpectedToken { token: other.to_string(),
                                                   position }),
    }
}
