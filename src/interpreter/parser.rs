/// Parser entry points.
///
/// Holds the result type, the bookkeeping of which names denote functions, and
/// the function that turns a whole token stream into a statement list.
pub mod core;

/// Data expressions.
///
/// Parses calls, assignments, strands and parenthesised expressions with the
/// right-to-left binding of function application.
pub mod expression;

/// Function expressions.
///
/// Parses primitive glyphs, function names, anonymous function literals and
/// operator applications, which bind left to right.
pub mod function;

/// Statement parsing.
///
/// Implements function assignment, guards, bare function statements and
/// statement lists.
pub mod statement;

/// Utility functions for the parser.
///
/// Provides lookahead helpers and common checks used across the grammar.
pub mod utils;
