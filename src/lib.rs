//! # aplite
//!
//! aplite is an interpreter for a small APL-family array language written in
//! Rust. It tokenizes, parses and evaluates programs over nested
//! multi-dimensional arrays, with pervasive primitive functions, higher-order
//! operators, anonymous functions with lexical scope, and guards.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{config::Config, interpreter::session::Session};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr`, `FuncExpr`, `OperandExpr` and `Statement` types that
/// represent source code as a tree, together with the primitive and operator
/// enumerations. The AST is built by the parser and traversed by the
/// evaluator.
///
/// # Responsibilities
/// - Separates data-producing nodes from function-producing nodes.
/// - Attaches source positions to AST nodes for error reporting.
pub mod ast;
/// Session configuration.
///
/// Initial values of the system variables and the evaluation limits.
pub mod config;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during lexing, parsing,
/// or evaluating code. Every error carries the line and column it refers to.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Projects runtime errors onto a small set of error kinds.
/// - Supports integration with standard error handling traits and reporting
///   utilities.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations and scopes to provide a complete runtime for source code
/// evaluation.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides sessions that keep a workspace across runs.
pub mod interpreter;
/// General utilities for safe numeric conversion and deep recursion.
///
/// # Responsibilities
/// - Safely convert between `i64`, `usize`, and `f64` without silent data
///   loss.
/// - Grow the stack on demand for deeply nested programs.
pub mod util;

/// Runs a program in a fresh session.
///
/// If `auto_print` is set, the value of the last statement is printed, unless
/// that statement is an assignment.
///
/// # Errors
/// Returns an error if parsing or evaluation fails.
///
/// # Examples
/// ```
/// use aplite::get_result;
///
/// let source = "result←+/⍳10";
/// assert!(get_result(source, false).is_ok());
///
/// // `x` is not defined
/// let source = "y←x+1";
/// assert!(get_result(source, false).is_err());
/// ```
pub fn get_result(source: &str, auto_print: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(Config::default())?;
    let output = session.echo(source)?;

    if auto_print && let Some(text) = output {
        println!("{text}");
    }

    Ok(())
}
