/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, applies primitive functions and
/// operators to arrays, manages scopes for user-defined functions, and
/// produces results. It is the core execution engine of the interpreter.
///
/// # Responsibilities
/// - Evaluates statements and expressions right to left.
/// - Lifts scalar functions over arrays and checks conformability.
/// - Reports runtime errors such as length and domain errors.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens, each
/// corresponding to a glyph, a literal, a name or a piece of punctuation, with
/// its line and column.
///
/// # Responsibilities
/// - Converts the input character stream into positioned tokens.
/// - Handles numeric literals with high minus, exponents and complex parts.
/// - Reports text that is not part of the language.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// the two families of AST nodes: data expressions and function expressions.
///
/// # Responsibilities
/// - Decides which names denote functions and which denote data.
/// - Applies right-to-left function binding and left-to-right operator
///   binding.
/// - Reports syntax errors with their line and column.
pub mod parser;
/// Persistent sessions.
///
/// Ties lexing, parsing and evaluation together around a workspace that
/// outlives individual runs.
pub mod session;
/// Scopes and bindings.
///
/// Defines the parent-linked chain of scopes names are resolved in.
pub mod symbol_table;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares arrays, their elements and complex numbers, and how
/// they print.
///
/// # Responsibilities
/// - Defines the `Array`, `Element` and `Value` types.
/// - Enforces that an array's element count matches its shape.
/// - Formats arrays for display.
pub mod value;
