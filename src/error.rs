/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of source
/// code: unrecognized characters, unexpected tokens, unbalanced brackets and
/// operators that are missing operands.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, together
/// with [`ErrorKind`], the coarse taxonomy every failure projects onto.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::{ErrorKind, RuntimeError};
