use crate::ast::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// The lexer found text that is not part of the language.
    UnrecognizedInput {
        /// The offending text.
        text:     String,
        /// Where the text starts.
        position: Position,
    },
    /// Found an unexpected token while parsing.
    UnexpectedToken {
        /// The token encountered.
        token:    String,
        /// Where the token appears.
        position: Position,
    },
    /// Reached the end of input unexpectedly.
    UnexpectedEndOfInput {
        /// The position of the last token read.
        position: Position,
    },
    /// A closing parenthesis `)` was expected but not found.
    ExpectedClosingParen {
        /// Where the parenthesised expression started.
        position: Position,
    },
    /// A closing brace `}` was expected but not found.
    ExpectedClosingBrace {
        /// Where the anonymous function started.
        position: Position,
    },
    /// An operator was not given the operand(s) it needs.
    MissingOperand {
        /// The operator glyph.
        operator: String,
        /// Where the operator appears.
        position: Position,
    },
    /// A function phrase appeared where an argument was required.
    MissingArgument {
        /// Where the argument was expected.
        position: Position,
    },
    /// Something other than a name appeared to the left of `←`.
    InvalidAssignmentTarget {
        /// Where the arrow appears.
        position: Position,
    },
    /// A numeric literal could not be represented.
    InvalidNumber {
        /// The literal as written.
        literal:  String,
        /// Where the literal appears.
        position: Position,
    },
    /// The program nests deeper than the parser allows.
    TooDeeplyNested {
        /// The nesting limit.
        limit:    usize,
        /// Where the limit was reached.
        position: Position,
    },
    /// Some other kind of parse error, with a custom message.
    Other {
        /// Details about the parse error.
        message:  String,
        /// Where the problem was detected.
        position: Position,
    },
}

impl ParseError {
    /// Returns the position the error refers to.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnrecognizedInput { position, .. }
            | Self::UnexpectedToken { position, .. }
            | Self::UnexpectedEndOfInput { position }
            | Self::ExpectedClosingParen { position }
            | Self::ExpectedClosingBrace { position }
            | Self::MissingOperand { position, .. }
            | Self::MissingArgument { position }
            | Self::InvalidAssignmentTarget { position }
            | Self::InvalidNumber { position, .. }
            | Self::TooDeeplyNested { position, .. }
            | Self::Other { position, .. } => *position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Position { line, column } = self.position();
        match self {
            Self::UnrecognizedInput { text, .. } => {
                write!(f, "Error on line {line}, column {column}: Unrecognized input '{text}'.")
            },

            Self::UnexpectedToken { token, .. } => {
                write!(f, "Error on line {line}, column {column}: Unexpected token: {token}.")
            },

            Self::UnexpectedEndOfInput { .. } => {
                write!(f, "Error on line {line}, column {column}: Unexpected end of input.")
            },

            Self::ExpectedClosingParen { .. } => write!(f,
                                                        "Error on line {line}, column {column}: Expected closing parenthesis ')' but none found."),

            Self::ExpectedClosingBrace { .. } => write!(f,
                                                        "Error on line {line}, column {column}: Expected closing brace '}}' but none found."),

            Self::MissingOperand { operator, .. } => write!(f,
                                                            "Error on line {line}, column {column}: Operator {operator} is missing an operand."),

            Self::MissingArgument { .. } => {
                write!(f, "Error on line {line}, column {column}: Expected an argument.")
            },

            Self::InvalidAssignmentTarget { .. } => write!(f,
                                                           "Error on line {line}, column {column}: Only names can be assigned to."),

            Self::InvalidNumber { literal, .. } => {
                write!(f, "Error on line {line}, column {column}: Invalid number '{literal}'.")
            },

            Self::TooDeeplyNested { limit, .. } => write!(f,
                                                          "Error on line {line}, column {column}: Expression nests deeper than {limit} levels."),

            Self::Other { message, .. } => {
                write!(f, "Error on line {line}, column {column}: {message}")
            },
        }
    }
}

impl std::error::Error for ParseError {}
