use std::fmt::Display;

use crate::{
    ast::Position, error::ParseError, interpreter::symbol_table::SymbolKind,
};

/// The category of a [`RuntimeError`].
///
/// Front ends use the kind to decide how to present a failure; tests use it to
/// assert on failures without depending on message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Arrays that must conform did not.
    ShapeMismatch,
    /// An argument was outside the domain of a function.
    DomainError,
    /// A name was not bound anywhere in the scope chain.
    UnboundName,
    /// Data was used where a function was expected, or the other way round.
    KindMismatch,
    /// A function was applied with a valence it does not support.
    ArityMismatch,
    /// The source could not be tokenized or parsed.
    SyntaxPassthrough,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::ShapeMismatch => "LENGTH ERROR",
            Self::DomainError => "DOMAIN ERROR",
            Self::UnboundName => "VALUE ERROR",
            Self::KindMismatch => "SYNTAX ERROR",
            Self::ArityMismatch => "VALENCE ERROR",
            Self::SyntaxPassthrough => "PARSE ERROR",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur during evaluation and runtime.
pub enum RuntimeError {
    /// Two arrays had unequal shapes where equal shapes were required.
    ShapeMismatch {
        /// Details describing the shapes involved.
        details:  String,
        /// Where the failing function was applied.
        position: Position,
    },
    /// An argument was outside the domain of a function.
    DomainError {
        /// Details about the failure.
        details:  String,
        /// Where the failing function was applied.
        position: Position,
    },
    /// Tried to use a name that is not bound.
    UnboundName {
        /// The name.
        name:     String,
        /// Where the name was referenced.
        position: Position,
    },
    /// A name was bound to the wrong kind of value for its use.
    KindMismatch {
        /// The name, or a description of the offending expression.
        name:     String,
        /// The kind the use site needed.
        expected: SymbolKind,
        /// Where the use occurred.
        position: Position,
    },
    /// A function was applied monadically or dyadically when it does not
    /// support that valence.
    ArityMismatch {
        /// Details about the call.
        details:  String,
        /// Where the call occurred.
        position: Position,
    },
    /// An error raised by the lexer or parser, passed through unchanged.
    SyntaxPassthrough(ParseError),
}

impl RuntimeError {
    /// Projects the error onto its category.
    ///
    /// # Example
    /// ```
    /// use aplite::{
    ///     ast::Position,
    ///     error::{ErrorKind, RuntimeError},
    /// };
    ///
    /// let e = RuntimeError::UnboundName { name:     "x".to_string(),
    ///                                     position: Position::new(1, 1), };
    /// assert_eq!(e.kind(), ErrorKind::UnboundName);
    /// assert_eq!(e.name(), Some("x"));
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            Self::DomainError { .. } => ErrorKind::DomainError,
            Self::UnboundName { .. } => ErrorKind::UnboundName,
            Self::KindMismatch { .. } => ErrorKind::KindMismatch,
            Self::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            Self::SyntaxPassthrough(_) => ErrorKind::SyntaxPassthrough,
        }
    }

    /// Returns the source position the error is attributed to.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::ShapeMismatch { position, .. }
            | Self::DomainError { position, .. }
            | Self::UnboundName { position, .. }
            | Self::KindMismatch { position, .. }
            | Self::ArityMismatch { position, .. } => *position,
            Self::SyntaxPassthrough(e) => e.position(),
        }
    }

    /// Returns the offending identifier, if the error concerns one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::UnboundName { name, .. } | Self::KindMismatch { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Shorthand for a [`RuntimeError::DomainError`].
    pub fn domain(details: impl Into<String>, position: Position) -> Self {
        Self::DomainError { details: details.into(),
                            position }
    }

    /// Shorthand for a [`RuntimeError::ShapeMismatch`] between two shapes.
    #[must_use]
    pub fn shapes(left: &[usize], right: &[usize], position: Position) -> Self {
        Self::ShapeMismatch { details: format!("shapes {left:?} and {right:?} do not conform"),
                              position }
    }
}

impl From<ParseError> for RuntimeError {
    fn from(value: ParseError) -> Self {
        Self::SyntaxPassthrough(value)
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = self.kind();
        let Position { line, column } = self.position();
        match self {
            Self::ShapeMismatch { details, .. } | Self::DomainError { details, .. } => {
                write!(f, "{kind} on line {line}, column {column}: {details}.")
            },
            Self::UnboundName { name, .. } => {
                write!(f, "{kind} on line {line}, column {column}: '{name}' is not defined.")
            },
            Self::KindMismatch { name, expected, .. } => write!(f,
                                                                "{kind} on line {line}, column {column}: '{name}' is not {expected}."),
            Self::ArityMismatch { details, .. } => {
                write!(f, "{kind} on line {line}, column {column}: {details}.")
            },
            Self::SyntaxPassthrough(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SyntaxPassthrough(e) => Some(e),
            _ => None,
        }
    }
}
