use std::collections::HashSet;

use crate::{
    ast::{Block, Position},
    config::DEFAULT_MAX_NESTING,
    error::ParseError,
    interpreter::{lexer::Token, parser::statement::parse_statements},
    util::stack::ensure_sufficient_stack,
};

pub type ParseResult<T> = Result<T, ParseError>;

/// The names the parser currently treats as functions.
///
/// Whether `f x` is a call or a two-item strand depends on what `f` is, so the
/// parser keeps track: it starts from the functions already bound in the
/// session and follows the assignments it parses. It also counts how deeply
/// the parse is nested and refuses to go past its limit.
#[derive(Debug, Clone)]
pub struct FunctionNames {
    names:   HashSet<String>,
    nesting: usize,
    limit:   usize,
}

impl FunctionNames {
    /// No function names, with the default nesting limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(HashSet::new(), DEFAULT_MAX_NESTING)
    }

    /// Starts from `names` and allows `limit` levels of nesting.
    #[must_use]
    pub const fn with_limit(names: HashSet<String>, limit: usize) -> Self {
        Self { names,
               nesting: 0,
               limit }
    }

    /// Whether `name` denotes a function.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Marks `name` as a function.
    pub fn insert(&mut self, name: String) {
        self.names.insert(name);
    }

    /// Marks `name` as not a function.
    pub fn remove(&mut self, name: &str) {
        self.names.remove(name);
    }

    /// Runs `parse` one level deeper.
    ///
    /// # Errors
    /// `TooDeeplyNested` at `position` if the limit is reached, otherwise
    /// whatever `parse` returns.
    pub(in crate::interpreter::parser) fn nested<T>(&mut self,
                                                    position: Position,
                                                    parse: impl FnOnce(&mut Self) -> ParseResult<T>)
                                                    -> ParseResult<T> {
        if self.nesting >= self.limit {
            return Err(ParseError::TooDeeplyNested { limit: self.limit,
                                                     position });
        }
        self.nesting += 1;
        let result = ensure_sufficient_stack(|| parse(self));
        self.nesting -= 1;
        result
    }
}

impl Default for FunctionNames {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a whole program.
///
/// This is the entry point for parsing. Statements are separated by `⋄`, `◊`
/// or newlines; empty statements are ignored.
///
/// # Parameters
/// - `tokens`: The output of [`tokenize`](crate::interpreter::lexer::tokenize).
/// - `names`: Function names known before parsing starts. Updated with the
///   function assignments found in the program.
///
/// # Returns
/// The parsed statement list.
///
/// # Example
/// ```
/// use aplite::interpreter::{
///     lexer::tokenize,
///     parser::core::{FunctionNames, parse_program},
/// };
///
/// let tokens = tokenize("f←{⍵+1} ⋄ f 2").unwrap();
/// let mut names = FunctionNames::new();
/// let block = parse_program(&tokens, &mut names).unwrap();
///
/// assert_eq!(block.statements.len(), 2);
/// assert!(names.contains("f"));
/// ```
pub fn parse_program(tokens: &[(Token, Position)], names: &mut FunctionNames) -> ParseResult<Block> {
    let position = tokens.first().map(|(_, position)| *position).unwrap_or_default();
    let mut iter = tokens.iter().peekable();
    let statements = parse_statements(&mut iter, names, None)?;

    Ok(Block { statements,
               position })
}
