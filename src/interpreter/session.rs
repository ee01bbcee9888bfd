use std::rc::Rc;

use crate::{
    ast::Block,
    config::Config,
    interpreter::{
        evaluator::{core::{EvalResult, Interpreter}, system::Settings},
        lexer::tokenize,
        parser::core::{FunctionNames, parse_program},
        symbol_table::{SymbolKind, SymbolTable},
        value::{core::Value, display::format_array},
    },
};

/// A persistent interpreter session.
///
/// A session owns the root scope, so names bound by one call to
/// [`run`](Self::run) are visible to the next. A failing run abandons the rest
/// of its statements but keeps whatever earlier statements bound.
///
/// # Example
/// ```
/// use aplite::{config::Config, interpreter::session::Session};
///
/// let mut session = Session::new(Config::default()).unwrap();
/// session.run("x←2 3").unwrap();
/// assert_eq!(session.echo("x×10").unwrap().as_deref(), Some("20 30"));
/// assert_eq!(session.echo("y←1").unwrap(), None);
/// ```
#[derive(Debug)]
pub struct Session {
    interpreter: Interpreter,
    root:        Rc<SymbolTable>,
}

impl Session {
    /// Creates a session with an empty workspace and system variables seeded
    /// from `config`.
    ///
    /// # Errors
    /// Returns a `DomainError` if a configured system variable value is out of
    /// range.
    pub fn new(config: Config) -> EvalResult<Self> {
        let interpreter = Interpreter::new(config)?;
        let root = SymbolTable::root();
        interpreter.settings().seed(&root)?;
        Ok(Self { interpreter, root })
    }

    /// Tokenizes and parses `source` against the functions currently bound in
    /// the workspace.
    ///
    /// # Errors
    /// Returns `SyntaxPassthrough` wrapping the parse error.
    pub fn parse(&self, source: &str) -> EvalResult<Block> {
        let tokens = tokenize(source)?;
        let mut names = FunctionNames::with_limit(self.root.function_names(),
                                                  self.interpreter.config().max_nesting);
        Ok(parse_program(&tokens, &mut names)?)
    }

    /// Runs `source` in the workspace and returns the value of its last
    /// statement, or `None` if it has none.
    pub fn run(&mut self, source: &str) -> EvalResult<Option<Value>> {
        let block = self.parse(source)?;
        self.interpreter.evaluate(&block, &self.root)
    }

    /// Runs `source` and formats its result for display.
    ///
    /// Programs ending in an assignment display nothing.
    pub fn echo(&mut self, source: &str) -> EvalResult<Option<String>> {
        let block = self.parse(source)?;
        let value = self.interpreter.evaluate(&block, &self.root)?;
        if block.ends_with_assignment() {
            return Ok(None);
        }
        Ok(value.map(|value| self.format(&value)))
    }

    /// Formats a value using the current `⎕PP`.
    #[must_use]
    pub fn format(&self, value: &Value) -> String {
        match value {
            Value::Array(array) => format_array(array, self.settings().print_precision),
            Value::Function(function) => function.to_string(),
        }
    }

    /// The system variable values currently in effect.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        self.interpreter.settings()
    }

    /// The session's root scope.
    #[must_use]
    pub const fn root(&self) -> &Rc<SymbolTable> {
        &self.root
    }

    /// The names bound in the workspace with the given kind, sorted. System
    /// variables are left out.
    #[must_use]
    pub fn names(&self, kind: SymbolKind) -> Vec<String> {
        self.root
            .local_names(kind)
            .into_iter()
            .filter(|name| !name.starts_with('⎕'))
            .collect()
    }

    /// Empties the workspace and restores the configured system variables.
    ///
    /// # Errors
    /// Returns a `DomainError` if the configured values cannot be restored.
    pub fn clear(&mut self) -> EvalResult<()> {
        self.root.clear();
        let settings = Settings::from_config(self.interpreter.config())?;
        settings.seed(&self.root)?;
        self.interpreter.sync_settings(&self.root);
        Ok(())
    }
}

impl Drop for Session {
    // Functions stored in the workspace hold the root scope alive.
    fn drop(&mut self) {
        self.root.clear();
    }
}
