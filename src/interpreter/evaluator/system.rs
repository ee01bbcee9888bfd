use crate::{
    ast::Position,
    config::{Config, MAX_COMPARISON_TOLERANCE, MAX_PRINT_PRECISION},
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        symbol_table::SymbolTable,
        value::core::{Array, Value},
    },
    util::num::{f64_to_usize_checked, usize_to_f64_checked},
};

/// Index origin.
pub const INDEX_ORIGIN: &str = "⎕IO";
/// Comparison tolerance.
pub const COMPARISON_TOLERANCE: &str = "⎕CT";
/// Print precision.
pub const PRINT_PRECISION: &str = "⎕PP";

/// Whether `name` is spelled as a system name.
#[must_use]
pub fn is_system_name(name: &str) -> bool {
    name.starts_with('⎕')
}

/// The current values of the system variables, in the form primitives use
/// them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// `⎕IO`
    pub index_origin:         usize,
    /// `⎕CT`
    pub comparison_tolerance: f64,
    /// `⎕PP`
    pub print_precision:      usize,
}

impl Default for Settings {
    fn default() -> Self {
        let config = Config::default();
        Self { index_origin:         config.index_origin,
               comparison_tolerance: config.comparison_tolerance,
               print_precision:      config.print_precision, }
    }
}

impl Settings {
    /// Builds settings from a configuration, validating each value exactly as
    /// an assignment to the corresponding system variable would.
    ///
    /// # Errors
    /// Returns a `DomainError` naming the first invalid value.
    ///
    /// # Example
    /// ```
    /// use aplite::{config::Config, interpreter::evaluator::system::Settings};
    ///
    /// let config = Config { index_origin: 0,
    ///                       ..Config::default() };
    /// assert_eq!(Settings::from_config(&config).unwrap().index_origin, 0);
    ///
    /// let config = Config { index_origin: 2,
    ///                       ..Config::default() };
    /// assert!(Settings::from_config(&config).is_err());
    /// ```
    pub fn from_config(config: &Config) -> EvalResult<Self> {
        let position = Position::default();
        let mut settings = Self::default();
        settings.assign(INDEX_ORIGIN,
                        &Array::real(usize_to_f64_checked(config.index_origin, position)?),
                        position)?;
        settings.assign(COMPARISON_TOLERANCE,
                        &Array::real(config.comparison_tolerance),
                        position)?;
        settings.assign(PRINT_PRECISION,
                        &Array::real(usize_to_f64_checked(config.print_precision, position)?),
                        position)?;
        Ok(settings)
    }

    /// Binds the system variables in `root`.
    pub fn seed(&self, root: &SymbolTable) -> EvalResult<()> {
        let position = Position::default();
        for (name, value) in self.as_arrays(position)? {
            root.define_local(name, Value::Array(value), position);
        }
        Ok(())
    }

    /// Reads the system variables visible from `env`, keeping `self`'s value
    /// for any that are missing or invalid.
    #[must_use]
    pub fn read(self, env: &SymbolTable) -> Self {
        let mut settings = self;
        for name in [INDEX_ORIGIN, COMPARISON_TOLERANCE, PRINT_PRECISION] {
            if let Some(symbol) = env.lookup(name)
               && let Some(array) = symbol.value.as_array()
            {
                let mut candidate = settings;
                if candidate.assign(name, array, symbol.defined_at).is_ok() {
                    settings = candidate;
                }
            }
        }
        settings
    }

    /// Validates and applies an assignment to a system variable.
    ///
    /// # Errors
    /// Returns a `DomainError` for unknown system names and for values out of
    /// range. `self` is unchanged on error.
    ///
    /// # Example
    /// ```
    /// use aplite::{
    ///     ast::Position,
    ///     interpreter::{evaluator::system::Settings, value::core::Array},
    /// };
    ///
    /// let mut settings = Settings::default();
    /// let p = Position::default();
    /// settings.assign("⎕PP", &Array::real(4.0), p).unwrap();
    /// assert_eq!(settings.print_precision, 4);
    ///
    /// assert!(settings.assign("⎕IO", &Array::real(2.0), p).is_err());
    /// assert_eq!(settings.index_origin, 1);
    /// ```
    pub fn assign(&mut self, name: &str, value: &Array, position: Position) -> EvalResult<()> {
        let element = value.single(position)
                           .map_err(|_| RuntimeError::domain(format!("{name} must be a single number"), position))?;
        match name {
            INDEX_ORIGIN => {
                let origin = f64_to_usize_checked(element.as_real(position)?, position)?;
                if origin > 1 {
                    return Err(RuntimeError::domain(format!("{INDEX_ORIGIN} must be 0 or 1"),
                                                    position));
                }
                self.index_origin = origin;
            },
            COMPARISON_TOLERANCE => {
                let tolerance = element.as_real(position)?;
                if !(0.0..=MAX_COMPARISON_TOLERANCE).contains(&tolerance) {
                    return Err(RuntimeError::domain(format!("{COMPARISON_TOLERANCE} must be between 0 and {MAX_COMPARISON_TOLERANCE}"),
                                                    position));
                }
                self.comparison_tolerance = tolerance;
            },
            PRINT_PRECISION => {
                let precision = f64_to_usize_checked(element.as_real(position)?, position)?;
                if !(1..=MAX_PRINT_PRECISION).contains(&precision) {
                    return Err(RuntimeError::domain(format!("{PRINT_PRECISION} must be between 1 and {MAX_PRINT_PRECISION}"),
                                                    position));
                }
                self.print_precision = precision;
            },
            other => {
                return Err(RuntimeError::domain(format!("unknown system variable {other}"),
                                                position));
            },
        }
        Ok(())
    }

    fn as_arrays(&self, position: Position) -> EvalResult<[(&'static str, Array); 3]> {
        Ok([(INDEX_ORIGIN, Array::real(usize_to_f64_checked(self.index_origin, position)?)),
            (COMPARISON_TOLERANCE, Array::real(self.comparison_tolerance)),
            (PRINT_PRECISION, Array::real(usize_to_f64_checked(self.print_precision, position)?))])
    }
}
