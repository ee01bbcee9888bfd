use crate::interpreter::value::display::DEFAULT_PRINT_PRECISION;

/// Default index origin, the value of `⎕IO` in a fresh session.
pub const DEFAULT_INDEX_ORIGIN: usize = 1;
/// Default comparison tolerance, the value of `⎕CT` in a fresh session.
pub const DEFAULT_COMPARISON_TOLERANCE: f64 = 1e-14;
/// Largest comparison tolerance `⎕CT` accepts.
pub const MAX_COMPARISON_TOLERANCE: f64 = 1e-8;
/// Largest print precision `⎕PP` accepts.
pub const MAX_PRINT_PRECISION: usize = 17;
/// Default limit on nested function calls.
pub const DEFAULT_MAX_DEPTH: usize = 256;
/// Default limit on how deeply expressions may nest, both in the source and
/// during evaluation.
pub const DEFAULT_MAX_NESTING: usize = 4_096;
/// Default limit on iterations of the power operator with a convergence test.
pub const DEFAULT_MAX_POWER_ITERATIONS: usize = 10_000;

/// Settings a session starts with.
///
/// The first three fields seed the system variables `⎕IO`, `⎕CT` and `⎕PP`;
/// programs may change those later by assignment. The limits are fixed for
/// the lifetime of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Initial `⎕IO`: 0 or 1.
    pub index_origin:         usize,
    /// Initial `⎕CT`.
    pub comparison_tolerance: f64,
    /// Initial `⎕PP`: significant digits used when printing.
    pub print_precision:      usize,
    /// Maximum nesting of user-defined function calls.
    pub max_depth:            usize,
    /// Maximum nesting of expressions. The parser rejects deeper programs
    /// and the evaluator stops when calls nest expressions deeper than this.
    pub max_nesting:          usize,
    /// Maximum iterations of `f⍣g` before it gives up.
    pub max_power_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { index_origin:         DEFAULT_INDEX_ORIGIN,
               comparison_tolerance: DEFAULT_COMPARISON_TOLERANCE,
               print_precision:      DEFAULT_PRINT_PRECISION,
               max_depth:            DEFAULT_MAX_DEPTH,
               max_nesting:          DEFAULT_MAX_NESTING,
               max_power_iterations: DEFAULT_MAX_POWER_ITERATIONS, }
    }
}
