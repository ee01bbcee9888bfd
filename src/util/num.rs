use crate::{ast::Position, error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;
/// Largest signed integer exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_I64_INT: i64 = 9_007_199_254_740_991;
/// How far a real may stray from the nearest integer and still be accepted
/// where an integer is required.
pub const INTEGER_TOLERANCE: f64 = 1e-10;

/// Safely converts a `usize` to `f64` if and only if it is exactly
/// representable.
///
/// # Errors
/// Returns a `DomainError` if the value exceeds `MAX_SAFE_U64_INT`.
///
/// # Example
/// ```
/// use aplite::{ast::Position, util::num::usize_to_f64_checked};
///
/// let val = usize_to_f64_checked(100, Position::default()).unwrap();
/// assert_eq!(val, 100.0);
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn usize_to_f64_checked(value: usize, position: Position) -> EvalResult<f64> {
    if value as u64 > MAX_SAFE_U64_INT {
        return Err(RuntimeError::domain(format!("{value} is too large to represent exactly"),
                                        position));
    }

    Ok(value as f64)
}

/// Converts an `f64` to `i64` if the value is finite, within range, and
/// integral to within [`INTEGER_TOLERANCE`].
///
/// # Errors
/// Returns a `DomainError` for non-finite, out-of-range, or fractional values.
///
/// # Example
/// ```
/// use aplite::{ast::Position, error::ErrorKind, util::num::f64_to_i64_checked};
///
/// let p = Position::default();
/// assert_eq!(f64_to_i64_checked(1000.0, p).unwrap(), 1000);
/// assert_eq!(f64_to_i64_checked(2.999_999_999_999, p).unwrap(), 3);
///
/// let err = f64_to_i64_checked(1.5, p).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::DomainError);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64, position: Position) -> EvalResult<i64> {
    if !value.is_finite() {
        return Err(RuntimeError::domain(format!("cannot use {value} as an integer"), position));
    }
    let rounded = value.round();
    if rounded.abs() > MAX_SAFE_I64_INT as f64 {
        return Err(RuntimeError::domain(format!("{value} is too large to use as an integer"),
                                        position));
    }
    if (value - rounded).abs() > INTEGER_TOLERANCE {
        return Err(RuntimeError::domain(format!("{value} is not an integer"), position));
    }
    Ok(rounded as i64)
}

/// Converts an `f64` to a non-negative `usize`, as needed for shapes and
/// counts.
///
/// # Errors
/// Returns a `DomainError` for negative, non-finite or fractional values.
///
/// # Example
/// ```
/// use aplite::{ast::Position, util::num::f64_to_usize_checked};
///
/// let p = Position::default();
/// assert_eq!(f64_to_usize_checked(7.0, p).unwrap(), 7);
/// assert!(f64_to_usize_checked(-5.0, p).is_err());
/// ```
pub fn f64_to_usize_checked(value: f64, position: Position) -> EvalResult<usize> {
    i64_to_usize_checked(f64_to_i64_checked(value, position)?, position)
}

/// Converts an `i64` to a `usize` if and only if it can be represented
/// exactly.
///
/// # Errors
/// Returns a `DomainError` if the value is negative or exceeds the maximum
/// representable `usize`.
///
/// # Example
/// ```
/// use aplite::{ast::Position, util::num::i64_to_usize_checked};
///
/// assert_eq!(i64_to_usize_checked(42, Position::default()).unwrap(), 42);
/// assert!(i64_to_usize_checked(-1, Position::default()).is_err());
/// ```
pub fn i64_to_usize_checked(value: i64, position: Position) -> EvalResult<usize> {
    usize::try_from(value).map_err(|_| {
                              RuntimeError::domain(format!("{value} is not a valid length"),
                                                   position)
                          })
}
