use crate::{
    ast::Position,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            complex::ComplexNumber,
            core::{Array, Element},
        },
    },
};

/// Lanczos coefficients for `g = 7`.
const LANCZOS: [f64; 9] = [0.999_999_999_999_809_9,
                           676.520_368_121_885_1,
                           -1_259.139_216_722_402_8,
                           771.323_428_777_653_1,
                           -176.615_029_162_140_6,
                           12.507_343_278_686_905,
                           -0.138_571_095_265_720_12,
                           9.984_369_578_019_572e-6,
                           1.505_632_735_149_311_6e-7];
const LANCZOS_G: f64 = 7.0;

/// Γ(z) for real `z`, by the Lanczos approximation. Arguments below ½ go
/// through the reflection formula `Γ(z) Γ(1−z) = π / sin(πz)`.
///
/// # Errors
/// `DomainError` at the poles (zero and the negative integers).
///
/// # Example
/// ```
/// use aplite::{ast::Position, interpreter::evaluator::utils::euler_gamma};
///
/// let g = euler_gamma(5.0, Position::default()).unwrap();
/// assert!((g - 24.0).abs() < 1e-9);
/// assert!((euler_gamma(0.5, Position::default()).unwrap() - std::f64::consts::PI.sqrt()).abs() < 1e-9);
///
/// assert!(euler_gamma(-2.0, Position::default()).is_err());
/// ```
pub fn euler_gamma(z: f64, position: Position) -> EvalResult<f64> {
    use std::f64::consts::{PI, TAU};

    if z <= 0.0 && z.fract() == 0.0 {
        return Err(RuntimeError::domain(format!("gamma is undefined at {z}"), position));
    }
    if z < 0.5 {
        return Ok(PI / ((PI * z).sin() * euler_gamma(1.0 - z, position)?));
    }

    let x = z - 1.0;
    let series = LANCZOS[1..].iter()
                             .zip(1u8..)
                             .fold(LANCZOS[0], |sum, (&c, k)| sum + c / (x + f64::from(k)));
    let t = x + LANCZOS_G + 0.5;
    // t^(x+0.5) alone overflows before the product does
    let half_power = t.powf((x + 0.5) / 2.0);
    Ok(TAU.sqrt() * half_power * (-t).exp() * half_power * series)
}

/// Tolerant equality of two numbers.
///
/// Two numbers are equal when `|a − b| ≤ tolerance × max(|a|, |b|)`. A
/// tolerance of zero demands exact equality.
///
/// # Example
/// ```
/// use aplite::interpreter::{
///     evaluator::utils::tolerantly_equal, value::complex::ComplexNumber,
/// };
///
/// let a = ComplexNumber::from(1.0 + 1e-15);
/// let b = ComplexNumber::from(1.0);
/// assert!(tolerantly_equal(a, b, 1e-14));
/// assert!(!tolerantly_equal(a, b, 0.0));
/// ```
#[must_use]
pub fn tolerantly_equal(a: ComplexNumber, b: ComplexNumber, tolerance: f64) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() <= tolerance * a.abs().max(b.abs())
}

/// Tolerant floor: values within tolerance of the next integer up round to
/// it.
#[must_use]
pub fn tolerant_floor(value: f64, tolerance: f64) -> f64 {
    let nearest = value.round();
    if (value - nearest).abs() <= tolerance * value.abs().max(1.0) {
        nearest
    } else {
        value.floor()
    }
}

/// Whether two elements are the same, recursing into boxes and comparing
/// numbers tolerantly.
#[must_use]
pub fn elements_match(left: &Element, right: &Element, tolerance: f64) -> bool {
    match (left, right) {
        (Element::Number(a), Element::Number(b)) => tolerantly_equal(*a, *b, tolerance),
        (Element::Char(a), Element::Char(b)) => a == b,
        (Element::Boxed(a), Element::Boxed(b)) => arrays_match(a, b, tolerance),
        _ => false,
    }
}

/// Whether two arrays have the same shape and matching elements.
#[must_use]
pub fn arrays_match(left: &Array, right: &Array, tolerance: f64) -> bool {
    left.shape() == right.shape()
    && left.elements()
           .iter()
           .zip(right.elements())
           .all(|(a, b)| elements_match(a, b, tolerance))
}

/// Strides of a row-major layout: `strides[i]` is how far apart consecutive
/// indices along axis `i` are in the flat element vector.
///
/// # Example
/// ```
/// use aplite::interpreter::evaluator::utils::strides;
/// assert_eq!(strides(&[2, 3, 4]), vec![12, 4, 1]);
/// assert_eq!(strides(&[]), Vec::<usize>::new());
/// ```
#[must_use]
pub fn strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}
