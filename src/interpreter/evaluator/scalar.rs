use std::f64::consts::PI;

use crate::{
    ast::{Position, Primitive},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            system::Settings,
            utils::{euler_gamma, tolerant_floor, tolerantly_equal},
        },
        value::{
            complex::{ComplexNumber, ONE, ZERO},
            core::Element,
        },
    },
};

/// Largest `n` whose factorial is computed by exact multiplication.
const EXACT_FACTORIAL_LIMIT: f64 = 170.0;

impl Primitive {
    /// Whether the monadic form applies to each simple scalar independently.
    #[must_use]
    pub const fn is_pervasive_monadic(self) -> bool {
        matches!(self,
                 Self::Plus
                 | Self::Minus
                 | Self::Times
                 | Self::Divide
                 | Self::Power
                 | Self::Log
                 | Self::Stile
                 | Self::Ceiling
                 | Self::Floor
                 | Self::Factorial
                 | Self::Circle
                 | Self::Tilde)
    }

    /// Whether the dyadic form pairs up simple scalars independently.
    #[must_use]
    pub const fn is_pervasive_dyadic(self) -> bool {
        matches!(self,
                 Self::Plus
                 | Self::Minus
                 | Self::Times
                 | Self::Divide
                 | Self::Power
                 | Self::Log
                 | Self::Stile
                 | Self::Ceiling
                 | Self::Floor
                 | Self::Factorial
                 | Self::Circle
                 | Self::Less
                 | Self::LessEqual
                 | Self::Equal
                 | Self::GreaterEqual
                 | Self::Greater
                 | Self::NotEqual
                 | Self::And
                 | Self::Or
                 | Self::Nand
                 | Self::Nor)
    }

    /// The value reducing an empty axis with this function produces, if the
    /// function has one.
    ///
    /// # Example
    /// ```
    /// use aplite::ast::Primitive;
    ///
    /// assert_eq!(Primitive::Plus.identity(), Some(0.0));
    /// assert_eq!(Primitive::Times.identity(), Some(1.0));
    /// assert_eq!(Primitive::Nand.identity(), None);
    /// ```
    #[must_use]
    pub const fn identity(self) -> Option<f64> {
        match self {
            Self::Plus
            | Self::Minus
            | Self::Stile
            | Self::Or
            | Self::NotEqual
            | Self::Less
            | Self::Greater => Some(0.0),
            Self::Times
            | Self::Divide
            | Self::Power
            | Self::Factorial
            | Self::And
            | Self::Equal
            | Self::LessEqual
            | Self::GreaterEqual => Some(1.0),
            Self::Ceiling => Some(-f64::MAX),
            Self::Floor => Some(f64::MAX),
            _ => None,
        }
    }

    /// Applies the monadic scalar function to one simple scalar.
    pub fn scalar_monadic(self,
                          omega: &Element,
                          settings: &Settings,
                          position: Position)
                          -> EvalResult<Element> {
        let w = omega.as_number(position)?;
        let result = match self {
            Self::Plus => w.conj(),
            Self::Minus => -w,
            Self::Times => {
                if w == ZERO {
                    ZERO
                } else {
                    w / ComplexNumber::from(w.abs())
                }
            },
            Self::Divide => {
                if w == ZERO {
                    return Err(RuntimeError::domain("reciprocal of zero", position));
                }
                w.recip()
            },
            Self::Power => w.exp(),
            Self::Log => {
                if w == ZERO {
                    return Err(RuntimeError::domain("logarithm of zero", position));
                }
                w.ln()
            },
            Self::Stile => ComplexNumber::from(w.abs()),
            Self::Floor => {
                ComplexNumber::from(tolerant_floor(w.real_part(position)?,
                                                   settings.comparison_tolerance))
            },
            Self::Ceiling => {
                ComplexNumber::from(-tolerant_floor(-w.real_part(position)?,
                                                    settings.comparison_tolerance))
            },
            Self::Factorial => ComplexNumber::from(factorial(w.real_part(position)?, position)?),
            Self::Circle => w * ComplexNumber::from(PI),
            Self::Tilde => return Ok(Element::boolean(!omega.as_boolean(position)?)),
            _ => return Err(not_scalar(self, position)),
        };
        finish(result, position)
    }

    /// Applies the dyadic scalar function to one pair of simple scalars.
    pub fn scalar_dyadic(self,
                         alpha: &Element,
                         omega: &Element,
                         settings: &Settings,
                         position: Position)
                         -> EvalResult<Element> {
        let tolerance = settings.comparison_tolerance;
        match self {
            Self::Equal => return Ok(Element::boolean(scalars_equal(alpha, omega, tolerance))),
            Self::NotEqual => return Ok(Element::boolean(!scalars_equal(alpha, omega, tolerance))),
            Self::And | Self::Or | Self::Nand | Self::Nor => {
                let (a, w) = (alpha.as_boolean(position)?, omega.as_boolean(position)?);
                let result = match self {
                    Self::And => a && w,
                    Self::Or => a || w,
                    Self::Nand => !(a && w),
                    _ => !(a || w),
                };
                return Ok(Element::boolean(result));
            },
            Self::Less | Self::LessEqual | Self::GreaterEqual | Self::Greater => {
                let (a, w) = (alpha.as_real(position)?, omega.as_real(position)?);
                let equal = tolerantly_equal(a.into(), w.into(), tolerance);
                let result = match self {
                    Self::Less => a < w && !equal,
                    Self::LessEqual => a < w || equal,
                    Self::GreaterEqual => a > w || equal,
                    _ => a > w && !equal,
                };
                return Ok(Element::boolean(result));
            },
            _ => {},
        }

        let a = alpha.as_number(position)?;
        let w = omega.as_number(position)?;
        let result = match self {
            Self::Plus => a + w,
            Self::Minus => a - w,
            Self::Times => a * w,
            Self::Divide => divide(a, w, position)?,
            Self::Power => power(a, w, position)?,
            Self::Log => logarithm(a, w, position)?,
            Self::Stile => {
                residue(a.real_part(position)?, w.real_part(position)?, tolerance).into()
            },
            Self::Ceiling => a.real_part(position)?.max(w.real_part(position)?).into(),
            Self::Floor => a.real_part(position)?.min(w.real_part(position)?).into(),
            Self::Factorial => {
                binomial(a.real_part(position)?, w.real_part(position)?, position)?.into()
            },
            Self::Circle => circular(a, w, position)?,
            _ => return Err(not_scalar(self, position)),
        };
        finish(result, position)
    }
}

fn not_scalar(primitive: Primitive, position: Position) -> RuntimeError {
    RuntimeError::domain(format!("{primitive} is not a scalar function"), position)
}

fn finish(result: ComplexNumber, position: Position) -> EvalResult<Element> {
    if result.real.is_nan() || result.imaginary.is_nan() {
        return Err(RuntimeError::domain("result is not a number", position));
    }
    if !result.is_finite() {
        return Err(RuntimeError::domain("result is out of range", position));
    }
    Ok(Element::Number(result.cleaned()))
}

fn scalars_equal(alpha: &Element, omega: &Element, tolerance: f64) -> bool {
    match (alpha, omega) {
        (Element::Number(a), Element::Number(w)) => tolerantly_equal(*a, *w, tolerance),
        (Element::Char(a), Element::Char(w)) => a == w,
        _ => false,
    }
}

fn divide(a: ComplexNumber, w: ComplexNumber, position: Position) -> EvalResult<ComplexNumber> {
    if w == ZERO {
        if a == ZERO {
            return Ok(ONE);
        }
        return Err(RuntimeError::domain("division by zero", position));
    }
    Ok(a / w)
}

fn power(a: ComplexNumber, w: ComplexNumber, position: Position) -> EvalResult<ComplexNumber> {
    if w.is_real() && w.real.fract() == 0.0 && w.real.abs() <= f64::from(i32::MAX) {
        #[allow(clippy::cast_possible_truncation)]
        return a.checked_powi(w.real as i64, position);
    }
    if a == ZERO && w.real < 0.0 {
        return Err(RuntimeError::domain("zero cannot be raised to a negative power", position));
    }
    if a.is_real() && a.real >= 0.0 && w.is_real() {
        return Ok(a.real.powf(w.real).into());
    }
    Ok(a.powc(w))
}

fn logarithm(base: ComplexNumber,
             w: ComplexNumber,
             position: Position)
             -> EvalResult<ComplexNumber> {
    if base == ZERO || w == ZERO {
        return Err(RuntimeError::domain("logarithm of zero", position));
    }
    if base == ONE {
        if w == ONE {
            return Ok(ONE);
        }
        return Err(RuntimeError::domain("logarithm to base 1", position));
    }
    if base.is_real() && w.is_real() && base.real > 0.0 && w.real > 0.0 {
        return Ok(w.real.log(base.real).into());
    }
    Ok(w.ln() / base.ln())
}

/// `a | w`: the remainder of `w` divided by `a`, taking the sign of `a`.
fn residue(a: f64, w: f64, tolerance: f64) -> f64 {
    if a == 0.0 {
        return w;
    }
    let quotient = w / a;
    let floor = tolerant_floor(quotient, tolerance);
    if (quotient - floor).abs() <= tolerance * quotient.abs().max(1.0) {
        0.0
    } else {
        a.mul_add(-floor, w)
    }
}

/// `!w`, the gamma function shifted by one.
fn factorial(w: f64, position: Position) -> EvalResult<f64> {
    if w >= 0.0 && w.fract() == 0.0 && w <= EXACT_FACTORIAL_LIMIT {
        let mut result = 1.0;
        let mut k = 2.0;
        while k <= w {
            result *= k;
            k += 1.0;
        }
        return Ok(result);
    }
    euler_gamma(w + 1.0, position)
}

/// `a ! w`, the number of ways to choose `a` items from `w`.
fn binomial(a: f64, w: f64, position: Position) -> EvalResult<f64> {
    let integral = a.fract() == 0.0 && w.fract() == 0.0;
    if integral && a >= 0.0 && w >= 0.0 {
        if a > w {
            return Ok(0.0);
        }
        let k = a.min(w - a);
        let mut result = 1.0;
        let mut i = 1.0;
        while i <= k {
            result = result * (w - k + i) / i;
            i += 1.0;
        }
        return Ok(result.round());
    }
    if integral && w < 0.0 && a >= 0.0 {
        // Upper negation: (-n choose k) = (-1)^k (n+k-1 choose k).
        #[allow(clippy::cast_possible_truncation)]
        let sign = if (a as i64) % 2 == 0 { 1.0 } else { -1.0 };
        return Ok(sign * binomial(a, a - w - 1.0, position)?);
    }
    let numerator = euler_gamma(w + 1.0, position)?;
    let left = euler_gamma(a + 1.0, position).map_err(|_| {
                                                  RuntimeError::domain(format!("{a}!{w} is undefined"), position)
                                              })?;
    let right = match euler_gamma(w - a + 1.0, position) {
        Ok(value) => value,
        // Γ has a pole here, so the quotient is zero.
        Err(_) => return Ok(0.0),
    };
    Ok(numerator / (left * right))
}

/// `a ○ w`: the circular, hyperbolic and Pythagorean function family.
fn circular(a: ComplexNumber, w: ComplexNumber, position: Position) -> EvalResult<ComplexNumber> {
    let selector = Element::Number(a).as_integer(position)?;
    let one = ONE;
    let result = match selector {
        0 => (one - w * w).sqrt(),
        1 => w.sin(),
        2 => w.cos(),
        3 => w.tan(),
        4 => (one + w * w).sqrt(),
        5 => w.sinh(),
        6 => w.cosh(),
        7 => w.tanh(),
        -4 => {
            if w == -one {
                ZERO
            } else {
                (w + one) * ((w - one) / (w + one)).sqrt()
            }
        },
        -1 | -2 | -3 | -5 | -6 | -7 => {
            let x = w.real_part(position)?;
            let value = match selector {
                -1 => x.asin(),
                -2 => x.acos(),
                -3 => x.atan(),
                -5 => x.asinh(),
                -6 => x.acosh(),
                _ => x.atanh(),
            };
            ComplexNumber::from(value)
        },
        other => {
            return Err(RuntimeError::domain(format!("{other} is not a circular function selector"),
                                            position));
        },
    };
    Ok(result)
}
