use std::{fmt::Display, ops};

use ordered_float::OrderedFloat;

use crate::{
    ast::Position,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::display},
};

/// `0` as a complex number.
pub const ZERO: ComplexNumber = ComplexNumber::new(0.0, 0.0);
/// `1` as a complex number.
pub const ONE: ComplexNumber = ComplexNumber::new(1.0, 0.0);

/// Parts smaller than this fraction of the other part are rounding noise and
/// are flushed to zero by [`ComplexNumber::cleaned`].
const NOISE: f64 = 1e-15;

/// Represents a complex number with real and imaginary parts.
///
/// Every number in the language is a `ComplexNumber`; reals simply have a zero
/// imaginary part.
#[derive(Debug, Clone, Copy)]
pub struct ComplexNumber {
    /// The real part of the number.
    pub real:      f64,
    /// The imaginary part of the number.
    pub imaginary: f64,
}

impl Display for ComplexNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", display::format_number(*self, display::DEFAULT_PRINT_PRECISION))
    }
}

impl ComplexNumber {
    /// Constructs a new complex number from real and imaginary components.
    ///
    /// # Example
    /// ```
    /// use aplite::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(5.0, -1.0);
    /// assert_eq!(c.real, 5.0);
    /// assert_eq!(c.imaginary, -1.0);
    /// ```
    #[must_use]
    pub const fn new(real: f64, imaginary: f64) -> Self {
        Self { real, imaginary }
    }

    /// Whether the imaginary part is exactly zero.
    #[must_use]
    pub const fn is_real(&self) -> bool {
        self.imaginary == 0.0
    }

    /// Returns the real part, or a `DomainError` if the number has an
    /// imaginary component.
    pub fn real_part(self, position: Position) -> EvalResult<f64> {
        if self.is_real() {
            Ok(self.real)
        } else {
            Err(RuntimeError::domain(format!("{self} is not a real number"), position))
        }
    }

    /// Flushes a part to zero when it is negligible next to the other one.
    ///
    /// Transcendental functions routinely leave residues like `6.1E¯17` in a
    /// part that is zero mathematically. Non-finite numbers are returned
    /// unchanged.
    ///
    /// # Example
    /// ```
    /// use aplite::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(6.1e-17, 1.0).cleaned();
    /// assert_eq!(c, ComplexNumber::new(0.0, 1.0));
    /// ```
    #[must_use]
    pub fn cleaned(self) -> Self {
        if !self.is_finite() {
            return self;
        }
        let magnitude = self.real.abs().max(self.imaginary.abs());
        let flush = |part: f64| {
            if part.abs() <= NOISE * magnitude {
                0.0
            } else {
                part
            }
        };
        Self { real:      flush(self.real),
               imaginary: flush(self.imaginary), }
    }

    /// Builds a number from its magnitude and phase angle.
    #[must_use]
    pub fn from_polar(magnitude: f64, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(magnitude * cos, magnitude * sin)
    }

    /// The magnitude `|z|`.
    ///
    /// # Example
    /// ```
    /// use aplite::interpreter::value::complex::ComplexNumber;
    /// assert_eq!(ComplexNumber::new(3.0, 4.0).abs(), 5.0);
    /// ```
    #[must_use]
    pub fn abs(&self) -> f64 {
        self.real.hypot(self.imaginary)
    }

    /// The phase angle in radians, in `(-π, π]`.
    #[must_use]
    pub fn arg(self) -> f64 {
        self.imaginary.atan2(self.real)
    }

    /// The complex conjugate.
    #[must_use]
    pub const fn conj(&self) -> Self {
        Self::new(self.real, -self.imaginary)
    }

    /// `1 ÷ z`. Callers rule out zero.
    #[must_use]
    pub fn recip(&self) -> Self {
        let norm = self.real.mul_add(self.real, self.imaginary * self.imaginary);
        Self::new(self.real / norm, -self.imaginary / norm)
    }

    /// Integer power by binary exponentiation.
    ///
    /// # Errors
    /// `DomainError` for zero to a negative power, or when an intermediate
    /// product stops being finite.
    ///
    /// # Example
    /// ```
    /// use aplite::{
    ///     ast::Position,
    ///     interpreter::value::complex::{ComplexNumber, ONE},
    /// };
    /// let p = Position::default();
    /// let two = ComplexNumber::from(2.0);
    /// assert_eq!(two.checked_powi(0, p).unwrap(), ONE);
    /// assert_eq!(two.checked_powi(10, p).unwrap(), ComplexNumber::from(1024.0));
    /// assert_eq!(two.checked_powi(-1, p).unwrap(), ComplexNumber::from(0.5));
    /// assert!(ComplexNumber::from(0.0).checked_powi(-1, p).is_err());
    /// ```
    pub fn checked_powi(self, exp: i64, position: Position) -> EvalResult<Self> {
        if self == ZERO && exp < 0 {
            return Err(RuntimeError::domain("zero cannot be raised to a negative power",
                                            position));
        }
        let finite = |value: Self| {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(RuntimeError::domain("power overflowed", position))
            }
        };

        let mut result = ONE;
        let mut square = self;
        let mut remaining = exp.unsigned_abs();
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = finite(result * square)?;
            }
            remaining >>= 1;
            if remaining > 0 {
                square = finite(square * square)?;
            }
        }
        Ok(if exp < 0 { result.recip() } else { result })
    }

    /// `z` raised to the power `w`, principal branch. Zero to the zeroth
    /// power is 1; zero to any other power is 0.
    ///
    /// # Example
    /// ```
    /// use aplite::interpreter::value::complex::ComplexNumber;
    /// let root = ComplexNumber::from(4.0).powc(ComplexNumber::from(0.5));
    /// assert!((root.real - 2.0).abs() < 1e-10);
    /// assert!(root.imaginary.abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn powc(self, exp: Self) -> Self {
        match (self == ZERO, exp == ZERO) {
            (true, true) => ONE,
            (true, false) => ZERO,
            _ => (exp * self.ln()).exp(),
        }
    }

    /// The principal square root.
    ///
    /// # Example
    /// ```
    /// use aplite::interpreter::value::complex::ComplexNumber;
    /// let s = ComplexNumber::from(-9.0).sqrt();
    /// assert!(s.real.abs() < 1e-10);
    /// assert!((s.imaginary - 3.0).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn sqrt(self) -> Self {
        if self.is_real() && self.real >= 0.0 {
            return Self::from(self.real.sqrt());
        }
        Self::from_polar(self.abs().sqrt(), self.arg() / 2.0)
    }

    /// `e` raised to the power `z`.
    #[must_use]
    pub fn exp(self) -> Self {
        Self::from_polar(self.real.exp(), self.imaginary)
    }

    /// Natural logarithm, principal branch.
    ///
    /// # Example
    /// ```
    /// use aplite::interpreter::value::complex::ComplexNumber;
    /// let ln = ComplexNumber::from(-1.0).ln();
    /// assert!(ln.real.abs() < 1e-10);
    /// assert!((ln.imaginary - std::f64::consts::PI).abs() < 1e-10);
    /// ```
    #[must_use]
    pub fn ln(self) -> Self {
        Self::new(self.abs().ln(), self.arg())
    }

    #[must_use]
    pub fn sin(self) -> Self {
        let (sin, cos) = self.real.sin_cos();
        Self::new(sin * self.imaginary.cosh(), cos * self.imaginary.sinh())
    }

    #[must_use]
    pub fn cos(self) -> Self {
        let (sin, cos) = self.real.sin_cos();
        Self::new(cos * self.imaginary.cosh(), -sin * self.imaginary.sinh())
    }

    #[must_use]
    pub fn tan(self) -> Self {
        self.sin() / self.cos()
    }

    #[must_use]
    pub fn sinh(self) -> Self {
        let (sin, cos) = self.imaginary.sin_cos();
        Self::new(self.real.sinh() * cos, self.real.cosh() * sin)
    }

    #[must_use]
    pub fn cosh(self) -> Self {
        let (sin, cos) = self.imaginary.sin_cos();
        Self::new(self.real.cosh() * cos, self.real.sinh() * sin)
    }

    #[must_use]
    pub fn tanh(self) -> Self {
        self.sinh() / self.cosh()
    }

    /// Whether both parts are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.real.is_finite() && self.imaginary.is_finite()
    }
}

impl ops::Neg for ComplexNumber {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.real, -self.imaginary)
    }
}

macro_rules! componentwise {
    ($trait:ident, $method:ident, $op:tt) => {
        impl ops::$trait for ComplexNumber {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self::new(self.real $op rhs.real, self.imaginary $op rhs.imaginary)
            }
        }
    };
}

componentwise!(Add, add, +);
componentwise!(Sub, sub, -);

impl ops::Mul for ComplexNumber {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let (a, b, c, d) = (self.real, self.imaginary, rhs.real, rhs.imaginary);
        Self::new(a.mul_add(c, -(b * d)), a.mul_add(d, b * c))
    }
}

impl ops::Div for ComplexNumber {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        if rhs.is_real() {
            Self::new(self.real / rhs.real, self.imaginary / rhs.real)
        } else {
            self * rhs.recip()
        }
    }
}

impl<T> From<T> for ComplexNumber where T: Into<f64>
{
    fn from(value: T) -> Self {
        Self::new(value.into(), 0.0)
    }
}

impl PartialEq for ComplexNumber {
    fn eq(&self, other: &Self) -> bool {
        (OrderedFloat(self.real), OrderedFloat(self.imaginary))
        == (OrderedFloat(other.real), OrderedFloat(other.imaginary))
    }
}

impl Eq for ComplexNumber {}
