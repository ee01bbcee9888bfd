use crate::{
    ast::{Axis, Position, Primitive},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            pervade::{pervade_dyadic, pervade_monadic},
            structural,
            system::Settings,
        },
        value::core::{Array, Element},
    },
};

fn valence_error(primitive: Primitive, valence: &str, position: Position) -> RuntimeError {
    RuntimeError::ArityMismatch { details: format!("{primitive} cannot be applied {valence}"),
                                  position }
}

impl Primitive {
    /// Applies the primitive to a single argument.
    ///
    /// Scalar functions go through the pervasion engine; the rest are
    /// structural.
    ///
    /// # Errors
    /// Returns `ArityMismatch` for primitives without a monadic form, and
    /// whatever the primitive itself raises.
    ///
    /// # Example
    /// ```
    /// use aplite::{
    ///     ast::{Position, Primitive},
    ///     interpreter::{evaluator::system::Settings, value::core::Array},
    /// };
    ///
    /// let settings = Settings::default();
    /// let r = Primitive::Iota.apply_monadic(&Array::real(3.0), &settings, Position::default())
    ///                        .unwrap();
    /// assert_eq!(r, Array::from_reals([1.0, 2.0, 3.0]));
    /// ```
    pub fn apply_monadic(self,
                         omega: &Array,
                         settings: &Settings,
                         position: Position)
                         -> EvalResult<Array> {
        if self.is_pervasive_monadic() {
            return pervade_monadic(omega, &|w| self.scalar_monadic(w, settings, position));
        }
        match self {
            Self::Rho => structural::shape(omega, position),
            Self::Iota => structural::iota(omega, settings, position),
            Self::Comma => Ok(omega.ravel()),
            Self::Rotate => structural::reverse(omega, Axis::Last),
            Self::RotateFirst => structural::reverse(omega, Axis::First),
            Self::Transpose => structural::transpose(omega),
            Self::Enclose => Ok(omega.clone().enclose()),
            Self::First => Ok(structural::first(omega)),
            Self::Right | Self::Left => Ok(omega.clone()),
            Self::Match => structural::depth(omega, position),
            Self::NotMatch => structural::tally(omega, position),
            _ => Err(valence_error(self, "monadically", position)),
        }
    }

    /// Applies the primitive to two arguments.
    ///
    /// # Errors
    /// Returns `ArityMismatch` for primitives without a dyadic form,
    /// `ShapeMismatch` when pervasive arguments do not conform, and whatever
    /// the primitive itself raises.
    pub fn apply_dyadic(self,
                        alpha: &Array,
                        omega: &Array,
                        settings: &Settings,
                        position: Position)
                        -> EvalResult<Array> {
        if self.is_pervasive_dyadic() {
            return pervade_dyadic(alpha, omega, position, &|a, w| {
                       self.scalar_dyadic(a, w, settings, position)
                   });
        }
        match self {
            Self::Rho => structural::reshape(alpha, omega, position),
            Self::Iota => structural::index_of(alpha, omega, settings, position),
            Self::Comma => structural::catenate(alpha, omega, position),
            Self::Rotate => structural::rotate(alpha, omega, Axis::Last, position),
            Self::RotateFirst => structural::rotate(alpha, omega, Axis::First, position),
            Self::Take => structural::take(alpha, omega, position),
            Self::Drop => structural::drop(alpha, omega, position),
            Self::Right => Ok(omega.clone()),
            Self::Left => Ok(alpha.clone()),
            Self::Match => Ok(structural::matches(alpha, omega, settings)),
            Self::NotMatch => {
                let matched = structural::matches(alpha, omega, settings);
                let negated = !matched.elements()[0].as_boolean(position)?;
                Ok(Array::scalar(Element::boolean(negated)))
            },
            Self::Tilde => structural::without(alpha, omega, settings, position),
            _ => Err(valence_error(self, "dyadically", position)),
        }
    }
}
