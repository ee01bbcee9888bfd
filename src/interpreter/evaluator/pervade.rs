use crate::{
    ast::Position,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{Array, Element},
    },
};

/// Lifts a scalar function over an array.
///
/// `f` is applied to every simple scalar; boxed elements are descended into,
/// so the shape and nesting structure of `omega` is preserved exactly.
///
/// # Parameters
/// - `omega`: The argument.
/// - `f`: The scalar function. It never sees a boxed element.
///
/// # Example
/// ```
/// use aplite::interpreter::{
///     evaluator::pervade::pervade_monadic,
///     value::core::{Array, Element},
/// };
///
/// let v = Array::from_reals([1.0, -2.0]);
/// let r = pervade_monadic(&v, &|e| Ok(Element::real(-e.as_real(Default::default())?)))
///     .unwrap();
/// assert_eq!(r, Array::from_reals([-1.0, 2.0]));
/// ```
pub fn pervade_monadic<F>(omega: &Array, f: &F) -> EvalResult<Array>
    where F: Fn(&Element) -> EvalResult<Element>
{
    let elements = omega.elements()
                        .iter()
                        .map(|e| monadic_element(e, f))
                        .collect::<EvalResult<Vec<_>>>()?;
    Ok(Array::from_parts(omega.shape().to_vec(), elements))
}

fn monadic_element<F>(element: &Element, f: &F) -> EvalResult<Element>
    where F: Fn(&Element) -> EvalResult<Element>
{
    match element {
        Element::Boxed(inner) => Ok(pervade_monadic(inner, f)?.into_item()),
        simple => f(simple),
    }
}

/// Lifts a scalar function over two arrays.
///
/// This is the single conformability routine behind every pervasive dyadic
/// primitive:
/// - Scalar with scalar: `f` is applied directly.
/// - Scalar with array: the scalar is paired with every element (scalar
///   extension).
/// - Array with array: shapes must be identical; elements are paired
///   position by position.
///
/// Boxed elements recurse by the same rules, bottoming out at simple scalars.
///
/// # Parameters
/// - `alpha`: Left argument.
/// - `omega`: Right argument.
/// - `position`: Where the function was applied, for error reporting.
/// - `f`: The scalar function. It never sees a boxed element.
///
/// # Errors
/// Returns `ShapeMismatch` if two non-scalar arrays at the same nesting level
/// have different shapes, or any error `f` produces.
///
/// # Example
/// ```
/// use aplite::{
///     ast::Position,
///     interpreter::{
///         evaluator::pervade::pervade_dyadic,
///         value::core::{Array, Element},
///     },
/// };
///
/// let p = Position::default();
/// let add = |a: &Element, b: &Element| Ok(Element::real(a.as_real(p)? + b.as_real(p)?));
///
/// let r = pervade_dyadic(&Array::real(3.0), &Array::from_reals([1.0, 2.0, 3.0]), p, &add).unwrap();
/// assert_eq!(r, Array::from_reals([4.0, 5.0, 6.0]));
///
/// let short = Array::from_reals([1.0, 2.0]);
/// let long = Array::from_reals([1.0, 2.0, 3.0]);
/// assert!(pervade_dyadic(&short, &long, p, &add).is_err());
/// ```
pub fn pervade_dyadic<F>(alpha: &Array, omega: &Array, position: Position, f: &F) -> EvalResult<Array>
    where F: Fn(&Element, &Element) -> EvalResult<Element>
{
    let (shape, elements) = match (alpha.is_scalar(), omega.is_scalar()) {
        // Scalar with scalar, and scalar with array
        (true, _) => {
            let left = &alpha.elements()[0];
            let elements = omega.elements()
                                .iter()
                                .map(|r| dyadic_element(left, r, position, f))
                                .collect::<EvalResult<Vec<_>>>()?;
            (omega.shape().to_vec(), elements)
        },

        // Array with scalar
        (false, true) => {
            let right = &omega.elements()[0];
            let elements = alpha.elements()
                                .iter()
                                .map(|l| dyadic_element(l, right, position, f))
                                .collect::<EvalResult<Vec<_>>>()?;
            (alpha.shape().to_vec(), elements)
        },

        // Array with array
        (false, false) => {
            if alpha.shape() != omega.shape() {
                return Err(RuntimeError::shapes(alpha.shape(), omega.shape(), position));
            }
            let elements = alpha.elements()
                                .iter()
                                .zip(omega.elements())
                                .map(|(l, r)| dyadic_element(l, r, position, f))
                                .collect::<EvalResult<Vec<_>>>()?;
            (alpha.shape().to_vec(), elements)
        },
    };
    Ok(Array::from_parts(shape, elements))
}

fn dyadic_element<F>(left: &Element, right: &Element, position: Position, f: &F) -> EvalResult<Element>
    where F: Fn(&Element, &Element) -> EvalResult<Element>
{
    match (left, right) {
        (Element::Boxed(l), Element::Boxed(r)) => Ok(pervade_dyadic(l, r, position, f)?.into_item()),
        (Element::Boxed(l), simple) => {
            Ok(pervade_dyadic(l, &Array::scalar(simple.clone()), position, f)?.into_item())
        },
        (simple, Element::Boxed(r)) => {
            Ok(pervade_dyadic(&Array::scalar(simple.clone()), r, position, f)?.into_item())
        },
        (l, r) => f(l, r),
    }
}
