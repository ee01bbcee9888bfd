//! Non-pervasive primitives: functions that work on whole arrays and their
//! shapes rather than on individual scalars.

use crate::{
    ast::{Axis, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            system::Settings,
            utils::{arrays_match, elements_match, strides},
        },
        value::core::{Array, Element},
    },
    util::num::{i64_to_usize_checked, usize_to_f64_checked},
};

/// Converts a flat row-major index into one index per axis.
fn unravel(mut flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut index = vec![0; shape.len()];
    for axis in (0..shape.len()).rev() {
        if shape[axis] > 0 {
            index[axis] = flat % shape[axis];
            flat /= shape[axis];
        }
    }
    index
}

/// Converts one index per axis into a flat row-major index.
fn ravel_index(index: &[usize], strides: &[usize]) -> usize {
    index.iter().zip(strides).map(|(i, s)| i * s).sum()
}

fn to_i64(value: usize, position: Position) -> EvalResult<i64> {
    i64::try_from(value).map_err(|_| RuntimeError::domain(format!("{value} is too large"), position))
}

/// Builds an array of `shape` by computing each element from its index.
fn tabulate<F>(shape: Vec<usize>, mut element_at: F) -> EvalResult<Array>
    where F: FnMut(&[usize]) -> EvalResult<Element>
{
    let size: usize = shape.iter().product();
    let elements = (0..size).map(|flat| element_at(&unravel(flat, &shape)))
                            .collect::<EvalResult<Vec<_>>>()?;
    Ok(Array::from_parts(shape, elements))
}

/// `⍴ω`
pub fn shape(omega: &Array, position: Position) -> EvalResult<Array> {
    Array::from_lengths(omega.shape(), position)
}

/// `α⍴ω`
pub fn reshape(alpha: &Array, omega: &Array, position: Position) -> EvalResult<Array> {
    omega.reshape(alpha.as_lengths(position)?, position)
}

/// `⍳ω`
///
/// A scalar gives the first `ω` indices starting at `⎕IO`. A vector gives an
/// array of shape `ω` whose items are index vectors.
pub fn iota(omega: &Array, settings: &Settings, position: Position) -> EvalResult<Array> {
    let origin = settings.index_origin;
    if omega.is_scalar() {
        let count = omega.as_lengths(position)?[0];
        return (0..count).map(|i| usize_to_f64_checked(i + origin, position).map(Element::real))
                         .collect::<EvalResult<Vec<_>>>()
                         .map(Array::vector);
    }
    let dims = omega.as_lengths(position)?;
    tabulate(dims, |index| {
        let items = index.iter()
                         .map(|&i| usize_to_f64_checked(i + origin, position).map(Element::real))
                         .collect::<EvalResult<Vec<_>>>()?;
        Ok(Array::vector(items).into_item())
    })
}

/// `α⍳ω`: for each item of `ω`, where it first occurs in the vector `α`, or
/// one past the end of `α` if it does not.
pub fn index_of(alpha: &Array,
                omega: &Array,
                settings: &Settings,
                position: Position)
                -> EvalResult<Array> {
    if alpha.rank() > 1 {
        return Err(RuntimeError::domain("the left argument of ⍳ must be a vector", position));
    }
    let tolerance = settings.comparison_tolerance;
    let elements = omega.elements()
                        .iter()
                        .map(|item| {
                            let found = alpha.elements()
                                             .iter()
                                             .position(|a| elements_match(a, item, tolerance))
                                             .unwrap_or(alpha.size());
                            usize_to_f64_checked(found + settings.index_origin, position).map(Element::real)
                        })
                        .collect::<EvalResult<Vec<_>>>()?;
    Ok(Array::from_parts(omega.shape().to_vec(), elements))
}

/// `α,ω`: joins two arrays along their last axis.
///
/// Scalars are extended to fill the joined axis, and an array one rank short
/// is treated as having a last axis of length one.
pub fn catenate(alpha: &Array, omega: &Array, position: Position) -> EvalResult<Array> {
    if alpha.is_scalar() && omega.is_scalar() {
        return Ok(Array::vector(vec![alpha.elements()[0].clone(), omega.elements()[0].clone()]));
    }
    let rank = alpha.rank().max(omega.rank());
    let left = catenand(alpha, omega, rank, position)?;
    let right = catenand(omega, alpha, rank, position)?;

    let frame = &left.shape()[..rank - 1];
    if frame != &right.shape()[..rank - 1] {
        return Err(RuntimeError::shapes(alpha.shape(), omega.shape(), position));
    }
    let left_width = left.shape()[rank - 1];
    let right_width = right.shape()[rank - 1];
    let rows: usize = frame.iter().product();

    let mut elements = Vec::with_capacity(left.size() + right.size());
    for row in 0..rows {
        elements.extend_from_slice(&left.elements()[row * left_width..(row + 1) * left_width]);
        elements.extend_from_slice(&right.elements()[row * right_width..(row + 1) * right_width]);
    }
    let mut shape = frame.to_vec();
    shape.push(left_width + right_width);
    Ok(Array::from_parts(shape, elements))
}

fn catenand(array: &Array, other: &Array, rank: usize, position: Position) -> EvalResult<Array> {
    if array.rank() == rank {
        return Ok(array.clone());
    }
    if array.is_scalar() {
        let mut shape = other.shape()[..rank - 1].to_vec();
        shape.push(1);
        return Ok(Array::filled(shape, &array.elements()[0]));
    }
    if array.rank() + 1 == rank {
        let mut shape = array.shape().to_vec();
        shape.push(1);
        return array.reshape(shape, position);
    }
    Err(RuntimeError::shapes(array.shape(), other.shape(), position))
}

const fn axis_index(axis: Axis, rank: usize) -> usize {
    match axis {
        Axis::First => 0,
        Axis::Last => rank - 1,
    }
}

/// `⌽ω` and `⊖ω`
pub fn reverse(omega: &Array, axis: Axis) -> EvalResult<Array> {
    if omega.is_scalar() {
        return Ok(omega.clone());
    }
    let ax = axis_index(axis, omega.rank());
    let length = omega.shape()[ax];
    let strides = strides(omega.shape());
    tabulate(omega.shape().to_vec(), |index| {
        let mut source = index.to_vec();
        source[ax] = length - 1 - index[ax];
        Ok(omega.elements()[ravel_index(&source, &strides)].clone())
    })
}

/// `α⌽ω` and `α⊖ω`
///
/// `α` is either a single count applied to every vector along the axis, or
/// an array with the shape of `ω` without that axis giving one count per
/// vector.
pub fn rotate(alpha: &Array, omega: &Array, axis: Axis, position: Position) -> EvalResult<Array> {
    if omega.is_scalar() {
        alpha.single(position)?.as_integer(position)?;
        return Ok(omega.clone());
    }
    let ax = axis_index(axis, omega.rank());
    let mut frame = omega.shape().to_vec();
    let length = frame.remove(ax);
    let counts = if alpha.size() == 1 {
        vec![alpha.elements()[0].as_integer(position)?]
    } else if alpha.shape() == frame.as_slice() {
        alpha.elements()
             .iter()
             .map(|e| e.as_integer(position))
             .collect::<EvalResult<Vec<_>>>()?
    } else {
        return Err(RuntimeError::shapes(alpha.shape(), omega.shape(), position));
    };
    if length == 0 {
        return Ok(omega.clone());
    }
    let length_i64 = to_i64(length, position)?;
    let frame_strides = strides(&frame);
    let strides = strides(omega.shape());
    tabulate(omega.shape().to_vec(), |index| {
        let mut cell = index.to_vec();
        cell.remove(ax);
        let count = if counts.len() == 1 {
            counts[0]
        } else {
            counts[ravel_index(&cell, &frame_strides)]
        };
        let mut source = index.to_vec();
        let shifted = (to_i64(index[ax], position)? + count).rem_euclid(length_i64);
        source[ax] = i64_to_usize_checked(shifted, position)?;
        Ok(omega.elements()[ravel_index(&source, &strides)].clone())
    })
}

/// `⍉ω`: reverses the order of the axes.
///
/// # Example
/// ```
/// use aplite::{
///     ast::Position,
///     interpreter::{evaluator::structural::transpose, value::core::Array},
/// };
///
/// let p = Position::default();
/// let m = Array::from_reals([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).reshape(vec![2, 3], p).unwrap();
/// let t = transpose(&m).unwrap();
/// assert_eq!(t.shape(), &[3, 2]);
/// assert_eq!(t.ravel(), Array::from_reals([1.0, 4.0, 2.0, 5.0, 3.0, 6.0]));
/// ```
pub fn transpose(omega: &Array) -> EvalResult<Array> {
    if omega.rank() < 2 {
        return Ok(omega.clone());
    }
    let shape: Vec<usize> = omega.shape().iter().rev().copied().collect();
    let strides = strides(omega.shape());
    tabulate(shape, |index| {
        let source: Vec<usize> = index.iter().rev().copied().collect();
        Ok(omega.elements()[ravel_index(&source, &strides)].clone())
    })
}

/// `⊃ω`: the first item, disclosed. An empty array yields its prototype.
#[must_use]
pub fn first(omega: &Array) -> Array {
    omega.elements()
         .first()
         .map_or_else(|| omega.prototype().to_array(), Element::to_array)
}

/// Brings `ω` up to at least `rank` axes by prepending axes of length one.
fn lift_rank(omega: &Array, rank: usize, position: Position) -> EvalResult<Array> {
    if omega.rank() >= rank {
        return Ok(omega.clone());
    }
    let mut shape = vec![1; rank - omega.rank()];
    shape.extend_from_slice(omega.shape());
    omega.reshape(shape, position)
}

fn take_drop_counts(alpha: &Array, omega: &Array, position: Position) -> EvalResult<(Vec<i64>, Array)> {
    let counts = alpha.as_integers(position)?;
    let omega = lift_rank(omega, counts.len(), position)?;
    if counts.len() > omega.rank() {
        return Err(RuntimeError::ShapeMismatch { details: format!("{} counts for an array of rank {}",
                                                                  counts.len(),
                                                                  omega.rank()),
                                                 position });
    }
    Ok((counts, omega))
}

/// `α↑ω`: takes `|α[i]|` items along leading axis `i`, from the front for
/// positive counts and from the back for negative ones. Taking more items
/// than exist pads with the prototype.
pub fn take(alpha: &Array, omega: &Array, position: Position) -> EvalResult<Array> {
    let (counts, omega) = take_drop_counts(alpha, omega, position)?;
    let source_shape = omega.shape().to_vec();
    let mut shape = source_shape.clone();
    let mut offsets = vec![0_i64; shape.len()];
    for (axis, &count) in counts.iter().enumerate() {
        shape[axis] = i64_to_usize_checked(count.abs(), position)?;
        if count < 0 {
            offsets[axis] = to_i64(source_shape[axis], position)? - count.abs();
        }
    }
    let fill = omega.prototype();
    let strides = strides(&source_shape);
    tabulate(shape, |index| {
        let mut source = Vec::with_capacity(index.len());
        for (axis, &i) in index.iter().enumerate() {
            match usize::try_from(to_i64(i, position)? + offsets[axis]) {
                Ok(s) if s < source_shape[axis] => source.push(s),
                _ => return Ok(fill.clone()),
            }
        }
        Ok(omega.elements()[ravel_index(&source, &strides)].clone())
    })
}

/// `α↓ω`: drops `|α[i]|` items along leading axis `i`, from the front for
/// positive counts and from the back for negative ones.
pub fn drop(alpha: &Array, omega: &Array, position: Position) -> EvalResult<Array> {
    let (counts, omega) = take_drop_counts(alpha, omega, position)?;
    let mut shape = omega.shape().to_vec();
    let mut offsets = vec![0; shape.len()];
    for (axis, &count) in counts.iter().enumerate() {
        let dropped = i64_to_usize_checked(count.abs(), position)?;
        shape[axis] = shape[axis].saturating_sub(dropped);
        if count > 0 {
            offsets[axis] = dropped;
        }
    }
    let strides = strides(omega.shape());
    tabulate(shape, |index| {
        let source: Vec<usize> = index.iter().zip(&offsets).map(|(i, o)| i + o).collect();
        Ok(omega.elements()[ravel_index(&source, &strides)].clone())
    })
}

/// `≢ω`
pub fn tally(omega: &Array, position: Position) -> EvalResult<Array> {
    Ok(Array::real(usize_to_f64_checked(omega.tally(), position)?))
}

/// `≡ω`
pub fn depth(omega: &Array, position: Position) -> EvalResult<Array> {
    Ok(Array::real(usize_to_f64_checked(omega.depth(), position)?))
}

/// `α≡ω`
#[must_use]
pub fn matches(alpha: &Array, omega: &Array, settings: &Settings) -> Array {
    Array::scalar(Element::boolean(arrays_match(alpha, omega, settings.comparison_tolerance)))
}

/// `α~ω`: the items of the vector `α` that do not occur in `ω`.
pub fn without(alpha: &Array,
               omega: &Array,
               settings: &Settings,
               position: Position)
               -> EvalResult<Array> {
    if alpha.rank() > 1 {
        return Err(RuntimeError::domain("the left argument of ~ must be a vector", position));
    }
    let tolerance = settings.comparison_tolerance;
    let kept = alpha.elements()
                    .iter()
                    .filter(|a| !omega.elements().iter().any(|w| elements_match(a, w, tolerance)))
                    .cloned()
                    .collect();
    Ok(Array::vector(kept))
}
