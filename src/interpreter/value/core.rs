use std::rc::Rc;

use crate::{
    ast::Position,
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, function::Operation},
        symbol_table::SymbolKind,
        value::complex::ComplexNumber,
    },
    util::num::{f64_to_i64_checked, f64_to_usize_checked, usize_to_f64_checked},
};

/// One cell of an array.
///
/// An element is either a simple scalar or a boxed array. Boxing is what lets
/// ragged and nested data live inside a rectangular array.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A numeric scalar.
    Number(ComplexNumber),
    /// A character scalar.
    Char(char),
    /// A nested array.
    Boxed(Array),
}

impl Element {
    /// Shorthand for a real number element.
    #[must_use]
    pub const fn real(value: f64) -> Self {
        Self::Number(ComplexNumber::new(value, 0.0))
    }

    /// Shorthand for a boolean element.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::real(if value { 1.0 } else { 0.0 })
    }

    /// Whether the element is a simple scalar, i.e. not boxed.
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        !matches!(self, Self::Boxed(_))
    }

    /// Views the element as an array in its own right.
    ///
    /// A boxed element yields the array inside; a simple scalar yields a
    /// rank-0 array holding it.
    ///
    /// # Example
    /// ```
    /// use aplite::interpreter::value::core::{Array, Element};
    ///
    /// let inner = Array::from_reals([1.0, 2.0]);
    /// assert_eq!(Element::Boxed(inner.clone()).to_array(), inner);
    /// assert_eq!(Element::real(3.0).to_array(), Array::real(3.0));
    /// ```
    #[must_use]
    pub fn to_array(&self) -> Array {
        match self {
            Self::Boxed(array) => array.clone(),
            simple => Array::scalar(simple.clone()),
        }
    }

    /// The fill element used when an array of this element's type has to be
    /// padded: a space for characters, zero otherwise.
    #[must_use]
    pub fn prototype(&self) -> Self {
        match self {
            Self::Char(_) => Self::Char(' '),
            Self::Number(_) => Self::real(0.0),
            Self::Boxed(array) => {
                let inner = array.elements().first().map_or_else(|| Self::real(0.0), Self::prototype);
                Array::filled(array.shape().to_vec(), &inner).into_item()
            },
        }
    }

    /// Returns the number held by this element.
    pub fn as_number(&self, position: Position) -> EvalResult<ComplexNumber> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Char(c) => Err(RuntimeError::domain(format!("expected a number, found '{c}'"),
                                                      position)),
            Self::Boxed(_) => {
                Err(RuntimeError::domain("expected a number, found a nested array", position))
            },
        }
    }

    /// Returns the element as a real number.
    pub fn as_real(&self, position: Position) -> EvalResult<f64> {
        self.as_number(position)?.real_part(position)
    }

    /// Returns the element as an integer.
    pub fn as_integer(&self, position: Position) -> EvalResult<i64> {
        f64_to_i64_checked(self.as_real(position)?, position)
    }

    /// Returns the element as a boolean; only `0` and `1` qualify.
    pub fn as_boolean(&self, position: Position) -> EvalResult<bool> {
        match self.as_integer(position) {
            Ok(0) => Ok(false),
            Ok(1) => Ok(true),
            _ => Err(RuntimeError::domain("expected a boolean (0 or 1)", position)),
        }
    }
}

impl From<ComplexNumber> for Element {
    fn from(value: ComplexNumber) -> Self {
        Self::Number(value)
    }
}

impl From<char> for Element {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

/// A shaped, immutable, possibly nested array.
///
/// Elements are stored flat in row-major order. The number of elements always
/// equals the product of the shape; a rank-0 array (empty shape) holds exactly
/// one element. Elements sit behind an `Rc`, so cloning an array is cheap and
/// never aliases mutable state.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    shape:    Vec<usize>,
    elements: Rc<Vec<Element>>,
}

impl Array {
    /// Creates an array from a shape and its flat elements.
    ///
    /// # Errors
    /// Returns a `ShapeMismatch` if the element count differs from the
    /// product of the shape.
    ///
    /// # Example
    /// ```
    /// use aplite::{
    ///     ast::Position,
    ///     interpreter::value::core::{Array, Element},
    /// };
    ///
    /// let elements = (1..=6).map(|n| Element::real(f64::from(n))).collect();
    /// let matrix = Array::new(vec![2, 3], elements, Position::default()).unwrap();
    /// assert_eq!(matrix.rank(), 2);
    /// assert_eq!(matrix.size(), 6);
    ///
    /// assert!(Array::new(vec![2, 2], vec![Element::real(1.0)], Position::default()).is_err());
    /// ```
    pub fn new(shape: Vec<usize>, elements: Vec<Element>, position: Position) -> EvalResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != elements.len() {
            return Err(RuntimeError::ShapeMismatch { details: format!("shape {shape:?} needs {expected} elements, found {}",
                                                                      elements.len()),
                                                     position });
        }
        Ok(Self::from_parts(shape, elements))
    }

    /// Creates an array whose element count is known to match its shape.
    pub(crate) fn from_parts(shape: Vec<usize>, elements: Vec<Element>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), elements.len());
        Self { shape,
               elements: Rc::new(elements) }
    }

    /// Creates a rank-0 array.
    #[must_use]
    pub fn scalar(element: Element) -> Self {
        Self::from_parts(Vec::new(), vec![element])
    }

    /// Creates a numeric rank-0 array from a real number.
    #[must_use]
    pub fn real(value: f64) -> Self {
        Self::scalar(Element::real(value))
    }

    /// Creates a vector.
    #[must_use]
    pub fn vector(elements: Vec<Element>) -> Self {
        Self::from_parts(vec![elements.len()], elements)
    }

    /// Creates a numeric vector from reals.
    ///
    /// # Example
    /// ```
    /// use aplite::interpreter::value::core::Array;
    /// let v = Array::from_reals([1.0, 2.0, 3.0]);
    /// assert_eq!(v.shape(), &[3]);
    /// ```
    #[must_use]
    pub fn from_reals(values: impl IntoIterator<Item = f64>) -> Self {
        Self::vector(values.into_iter().map(Element::real).collect())
    }

    /// Creates a character array from text: a scalar for a single character,
    /// a vector otherwise.
    #[must_use]
    pub fn text(value: &str) -> Self {
        let mut chars: Vec<Element> = value.chars().map(Element::Char).collect();
        if chars.len() == 1
           && let Some(only) = chars.pop()
        {
            return Self::scalar(only);
        }
        Self::vector(chars)
    }

    /// Creates an array of the given shape with every position set to
    /// `element`.
    #[must_use]
    pub fn filled(shape: Vec<usize>, element: &Element) -> Self {
        let size = shape.iter().product();
        Self::from_parts(shape, vec![element.clone(); size])
    }

    /// The dimension sizes.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The flat, row-major elements.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of axes.
    #[must_use]
    pub const fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements, the product of the shape.
    #[must_use]
    pub fn size(&self) -> usize {
        self.elements.len()
    }

    /// Whether the array has rank 0.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Whether the array is a rank-0 array holding a simple scalar.
    #[must_use]
    pub fn is_simple_scalar(&self) -> bool {
        self.is_scalar() && self.elements[0].is_simple()
    }

    /// Length of the first axis; 1 for scalars.
    #[must_use]
    pub fn tally(&self) -> usize {
        self.shape.first().copied().unwrap_or(1)
    }

    /// Returns the array as a single element: a simple scalar stays as it is,
    /// anything else is boxed.
    ///
    /// This is how a result array becomes one item of a larger array.
    #[must_use]
    pub fn into_item(self) -> Element {
        if self.is_simple_scalar() {
            self.elements[0].clone()
        } else {
            Element::Boxed(self)
        }
    }

    /// Encloses the array. Enclosing a simple scalar returns it unchanged.
    #[must_use]
    pub fn enclose(self) -> Self {
        Self::scalar(self.into_item())
    }

    /// Returns the flat elements as a vector.
    #[must_use]
    pub fn ravel(&self) -> Self {
        Self { shape:    vec![self.size()],
               elements: Rc::clone(&self.elements), }
    }

    /// Reshapes the array, cycling or truncating the source elements to fill
    /// the new shape.
    ///
    /// # Errors
    /// Returns a `DomainError` if the source is empty and the target is not.
    ///
    /// # Example
    /// ```
    /// use aplite::{ast::Position, interpreter::value::core::Array};
    ///
    /// let v = Array::from_reals([1.0, 2.0, 3.0]);
    /// let r = v.reshape(vec![5], Position::default()).unwrap();
    /// assert_eq!(r, Array::from_reals([1.0, 2.0, 3.0, 1.0, 2.0]));
    /// ```
    pub fn reshape(&self, shape: Vec<usize>, position: Position) -> EvalResult<Self> {
        let target: usize = shape.iter().product();
        if target == self.size() {
            return Ok(Self { shape,
                             elements: Rc::clone(&self.elements) });
        }
        if self.elements.is_empty() {
            if target == 0 {
                return Ok(Self::from_parts(shape, Vec::new()));
            }
            return Err(RuntimeError::domain("cannot reshape an empty array to a non-empty shape",
                                            position));
        }
        let elements = self.elements.iter().cycle().take(target).cloned().collect();
        Ok(Self::from_parts(shape, elements))
    }

    /// Returns the sole element of a one-element array.
    pub fn single(&self, position: Position) -> EvalResult<&Element> {
        match self.elements.as_slice() {
            [only] => Ok(only),
            _ => Err(RuntimeError::ShapeMismatch { details: format!("expected a single value, found shape {:?}",
                                                                    self.shape),
                                                   position }),
        }
    }

    /// Returns the array as a vector of integers. Scalars count as
    /// one-element vectors.
    pub fn as_integers(&self, position: Position) -> EvalResult<Vec<i64>> {
        if self.rank() > 1 {
            return Err(RuntimeError::domain(format!("expected a vector, found rank {}",
                                                    self.rank()),
                                            position));
        }
        self.elements.iter().map(|e| e.as_integer(position)).collect()
    }

    /// Returns the array as a vector of non-negative lengths.
    pub fn as_lengths(&self, position: Position) -> EvalResult<Vec<usize>> {
        if self.rank() > 1 {
            return Err(RuntimeError::domain(format!("expected a vector, found rank {}",
                                                    self.rank()),
                                            position));
        }
        self.elements
            .iter()
            .map(|e| f64_to_usize_checked(e.as_real(position)?, position))
            .collect()
    }

    /// Builds a numeric vector from lengths such as a shape.
    pub fn from_lengths(values: &[usize], position: Position) -> EvalResult<Self> {
        let elements = values.iter()
                             .map(|&n| usize_to_f64_checked(n, position).map(Element::real))
                             .collect::<EvalResult<Vec<_>>>()?;
        Ok(Self::vector(elements))
    }

    /// Nesting depth: 0 for a simple scalar, 1 for a simple array, one more
    /// than the deepest item otherwise.
    ///
    /// # Example
    /// ```
    /// use aplite::interpreter::value::core::{Array, Element};
    ///
    /// assert_eq!(Array::real(1.0).depth(), 0);
    /// let flat = Array::from_reals([1.0, 2.0]);
    /// assert_eq!(flat.depth(), 1);
    /// let nested = Array::vector(vec![Element::Boxed(flat), Element::real(3.0)]);
    /// assert_eq!(nested.depth(), 2);
    /// ```
    #[must_use]
    pub fn depth(&self) -> usize {
        let deepest = self.elements
                          .iter()
                          .map(|e| match e {
                              Element::Boxed(inner) => inner.depth(),
                              _ => 0,
                          })
                          .max()
                          .unwrap_or(0);
        if self.is_simple_scalar() {
            0
        } else {
            deepest + 1
        }
    }

    /// Whether every element is a character.
    #[must_use]
    pub fn is_text(&self) -> bool {
        !self.elements.is_empty() && self.elements.iter().all(|e| matches!(e, Element::Char(_)))
    }

    /// The fill element for padding this array.
    #[must_use]
    pub fn prototype(&self) -> Element {
        self.elements.first().map_or_else(|| Element::real(0.0), Element::prototype)
    }
}

/// A runtime value: the two kinds a name can be bound to.
#[derive(Debug, Clone)]
pub enum Value {
    /// Data.
    Array(Array),
    /// A function, primitive, derived or user-defined.
    Function(Operation),
}

impl Value {
    /// Whether this is data or a function.
    #[must_use]
    pub const fn kind(&self) -> SymbolKind {
        match self {
            Self::Array(_) => SymbolKind::Data,
            Self::Function(_) => SymbolKind::Function,
        }
    }

    /// Returns the array, or `None` for functions.
    #[must_use]
    pub const fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(array) => Some(array),
            Self::Function(_) => None,
        }
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Self::Array(value)
    }
}

impl From<Operation> for Value {
    fn from(value: Operation) -> Self {
        Self::Function(value)
    }
}
