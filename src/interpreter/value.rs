/// Complex number support.
///
/// Defines the `ComplexNumber` type every numeric scalar is stored as. Reals
/// are complex numbers with a zero imaginary part. Includes arithmetic,
/// transcendental functions and a checked integer power.
pub mod complex;
/// Arrays, their elements, and the runtime `Value` enum.
///
/// An `Array` is a shape plus a flat, reference-counted element vector;
/// `Element` is either a simple scalar or a boxed array, which is how nesting
/// is represented.
pub mod core;
/// Formatting of arrays and numbers for output.
pub mod display;
