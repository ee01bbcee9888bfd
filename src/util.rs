/// Numeric conversion helpers.
///
/// This module provides safe functions for converting between integer and
/// floating-point types without risking silent data loss. Array languages
/// store every number as a float, so shapes, counts and indices pass through
/// these helpers whenever they leave or enter an array.
///
/// All functions return a `Result`, which is `Ok` if the conversion is lossless
/// and valid, or a `DomainError` if the value is out of range or not an
/// integer.
pub mod num;

/// Stack growth for deep recursion.
///
/// Deeply nested programs recurse deeply in the parser and the evaluator.
/// This module moves such recursion onto heap-allocated stack segments
/// instead of overflowing the thread's stack.
pub mod stack;
