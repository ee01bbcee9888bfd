/// Core evaluation logic.
///
/// Contains the [`Interpreter`](core::Interpreter) visitor: statement
/// execution, guards, right-to-left expression evaluation, assignment, closure
/// creation and calls, and the call-depth limit.
pub mod core;

/// Function values.
///
/// Defines [`Operation`](function::Operation), the single representation of
/// every callable thing: primitives, operator-derived functions and
/// user-defined closures.
pub mod function;

/// Operator application.
///
/// Implements reduction, each, outer and inner product, commute, jot, atop,
/// over and power in terms of the functions they were derived from.
pub mod operator;

/// The pervasion engine.
///
/// Lifts scalar functions over arbitrarily shaped and nested arrays and
/// enforces conformability between two arguments.
pub mod pervade;

/// Primitive dispatch.
pub mod primitive;

/// Scalar primitive functions on single numbers and characters.
pub mod scalar;

/// Structural primitives: shape, index generation, catenation, rotation,
/// transposition, take, drop and friends.
pub mod structural;

/// System variables (`⎕IO`, `⎕CT`, `⎕PP`).
pub mod system;

/// Utility functions for evaluation.
///
/// Provides numeric helpers and tolerant comparisons shared by the
/// primitives.
pub mod utils;
