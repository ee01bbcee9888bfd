use std::{fmt::Display, rc::Rc};

use crate::{
    ast::{Block, DyadicOperator, MonadicOperator, Position, Primitive},
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult, symbol_table::{SymbolKind, SymbolTable},
        value::core::Array,
    },
};

/// A function value.
///
/// Functions are immutable and cheap to clone: derived functions and closures
/// sit behind an `Rc`, so storing a function under a name or passing it to an
/// operator never copies or mutates it.
#[derive(Debug, Clone)]
pub enum Operation {
    /// A primitive glyph.
    Primitive(Primitive),
    /// A function produced by applying an operator to its operand(s).
    Derived(Rc<Derived>),
    /// A user-defined function together with its defining scope.
    Defined(Rc<Closure>),
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::Derived(derived) => write!(f, "{derived}"),
            Self::Defined(_) => write!(f, "{{…}}"),
        }
    }
}

/// An operator operand.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A function operand.
    Function(Operation),
    /// An array operand.
    Array(Array),
}

impl Operand {
    const fn kind(&self) -> SymbolKind {
        match self {
            Self::Function(_) => SymbolKind::Function,
            Self::Array(_) => SymbolKind::Data,
        }
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Function(function) => write!(f, "{function}"),
            Self::Array(array) if array.rank() <= 1 => write!(f, "({array})"),
            Self::Array(_) => write!(f, "(array)"),
        }
    }
}

/// A function derived from an operator and its operands.
#[derive(Debug)]
pub enum Derived {
    /// `operand operator`, e.g. `+/`.
    Monadic {
        /// The operator.
        operator: MonadicOperator,
        /// Its only operand; always a function.
        operand:  Operation,
    },
    /// `left operator right`, e.g. `+.×`.
    Dyadic {
        /// The operator.
        operator: DyadicOperator,
        /// The left operand.
        left:     Operand,
        /// The right operand.
        right:    Operand,
    },
}

impl Derived {
    /// Applies a monadic operator to its operand.
    ///
    /// Every monadic operator takes a function operand.
    ///
    /// # Errors
    /// Returns `KindMismatch` if the operand is an array.
    pub fn monadic(operator: MonadicOperator,
                   operand: Operand,
                   position: Position)
                   -> EvalResult<Operation> {
        match operand {
            Operand::Function(operand) => {
                Ok(Operation::Derived(Rc::new(Self::Monadic { operator, operand })))
            },
            Operand::Array(_) => Err(operand_mismatch(&operator.to_string(), SymbolKind::Function, position)),
        }
    }

    /// Applies a dyadic operator to its operands.
    ///
    /// Inner product, atop and over need two functions. Jot accepts one
    /// array operand, which it binds as an argument. Power needs a function on
    /// the left and accepts a count or a function on the right.
    ///
    /// # Errors
    /// Returns `KindMismatch` if an operand has the wrong kind.
    pub fn dyadic(operator: DyadicOperator,
                  left: Operand,
                  right: Operand,
                  position: Position)
                  -> EvalResult<Operation> {
        let glyph = operator.to_string();
        let valid = match operator {
            DyadicOperator::InnerProduct | DyadicOperator::Atop | DyadicOperator::Over => {
                (left.kind(), right.kind()) == (SymbolKind::Function, SymbolKind::Function)
            },
            DyadicOperator::Jot => {
                left.kind() == SymbolKind::Function || right.kind() == SymbolKind::Function
            },
            DyadicOperator::Power => left.kind() == SymbolKind::Function,
        };
        if !valid {
            return Err(operand_mismatch(&glyph, SymbolKind::Function, position));
        }
        Ok(Operation::Derived(Rc::new(Self::Dyadic { operator,
                                                     left,
                                                     right })))
    }
}

fn operand_mismatch(glyph: &str, expected: SymbolKind, position: Position) -> RuntimeError {
    RuntimeError::KindMismatch { name: format!("operand of {glyph}"),
                                 expected,
                                 position }
}

impl Display for Derived {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monadic { operator: MonadicOperator::OuterProduct,
                            operand, } => write!(f, "∘.{operand}"),
            Self::Monadic { operator, operand } => write!(f, "{operand}{operator}"),
            Self::Dyadic { operator, left, right } => write!(f, "{left}{operator}{right}"),
        }
    }
}

/// A user-defined function: an anonymous function body closed over the scope
/// it was created in.
pub struct Closure {
    /// The statements to run on each call.
    pub body:     Rc<Block>,
    /// The defining scope. Calls run in a fresh child of this scope.
    pub env:      Rc<SymbolTable>,
    /// Where the function literal appears.
    pub position: Position,
}

impl std::fmt::Debug for Closure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Closure")
         .field("position", &self.position)
         .field("statements", &self.body.statements.len())
         .finish_non_exhaustive()
    }
}
