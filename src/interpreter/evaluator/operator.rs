use crate::{
    ast::{Axis, DyadicOperator, MonadicOperator, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            function::{Derived, Operand, Operation},
        },
        symbol_table::SymbolKind,
        value::core::{Array, Element},
    },
};

fn valence_error(derived: &Derived, details: &str, position: Position) -> RuntimeError {
    RuntimeError::ArityMismatch { details: format!("{derived} {details}"),
                                  position }
}

fn function_operand<'a>(operand: &'a Operand,
                        operator: DyadicOperator,
                        position: Position)
                        -> EvalResult<&'a Operation> {
    match operand {
        Operand::Function(function) => Ok(function),
        Operand::Array(_) => Err(RuntimeError::KindMismatch { name: format!("operand of {operator}"),
                                                              expected: SymbolKind::Function,
                                                              position }),
    }
}

impl Interpreter {
    pub(super) fn apply_derived_monadic(&mut self,
                                        derived: &Derived,
                                        omega: &Array,
                                        position: Position)
                                        -> EvalResult<Array> {
        match derived {
            Derived::Monadic { operator, operand } => match operator {
                MonadicOperator::Reduce(axis) => self.reduce(operand, *axis, omega, position),
                MonadicOperator::Each => self.each_monadic(operand, omega, position),
                MonadicOperator::OuterProduct => {
                    Err(valence_error(derived, "needs a left argument", position))
                },
                MonadicOperator::Commute => self.apply_dyadic(operand, omega, omega, position),
            },
            Derived::Dyadic { operator, left, right } => match (operator, left, right) {
                (DyadicOperator::InnerProduct, ..) => {
                    Err(valence_error(derived, "needs a left argument", position))
                },
                (DyadicOperator::Jot, Operand::Array(alpha), Operand::Function(g)) => {
                    self.apply_dyadic(g, alpha, omega, position)
                },
                (DyadicOperator::Jot, Operand::Function(f), Operand::Array(beta)) => {
                    self.apply_dyadic(f, omega, beta, position)
                },
                (DyadicOperator::Power, Operand::Function(f), count_or_test) => {
                    self.power(f, count_or_test, None, omega, position)
                },
                // f∘g ω, f⍤g ω and f⍥g ω all mean f g ω
                (..) => {
                    let f = function_operand(left, *operator, position)?;
                    let g = function_operand(right, *operator, position)?;
                    let inner = self.apply_monadic(g, omega, position)?;
                    self.apply_monadic(f, &inner, position)
                },
            },
        }
    }

    pub(super) fn apply_derived_dyadic(&mut self,
                                       derived: &Derived,
                                       alpha: &Array,
                                       omega: &Array,
                                       position: Position)
                                       -> EvalResult<Array> {
        match derived {
            Derived::Monadic { operator, operand } => match operator {
                MonadicOperator::Reduce(_) => {
                    Err(valence_error(derived, "cannot take a left argument", position))
                },
                MonadicOperator::Each => self.each_dyadic(operand, alpha, omega, position),
                MonadicOperator::OuterProduct => self.outer(operand, alpha, omega, position),
                MonadicOperator::Commute => self.apply_dyadic(operand, omega, alpha, position),
            },
            Derived::Dyadic { operator, left, right } => {
                if *operator == DyadicOperator::Power {
                    let f = function_operand(left, *operator, position)?;
                    return self.power(f, right, Some(alpha), omega, position);
                }
                let (Operand::Function(f), Operand::Function(g)) = (left, right) else {
                    return Err(valence_error(derived, "cannot take a left argument", position));
                };
                match operator {
                    DyadicOperator::InnerProduct => self.inner(f, g, alpha, omega, position),
                    DyadicOperator::Atop => {
                        let inner = self.apply_dyadic(g, alpha, omega, position)?;
                        self.apply_monadic(f, &inner, position)
                    },
                    DyadicOperator::Over => {
                        let right = self.apply_monadic(g, omega, position)?;
                        let left = self.apply_monadic(g, alpha, position)?;
                        self.apply_dyadic(f, &left, &right, position)
                    },
                    DyadicOperator::Jot | DyadicOperator::Power => {
                        let right = self.apply_monadic(g, omega, position)?;
                        self.apply_dyadic(f, alpha, &right, position)
                    },
                }
            },
        }
    }

    /// `f/ω` and `f⌿ω`: inserts `f` between the items along one axis.
    ///
    /// The fold runs right to left, so `-/1 2 3` is `1-(2-3)`. An axis of
    /// length one yields its single item unchanged; an empty axis yields the
    /// identity element of `f` if it has one.
    fn reduce(&mut self,
              function: &Operation,
              axis: Axis,
              omega: &Array,
              position: Position)
              -> EvalResult<Array> {
        if omega.is_scalar() {
            return Ok(omega.clone());
        }
        let shape = omega.shape();
        let axis = match axis {
            Axis::First => 0,
            Axis::Last => shape.len() - 1,
        };
        let length = shape[axis];
        let outer: usize = shape[..axis].iter().product();
        let inner: usize = shape[axis + 1..].iter().product();
        let result_shape: Vec<usize> = shape[..axis].iter().chain(&shape[axis + 1..]).copied().collect();

        if length == 0 {
            let identity = match function {
                Operation::Primitive(primitive) => primitive.identity(),
                _ => None,
            };
            return match identity {
                Some(value) => Ok(Array::filled(result_shape, &Element::real(value))),
                None => Err(RuntimeError::domain(format!("{function}/ of an empty axis has no identity"),
                                                 position)),
            };
        }

        let elements = omega.elements();
        let mut result = Vec::with_capacity(outer * inner);
        for o in 0..outer {
            for i in 0..inner {
                let base = o * length * inner + i;
                let mut accumulator = elements[base + (length - 1) * inner].to_array();
                for k in (0..length - 1).rev() {
                    let item = elements[base + k * inner].to_array();
                    accumulator = self.apply_dyadic(function, &item, &accumulator, position)?;
                }
                result.push(accumulator.into_item());
            }
        }
        Ok(Array::from_parts(result_shape, result))
    }

    /// `f¨ω`
    fn each_monadic(&mut self,
                    function: &Operation,
                    omega: &Array,
                    position: Position)
                    -> EvalResult<Array> {
        let elements = omega.elements()
                            .iter()
                            .map(|item| {
                                Ok(self.apply_monadic(function, &item.to_array(), position)?
                                       .into_item())
                            })
                            .collect::<EvalResult<Vec<_>>>()?;
        Ok(Array::from_parts(omega.shape().to_vec(), elements))
    }

    /// `α f¨ ω`, pairing items with scalar extension at the top level only.
    fn each_dyadic(&mut self,
                   function: &Operation,
                   alpha: &Array,
                   omega: &Array,
                   position: Position)
                   -> EvalResult<Array> {
        let shape = match (alpha.is_scalar(), omega.is_scalar()) {
            (true, _) => omega.shape(),
            (false, true) => alpha.shape(),
            (false, false) if alpha.shape() == omega.shape() => alpha.shape(),
            (false, false) => return Err(RuntimeError::shapes(alpha.shape(), omega.shape(), position)),
        };
        let size: usize = shape.iter().product();
        let pick = |array: &Array, i: usize| {
            if array.is_scalar() {
                array.elements()[0].to_array()
            } else {
                array.elements()[i].to_array()
            }
        };

        let mut elements = Vec::with_capacity(size);
        for i in 0..size {
            let result = self.apply_dyadic(function, &pick(alpha, i), &pick(omega, i), position)?;
            elements.push(result.into_item());
        }
        Ok(Array::from_parts(shape.to_vec(), elements))
    }

    /// `α ∘.f ω`: applies `f` to every pairing of an item of `α` with an item
    /// of `ω`. The result shape is `(⍴α),⍴ω`.
    fn outer(&mut self,
             function: &Operation,
             alpha: &Array,
             omega: &Array,
             position: Position)
             -> EvalResult<Array> {
        let mut elements = Vec::with_capacity(alpha.size() * omega.size());
        for a in alpha.elements() {
            let left = a.to_array();
            for w in omega.elements() {
                let result = self.apply_dyadic(function, &left, &w.to_array(), position)?;
                elements.push(result.into_item());
            }
        }
        let shape = alpha.shape().iter().chain(omega.shape()).copied().collect();
        Ok(Array::from_parts(shape, elements))
    }

    /// `α f.g ω`: pairs each row along the last axis of `α` with each column
    /// along the first axis of `ω`, applies `g` to the pair and reduces the
    /// result with `f`.
    fn inner(&mut self,
             f: &Operation,
             g: &Operation,
             alpha: &Array,
             omega: &Array,
             position: Position)
             -> EvalResult<Array> {
        let left_length = alpha.shape().last().copied();
        let right_length = omega.shape().first().copied();
        let length = match (left_length, right_length) {
            (Some(l), Some(r)) if l != r => {
                return Err(RuntimeError::shapes(alpha.shape(), omega.shape(), position));
            },
            (Some(l), _) => l,
            (None, Some(r)) => r,
            (None, None) => 1,
        };

        let left_frame = &alpha.shape()[..alpha.rank().saturating_sub(1)];
        let right_frame = if omega.is_scalar() { &[][..] } else { &omega.shape()[1..] };
        let rows: usize = left_frame.iter().product();
        let columns: usize = right_frame.iter().product();

        let left_item = |row: usize, k: usize| {
            if alpha.is_scalar() {
                alpha.elements()[0].clone()
            } else {
                alpha.elements()[row * length + k].clone()
            }
        };
        let right_item = |k: usize, column: usize| {
            if omega.is_scalar() {
                omega.elements()[0].clone()
            } else {
                omega.elements()[k * columns + column].clone()
            }
        };

        let mut elements = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            let left = Array::vector((0..length).map(|k| left_item(row, k)).collect());
            for column in 0..columns {
                let right = Array::vector((0..length).map(|k| right_item(k, column)).collect());
                let paired = self.apply_dyadic(g, &left, &right, position)?;
                let reduced = self.reduce(f, Axis::Last, &paired, position)?;
                elements.push(reduced.into_item());
            }
        }
        let shape = left_frame.iter().chain(right_frame).copied().collect();
        Ok(Array::from_parts(shape, elements))
    }

    /// `f⍣n ω` and `f⍣g ω`, with an optional bound left argument.
    ///
    /// With a count, `f` is applied that many times. With a function `g`,
    /// `f` is applied until `(f y) g y` is 1.
    fn power(&mut self,
             function: &Operation,
             control: &Operand,
             alpha: Option<&Array>,
             omega: &Array,
             position: Position)
             -> EvalResult<Array> {
        let step = |interpreter: &mut Self, y: &Array| match alpha {
            Some(alpha) => interpreter.apply_dyadic(function, alpha, y, position),
            None => interpreter.apply_monadic(function, y, position),
        };

        let mut current = omega.clone();
        match control {
            Operand::Array(count) => {
                let count = count.single(position)?.as_integer(position)?;
                if count < 0 {
                    return Err(RuntimeError::domain(format!("cannot apply a function {count} times"),
                                                    position));
                }
                for _ in 0..count {
                    current = step(self, &current)?;
                }
                Ok(current)
            },
            Operand::Function(test) => {
                for _ in 0..self.config.max_power_iterations {
                    let next = step(self, &current)?;
                    let converged = self.apply_dyadic(test, &next, &current, position)?;
                    if converged.single(position)?.as_boolean(position)? {
                        return Ok(next);
                    }
                    current = next;
                }
                Err(RuntimeError::domain(format!("{function}⍣ did not converge within {} iterations",
                                                 self.config.max_power_iterations),
                                         position))
            },
        }
    }
}
