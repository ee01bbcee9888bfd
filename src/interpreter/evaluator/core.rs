use std::rc::Rc;

use tracing::{debug, info, trace};

use crate::{
    ast::{Block, Expr, FuncExpr, OperandExpr, Position, Statement},
    config::Config,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            function::{Closure, Derived, Operand, Operation},
            system::{Settings, is_system_name},
        },
        symbol_table::{SymbolKind, SymbolTable},
        value::core::{Array, Element, Value},
    },
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The name a user-defined function sees its right argument under.
pub const OMEGA: &str = "⍵";
/// The name a user-defined function sees its left argument under.
pub const ALPHA: &str = "⍺";
/// The name a user-defined function sees itself under.
pub const SELF_REFERENCE: &str = "∇";

/// What a statement asks of the statement list it belongs to.
enum Flow {
    /// Carry on with the next statement.
    Continue(Option<Value>),
    /// A guard held: this is the value of the whole list.
    Return(Value),
}

/// Walks the AST and computes results.
///
/// The interpreter itself holds no bindings; every entry point takes the scope
/// to evaluate in. It only tracks the system variable values primitives
/// consult, the limits from [`Config`], and the current call depth and
/// expression nesting.
#[derive(Debug)]
pub struct Interpreter {
    pub(super) config: Config,
    settings:          Settings,
    depth:             usize,
    nesting:           usize,
}

impl Interpreter {
    /// Creates an interpreter with the given limits and initial system
    /// variable values.
    ///
    /// # Errors
    /// Returns a `DomainError` if a configured system variable value is out of
    /// range.
    pub fn new(config: Config) -> EvalResult<Self> {
        let settings = Settings::from_config(&config)?;
        Ok(Self { config,
                  settings,
                  depth: 0,
                  nesting: 0 })
    }

    /// The system variable values currently in effect.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The configuration this interpreter was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluates a statement list in `env`.
    ///
    /// This is the main entry point for evaluation. Statements run in order;
    /// the value of the last one executed is returned, or `None` if the list
    /// is empty. On error the remaining statements are abandoned, but bindings
    /// made by earlier statements stay in place.
    ///
    /// # Parameters
    /// - `block`: The statements to run.
    /// - `env`: The scope to run them in, usually a session's root scope.
    ///
    /// # Example
    /// ```
    /// use std::rc::Rc;
    ///
    /// use aplite::{
    ///     ast::{Block, Expr, Position, Statement},
    ///     config::Config,
    ///     interpreter::{
    ///         evaluator::core::Interpreter,
    ///         symbol_table::SymbolTable,
    ///         value::core::{Array, Value},
    ///     },
    /// };
    ///
    /// let p = Position::default();
    /// let block = Block { statements: vec![Statement::Expression(Expr::Number { value:    2.0.into(),
    ///                                                                           position: p, })],
    ///                     position:   p, };
    ///
    /// let mut interpreter = Interpreter::new(Config::default()).unwrap();
    /// let root = SymbolTable::root();
    /// match interpreter.evaluate(&block, &root).unwrap() {
    ///     Some(Value::Array(a)) => assert_eq!(a, Array::real(2.0)),
    ///     other => panic!("unexpected {other:?}"),
    /// }
    /// ```
    #[tracing::instrument(level = "debug", skip_all, fields(statements = block.statements.len()))]
    pub fn evaluate(&mut self,
                    block: &Block,
                    env: &Rc<SymbolTable>)
                    -> EvalResult<Option<Value>> {
        self.sync_settings(env);
        self.depth = 0;
        self.nesting = 0;
        self.execute_block(block, env)
    }

    /// Re-reads the system variables visible from `env`.
    ///
    /// Values that are missing or invalid keep their current setting.
    pub fn sync_settings(&mut self, env: &SymbolTable) {
        self.settings = self.settings.read(env);
    }

    fn execute_block(&mut self,
                     block: &Block,
                     env: &Rc<SymbolTable>)
                     -> EvalResult<Option<Value>> {
        let mut last = None;
        for statement in &block.statements {
            match self.execute_statement(statement, env)? {
                Flow::Continue(value) => last = value,
                Flow::Return(value) => return Ok(Some(value)),
            }
        }
        Ok(last)
    }

    fn execute_statement(&mut self,
                         statement: &Statement,
                         env: &Rc<SymbolTable>)
                         -> EvalResult<Flow> {
        trace!(?statement, "executing statement");
        match statement {
            Statement::Expression(expr) => {
                Ok(Flow::Continue(Some(Value::Array(self.eval_expr(expr, env)?))))
            },
            Statement::Function(function) => {
                Ok(Flow::Continue(Some(Value::Function(self.eval_function(function, env)?))))
            },
            Statement::FunctionAssignment { name,
                                            function,
                                            position, } => {
                if is_system_name(name) {
                    return Err(RuntimeError::KindMismatch { name:     name.clone(),
                                                            expected: SymbolKind::Data,
                                                            position: *position, });
                }
                let function = self.eval_function(function, env)?;
                env.define_local(name, Value::Function(function.clone()), *position);
                Ok(Flow::Continue(Some(Value::Function(function))))
            },
            Statement::Conditional { condition,
                                     consequent,
                                     position, } => {
                let guard = self.eval_expr(condition, env)?;
                let holds = guard.single(*position)
                                 .and_then(|element| element.as_boolean(*position))
                                 .map_err(|_| {
                                     RuntimeError::domain("a guard must be a single 0 or 1",
                                                          *position)
                                 })?;
                if !holds {
                    return Ok(Flow::Continue(None));
                }
                match self.execute_statement(consequent, env)? {
                    Flow::Continue(Some(value)) | Flow::Return(value) => Ok(Flow::Return(value)),
                    Flow::Continue(None) => Ok(Flow::Continue(None)),
                }
            },
        }
    }

    /// Evaluates a data expression.
    ///
    /// Sub-expressions are evaluated right to left: the right argument of a
    /// call before its function, and the function before the left argument.
    ///
    /// # Errors
    /// Any error raised while evaluating the expression, or a `DomainError`
    /// if expressions nest deeper than `Config::max_nesting`.
    pub fn eval_expr(&mut self, expr: &Expr, env: &Rc<SymbolTable>) -> EvalResult<Array> {
        self.nested(expr.position(), |this| this.expr(expr, env))
    }

    fn expr(&mut self, expr: &Expr, env: &Rc<SymbolTable>) -> EvalResult<Array> {
        match expr {
            Expr::Number { value, .. } => Ok(Array::scalar(Element::Number(*value))),
            Expr::Text { value, .. } => {
                let mut chars = value.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Array::scalar(Element::Char(c))),
                    _ => Ok(Array::text(value)),
                }
            },
            Expr::Strand { items, .. } => {
                let mut elements = Vec::with_capacity(items.len());
                for item in items.iter().rev() {
                    elements.push(self.eval_expr(item, env)?.into_item());
                }
                elements.reverse();
                Ok(Array::vector(elements))
            },
            Expr::Variable { name, position } => env.resolve_data(name, *position),
            Expr::MonadicCall { function,
                                omega,
                                position, } => {
                let omega = self.eval_expr(omega, env)?;
                let function = self.eval_function(function, env)?;
                self.apply_monadic(&function, &omega, *position)
            },
            Expr::DyadicCall { function,
                               alpha,
                               omega,
                               position, } => {
                let omega = self.eval_expr(omega, env)?;
                let function = self.eval_function(function, env)?;
                let alpha = self.eval_expr(alpha, env)?;
                self.apply_dyadic(&function, &alpha, &omega, *position)
            },
            Expr::Assignment { name,
                               value,
                               position, } => {
                let value = self.eval_expr(value, env)?;
                self.assign(name, &value, env, *position)?;
                Ok(value)
            },
        }
    }

    fn assign(&mut self,
              name: &str,
              value: &Array,
              env: &Rc<SymbolTable>,
              position: Position)
              -> EvalResult<()> {
        if is_system_name(name) {
            self.settings.assign(name, value, position)?;
            info!(name, %value, "system variable changed");
            env.assign_nearest(name, Value::Array(value.clone()), position);
        } else {
            env.define_local(name, Value::Array(value.clone()), position);
        }
        Ok(())
    }

    /// Resolves a function expression to a function value.
    ///
    /// Operator operands are evaluated right operand first. Anonymous function
    /// literals close over `env`.
    ///
    /// # Errors
    /// `UnboundName` or `KindMismatch` for bad references, and any error from
    /// evaluating an array operand.
    pub fn eval_function(&mut self,
                         function: &FuncExpr,
                         env: &Rc<SymbolTable>)
                         -> EvalResult<Operation> {
        self.nested(function.position(), |this| this.function(function, env))
    }

    fn function(&mut self, function: &FuncExpr, env: &Rc<SymbolTable>) -> EvalResult<Operation> {
        match function {
            FuncExpr::Primitive { primitive, .. } => Ok(Operation::Primitive(*primitive)),
            FuncExpr::Reference { name, position } => env.resolve_function(name, *position),
            FuncExpr::MonadicOperator { operator,
                                        operand,
                                        position, } => {
                let operand = self.eval_operand(operand, env)?;
                Derived::monadic(*operator, operand, *position)
            },
            FuncExpr::DyadicOperator { operator,
                                       left,
                                       right,
                                       position, } => {
                let right = self.eval_operand(right, env)?;
                let left = self.eval_operand(left, env)?;
                Derived::dyadic(*operator, left, right, *position)
            },
            FuncExpr::Anonymous { body, position } => {
                Ok(Operation::Defined(Rc::new(Closure { body:     Rc::clone(body),
                                                        env:      Rc::clone(env),
                                                        position: *position, })))
            },
        }
    }

    fn eval_operand(&mut self, operand: &OperandExpr, env: &Rc<SymbolTable>) -> EvalResult<Operand> {
        match operand {
            OperandExpr::Function(function) => Ok(Operand::Function(self.eval_function(function, env)?)),
            OperandExpr::Array(expr) => Ok(Operand::Array(self.eval_expr(expr, env)?)),
        }
    }

    /// Applies a function to one argument.
    ///
    /// # Errors
    /// Whatever the function raises, or a `DomainError` if the call nests too
    /// deeply.
    pub fn apply_monadic(&mut self,
                         function: &Operation,
                         omega: &Array,
                         position: Position)
                         -> EvalResult<Array> {
        debug!(%function, "monadic call");
        match function {
            Operation::Primitive(primitive) => primitive.apply_monadic(omega, &self.settings, position),
            Operation::Derived(derived) => self.apply_derived_monadic(derived, omega, position),
            Operation::Defined(closure) => self.call(closure, None, omega, position),
        }
    }

    /// Applies a function to two arguments.
    ///
    /// # Errors
    /// Whatever the function raises, or a `DomainError` if the call nests too
    /// deeply.
    pub fn apply_dyadic(&mut self,
                        function: &Operation,
                        alpha: &Array,
                        omega: &Array,
                        position: Position)
                        -> EvalResult<Array> {
        debug!(%function, "dyadic call");
        match function {
            Operation::Primitive(primitive) => {
                primitive.apply_dyadic(alpha, omega, &self.settings, position)
            },
            Operation::Derived(derived) => self.apply_derived_dyadic(derived, alpha, omega, position),
            Operation::Defined(closure) => self.call(closure, Some(alpha), omega, position),
        }
    }

    /// Runs `eval` one level of expression nesting deeper.
    fn nested<T>(&mut self,
                 position: Position,
                 eval: impl FnOnce(&mut Self) -> EvalResult<T>)
                 -> EvalResult<T> {
        if self.nesting >= self.config.max_nesting {
            return Err(RuntimeError::domain(format!("expression nesting exceeded {}",
                                                    self.config.max_nesting),
                                            position));
        }
        self.nesting += 1;
        let result = ensure_sufficient_stack(|| eval(self));
        self.nesting -= 1;
        result
    }

    fn call(&mut self,
            closure: &Rc<Closure>,
            alpha: Option<&Array>,
            omega: &Array,
            position: Position)
            -> EvalResult<Array> {
        if self.depth >= self.config.max_depth {
            return Err(RuntimeError::domain(format!("call depth exceeded {}", self.config.max_depth),
                                            position));
        }
        self.depth += 1;
        let result = self.run_closure(closure, alpha, omega, position);
        self.depth -= 1;
        result
    }

    /// Runs a user-defined function in a fresh child of its defining scope.
    fn run_closure(&mut self,
                   closure: &Rc<Closure>,
                   alpha: Option<&Array>,
                   omega: &Array,
                   position: Position)
                   -> EvalResult<Array> {
        let scope = SymbolTable::child(&closure.env);
        trace!(depth = self.depth, "entered call scope");
        scope.define_local(OMEGA, Value::Array(omega.clone()), position);
        if let Some(alpha) = alpha {
            scope.define_local(ALPHA, Value::Array(alpha.clone()), position);
        }
        scope.define_local(SELF_REFERENCE, Value::Function(Operation::Defined(Rc::clone(closure))), position);

        let result = self.execute_block(&closure.body, &scope);
        // Nothing bound in a call scope outlives the call.
        scope.clear();

        match result? {
            Some(Value::Array(array)) => Ok(array),
            Some(Value::Function(_)) => Err(RuntimeError::KindMismatch { name:     "function result".to_string(),
                                                                         expected: SymbolKind::Data,
                                                                         position }),
            None => Err(RuntimeError::domain("function produced no result", closure.position)),
        }
    }
}
