use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    fmt::Display,
    rc::Rc,
};

use crate::{
    ast::Position,
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, function::Operation},
        value::core::{Array, Value},
    },
};

/// Whether a name holds data or a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// An array.
    Data,
    /// A function.
    Function,
}

impl Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Data => write!(f, "an array"),
            Self::Function => write!(f, "a function"),
        }
    }
}

/// A named binding.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// The bound value.
    pub value:      Value,
    /// Where the binding was made.
    pub defined_at: Position,
}

impl Symbol {
    /// Whether the binding holds data or a function.
    #[must_use]
    pub const fn kind(&self) -> SymbolKind {
        self.value.kind()
    }
}

/// One scope in a parent-linked chain of scopes.
///
/// The root scope is the session's global workspace. Every call of a
/// user-defined function gets a fresh child of the scope the function was
/// defined in, so free names resolve lexically. Lookups walk toward the root;
/// writes go to the scope they are made in unless
/// [`assign_nearest`](Self::assign_nearest) is used.
pub struct SymbolTable {
    symbols: RefCell<HashMap<String, Symbol>>,
    parent:  Option<Rc<Self>>,
}

impl std::fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<String> = self.symbols.borrow().keys().cloned().collect();
        names.sort();
        f.debug_struct("SymbolTable")
         .field("names", &names)
         .field("is_root", &self.parent.is_none())
         .finish()
    }
}

impl SymbolTable {
    /// Creates an empty root scope.
    #[must_use]
    pub fn root() -> Rc<Self> {
        Rc::new(Self { symbols: RefCell::new(HashMap::new()),
                       parent:  None, })
    }

    /// Creates an empty scope whose lookups fall back to `parent`.
    ///
    /// # Example
    /// ```
    /// use aplite::{
    ///     ast::Position,
    ///     interpreter::{
    ///         symbol_table::SymbolTable,
    ///         value::core::{Array, Value},
    ///     },
    /// };
    ///
    /// let root = SymbolTable::root();
    /// root.define_local("x", Value::Array(Array::real(1.0)), Position::default());
    ///
    /// let child = SymbolTable::child(&root);
    /// assert!(child.lookup("x").is_some());
    /// assert!(!child.contains_local("x"));
    /// ```
    #[must_use]
    pub fn child(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self { symbols: RefCell::new(HashMap::new()),
                       parent:  Some(Rc::clone(parent)), })
    }

    /// The enclosing scope, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<&Rc<Self>> {
        self.parent.as_ref()
    }

    /// Whether this scope has no parent.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Finds a binding by walking from this scope toward the root.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        if let Some(symbol) = self.symbols.borrow().get(name) {
            return Some(symbol.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.lookup(name))
    }

    /// Resolves a name to its value.
    ///
    /// # Errors
    /// Returns `UnboundName` if no scope in the chain binds `name`.
    pub fn resolve(&self, name: &str, position: Position) -> EvalResult<Value> {
        self.lookup(name)
            .map(|symbol| symbol.value)
            .ok_or_else(|| RuntimeError::UnboundName { name: name.to_string(),
                                                       position })
    }

    /// Resolves a name that is used as data.
    ///
    /// # Errors
    /// Returns `UnboundName` if the name is unbound and `KindMismatch` if it
    /// is bound to a function.
    pub fn resolve_data(&self, name: &str, position: Position) -> EvalResult<Array> {
        match self.resolve(name, position)? {
            Value::Array(array) => Ok(array),
            Value::Function(_) => Err(RuntimeError::KindMismatch { name: name.to_string(),
                                                                   expected: SymbolKind::Data,
                                                                   position }),
        }
    }

    /// Resolves a name that is used as a function.
    ///
    /// # Errors
    /// Returns `UnboundName` if the name is unbound and `KindMismatch` if it
    /// is bound to data.
    pub fn resolve_function(&self, name: &str, position: Position) -> EvalResult<Operation> {
        match self.resolve(name, position)? {
            Value::Function(function) => Ok(function),
            Value::Array(_) => Err(RuntimeError::KindMismatch { name: name.to_string(),
                                                                expected: SymbolKind::Function,
                                                                position }),
        }
    }

    /// Binds `name` in this scope, shadowing any outer binding without
    /// touching it.
    pub fn define_local(&self, name: &str, value: Value, position: Position) {
        self.symbols.borrow_mut().insert(name.to_string(),
                                         Symbol { value,
                                                  defined_at: position });
    }

    /// Rebinds `name` in the nearest scope that already binds it, or in this
    /// scope if none does.
    ///
    /// # Example
    /// ```
    /// use aplite::{
    ///     ast::Position,
    ///     interpreter::{
    ///         symbol_table::SymbolTable,
    ///         value::core::{Array, Value},
    ///     },
    /// };
    ///
    /// let p = Position::default();
    /// let root = SymbolTable::root();
    /// root.define_local("y", Value::Array(Array::real(1.0)), p);
    ///
    /// let child = SymbolTable::child(&root);
    /// child.assign_nearest("y", Value::Array(Array::real(5.0)), p);
    ///
    /// assert!(!child.contains_local("y"));
    /// assert_eq!(root.resolve_data("y", p).unwrap(), Array::real(5.0));
    /// ```
    pub fn assign_nearest(&self, name: &str, value: Value, position: Position) {
        let mut scope = self;
        loop {
            if scope.contains_local(name) {
                scope.define_local(name, value, position);
                return;
            }
            match &scope.parent {
                Some(parent) => scope = parent,
                None => break,
            }
        }
        self.define_local(name, value, position);
    }

    /// Whether this scope itself binds `name`.
    #[must_use]
    pub fn contains_local(&self, name: &str) -> bool {
        self.symbols.borrow().contains_key(name)
    }

    /// The names bound directly in this scope with the given kind, sorted.
    #[must_use]
    pub fn local_names(&self, kind: SymbolKind) -> Vec<String> {
        let mut names: Vec<String> = self.symbols
                                         .borrow()
                                         .iter()
                                         .filter(|(_, symbol)| symbol.kind() == kind)
                                         .map(|(name, _)| name.clone())
                                         .collect();
        names.sort();
        names
    }

    /// Every function name visible from this scope.
    ///
    /// The parser uses this to decide whether a name denotes a function.
    #[must_use]
    pub fn function_names(&self) -> HashSet<String> {
        let mut names = self.parent
                            .as_ref()
                            .map(|parent| parent.function_names())
                            .unwrap_or_default();
        for (name, symbol) in self.symbols.borrow().iter() {
            if symbol.kind() == SymbolKind::Function {
                names.insert(name.clone());
            } else {
                names.remove(name);
            }
        }
        names
    }

    /// Drops every binding in this scope.
    ///
    /// Closures keep their defining scope alive, so a function stored in the
    /// scope it was defined in forms a reference cycle. Clearing a scope that
    /// is no longer needed breaks such cycles.
    pub fn clear(&self) {
        let drained: Vec<Symbol> = self.symbols.borrow_mut().drain().map(|(_, s)| s).collect();
        drop(drained);
    }
}
