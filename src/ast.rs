use std::{fmt::Display, rc::Rc};

use crate::interpreter::value::complex::ComplexNumber;

/// A location in the source text.
///
/// Both fields are 1-based. `column` counts characters, not bytes, so glyphs
/// such as `⍴` occupy a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Source line.
    pub line:   usize,
    /// Source column.
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    ///
    /// # Example
    /// ```
    /// use aplite::ast::Position;
    /// let p = Position::new(3, 7);
    /// assert_eq!(p.line, 3);
    /// assert_eq!(p.to_string(), "3:7");
    /// ```
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The closed set of primitive functions.
///
/// Every primitive may be applied monadically, dyadically or both; which
/// valences are supported is decided by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `+` conjugate / add.
    Plus,
    /// `-` negate / subtract.
    Minus,
    /// `×` direction / multiply.
    Times,
    /// `÷` reciprocal / divide.
    Divide,
    /// `*` exponential / power.
    Power,
    /// `⍟` natural logarithm / logarithm.
    Log,
    /// `|` magnitude / residue.
    Stile,
    /// `⌈` ceiling / maximum.
    Ceiling,
    /// `⌊` floor / minimum.
    Floor,
    /// `!` factorial / binomial.
    Factorial,
    /// `○` pi times / circular functions.
    Circle,
    /// `<`
    Less,
    /// `≤`
    LessEqual,
    /// `=`
    Equal,
    /// `≥`
    GreaterEqual,
    /// `>`
    Greater,
    /// `≠`
    NotEqual,
    /// `∧`
    And,
    /// `∨`
    Or,
    /// `⍲`
    Nand,
    /// `⍱`
    Nor,
    /// `~` not / without.
    Tilde,
    /// `⍴` shape / reshape.
    Rho,
    /// `⍳` index generator / index of.
    Iota,
    /// `,` ravel / catenate.
    Comma,
    /// `⌽` reverse / rotate along the last axis.
    Rotate,
    /// `⊖` reverse / rotate along the first axis.
    RotateFirst,
    /// `⍉` transpose.
    Transpose,
    /// `⊂` enclose.
    Enclose,
    /// `⊃` first.
    First,
    /// `↑` take.
    Take,
    /// `↓` drop.
    Drop,
    /// `⊢` right tack.
    Right,
    /// `⊣` left tack.
    Left,
    /// `≡` depth / match.
    Match,
    /// `≢` tally / not match.
    NotMatch,
}

impl Primitive {
    /// The glyph that spells this primitive.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
            Self::Times => '×',
            Self::Divide => '÷',
            Self::Power => '*',
            Self::Log => '⍟',
            Self::Stile => '|',
            Self::Ceiling => '⌈',
            Self::Floor => '⌊',
            Self::Factorial => '!',
            Self::Circle => '○',
            Self::Less => '<',
            Self::LessEqual => '≤',
            Self::Equal => '=',
            Self::GreaterEqual => '≥',
            Self::Greater => '>',
            Self::NotEqual => '≠',
            Self::And => '∧',
            Self::Or => '∨',
            Self::Nand => '⍲',
            Self::Nor => '⍱',
            Self::Tilde => '~',
            Self::Rho => '⍴',
            Self::Iota => '⍳',
            Self::Comma => ',',
            Self::Rotate => '⌽',
            Self::RotateFirst => '⊖',
            Self::Transpose => '⍉',
            Self::Enclose => '⊂',
            Self::First => '⊃',
            Self::Take => '↑',
            Self::Drop => '↓',
            Self::Right => '⊢',
            Self::Left => '⊣',
            Self::Match => '≡',
            Self::NotMatch => '≢',
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// The axis a reduction collapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `⌿`
    First,
    /// `/`
    Last,
}

/// Operators taking a single operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonadicOperator {
    /// `f/` and `f⌿`
    Reduce(Axis),
    /// `f¨`
    Each,
    /// `∘.f`
    OuterProduct,
    /// `f⍨`
    Commute,
}

impl Display for MonadicOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reduce(Axis::Last) => write!(f, "/"),
            Self::Reduce(Axis::First) => write!(f, "⌿"),
            Self::Each => write!(f, "¨"),
            Self::OuterProduct => write!(f, "∘."),
            Self::Commute => write!(f, "⍨"),
        }
    }
}

/// Operators taking a left and a right operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DyadicOperator {
    /// `f.g`
    InnerProduct,
    /// `f∘g`
    Jot,
    /// `f⍤g`
    Atop,
    /// `f⍥g`
    Over,
    /// `f⍣g`
    Power,
}

impl Display for DyadicOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let glyph = match self {
            Self::InnerProduct => '.',
            Self::Jot => '∘',
            Self::Atop => '⍤',
            Self::Over => '⍥',
            Self::Power => '⍣',
        };
        write!(f, "{glyph}")
    }
}

/// A data-producing AST node.
///
/// Every variant evaluates to an array. Function-producing subtrees live in
/// [`FuncExpr`]; the two families only meet at call sites and operator
/// operands.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal such as `42`, `¯1.5` or `3J4`.
    Number {
        /// The literal value.
        value:    ComplexNumber,
        /// Where the literal starts.
        position: Position,
    },
    /// A quoted literal. A single character is a scalar, anything else a
    /// character vector.
    Text {
        /// The unescaped contents.
        value:    String,
        /// Where the literal starts.
        position: Position,
    },
    /// Adjacent array atoms, e.g. `1 (2 3) x`.
    Strand {
        /// The items, left to right.
        items:    Vec<Self>,
        /// Where the first item starts.
        position: Position,
    },
    /// A reference to a data name, including `⍺`, `⍵` and system names.
    Variable {
        /// The referenced name.
        name:     String,
        /// Where the reference appears.
        position: Position,
    },
    /// `f ω`
    MonadicCall {
        /// The function being applied.
        function: Box<FuncExpr>,
        /// The right argument.
        omega:    Box<Self>,
        /// Where the function appears.
        position: Position,
    },
    /// `α f ω`
    DyadicCall {
        /// The function being applied.
        function: Box<FuncExpr>,
        /// The left argument.
        alpha:    Box<Self>,
        /// The right argument.
        omega:    Box<Self>,
        /// Where the function appears.
        position: Position,
    },
    /// `name ← value`; evaluates to the assigned array.
    Assignment {
        /// The target name.
        name:     String,
        /// The assigned expression.
        value:    Box<Self>,
        /// Where the target name appears.
        position: Position,
    },
}

impl Expr {
    /// Returns the source position of this node.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Number { position, .. }
            | Self::Text { position, .. }
            | Self::Strand { position, .. }
            | Self::Variable { position, .. }
            | Self::MonadicCall { position, .. }
            | Self::DyadicCall { position, .. }
            | Self::Assignment { position, .. } => *position,
        }
    }
}

/// A function-producing AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum FuncExpr {
    /// A primitive glyph.
    Primitive {
        /// Which primitive.
        primitive: Primitive,
        /// Where the glyph appears.
        position:  Position,
    },
    /// A reference to a function name, including `∇`.
    Reference {
        /// The referenced name.
        name:     String,
        /// Where the reference appears.
        position: Position,
    },
    /// A monadic operator applied to its operand, e.g. `+/`.
    MonadicOperator {
        /// The operator.
        operator: MonadicOperator,
        /// Its operand.
        operand:  Box<OperandExpr>,
        /// Where the operator glyph appears.
        position: Position,
    },
    /// A dyadic operator applied to its operands, e.g. `+.×`.
    DyadicOperator {
        /// The operator.
        operator: DyadicOperator,
        /// The left operand.
        left:     Box<OperandExpr>,
        /// The right operand.
        right:    Box<OperandExpr>,
        /// Where the operator glyph appears.
        position: Position,
    },
    /// An anonymous function literal `{ ... }`.
    Anonymous {
        /// The body, shared with every closure created from it.
        body:     Rc<Block>,
        /// Where the opening brace appears.
        position: Position,
    },
}

impl FuncExpr {
    /// Returns the source position of this node.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Primitive { position, .. }
            | Self::Reference { position, .. }
            | Self::MonadicOperator { position, .. }
            | Self::DyadicOperator { position, .. }
            | Self::Anonymous { position, .. } => *position,
        }
    }
}

/// An operator operand: operators accept functions and, in some positions,
/// arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum OperandExpr {
    /// A function operand.
    Function(FuncExpr),
    /// An array operand, e.g. the `3` in `f⍣3`.
    Array(Expr),
}

/// A single statement of a statement list.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A data expression (including data assignment).
    Expression(Expr),
    /// A bare function expression; evaluates to the function itself.
    Function(FuncExpr),
    /// `name ← function`
    FunctionAssignment {
        /// The target name.
        name:     String,
        /// The assigned function.
        function: FuncExpr,
        /// Where the target name appears.
        position: Position,
    },
    /// `condition : consequent`
    ///
    /// When the condition is 1 the consequent becomes the value of the
    /// enclosing statement list and the remaining statements are skipped.
    /// When it is 0 the remaining statements run instead.
    Conditional {
        /// The guard.
        condition:  Expr,
        /// The result produced when the guard holds.
        consequent: Box<Self>,
        /// Where the guard starts.
        position:   Position,
    },
}

impl Statement {
    /// Whether this statement only binds a name. Such statements are not
    /// echoed by the printer.
    #[must_use]
    pub const fn is_assignment(&self) -> bool {
        matches!(self,
                 Self::Expression(Expr::Assignment { .. }) | Self::FunctionAssignment { .. })
    }
}

/// A statement list: a whole program or the body of an anonymous function.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Statements in execution order.
    pub statements: Vec<Statement>,
    /// Where the list starts.
    pub position:   Position,
}

impl Block {
    /// Whether the final statement is an assignment.
    #[must_use]
    pub fn ends_with_assignment(&self) -> bool {
        self.statements.last().is_some_and(Statement::is_assignment)
    }
}
