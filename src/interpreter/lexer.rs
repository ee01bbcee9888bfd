use std::fmt::Display;

use logos::Logos;

use crate::{
    ast::{DyadicOperator, MonadicOperator, Position, Primitive},
    error::ParseError,
    interpreter::{parser::core::ParseResult, value::complex::ComplexNumber},
};

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Numeric literals such as `42`, `¯3.5`, `.5`, `1E¯3` or `3J4`.
    #[regex(r"¯?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE]¯?[0-9]+)?([jJ]¯?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE]¯?[0-9]+)?)?",
            parse_number)]
    Number(ComplexNumber),
    /// Quoted text such as `'abc'`; `''` stands for one quote.
    #[regex(r"'([^'\n]|'')*'", parse_text)]
    Text(String),
    /// Names such as `x`, `sum` or `∆tmp`.
    #[regex(r"[A-Za-z_∆⍙][A-Za-z0-9_∆⍙]*", |lex| lex.slice().to_string())]
    Name(String),
    /// System names such as `⎕IO`.
    #[regex(r"⎕[A-Za-z]+", |lex| lex.slice().to_string())]
    SystemName(String),
    /// Primitive function glyphs.
    #[token("+", |_| Primitive::Plus)]
    #[token("-", |_| Primitive::Minus)]
    #[token("×", |_| Primitive::Times)]
    #[token("÷", |_| Primitive::Divide)]
    #[token("*", |_| Primitive::Power)]
    #[token("⍟", |_| Primitive::Log)]
    #[token("|", |_| Primitive::Stile)]
    #[token("⌈", |_| Primitive::Ceiling)]
    #[token("⌊", |_| Primitive::Floor)]
    #[token("!", |_| Primitive::Factorial)]
    #[token("○", |_| Primitive::Circle)]
    #[token("<", |_| Primitive::Less)]
    #[token("≤", |_| Primitive::LessEqual)]
    #[token("=", |_| Primitive::Equal)]
    #[token("≥", |_| Primitive::GreaterEqual)]
    #[token(">", |_| Primitive::Greater)]
    #[token("≠", |_| Primitive::NotEqual)]
    #[token("∧", |_| Primitive::And)]
    #[token("∨", |_| Primitive::Or)]
    #[token("⍲", |_| Primitive::Nand)]
    #[token("⍱", |_| Primitive::Nor)]
    #[token("~", |_| Primitive::Tilde)]
    #[token("⍴", |_| Primitive::Rho)]
    #[token("⍳", |_| Primitive::Iota)]
    #[token(",", |_| Primitive::Comma)]
    #[token("⌽", |_| Primitive::Rotate)]
    #[token("⊖", |_| Primitive::RotateFirst)]
    #[token("⍉", |_| Primitive::Transpose)]
    #[token("⊂", |_| Primitive::Enclose)]
    #[token("⊃", |_| Primitive::First)]
    #[token("↑", |_| Primitive::Take)]
    #[token("↓", |_| Primitive::Drop)]
    #[token("⊢", |_| Primitive::Right)]
    #[token("⊣", |_| Primitive::Left)]
    #[token("≡", |_| Primitive::Match)]
    #[token("≢", |_| Primitive::NotMatch)]
    Primitive(Primitive),
    /// Operators taking one operand on their left.
    #[token("/", |_| MonadicOperator::Reduce(crate::ast::Axis::Last))]
    #[token("⌿", |_| MonadicOperator::Reduce(crate::ast::Axis::First))]
    #[token("¨", |_| MonadicOperator::Each)]
    #[token("⍨", |_| MonadicOperator::Commute)]
    MonadicOp(MonadicOperator),
    /// Operators taking an operand on each side.
    #[token(".", |_| DyadicOperator::InnerProduct)]
    #[token("∘", |_| DyadicOperator::Jot)]
    #[token("⍤", |_| DyadicOperator::Atop)]
    #[token("⍥", |_| DyadicOperator::Over)]
    #[token("⍣", |_| DyadicOperator::Power)]
    DyadicOp(DyadicOperator),
    /// `∘.`, the outer product prefix.
    #[token("∘.")]
    JotDot,
    /// `⍺`
    #[token("⍺")]
    Alpha,
    /// `⍵`
    #[token("⍵")]
    Omega,
    /// `∇`
    #[token("∇")]
    Del,
    /// `←`
    #[token("←")]
    Assign,
    /// `:`
    #[token(":")]
    Colon,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// Statement separators: `⋄`, `◊` and newlines.
    #[token("⋄")]
    #[token("◊")]
    #[token("\n", |lex| {
        lex.extras.line += 1;
        lex.extras.line_start = lex.span().end;
    })]
    Separator,
    /// `⍝ Comments.`
    #[regex(r"⍝[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// Blanks between tokens.
    #[regex(r"[ \t\f\r]+", logos::skip)]
    Ignored,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "'{}'", text.replace('\'', "''")),
            Self::Name(name) | Self::SystemName(name) => write!(f, "{name}"),
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::MonadicOp(operator) => write!(f, "{operator}"),
            Self::DyadicOp(operator) => write!(f, "{operator}"),
            Self::JotDot => write!(f, "∘."),
            Self::Alpha => write!(f, "⍺"),
            Self::Omega => write!(f, "⍵"),
            Self::Del => write!(f, "∇"),
            Self::Assign => write!(f, "←"),
            Self::Colon => write!(f, ":"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBrace => write!(f, "{{"),
            Self::RBrace => write!(f, "}}"),
            Self::Separator => write!(f, "end of statement"),
            Self::Comment => write!(f, "comment"),
            Self::Ignored => write!(f, "whitespace"),
        }
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks where the current line starts so tokens can be given a line and a
/// column.
#[derive(Debug)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

impl LexerExtras {
    /// The position of the token starting at byte offset `start`. Columns
    /// count characters, not bytes.
    fn position(&self, source: &str, start: usize) -> Position {
        let column = source.get(self.line_start..start)
                           .map_or(1, |prefix| prefix.chars().count() + 1);
        Position::new(self.line, column)
    }
}

/// Splits source text into positioned tokens.
///
/// # Errors
/// Returns `UnrecognizedInput` for the first piece of text that is not a
/// token, including malformed numbers and unterminated strings.
///
/// # Example
/// ```
/// use aplite::{
///     ast::{Position, Primitive},
///     interpreter::lexer::{Token, tokenize},
/// };
///
/// let tokens = tokenize("x←1+2").unwrap();
/// assert_eq!(tokens.len(), 5);
/// assert_eq!(tokens[3], (Token::Primitive(Primitive::Plus), Position::new(1, 4)));
///
/// assert!(tokenize("1 $ 2").is_err());
/// ```
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token, Position)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras::default());

    while let Some(token) = lexer.next() {
        let position = lexer.extras.position(source, lexer.span().start);
        match token {
            Ok(token) => tokens.push((token, position)),
            Err(()) => {
                return Err(ParseError::UnrecognizedInput { text: lexer.slice().to_string(),
                                                           position });
            },
        }
    }

    Ok(tokens)
}

/// Parses a numeric literal from the current token slice.
///
/// `¯` marks a negative mantissa or exponent and `J` separates the real part
/// from the imaginary part.
///
/// # Returns
/// - `Some(ComplexNumber)`: The parsed value if successful.
/// - `None`: If either part is not a valid float.
fn parse_number(lex: &logos::Lexer<Token>) -> Option<ComplexNumber> {
    let literal = lex.slice().replace('¯', "-");
    let mut parts = literal.split(['j', 'J']);
    let real = parts.next()?.parse().ok()?;
    let imaginary = match parts.next() {
        Some(part) => part.parse().ok()?,
        None => 0.0,
    };
    Some(ComplexNumber::new(real, imaginary))
}

/// Strips the quotes from a text literal and undoubles embedded quotes.
fn parse_text(lex: &logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].replace("''", "'")
}
