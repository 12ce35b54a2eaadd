use std::f64::consts::{E, PI};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

/// Arithmetic operators. Unary minus and plus are distinct from their binary
/// forms; the tokenizer decides which one a `-` or `+` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
    Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    pub symbol: char,
    pub precedence: u8,
    pub associativity: Associativity,
    pub arity: usize,
}

impl Operator {
    pub const fn info(self) -> OperatorInfo {
        use Associativity::*;
        let (symbol, precedence, associativity, arity) = match self {
            Operator::Add => ('+', 1, Left, 2),
            Operator::Sub => ('-', 1, Left, 2),
            Operator::Mul => ('*', 2, Left, 2),
            Operator::Div => ('/', 2, Left, 2),
            Operator::Neg => ('-', 3, Right, 1),
            Operator::Pos => ('+', 3, Right, 1),
            Operator::Pow => ('^', 4, Right, 2),
        };
        OperatorInfo { symbol, precedence, associativity, arity }
    }

    /// Binary operator for `c`. Unary forms are never produced here.
    pub fn binary(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '^' => Some(Operator::Pow),
            _ => None,
        }
    }

    pub fn unary(c: char) -> Option<Self> {
        match c {
            '-' => Some(Operator::Neg),
            '+' => Some(Operator::Pos),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        self.info().symbol
    }

    pub fn precedence(self) -> u8 {
        self.info().precedence
    }

    pub fn associativity(self) -> Associativity {
        self.info().associativity
    }

    pub fn is_unary(self) -> bool {
        self.info().arity == 1
    }
}

/// Valid input range of a [`Function`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    All,
    NonNegative,
    Positive,
}

impl Domain {
    pub fn contains(self, x: f64) -> bool {
        match self {
            Domain::All => true,
            Domain::NonNegative => x >= 0.0,
            Domain::Positive => x > 0.0,
        }
    }
}

#[derive(Debug)]
pub struct Function {
    pub name: &'static str,
    pub domain: Domain,
    pub apply: fn(f64) -> f64,
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

pub static FUNCTIONS: [Function; 7] = [
    Function { name: "sin", domain: Domain::All, apply: f64::sin },
    Function { name: "cos", domain: Domain::All, apply: f64::cos },
    Function { name: "tan", domain: Domain::All, apply: f64::tan },
    Function { name: "log", domain: Domain::Positive, apply: f64::log10 },
    Function { name: "ln", domain: Domain::Positive, apply: f64::ln },
    Function { name: "sqrt", domain: Domain::NonNegative, apply: f64::sqrt },
    Function { name: "abs", domain: Domain::All, apply: f64::abs },
];

pub const CONSTANTS: [(&str, f64); 2] = [("pi", PI), ("e", E)];

/// Looks up a function by its lowercase name.
pub fn lookup_function(name: &str) -> Option<&'static Function> {
    FUNCTIONS.iter().find(|f| f.name == name)
}

pub fn lookup_constant(name: &str) -> Option<f64> {
    CONSTANTS.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number { text: String, value: f64 },
    Op(Operator),
    Function(&'static Function),
    LParen,
    RParen,
    Comma,
}

impl Token {
    pub fn number(text: impl Into<String>, value: f64) -> Self {
        Token::Number { text: text.into(), value }
    }

    /// True when a `-` or `+` following this token must be unary.
    pub fn expects_operand_after(&self) -> bool {
        matches!(
            self,
            Token::Op(_) | Token::Function(_) | Token::LParen | Token::Comma
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number { text, .. } => write!(f, "{}", text),
            Token::Op(op) => write!(f, "{}", op.symbol()),
            Token::Function(func) => write!(f, "{}", func.name),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// Space separated rendering of a token sequence, with unary operators marked.
pub fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| match t {
            Token::Op(Operator::Neg) => "neg".to_string(),
            Token::Op(Operator::Pos) => "pos".to_string(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
