use thiserror::Error;

/// Coarse classification of a [`CalcError`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Tokenize,
    MismatchedParentheses,
    UnknownFunction,
    InsufficientOperands,
    DivisionByZero,
    Domain,
    MalformedExpression,
}

/// Everything that can go wrong between an input string and its value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("malformed number '{literal}' at position {position}")]
    MalformedNumber { literal: String, position: usize },

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("function '{0}' requires parentheses")]
    FunctionWithoutParentheses(String),

    /// An operand or `(` appeared right after another operand.
    #[error("unexpected '{0}' after an operand")]
    UnexpectedToken(String),

    #[error("mismatched parentheses")]
    MismatchedParentheses,

    #[error("argument separator outside of parentheses")]
    MisplacedComma,

    #[error("missing operand for '{0}'")]
    InsufficientOperands(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("{function} is undefined for {argument}")]
    Domain { function: &'static str, argument: f64 },

    #[error("result of '{0}' is not a number")]
    NotANumber(String),

    /// Evaluation finished with `remaining` values on the stack instead of one.
    #[error("malformed expression ({remaining} values left on the stack)")]
    MalformedExpression { remaining: usize },
}

impl CalcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::UnexpectedCharacter { .. } | CalcError::MalformedNumber { .. } => {
                ErrorKind::Tokenize
            }
            CalcError::UnknownFunction(_) => ErrorKind::UnknownFunction,
            CalcError::FunctionWithoutParentheses(_)
            | CalcError::UnexpectedToken(_)
            | CalcError::MalformedExpression { .. } => ErrorKind::MalformedExpression,
            CalcError::MismatchedParentheses | CalcError::MisplacedComma => {
                ErrorKind::MismatchedParentheses
            }
            CalcError::InsufficientOperands(_) => ErrorKind::InsufficientOperands,
            CalcError::DivisionByZero => ErrorKind::DivisionByZero,
            CalcError::Domain { .. } | CalcError::NotANumber(_) => ErrorKind::Domain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fine_grained_variants_map_onto_taxonomy() {
        let malformed = CalcError::MalformedNumber { literal: "1..2".into(), position: 0 };
        assert_eq!(malformed.kind(), ErrorKind::Tokenize);
        assert_eq!(CalcError::MisplacedComma.kind(), ErrorKind::MismatchedParentheses);
        assert_eq!(CalcError::NotANumber("^".into()).kind(), ErrorKind::Domain);
        assert_eq!(
            CalcError::FunctionWithoutParentheses("sin".into()).kind(),
            ErrorKind::MalformedExpression
        );
    }

    #[test]
    fn domain_message_names_function_and_argument() {
        let err = CalcError::Domain { function: "sqrt", argument: -4.0 };
        assert_eq!(err.to_string(), "sqrt is undefined for -4");
    }
}
