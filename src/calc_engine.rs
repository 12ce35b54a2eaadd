//! Expression pipeline: tokenizer, shunting-yard converter and RPN evaluator.

pub mod error;
pub mod evaluator;
pub mod format;
pub mod postfix;
pub mod token;
pub mod tokenizer;

pub use error::{CalcError, ErrorKind};
pub use evaluator::{evaluate, evaluate_traced, EvaluationTrace, Step};
pub use format::{format_result, format_with_spaces};
pub use postfix::to_postfix;
pub use token::{Associativity, Function, Operator, Token, FUNCTIONS};
pub use tokenizer::tokenize;

/// Runs an expression through all three stages.
pub fn evaluate_expression(expression: &str) -> Result<f64, CalcError> {
    evaluate_expression_traced(expression, &mut EvaluationTrace::new(false))
}

pub fn evaluate_expression_traced(
    expression: &str,
    trace: &mut EvaluationTrace,
) -> Result<f64, CalcError> {
    let tokens = tokenize(expression)?;
    let postfix = to_postfix(&tokens)?;
    evaluate_traced(&postfix, trace)
}
