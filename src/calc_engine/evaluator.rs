use super::error::CalcError;
use super::token::{Function, Operator, Token};
use log::trace;

pub struct Step {
    pub operation: String,
    pub result: f64,
}

/// Collects the operations applied during evaluation when `detailed_mode` is set.
pub struct EvaluationTrace {
    pub steps: Vec<Step>,
    pub detailed_mode: bool,
}

impl EvaluationTrace {
    pub fn new(detailed_mode: bool) -> Self {
        EvaluationTrace {
            steps: Vec::new(),
            detailed_mode,
        }
    }

    pub fn add_step(&mut self, operation: String, result: f64) {
        trace!("{} = {}", operation, result);
        if self.detailed_mode {
            self.steps.push(Step { operation, result });
        }
    }
}

pub fn evaluate(postfix: &[Token]) -> Result<f64, CalcError> {
    evaluate_traced(postfix, &mut EvaluationTrace::new(false))
}

/// Evaluates a postfix sequence, recording every applied operator and function.
pub fn evaluate_traced(postfix: &[Token], trace: &mut EvaluationTrace) -> Result<f64, CalcError> {
    let mut stack: Vec<f64> = Vec::new();

    for token in postfix {
        match token {
            Token::Number { value, .. } => stack.push(*value),
            Token::Function(func) => {
                let x = stack
                    .pop()
                    .ok_or_else(|| CalcError::InsufficientOperands(func.name.to_string()))?;
                let result = apply_function(func, x)?;
                trace.add_step(format!("{}({})", func.name, x), result);
                stack.push(result);
            }
            Token::Op(op) if op.is_unary() => {
                let x = stack
                    .pop()
                    .ok_or_else(|| CalcError::InsufficientOperands(op.symbol().to_string()))?;
                let result = apply_unary(*op, x);
                trace.add_step(format!("{}{}", op.symbol(), x), result);
                stack.push(result);
            }
            Token::Op(op) => {
                let (b, a) = match (stack.pop(), stack.pop()) {
                    (Some(b), Some(a)) => (b, a),
                    _ => return Err(CalcError::InsufficientOperands(op.symbol().to_string())),
                };
                let result = apply_binary(*op, a, b)?;
                trace.add_step(format!("{} {} {}", a, op.symbol(), b), result);
                stack.push(result);
            }
            Token::LParen | Token::RParen => return Err(CalcError::MismatchedParentheses),
            Token::Comma => return Err(CalcError::MisplacedComma),
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        rest => Err(CalcError::MalformedExpression { remaining: rest.len() }),
    }
}

fn apply_function(func: &Function, x: f64) -> Result<f64, CalcError> {
    if !func.domain.contains(x) {
        return Err(CalcError::Domain { function: func.name, argument: x });
    }
    let result = (func.apply)(x);
    // sin(inf) and friends
    if result.is_nan() {
        return Err(CalcError::NotANumber(func.name.to_string()));
    }
    Ok(result)
}

fn apply_unary(op: Operator, x: f64) -> f64 {
    match op {
        Operator::Neg => -x,
        _ => x,
    }
}

fn apply_binary(op: Operator, a: f64, b: f64) -> Result<f64, CalcError> {
    let result = match op {
        Operator::Add => a + b,
        Operator::Sub => a - b,
        Operator::Mul => a * b,
        Operator::Div => {
            if b == 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            a / b
        }
        Operator::Pow => a.powf(b),
        // prefix operators ignore the left operand
        Operator::Neg | Operator::Pos => apply_unary(op, b),
    };
    // inf - inf, 0 * inf, (-8) ^ 0.5 ...
    if result.is_nan() {
        return Err(CalcError::NotANumber(op.symbol().to_string()));
    }
    Ok(result)
}
