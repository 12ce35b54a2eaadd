use super::error::CalcError;
use super::token::{render, Associativity, Token};
use log::debug;

/// Converts infix tokens to postfix order with the shunting-yard algorithm.
///
/// Besides parenthesis matching this checks token adjacency: an operand can
/// not follow another operand and a binary operator needs a left operand.
/// Operand counts inside a well-ordered sequence are left to the evaluator.
pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>, CalcError> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Token> = Vec::new();
    let mut expect_operand = true;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Number { .. } => {
                if !expect_operand {
                    return Err(CalcError::UnexpectedToken(token.to_string()));
                }
                output.push(token.clone());
                expect_operand = false;
            }
            Token::Function(func) => {
                if !expect_operand {
                    return Err(CalcError::UnexpectedToken(token.to_string()));
                }
                if tokens.get(i + 1) != Some(&Token::LParen) {
                    return Err(CalcError::FunctionWithoutParentheses(func.name.to_string()));
                }
                stack.push(token.clone());
            }
            // Prefix operators have no left operand, so nothing is popped for them.
            Token::Op(op) if op.is_unary() => {
                if !expect_operand {
                    return Err(CalcError::UnexpectedToken(token.to_string()));
                }
                stack.push(token.clone());
            }
            Token::Op(op) => {
                if expect_operand {
                    return Err(CalcError::InsufficientOperands(op.symbol().to_string()));
                }
                while let Some(Token::Op(top)) = stack.last() {
                    let pops = match op.associativity() {
                        Associativity::Left => top.precedence() >= op.precedence(),
                        Associativity::Right => top.precedence() > op.precedence(),
                    };
                    if !pops {
                        break;
                    }
                    if let Some(popped) = stack.pop() {
                        output.push(popped);
                    }
                }
                stack.push(token.clone());
                expect_operand = true;
            }
            Token::LParen => {
                if !expect_operand {
                    return Err(CalcError::UnexpectedToken(token.to_string()));
                }
                stack.push(Token::LParen);
            }
            Token::RParen => {
                // `(` and `)` alone is left to the evaluator; `(1,)` and `(1+)` are not.
                if expect_operand {
                    match i.checked_sub(1).and_then(|j| tokens.get(j)) {
                        Some(Token::Comma) => return Err(CalcError::MisplacedComma),
                        Some(Token::Op(op)) => {
                            return Err(CalcError::InsufficientOperands(op.symbol().to_string()))
                        }
                        _ => {}
                    }
                }
                pop_until_left_paren(&mut stack, &mut output)
                    .ok_or(CalcError::MismatchedParentheses)?;
                stack.pop();
                if let Some(Token::Function(_)) = stack.last() {
                    if let Some(func) = stack.pop() {
                        output.push(func);
                    }
                }
                expect_operand = false;
            }
            Token::Comma => {
                if expect_operand {
                    return Err(CalcError::MisplacedComma);
                }
                pop_until_left_paren(&mut stack, &mut output).ok_or(CalcError::MisplacedComma)?;
                expect_operand = true;
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top == Token::LParen {
            return Err(CalcError::MismatchedParentheses);
        }
        output.push(top);
    }

    debug!("postfix: [{}]", render(&output));
    Ok(output)
}

// Moves operators to the output until a '(' is on top. The '(' stays on the
// stack. Returns None when the stack runs out first.
fn pop_until_left_paren(stack: &mut Vec<Token>, output: &mut Vec<Token>) -> Option<()> {
    loop {
        match stack.last() {
            Some(Token::LParen) => return Some(()),
            Some(_) => output.extend(stack.pop()),
            None => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc_engine::error::ErrorKind;
    use crate::calc_engine::tokenizer::tokenize;

    fn postfix(input: &str) -> Result<String, CalcError> {
        let tokens = tokenize(input)?;
        to_postfix(&tokens).map(|out| render(&out))
    }

    #[test]
    fn precedence() {
        assert_eq!(postfix("2 + 3 * 4").unwrap(), "2 3 4 * +");
        assert_eq!(postfix("(2 + 3) * 4").unwrap(), "2 3 + 4 *");
        assert_eq!(postfix("2 * 3 + 4").unwrap(), "2 3 * 4 +");
    }

    #[test]
    fn left_associativity() {
        assert_eq!(postfix("8 - 4 - 2").unwrap(), "8 4 - 2 -");
        assert_eq!(postfix("8 / 4 / 2").unwrap(), "8 4 / 2 /");
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(postfix("2 ^ 3 ^ 2").unwrap(), "2 3 2 ^ ^");
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        assert_eq!(postfix("-2 ^ 2").unwrap(), "2 2 ^ neg");
        assert_eq!(postfix("2 ^ -2").unwrap(), "2 2 neg ^");
        assert_eq!(postfix("-2 * 3").unwrap(), "2 neg 3 *");
        assert_eq!(postfix("5 - -3").unwrap(), "5 3 neg -");
    }

    #[test]
    fn functions_follow_their_argument() {
        assert_eq!(postfix("sqrt(16)").unwrap(), "16 sqrt");
        assert_eq!(postfix("2 * sin(1 + 2)").unwrap(), "2 1 2 + sin *");
        assert_eq!(postfix("abs(-cos(0))").unwrap(), "0 cos neg abs");
    }

    #[test]
    fn mismatched_parentheses() {
        for input in ["(2 + 3", "2 + 3)", ")(", "((1)", "sqrt(4"] {
            assert_eq!(
                postfix(input).unwrap_err().kind(),
                ErrorKind::MismatchedParentheses,
                "{}",
                input
            );
        }
    }

    #[test]
    fn comma_outside_parentheses() {
        assert_eq!(postfix("1 , 2").unwrap_err(), CalcError::MisplacedComma);
    }

    #[test]
    fn comma_inside_parentheses_splits_argument() {
        assert_eq!(postfix("sin(1 + 2, 3)").unwrap(), "1 2 + 3 sin");
    }

    #[test]
    fn dangling_comma_is_rejected() {
        for input in ["sqrt(,16)", "(1,)", "sin(0,)", "(,2) * 3", "(1,,2)"] {
            assert_eq!(postfix(input).unwrap_err(), CalcError::MisplacedComma, "{}", input);
        }
    }

    #[test]
    fn operator_before_right_paren() {
        assert_eq!(
            postfix("(1 +)").unwrap_err(),
            CalcError::InsufficientOperands("+".into())
        );
        assert_eq!(postfix("abs(-)").unwrap_err().kind(), ErrorKind::InsufficientOperands);
        // an empty group still converts; the evaluator reports it
        assert_eq!(postfix("()").unwrap(), "");
    }

    #[test]
    fn operator_adjacency() {
        assert_eq!(
            postfix("6 * / 2").unwrap_err(),
            CalcError::InsufficientOperands("/".into())
        );
        assert_eq!(
            postfix("* 2").unwrap_err().kind(),
            ErrorKind::InsufficientOperands
        );
        assert_eq!(postfix("2 3").unwrap_err(), CalcError::UnexpectedToken("3".into()));
        assert_eq!(postfix("1 2 +").unwrap_err().kind(), ErrorKind::MalformedExpression);
        assert_eq!(postfix("2 (3)").unwrap_err().kind(), ErrorKind::MalformedExpression);
    }

    #[test]
    fn function_needs_parentheses() {
        assert_eq!(
            postfix("sqrt 4").unwrap_err(),
            CalcError::FunctionWithoutParentheses("sqrt".into())
        );
    }
}
