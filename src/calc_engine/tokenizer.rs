use super::error::CalcError;
use super::token::{lookup_constant, lookup_function, render, Operator, Token};
use log::debug;

/// Splits an expression into tokens.
///
/// Whitespace is skipped; every other character has to be consumed by one of
/// the token rules, otherwise the whole input is rejected. A `-` or `+` is
/// classified as unary when it starts the input or follows an operator, a
/// function name, `(` or `,`.
pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens: Vec<Token> = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        match c {
            c if c.is_whitespace() => {
                pos += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                pos += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                pos += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                pos += 1;
            }
            '+' | '-' | '*' | '/' | '^' => {
                let unary_position = tokens.last().map_or(true, Token::expects_operand_after);
                let op = unary_position
                    .then(|| Operator::unary(c))
                    .flatten()
                    .or_else(|| Operator::binary(c));
                match op {
                    Some(op) => tokens.push(Token::Op(op)),
                    None => return Err(CalcError::UnexpectedCharacter { ch: c, position: pos }),
                }
                pos += 1;
            }
            '0'..='9' | '.' => {
                let (token, next) = read_number(&chars, pos)?;
                tokens.push(token);
                pos = next;
            }
            c if c.is_alphabetic() => {
                let start = pos;
                while pos < chars.len() && chars[pos].is_alphabetic() {
                    pos += 1;
                }
                let name: String = chars[start..pos].iter().collect::<String>().to_lowercase();

                if let Some(value) = lookup_constant(&name) {
                    tokens.push(Token::number(name, value));
                } else if let Some(func) = lookup_function(&name) {
                    tokens.push(Token::Function(func));
                } else {
                    return Err(CalcError::UnknownFunction(name));
                }
            }
            _ => return Err(CalcError::UnexpectedCharacter { ch: c, position: pos }),
        }
    }

    debug!("tokenized {:?} into [{}]", input, render(&tokens));
    Ok(tokens)
}

// Digits with at most one '.', then an optional exponent. The exponent is only
// taken when a digit follows the 'e' (possibly after a sign), so that "2e"
// still lexes as a number followed by an identifier.
fn read_number(chars: &[char], start: usize) -> Result<(Token, usize), CalcError> {
    let mut end = start;
    let mut dots = 0;

    while end < chars.len() && (chars[end].is_ascii_digit() || chars[end] == '.') {
        if chars[end] == '.' {
            dots += 1;
        }
        end += 1;
    }

    if dots <= 1 && end < chars.len() && matches!(chars[end], 'e' | 'E') {
        let mut look = end + 1;
        if look < chars.len() && matches!(chars[look], '+' | '-') {
            look += 1;
        }
        if look < chars.len() && chars[look].is_ascii_digit() {
            end = look;
            while end < chars.len() && chars[end].is_ascii_digit() {
                end += 1;
            }
        }
    }

    let literal: String = chars[start..end].iter().collect();
    if dots > 1 {
        return Err(CalcError::MalformedNumber { literal, position: start });
    }

    match literal.parse::<f64>() {
        Ok(value) => Ok((Token::number(literal, value), end)),
        Err(_) => Err(CalcError::MalformedNumber { literal, position: start }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc_engine::error::ErrorKind;

    fn ops(input: &str) -> Vec<Operator> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .filter_map(|t| match t {
                Token::Op(op) => Some(op),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn simple_expression() {
        let tokens = tokenize("2 + 3.5 * (4)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::number("2", 2.0),
                Token::Op(Operator::Add),
                Token::number("3.5", 3.5),
                Token::Op(Operator::Mul),
                Token::LParen,
                Token::number("4", 4.0),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn lexemes_reconstruct_input_without_whitespace() {
        let input = " 12.5*sqrt( 3 ) - -4 ^2 ";
        let rebuilt: String = tokenize(input).unwrap().iter().map(|t| t.to_string()).collect();
        let stripped: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(rebuilt, stripped);
    }

    #[test]
    fn unary_minus_classification() {
        assert_eq!(ops("-3"), vec![Operator::Neg]);
        assert_eq!(ops("5 - 3"), vec![Operator::Sub]);
        assert_eq!(ops("5 - -3"), vec![Operator::Sub, Operator::Neg]);
        assert_eq!(ops("(-3)"), vec![Operator::Neg]);
        assert_eq!(ops("2 ^ -1"), vec![Operator::Pow, Operator::Neg]);
        assert_eq!(ops("(1) - 1"), vec![Operator::Sub]);
        assert_eq!(ops("+4 + +4"), vec![Operator::Pos, Operator::Add, Operator::Pos]);
    }

    #[test]
    fn repeated_decimal_points_are_rejected() {
        for input in ["1..2", "3.14.15", "1 + 2.2.2"] {
            let err = tokenize(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Tokenize, "{}", input);
        }
        assert_eq!(
            tokenize("3.14.15").unwrap_err(),
            CalcError::MalformedNumber { literal: "3.14.15".into(), position: 0 }
        );
    }

    #[test]
    fn lone_dot_is_rejected() {
        assert_eq!(tokenize(".").unwrap_err().kind(), ErrorKind::Tokenize);
    }

    #[test]
    fn leading_and_trailing_dots() {
        assert_eq!(tokenize(".5").unwrap(), vec![Token::number(".5", 0.5)]);
        assert_eq!(tokenize("5.").unwrap(), vec![Token::number("5.", 5.0)]);
    }

    #[test]
    fn exponent_suffix() {
        assert_eq!(tokenize("1.5e3").unwrap(), vec![Token::number("1.5e3", 1500.0)]);
        assert_eq!(tokenize("2E-2").unwrap(), vec![Token::number("2E-2", 0.02)]);
        // no digit after the 'e': the constant e follows the number
        let tokens = tokenize("2e").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1], Token::number("e", std::f64::consts::E));
    }

    #[test]
    fn identifiers_are_case_insensitive() {
        let tokens = tokenize("SQRT(PI)").unwrap();
        assert!(matches!(tokens[0], Token::Function(f) if f.name == "sqrt"));
        assert!(matches!(&tokens[2], Token::Number { text, .. } if text == "pi"));
    }

    #[test]
    fn unknown_function() {
        assert_eq!(
            tokenize("foo(2)").unwrap_err(),
            CalcError::UnknownFunction("foo".into())
        );
    }

    #[test]
    fn stray_characters() {
        assert_eq!(
            tokenize("2 # 3").unwrap_err(),
            CalcError::UnexpectedCharacter { ch: '#', position: 2 }
        );
        assert_eq!(tokenize("4 % 2").unwrap_err().kind(), ErrorKind::Tokenize);
        assert_eq!(tokenize("x = 1").unwrap_err().kind(), ErrorKind::UnknownFunction);
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("   ").unwrap().is_empty());
    }
}
