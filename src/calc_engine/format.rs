use super::token::Token;
use super::tokenizer::tokenize;

/// Magnitudes above this are shown in scientific notation.
pub const SCIENTIFIC_ABOVE: f64 = 1e15;
/// Nonzero magnitudes below this are shown in scientific notation.
pub const SCIENTIFIC_BELOW: f64 = 1e-6;
pub const MAX_FRACTION_DIGITS: usize = 10;

/// Renders a result for display.
///
/// Integral values have no decimal point, very large or very small values use
/// the shortest scientific form that parses back to the same number, and
/// everything else is rounded to at most ten fractional digits with trailing
/// zeros removed.
pub fn format_result(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }

    let magnitude = x.abs();
    if magnitude > SCIENTIFIC_ABOVE || magnitude < SCIENTIFIC_BELOW {
        return format!("{:e}", x);
    }
    if x.fract() == 0.0 {
        return format!("{:.0}", x);
    }

    let s = format!("{:.*}", MAX_FRACTION_DIGITS, x);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Normalizes spacing of an expression for display: binary operators are
/// surrounded by spaces, unary operators and function calls are kept tight.
/// Input that does not tokenize only has its whitespace collapsed.
pub fn format_with_spaces(expr: &str) -> String {
    let tokens = match tokenize(expr) {
        Ok(tokens) => tokens,
        Err(_) => return expr.split_whitespace().collect::<Vec<_>>().join(" "),
    };

    let mut result = String::new();
    let mut prev: Option<&Token> = None;

    for token in &tokens {
        let space_before = match (prev, token) {
            (None, _) => false,
            (Some(Token::LParen | Token::Function(_)), _) => false,
            (Some(Token::Op(op)), _) if op.is_unary() => false,
            (_, Token::RParen | Token::Comma) => false,
            _ => true,
        };
        if space_before {
            result.push(' ');
        }
        result.push_str(&token.to_string());
        prev = Some(token);
    }

    result
}
