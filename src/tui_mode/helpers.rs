use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use rpncalc::calc_engine::token::{lookup_constant, lookup_function};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Greedy word wrap by display width. Words wider than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if word.width() > width {
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            let mut chunk = String::new();
            let mut chunk_width = 0;
            for c in word.chars() {
                let char_width = UnicodeWidthChar::width_cjk(c).unwrap_or(1);
                if chunk_width + char_width > width {
                    lines.push(std::mem::take(&mut chunk));
                    chunk_width = 0;
                }
                chunk.push(c);
                chunk_width += char_width;
            }
            current_line = chunk;
            continue;
        }

        if !current_line.is_empty() && current_line.width() + 1 + word.width() > width {
            lines.push(std::mem::take(&mut current_line));
        }
        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// Function names and constants get their own color in the history view.
pub fn is_math_function(word: &str) -> bool {
    let word = word.to_lowercase();
    lookup_function(&word).is_some() || lookup_constant(&word).is_some()
}

#[derive(Clone, Copy, PartialEq)]
enum Run {
    Word,
    Number,
    Other,
}

fn run_of(c: char) -> Run {
    if c.is_alphabetic() {
        Run::Word
    } else if c.is_ascii_digit() || c == '.' {
        Run::Number
    } else {
        Run::Other
    }
}

/// Splits a formatted expression into styled spans: known names, numbers and
/// operators are colored, everything else keeps `base_style`.
pub fn highlight_functions(expr: &str, base_style: Style) -> Vec<Span<'static>> {
    let function_style = Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD);

    let operator_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let number_style = Style::default()
        .fg(Color::LightGreen);

    let mut spans = Vec::new();
    let mut chars = expr.chars().peekable();

    while let Some(c) = chars.next() {
        let run = run_of(c);
        if run == Run::Other {
            let style = match c {
                '+' | '-' | '*' | '/' | '^' => operator_style,
                _ => base_style,
            };
            spans.push(Span::styled(c.to_string(), style));
            continue;
        }

        let mut current = c.to_string();
        while let Some(&next) = chars.peek() {
            if run_of(next) != run {
                break;
            }
            current.push(next);
            chars.next();
        }

        let style = match run {
            Run::Number => number_style,
            _ if is_math_function(&current) => function_style,
            _ => base_style,
        };
        spans.push(Span::styled(current, style));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap_text("1 + 2 + 3", 5), vec!["1 + 2", "+ 3"]);
        assert_eq!(wrap_text("123456", 4), vec!["1234", "56"]);
        assert_eq!(wrap_text("anything", 0), vec![""]);
    }

    #[test]
    fn recognizes_table_names() {
        assert!(is_math_function("SQRT"));
        assert!(is_math_function("pi"));
        assert!(!is_math_function("fact"));
    }

    #[test]
    fn highlighting_keeps_text() {
        let spans = highlight_functions("sqrt(2) + 1.5", Style::default());
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "sqrt(2) + 1.5");
        assert_eq!(spans[0].content, "sqrt");
        assert_eq!(spans[0].style.fg, Some(Color::LightBlue));
    }
}
