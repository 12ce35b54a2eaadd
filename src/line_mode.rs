use crate::command::{parse_command, Command};
use anyhow::{Context, Result};
use rpncalc::calc_engine::{format_result, format_with_spaces};
use rpncalc::Calculator;
use std::io::{stdin, stdout, Write};
use termion::{
    clear::CurrentLine as ClearLine,
    cursor::{DetectCursorPos, Goto},
    event::Key,
    input::TermRead,
    raw::IntoRawMode,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const PROMPT: &str = "Expression: ";

// Cursor positions are counted in grapheme clusters.
fn grapheme_byte_index(s: &str, index: usize) -> usize {
    s.grapheme_indices(true)
        .nth(index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn grapheme_count(s: &str) -> usize {
    s.graphemes(true).count()
}

fn remove_grapheme(s: &mut String, index: usize) {
    let start = grapheme_byte_index(s, index);
    let end = grapheme_byte_index(s, index + 1);
    s.drain(start..end);
}

pub fn run_line() -> Result<()> {
    println!("rpncalc line mode");
    println!("Supports: + - * / ^, unary minus, parentheses");
    println!("Functions: sin cos tan log ln sqrt abs; constants: pi, e");
    println!("Memory: ms/m+/m- <expr>, mr, mc");
    println!("Navigation: ←/→, Backspace/Delete, Home/End, ↑/↓ for history");
    println!("Special commands: 'quit' to exit, 'history' to list, 'clear' to reset history");
    println!("\rAdd 'details' before expression for step-by-step evaluation\n");

    let mut stdout = stdout().into_raw_mode().context("failed to enter raw mode")?;
    let mut calculator = Calculator::new();
    let stdin = stdin();
    let mut keys = stdin.keys();

    loop {
        let mut expression = String::new();
        let mut cursor_pos = 0;
        let mut history_index = calculator.history().len();
        let (_, initial_y) = stdout.cursor_pos()?;

        loop {
            write!(stdout, "{}{}{}{}", Goto(1, initial_y), ClearLine, PROMPT, expression)?;

            let prefix_end = grapheme_byte_index(&expression, cursor_pos);
            let column = 1 + PROMPT.len() + expression[..prefix_end].width();
            write!(stdout, "{}", Goto(column as u16, initial_y))?;
            stdout.flush()?;

            let Some(key) = keys.next() else {
                return Ok(());
            };
            match key? {
                Key::Char('\n') => break,
                Key::Ctrl('c') | Key::Ctrl('d') => {
                    write!(stdout, "\r\n")?;
                    return Ok(());
                }
                Key::Char(c) => {
                    let byte_idx = grapheme_byte_index(&expression, cursor_pos);
                    expression.insert(byte_idx, c);
                    // a combining mark may merge into the previous grapheme
                    cursor_pos = grapheme_count(&expression[..byte_idx + c.len_utf8()]);
                }
                Key::Backspace if cursor_pos > 0 => {
                    cursor_pos -= 1;
                    remove_grapheme(&mut expression, cursor_pos);
                }
                Key::Delete if cursor_pos < grapheme_count(&expression) => {
                    remove_grapheme(&mut expression, cursor_pos);
                }
                Key::Left if cursor_pos > 0 => cursor_pos -= 1,
                Key::Right if cursor_pos < grapheme_count(&expression) => cursor_pos += 1,
                Key::Home => cursor_pos = 0,
                Key::End => cursor_pos = grapheme_count(&expression),
                Key::Up if history_index > 0 => {
                    history_index -= 1;
                    expression = calculator.history()[history_index].expression.clone();
                    cursor_pos = grapheme_count(&expression);
                }
                Key::Down => {
                    let len = calculator.history().len();
                    if history_index + 1 < len {
                        history_index += 1;
                        expression = calculator.history()[history_index].expression.clone();
                    } else {
                        history_index = len;
                        expression.clear();
                    }
                    cursor_pos = grapheme_count(&expression);
                }
                _ => {}
            }
        }

        let Some(command) = parse_command(&expression) else {
            write!(stdout, "\r\n")?;
            continue;
        };

        match command {
            Command::Quit => {
                write!(stdout, "\r\nGoodbye!\r\n")?;
                return Ok(());
            }
            Command::ClearHistory => {
                calculator.clear_history();
                write!(stdout, "\r\nHistory cleared\r\n\n")?;
            }
            Command::ShowHistory => {
                write!(stdout, "\r\n")?;
                if calculator.history().is_empty() {
                    write!(stdout, "  No calculations yet\r\n")?;
                }
                for entry in calculator.history() {
                    write!(stdout, "  {}\r\n", entry)?;
                }
                write!(stdout, "\n")?;
            }
            Command::Help => {
                write!(stdout, "\r\n  help is available in the full-screen mode\r\n\n")?;
            }
            Command::Memory(memory) => {
                let status = memory.run(&mut calculator);
                write!(stdout, "\r\n  {}\r\n\n", status)?;
            }
            Command::Evaluate { expression, detailed } => {
                let formatted_expr = format_with_spaces(expression);
                if detailed {
                    if let Some(entry) = calculator.calculate_detailed(expression) {
                        write!(stdout, "\r\n  {} = {}\r\n", formatted_expr, entry.display)?;
                        if !entry.steps.is_empty() {
                            write!(stdout, "\r\n  Step-by-step evaluation:\r\n")?;
                            for (i, step) in entry.steps.iter().enumerate() {
                                let result = format_result(step.result);
                                write!(stdout, "\r  Step {}: {} = {}\r\n", i + 1, step.operation, result)?;
                            }
                        }
                        write!(
                            stdout,
                            "\r  Time: {:.6} ms\r\n\n",
                            entry.duration.as_secs_f64() * 1000.0
                        )?;
                    }
                } else {
                    let result = calculator.calculate(expression);
                    write!(stdout, "\r\n  {} = {}\r\n\n", formatted_expr, result)?;
                }
            }
        }
        stdout.flush()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grapheme_editing() {
        let mut s = String::from("2e\u{301}3");
        assert_eq!(grapheme_count(&s), 3);
        assert_eq!(grapheme_byte_index(&s, 2), 4);
        remove_grapheme(&mut s, 1);
        assert_eq!(s, "23");
    }
}
