use crate::command::{parse_command, Command, MemoryCommand};
use rpncalc::calc_engine::format_result;
use rpncalc::Calculator;

pub struct App {
    pub calculator: Calculator,
    pub input: String,
    pub cursor_position: usize,
    pub input_scroll: usize,
    pub cursor_history: usize,
    pub should_quit: bool,
    pub show_help: bool,
    pub help_scroll: usize,
    pub list_height: usize,
    pub item_start_indices: Vec<usize>,
    pub history_scroll: usize,
    pub scroll_to_bottom: bool,
    pub terminal_too_small: bool,
    /// Outcome of the last memory command, shown in the status bar.
    pub status: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        App::new()
    }
}

impl App {
    pub fn new() -> Self {
        App {
            calculator: Calculator::new(),
            input: String::new(),
            cursor_position: 0,
            input_scroll: 0,
            cursor_history: 0,
            should_quit: false,
            show_help: false,
            help_scroll: 0,
            list_height: 5,
            item_start_indices: Vec::new(),
            history_scroll: 0,
            scroll_to_bottom: false,
            terminal_too_small: false,
            status: None,
        }
    }

    pub fn adjust_input_scroll(&mut self, visible_width: usize) {
        let total_chars = self.input.chars().count();
        let cursor_pos = self.cursor_position;

        if cursor_pos < self.input_scroll {
            self.input_scroll = cursor_pos;
        }
        else if cursor_pos >= self.input_scroll + visible_width {
            self.input_scroll = cursor_pos - visible_width + 1;
        }

        if self.input_scroll > total_chars.saturating_sub(visible_width) {
            self.input_scroll = total_chars.saturating_sub(visible_width);
        }
    }

    pub fn submit(&mut self) {
        let input = self.input.clone();
        let Some(command) = parse_command(&input) else {
            return;
        };

        match command {
            Command::Quit => {
                self.should_quit = true;
                return;
            }
            Command::ClearHistory => {
                self.calculator.clear_history();
                self.cursor_history = 0;
                self.history_scroll = 0;
                self.status = None;
            }
            // the list is always on screen; jump back to its newest entry
            Command::ShowHistory => {
                self.cursor_history = self.calculator.history().len().saturating_sub(1);
                self.scroll_to_bottom = true;
            }
            Command::Help => {
                self.show_help = true;
            }
            Command::Memory(MemoryCommand::Recall) => {
                let value = format_result(self.calculator.memory_recall());
                self.clear_input();
                self.insert_str(&value);
                self.status = Some(format!("M = {}", value));
                return;
            }
            Command::Memory(memory) => {
                self.status = Some(memory.run(&mut self.calculator));
            }
            Command::Evaluate { expression, detailed } => {
                if detailed {
                    self.calculator.calculate_detailed(expression);
                } else {
                    self.calculator.calculate(expression);
                }
                self.cursor_history = self.calculator.history().len().saturating_sub(1);
                self.scroll_to_bottom = true;
            }
        }

        self.clear_input();
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = App::char_index_to_byte_index(&self.input, self.cursor_position);
        self.input.insert(byte_idx, c);
        self.cursor_position += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert_char(c);
        }
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            self.delete_at_cursor();
        }
    }

    pub fn delete_at_cursor(&mut self) {
        let byte_idx = App::char_index_to_byte_index(&self.input, self.cursor_position);
        if let Some(c) = self.input[byte_idx..].chars().next() {
            self.input.drain(byte_idx..byte_idx + c.len_utf8());
        }
    }

    pub fn move_cursor(&mut self, direction: i32) {
        match direction {
            -1 => self.cursor_position = self.cursor_position.saturating_sub(1),
            1 => self.cursor_position = (self.cursor_position + 1).min(self.input.chars().count()),
            _ => {}
        }
    }

    pub fn move_cursor_by_words(&mut self, direction: i32) {
        let input_chars: Vec<char> = self.input.chars().collect();
        let mut pos = self.cursor_position;

        if direction < 0 {
            while pos > 0 && input_chars[pos - 1].is_whitespace() {
                pos -= 1;
            }
            while pos > 0 && !input_chars[pos - 1].is_whitespace() {
                pos -= 1;
            }
        } else {
            let len = input_chars.len();
            while pos < len && !input_chars[pos].is_whitespace() {
                pos += 1;
            }
            while pos < len && input_chars[pos].is_whitespace() {
                pos += 1;
            }
        }

        self.cursor_position = pos.min(input_chars.len());
    }

    pub fn navigate_history(&mut self, direction: i32) {
        let len = self.calculator.history().len();
        if direction < 0 && self.cursor_history > 0 {
            self.cursor_history -= 1;
        } else if direction > 0 && self.cursor_history < len.saturating_sub(1) {
            self.cursor_history += 1;
        }
        self.recall_selected();
    }

    pub fn scroll_history(&mut self, direction: i32) {
        let step = self.list_height.saturating_sub(1);
        if direction < 0 {
            self.cursor_history = self.cursor_history.saturating_sub(step);
        } else {
            self.cursor_history = self.cursor_history.saturating_add(step)
                .min(self.calculator.history().len().saturating_sub(1));
        }
        self.recall_selected();
    }

    fn recall_selected(&mut self) {
        match self.calculator.history().get(self.cursor_history) {
            Some(entry) => self.input = entry.expression.clone(),
            None => self.input.clear(),
        }
        self.cursor_position = self.input.chars().count();
        self.input_scroll = 0;
        self.scroll_to_bottom = false;
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.input_scroll = 0;
    }

    pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
        s.char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or_else(|| s.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(app: &mut App, line: &str) {
        app.clear_input();
        app.insert_str(line);
        app.submit();
    }

    #[test]
    fn default_starts_empty() {
        let app = App::default();
        assert!(app.input.is_empty());
        assert!(app.calculator.history().is_empty());
        assert!(!app.calculator.has_memory());
        assert!(app.status.is_none());
    }

    #[test]
    fn evaluation_goes_to_calculator_history() {
        let mut app = App::new();
        submit(&mut app, "2 + 2");
        submit(&mut app, "details 3 * 3");
        let history = app.calculator.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].display, "4");
        assert!(history[1].detailed);
        assert_eq!(app.cursor_history, 1);
        assert!(app.input.is_empty());
    }

    #[test]
    fn memory_recall_fills_input() {
        let mut app = App::new();
        submit(&mut app, "ms 1.5");
        assert_eq!(app.status.as_deref(), Some("M = 1.5"));
        submit(&mut app, "mr");
        assert_eq!(app.input, "1.5");
        assert_eq!(app.cursor_position, 3);
    }

    #[test]
    fn history_navigation_recalls_expressions() {
        let mut app = App::new();
        submit(&mut app, "1 + 1");
        submit(&mut app, "2 + 2");
        app.navigate_history(-1);
        assert_eq!(app.input, "1 + 1");
        app.navigate_history(1);
        assert_eq!(app.input, "2 + 2");
    }

    #[test]
    fn editing_handles_multibyte_chars() {
        let mut app = App::new();
        app.insert_str("2×3");
        app.move_cursor(-1);
        app.delete_before_cursor();
        assert_eq!(app.input, "23");
        app.insert_char('*');
        assert_eq!(app.input, "2*3");
    }

    #[test]
    fn quit_and_clear() {
        let mut app = App::new();
        submit(&mut app, "1");
        submit(&mut app, "clear");
        assert!(app.calculator.history().is_empty());
        submit(&mut app, "q");
        assert!(app.should_quit);
    }
}
