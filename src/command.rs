use rpncalc::calc_engine::format_result;
use rpncalc::{Calculator, Operand};

/// A line of user input, as understood by every front end.
#[derive(Debug, PartialEq)]
pub enum Command<'a> {
    Quit,
    ClearHistory,
    ShowHistory,
    Help,
    Memory(MemoryCommand<'a>),
    Evaluate { expression: &'a str, detailed: bool },
}

#[derive(Debug, PartialEq)]
pub enum MemoryCommand<'a> {
    Recall,
    Clear,
    Add(&'a str),
    Subtract(&'a str),
    Store(&'a str),
}

const DETAILS: &str = "details";

pub fn parse_command(input: &str) -> Option<Command<'_>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let command = match input.to_lowercase().as_str() {
        "quit" | "exit" | "q" => Command::Quit,
        "clear" | "reset" => Command::ClearHistory,
        "history" => Command::ShowHistory,
        "help" => Command::Help,
        "mr" => Command::Memory(MemoryCommand::Recall),
        "mc" => Command::Memory(MemoryCommand::Clear),
        _ => {
            if let Some(rest) = strip_prefix_ignore_case(input, "m+") {
                Command::Memory(MemoryCommand::Add(rest.trim()))
            } else if let Some(rest) = strip_prefix_ignore_case(input, "m-") {
                Command::Memory(MemoryCommand::Subtract(rest.trim()))
            } else if let Some(rest) = strip_prefix_ignore_case(input, "ms") {
                Command::Memory(MemoryCommand::Store(rest.trim()))
            } else {
                parse_evaluation(input)
            }
        }
    };
    Some(command)
}

// "details <expr>" or "<expr> details"
fn parse_evaluation(input: &str) -> Command<'_> {
    let prefix = input
        .split_once(char::is_whitespace)
        .filter(|(word, _)| word.eq_ignore_ascii_case(DETAILS))
        .map(|(_, rest)| rest);
    let suffix = input
        .rsplit_once(char::is_whitespace)
        .filter(|(_, word)| word.eq_ignore_ascii_case(DETAILS))
        .map(|(rest, _)| rest);

    match prefix.or(suffix) {
        Some(expression) => Command::Evaluate { expression: expression.trim(), detailed: true },
        None => Command::Evaluate { expression: input, detailed: false },
    }
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    input
        .get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &input[prefix.len()..])
}

impl MemoryCommand<'_> {
    /// Applies the command and returns a status line such as `M = 42`.
    ///
    /// An empty operand for `m+`, `m-` and `ms` takes the last successful
    /// result from the history.
    pub fn run(&self, calculator: &mut Calculator) -> String {
        let result = match self {
            MemoryCommand::Recall => Ok(calculator.memory_recall()),
            MemoryCommand::Clear => {
                calculator.memory_clear();
                Ok(0.0)
            }
            MemoryCommand::Add(text) => {
                let operand = operand(calculator, text);
                calculator.memory_add(operand)
            }
            MemoryCommand::Subtract(text) => {
                let operand = operand(calculator, text);
                calculator.memory_subtract(operand)
            }
            MemoryCommand::Store(text) => {
                let operand = operand(calculator, text);
                calculator.memory_store(operand)
            }
        };

        match result {
            Ok(value) => format!("M = {}", format_result(value)),
            Err(e) => format!("Error: {}", e),
        }
    }
}

fn operand(calculator: &Calculator, text: &str) -> Operand {
    if !text.is_empty() {
        return Operand::from(text);
    }
    calculator
        .history()
        .iter()
        .rev()
        .find_map(|entry| entry.outcome.as_ref().ok().copied())
        .map(Operand::Value)
        .unwrap_or(Operand::Value(0.0))
}
