mod command;
#[cfg(feature = "line")]
mod line_mode;
#[cfg(feature = "tui")]
mod render_help;
#[cfg(feature = "tui")]
mod tui_mode;

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    run()
}

#[cfg(feature = "tui")]
fn run() -> Result<()> {
    tui_mode::run_tui()
}

#[cfg(all(feature = "line", not(feature = "tui")))]
fn run() -> Result<()> {
    line_mode::run_line()
}

// Plain prompt loop for builds without a terminal front end.
#[cfg(not(any(feature = "tui", feature = "line")))]
fn run() -> Result<()> {
    use command::{parse_command, Command};
    use rpncalc::Calculator;
    use std::io::{self, BufRead, Write};

    println!("rpncalc");
    print_usage();

    let mut calculator = Calculator::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match parse_command(&line) {
            None => continue,
            Some(Command::Quit) => {
                println!("Goodbye!");
                break;
            }
            Some(Command::ClearHistory) => {
                calculator.clear_history();
                println!("History cleared");
            }
            Some(Command::ShowHistory) => {
                for entry in calculator.history() {
                    println!("{}", entry);
                }
            }
            Some(Command::Help) => print_usage(),
            Some(Command::Memory(memory)) => println!("{}", memory.run(&mut calculator)),
            Some(Command::Evaluate { expression, detailed }) => {
                if detailed {
                    if let Some(entry) = calculator.calculate_detailed(expression) {
                        for (i, step) in entry.steps.iter().enumerate() {
                            println!("  Step {}: {} = {}", i + 1, step.operation, step.result);
                        }
                        println!("{}", entry.display);
                    }
                } else {
                    println!("{}", calculator.calculate(expression));
                }
            }
        }
    }
    Ok(())
}

#[cfg(not(any(feature = "tui", feature = "line")))]
fn print_usage() {
    println!("Operators: + - * / ^, functions: sin cos tan log ln sqrt abs");
    println!("Memory: ms/m+/m- <expr>, mr, mc; 'details <expr>' for steps");
    println!("'history' lists recent calculations, 'clear' empties it, 'q' quits");
}
