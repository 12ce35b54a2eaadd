use crate::tui_mode::app::App;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
    ))
}

pub fn render_help(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" rpncalc Help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let help_text = vec![
        Line::from(Span::styled("rpncalc - Terminal Expression Calculator", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))),
        Line::from(""),
        section("Operators (lowest to highest precedence):"),
        Line::from("  + -  : Addition, subtraction   (e.g., 10 - 4 = 6)"),
        Line::from("  * /  : Multiplication, division (e.g., 15 / 3 = 5)"),
        Line::from("  -x   : Unary minus              (e.g., 5 - -3 = 8)"),
        Line::from("  ^    : Power, right-assoc.      (e.g., 2 ^ 3 ^ 2 = 512)"),
        Line::from("  Note: -2 ^ 2 = -4, the power binds first"),
        Line::from(""),
        section("Functions (one parenthesized argument):"),
        Line::from("  sin(x), cos(x), tan(x) : Trigonometry, x in radians"),
        Line::from("  log(x)  : Base-10 logarithm (x > 0)"),
        Line::from("  ln(x)   : Natural logarithm (x > 0)"),
        Line::from("  sqrt(x) : Square root (x >= 0)"),
        Line::from("  abs(x)  : Absolute value"),
        Line::from(""),
        section("Constants:"),
        Line::from("  pi : π (3.14159...)"),
        Line::from("  e  : Euler's number (2.71828...)"),
        Line::from(""),
        section("Memory:"),
        Line::from("  ms <expr> : Store value (last result when empty)"),
        Line::from("  m+ <expr> : Add to memory"),
        Line::from("  m- <expr> : Subtract from memory"),
        Line::from("  mr        : Recall memory into the input line"),
        Line::from("  mc        : Clear memory"),
        Line::from(""),
        section("Commands:"),
        Line::from("  details <expression> : Show step-by-step evaluation with time"),
        Line::from("  clear : Clear calculation history"),
        Line::from("  history : Jump to the newest history entry"),
        Line::from("  help  : Show this help screen"),
        Line::from("  quit  : Exit the calculator"),
        Line::from(""),
        section("Navigation:"),
        Line::from("  ← → : Move cursor left/right"),
        Line::from("  Ctrl+←/→ : Move cursor by words"),
        Line::from("  Home/End : Move to start/end of line"),
        Line::from("  ↑ ↓ : Navigate calculation history"),
        Line::from("  PgUp/PgDn : Page through history"),
        Line::from("  Ctrl+U : Clear current input"),
        Line::from("  Esc : Close help / dismiss status"),
        Line::from(""),
        section("Examples:"),
        Line::from("  2 + 3 * 4"),
        Line::from("  sqrt(16) / -2"),
        Line::from("  details log(100) ^ 2"),
        Line::from("  m+ sin(pi / 2)"),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll as u16, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
