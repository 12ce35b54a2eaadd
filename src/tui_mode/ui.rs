use super::app::App;
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;
use super::helpers::{highlight_functions, wrap_text};
use crate::render_help::render_help;
use rpncalc::calc_engine::{evaluate_expression, format_result, format_with_spaces};

const MIN_TERMINAL_WIDTH: u16 = 50;
const MIN_TERMINAL_HEIGHT: u16 = 10;

pub fn run_ui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            if app.show_help {
                render_help(f, app);
            } else {
                ui(f, app);
            }
        })?;

        if app.should_quit {
            break;
        }

        if crossterm::event::poll(Duration::from_millis(50))? {
            match crossterm::event::read()? {
                Event::Key(KeyEvent { code, modifiers, kind, .. }) if kind == KeyEventKind::Press => {
                    handle_key_event(app, code, modifiers);
                }
                Event::Mouse(event) => {
                    handle_mouse_event(app, event);
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if app.show_help {
        match code {
            KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
            KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
            KeyCode::PageDown => app.help_scroll = app.help_scroll.saturating_add(10),
            KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(10),
            KeyCode::Esc => {
                app.show_help = false;
                app.help_scroll = 0;
            }
            _ => {}
        }
    } else {
        match code {
            KeyCode::Char('u') | KeyCode::Char('U') if modifiers.contains(KeyModifiers::CONTROL) => {
                app.clear_input();
            }
            KeyCode::Char(c) if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT => {
                app.insert_char(c);
            }
            KeyCode::Backspace => app.delete_before_cursor(),
            KeyCode::Delete => app.delete_at_cursor(),
            KeyCode::Left if modifiers.contains(KeyModifiers::CONTROL) => {
                app.move_cursor_by_words(-1);
            }
            KeyCode::Right if modifiers.contains(KeyModifiers::CONTROL) => {
                app.move_cursor_by_words(1);
            }
            KeyCode::Left => app.move_cursor(-1),
            KeyCode::Right => app.move_cursor(1),
            KeyCode::Home => {
                app.cursor_position = 0;
                app.input_scroll = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.input.chars().count();
            }
            KeyCode::Up => app.navigate_history(-1),
            KeyCode::Down => app.navigate_history(1),
            KeyCode::PageUp => app.scroll_history(-1),
            KeyCode::PageDown => app.scroll_history(1),
            KeyCode::Enter => app.submit(),
            KeyCode::F(1) => {
                app.show_help = true;
                app.help_scroll = 0;
            }
            KeyCode::Esc => app.status = None,
            _ => {}
        }
    }
}

fn handle_mouse_event(app: &mut App, event: crossterm::event::MouseEvent) {
    let scroll = if app.show_help { &mut app.help_scroll } else { &mut app.history_scroll };
    match event.kind {
        MouseEventKind::ScrollDown => *scroll = scroll.saturating_add(3),
        MouseEventKind::ScrollUp => *scroll = scroll.saturating_sub(3),
        _ => {}
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let terminal_size = frame.size();

    app.terminal_too_small = terminal_size.width < MIN_TERMINAL_WIDTH ||
                             terminal_size.height < MIN_TERMINAL_HEIGHT;

    if app.terminal_too_small {
        render_resize_message(frame, terminal_size);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(terminal_size);

    render_input(frame, app, layout[0]);
    render_status(frame, app, layout[1]);
    render_history(frame, app, layout[2]);
    app.list_height = layout[2].height as usize;
}

fn render_resize_message(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled(
            format!("Need at least {}x{}, have {}x{}", MIN_TERMINAL_WIDTH, MIN_TERMINAL_HEIGHT, area.width, area.height),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("Enlarge the window to continue", Style::default().fg(Color::Yellow))),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" rpncalc ")
        .title_alignment(Alignment::Center);

    frame.render_widget(
        Paragraph::new(text).block(block).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_history(frame: &mut Frame, app: &mut App, area: Rect) {
    let title = format!(
        " History ({}/{}) ",
        app.calculator.history().len(),
        app.calculator.history_capacity()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let history = app.calculator.history();
    if history.is_empty() {
        let empty_msg = Paragraph::new("No calculations yet. Enter an expression to see results here.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty_msg, inner_area);
        return;
    }

    let mut items = Vec::new();
    app.item_start_indices.clear();

    // "HH:MM:SS " before each entry
    const TIME_WIDTH: usize = 9;
    let wrap_width = (inner_area.width as usize).saturating_sub(4 + TIME_WIDTH);

    for (i, entry) in history.iter().enumerate() {
        app.item_start_indices.push(items.len());

        let is_selected = i == app.cursor_history;
        let base_style = Style::default()
            .fg(if is_selected { Color::Yellow } else { Color::Cyan });

        let input = format_with_spaces(&entry.expression);
        let input_lines = wrap_text(&input, wrap_width);

        for (line_idx, line) in input_lines.into_iter().enumerate() {
            let mut result_spans = vec![];

            if line_idx == 0 {
                let time = entry.timestamp.format("%H:%M:%S ").to_string();
                result_spans.push(Span::styled(time, Style::default().fg(Color::DarkGray)));
                result_spans.push(Span::styled("> ", Style::default().fg(Color::Green)));
            } else {
                result_spans.push(Span::raw(" ".repeat(TIME_WIDTH + 2)));
            }

            result_spans.extend(highlight_functions(&line, base_style));

            if line_idx == 0 {
                let result_style = if entry.is_error() {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD)
                };
                result_spans.push(Span::styled(" = ", Style::default().fg(Color::Gray)));
                result_spans.push(Span::styled(entry.display.clone(), result_style));
            }

            items.push(ListItem::new(Line::from(result_spans)));
        }

        if entry.detailed {
            let mut detail_lines: Vec<(String, Color)> = entry
                .steps
                .iter()
                .enumerate()
                .map(|(j, step)| {
                    let text = format!("Step {}: {} = {}", j + 1, step.operation, format_result(step.result));
                    (text, Color::DarkGray)
                })
                .collect();
            if let Err(e) = &entry.outcome {
                detail_lines.push((format!("Error: {}", e), Color::Red));
            }
            detail_lines.push((
                format!("Time: {:.6} ms", entry.duration.as_secs_f64() * 1000.0),
                Color::Magenta,
            ));

            for (text, color) in detail_lines {
                for (idx, line) in wrap_text(&text, wrap_width).into_iter().enumerate() {
                    let prefix = if idx == 0 { "    - " } else { "      " };
                    let span = Span::styled(format!("{}{}", prefix, line), Style::default().fg(color));
                    items.push(ListItem::new(Line::from(span)));
                }
            }
        }

        if i < history.len() - 1 {
            let separator = Span::styled(
                "-".repeat(inner_area.width as usize),
                Style::default().fg(Color::DarkGray)
            );
            items.push(ListItem::new(Line::from(separator)));
        }
    }

    if app.scroll_to_bottom {
        app.history_scroll = items.len().saturating_sub(inner_area.height as usize);
        app.scroll_to_bottom = false;
    }

    let selected_index = app.item_start_indices.get(app.cursor_history).copied();

    let list = List::new(items)
        .block(Block::default())
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default()
        .with_selected(selected_index)
        .with_offset(app.history_scroll);

    frame.render_stateful_widget(list, inner_area, &mut state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let keys = [
        ("Enter", "Calculate"),
        ("Up/Down or PgUp/PgDn", "Navigate"),
        ("F1", "Help"),
        ("Ctrl+U", "Clear Input"),
    ];

    let mut spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(
                    *key,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {} ", desc),
                    Style::default().fg(Color::DarkGray),
                ),
            ]
        })
        .collect();

    if let Some(status) = &app.status {
        let color = if status.starts_with("Error") { Color::Red } else { Color::LightGreen };
        spans.push(Span::styled(format!("| {} ", status), Style::default().fg(color)));
    } else if app.calculator.has_memory() {
        spans.push(Span::styled(
            format!("| M = {} ", format_result(app.calculator.memory_recall())),
            Style::default().fg(Color::LightGreen),
        ));
    }

    let line = Line::from(spans);
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(line), area);
}

// Input line with highlighting and a live preview of the value in the title.
fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
    let preview = match evaluate_expression(&app.input) {
        Ok(value) if !app.input.trim().is_empty() => format!(" Expression = {} ", format_result(value)),
        _ => " Expression ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(preview)
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let visible_width = inner_area.width.saturating_sub(2) as usize;
    app.adjust_input_scroll(visible_width);

    let visible_input: String = app.input
        .chars()
        .skip(app.input_scroll)
        .take(visible_width)
        .collect();

    let mut spans = vec![Span::styled("> ", Style::default().fg(Color::Green))];
    spans.extend(highlight_functions(&visible_input, Style::default()));
    frame.render_widget(Paragraph::new(Line::from(spans)), inner_area);

    let visible_prefix: String = visible_input
        .chars()
        .take(app.cursor_position.saturating_sub(app.input_scroll))
        .collect();
    frame.set_cursor(inner_area.x + 2 + visible_prefix.width() as u16, inner_area.y);

    let indicator = Style::default().fg(Color::DarkGray);
    if app.input_scroll > 0 {
        frame.render_widget(
            Paragraph::new("<").style(indicator),
            Rect::new(inner_area.x, inner_area.y, 1, 1),
        );
    }
    if app.input.chars().count() > app.input_scroll + visible_width {
        frame.render_widget(
            Paragraph::new(">").style(indicator),
            Rect::new(inner_area.x + inner_area.width - 1, inner_area.y, 1, 1),
        );
    }
}
