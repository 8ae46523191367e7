pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Screen};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let theme = Theme::default();
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Message line
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);

    match state.screen {
        Screen::Browse => screens::browse::render(frame, layout[1], state),
        Screen::Detail => screens::detail::render(frame, layout[1], state),
        Screen::Submit => screens::submit::render(frame, layout[1], state),
        Screen::Stats => screens::stats::render(frame, layout[1], state),
    }

    render_message(frame, layout[2], state, &theme);
    render_bottom_bar(frame, layout[3], state, &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .last_refresh
        .map(|dt| {
            dt.with_timezone(&state.timezone)
                .format("%H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| "-".to_string());

    let (status, status_style) = if state.offline {
        ("OFFLINE", Style::default().fg(theme.accent))
    } else if state.stale {
        ("STALE", Style::default().fg(theme.error))
    } else {
        ("OK", Style::default().fg(theme.resolved))
    };

    let line = Line::from(vec![
        Span::styled("Campuz", Style::default().fg(theme.accent)),
        Span::raw("  "),
        Span::styled("Complaints", Style::default().fg(theme.dim)),
        Span::raw(format!(": {}  ", state.snapshot.complaints.len())),
        Span::styled("Refresh", Style::default().fg(theme.dim)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_message(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(message) = &state.message else {
        return;
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            message.as_str(),
            Style::default().fg(theme.dim),
        )),
        area,
    );
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let accent = Style::default().fg(theme.accent);
    let mut parts: Vec<Span<'static>> = Vec::new();

    let hint = |key: &'static str, label: &'static str, parts: &mut Vec<Span<'static>>| {
        parts.push(Span::styled(key, accent));
        parts.push(Span::raw(format!(" {label}  ")));
    };

    if state.comment.active || state.screen == Screen::Submit {
        hint("Tab", "next field", &mut parts);
        hint("Enter", "submit", &mut parts);
        hint("Esc", "cancel", &mut parts);
    } else {
        match state.screen {
            Screen::Browse => {
                hint("j/k", "move", &mut parts);
                hint("Enter", "detail", &mut parts);
                hint("n", "new", &mut parts);
                hint("s", "stats", &mut parts);
                hint("r", "refresh", &mut parts);
            }
            Screen::Detail => {
                hint("u", "support", &mut parts);
                hint("c", "comment", &mut parts);
                hint("b", "back", &mut parts);
            }
            Screen::Stats => {
                hint("r", "refresh", &mut parts);
                hint("b", "back", &mut parts);
            }
            Screen::Submit => {}
        }
        hint("q", "quit", &mut parts);
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
