use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::{
    app::{AppState, SubmitField},
    ui::Theme,
};

const FIELDS: [SubmitField; 7] = [
    SubmitField::Title,
    SubmitField::Description,
    SubmitField::Category,
    SubmitField::Location,
    SubmitField::StudentName,
    SubmitField::Email,
    SubmitField::ImagePaths,
];

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let block = Block::default()
        .title(" Submit a complaint ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.dim));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FIELDS.len() as u16 + 1),
            Constraint::Min(0),
        ])
        .split(inner);

    let mut lines = Vec::with_capacity(FIELDS.len());
    for field in FIELDS {
        let focused = state.submit_focus == field;
        let label_style = if focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.dim)
        };
        let cursor = if focused { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", field.label()), label_style),
            Span::raw(format!("{}{cursor}", state.submit.field(field))),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), layout[0]);

    let mut help = vec![
        Line::raw(""),
        Line::from(vec![
            Span::styled("Images", Style::default().fg(theme.dim)),
            Span::raw(": semicolon-separated file paths (JPEG/PNG/GIF/WebP, max 10 MiB each)."),
        ]),
        Line::from(vec![
            Span::styled("Categories", Style::default().fg(theme.dim)),
            Span::raw(format!(": {}", state.snapshot.categories.join(", "))),
        ]),
    ];
    if !state.snapshot.locations.is_empty() {
        help.push(Line::from(vec![
            Span::styled("Locations", Style::default().fg(theme.dim)),
            Span::raw(format!(": {}", state.snapshot.locations.join(", "))),
        ]));
    }
    frame.render_widget(Paragraph::new(help), layout[1]);
}
