use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
};

use api_types::ComplaintStatus;

use crate::{app::AppState, ui::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    if state.selected_complaint().is_none() {
        frame.render_widget(
            Paragraph::new("Complaint no longer exists. Press b to go back."),
            area,
        );
        return;
    }

    let compose_height = if state.comment.active { 4 } else { 0 };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),              // Details
            Constraint::Min(3),                 // Comments
            Constraint::Length(compose_height), // Comment composer
        ])
        .split(area);

    render_details(frame, layout[0], state, &theme);
    render_comments(frame, layout[1], state, &theme);
    if state.comment.active {
        render_composer(frame, layout[2], state, &theme);
    }
}

fn render_details(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(complaint) = state.selected_complaint() else {
        return;
    };

    let block = Block::default()
        .title(format!(" {} ", complaint.title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.dim));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (status, status_style) = match complaint.status {
        ComplaintStatus::Pending => ("pending", Style::default().fg(theme.pending)),
        ComplaintStatus::Resolved => ("resolved", Style::default().fg(theme.resolved)),
    };

    let submitted = complaint
        .created_at
        .with_timezone(&state.timezone)
        .format("%Y-%m-%d %H:%M");

    let supported = match state.supported {
        Some(true) => "yes",
        Some(false) => "no",
        None => "?",
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(theme.dim)),
            Span::styled(status, status_style),
            Span::styled("   Category: ", Style::default().fg(theme.dim)),
            Span::raw(complaint.category.clone()),
            Span::styled("   Location: ", Style::default().fg(theme.dim)),
            Span::raw(complaint.location.clone().unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(vec![
            Span::styled("Submitted: ", Style::default().fg(theme.dim)),
            Span::raw(format!("{submitted}")),
            Span::styled("   By: ", Style::default().fg(theme.dim)),
            Span::raw(
                complaint
                    .student_name
                    .clone()
                    .unwrap_or_else(|| "Anonymous".to_string()),
            ),
        ]),
        Line::from(vec![
            Span::styled("Support: ", Style::default().fg(theme.dim)),
            Span::styled(
                format!("+{}", complaint.support_count),
                Style::default().fg(theme.accent),
            ),
            Span::styled("   Supported by you: ", Style::default().fg(theme.dim)),
            Span::raw(supported),
            Span::styled("   Images: ", Style::default().fg(theme.dim)),
            Span::raw(complaint.images.len().to_string()),
        ]),
        Line::raw(""),
    ];
    for line in complaint.description.lines() {
        lines.push(Line::raw(line.to_string()));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_comments(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(complaint) = state.selected_complaint() else {
        return;
    };

    let block = Block::default()
        .title(format!(" Comments ({}) ", complaint.comments.len()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.dim));

    if complaint.comments.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw("No comments. Press "),
                Span::styled("c", Style::default().fg(theme.accent)),
                Span::raw(" to add one."),
            ])),
            inner,
        );
        return;
    }

    // Newest first, exactly as the server returns them.
    let items: Vec<ListItem<'_>> = complaint
        .comments
        .iter()
        .map(|comment| {
            let when = comment
                .created_at
                .with_timezone(&state.timezone)
                .format("%Y-%m-%d %H:%M");
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", comment.name),
                    Style::default().fg(theme.accent),
                ),
                Span::styled(format!("({when})  "), Style::default().fg(theme.dim)),
                Span::raw(comment.text.clone()),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_composer(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .title(" New comment ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let focus = Style::default().fg(theme.accent);
    let blur = Style::default().fg(theme.dim);

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "Name: ",
                if state.comment.focus_text { blur } else { focus },
            ),
            Span::raw(state.comment.name.clone()),
        ]),
        Line::from(vec![
            Span::styled(
                "Text: ",
                if state.comment.focus_text { focus } else { blur },
            ),
            Span::raw(state.comment.text.clone()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}
