use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};

use api_types::ComplaintStatus;

use crate::{app::AppState, ui::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let block = Block::default()
        .title(" Complaints ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.dim));

    if state.snapshot.complaints.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw("No complaints yet. Press "),
                Span::styled("n", Style::default().fg(theme.accent)),
                Span::raw(" to submit one."),
            ]))
            .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let items: Vec<ListItem<'_>> = state
        .snapshot
        .complaints
        .iter()
        .map(|complaint| {
            let (status, status_style) = match complaint.status {
                ComplaintStatus::Pending => ("pending ", Style::default().fg(theme.pending)),
                ComplaintStatus::Resolved => ("resolved", Style::default().fg(theme.resolved)),
            };

            let when = complaint
                .created_at
                .with_timezone(&state.timezone)
                .format("%Y-%m-%d %H:%M");

            let mut spans = vec![
                Span::styled(status, status_style),
                Span::raw("  "),
                Span::styled(format!("{when}"), Style::default().fg(theme.dim)),
                Span::raw("  "),
                Span::styled(
                    format!("+{:<3}", complaint.support_count),
                    Style::default().fg(theme.accent),
                ),
                Span::raw(" "),
                Span::styled(
                    complaint.title.clone(),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    format!("  [{}]", complaint.category),
                    Style::default().fg(theme.dim),
                ),
            ];
            if !complaint.comments.is_empty() {
                spans.push(Span::styled(
                    format!("  {}c", complaint.comments.len()),
                    Style::default().fg(theme.dim),
                ));
            }
            if !complaint.images.is_empty() {
                spans.push(Span::styled(
                    format!("  {}i", complaint.images.len()),
                    Style::default().fg(theme.dim),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}
