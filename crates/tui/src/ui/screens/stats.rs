use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::{app::AppState, ui::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let stats = &state.snapshot.stats;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let totals = Line::from(vec![
        Span::styled("Total: ", Style::default().fg(theme.dim)),
        Span::styled(stats.total.to_string(), Style::default().fg(theme.text)),
        Span::styled("   Pending: ", Style::default().fg(theme.dim)),
        Span::styled(stats.pending.to_string(), Style::default().fg(theme.pending)),
        Span::styled("   Resolved: ", Style::default().fg(theme.dim)),
        Span::styled(
            stats.resolved.to_string(),
            Style::default().fg(theme.resolved),
        ),
    ]);
    let totals_block = Block::default()
        .title(" Overview ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.dim));
    let totals_inner = totals_block.inner(layout[0]);
    frame.render_widget(totals_block, layout[0]);
    frame.render_widget(Paragraph::new(totals), totals_inner);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(layout[1]);

    render_breakdown(frame, columns[0], " By category ", &stats.by_category, &theme);
    render_breakdown(frame, columns[1], " By location ", &stats.by_location, &theme);
}

fn render_breakdown(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &'static str,
    counts: &std::collections::HashMap<String, i64>,
    theme: &Theme,
) {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.dim));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut entries: Vec<(&String, &i64)> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let max = entries.iter().map(|(_, count)| **count).max().unwrap_or(0);
    let bar_width = 20usize;

    let lines: Vec<Line<'_>> = entries
        .into_iter()
        .map(|(name, count)| {
            let filled = if max > 0 {
                ((*count as f64 / max as f64) * bar_width as f64).round() as usize
            } else {
                0
            };
            let bar = format!("{}{}", "█".repeat(filled), "░".repeat(bar_width - filled));
            Line::from(vec![
                Span::raw(format!("{name:<22}")),
                Span::styled(bar, Style::default().fg(theme.accent)),
                Span::styled(format!(" {count}"), Style::default().fg(theme.dim)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
