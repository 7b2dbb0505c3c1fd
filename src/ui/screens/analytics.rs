use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::titled_block;
use crate::ui::app::{AnalyticsView, App};
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" Total spending: ", theme::dim_style()),
        Span::styled(
            format_amount(app.total_spend),
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(titled_block("Analytics"));
    f.render_widget(header, chunks[0]);

    let (title, rows): (&str, Vec<(String, Decimal)>) = match app.analytics_view {
        AnalyticsView::Monthly => (
            "Spending by month",
            app.monthly_totals.iter().rev().cloned().collect(),
        ),
        AnalyticsView::Category => (
            "Spending by category",
            app.category_totals
                .iter()
                .map(|(c, amt)| (c.to_string(), *amt))
                .collect(),
        ),
    };

    if rows.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expense data to analyse yet",
            theme::dim_style(),
        )))
        .centered()
        .block(titled_block(title));
        f.render_widget(msg, chunks[1]);
        return;
    }

    let max = rows.iter().map(|(_, amt)| *amt).max().unwrap_or_default();
    let bar_width = (chunks[1].width as usize).saturating_sub(40).clamp(10, 50);
    let lines: Vec<Line> = rows
        .iter()
        .take(chunks[1].height.saturating_sub(2) as usize)
        .map(|(label, amt)| {
            let ratio = if max > Decimal::ZERO {
                (*amt / max).to_f64().unwrap_or(0.0)
            } else {
                0.0
            };
            Line::from(vec![
                Span::styled(format!(" {:<14}", truncate(label, 14)), theme::normal_style()),
                Span::styled(progress_bar(ratio, bar_width), Style::default().fg(theme::ACCENT)),
                Span::styled(format!(" {:>14}", format_amount(*amt)), theme::amount_style()),
            ])
        })
        .collect();

    f.render_widget(
        Paragraph::new(lines).block(titled_block(&format!("{title} (v to switch)"))),
        chunks[1],
    );
}
