use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rust_decimal::Decimal;

use super::titled_block;
use crate::analytics;
use crate::notifier::RE_ALERT_DURATION_HOURS;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let spend = app.notifier.current_month_spend();
    let warnings = app.warnings();

    let row = |label: &str, value: String, style: Style| {
        Line::from(vec![
            Span::styled(format!("  {label:<22}"), theme::dim_style()),
            Span::styled(value, style),
        ])
    };

    let mut lines = vec![Line::from("")];
    match app.notifier.limit() {
        Some(limit) => {
            let color = theme::usage_color(spend, Some(limit));
            let ratio = analytics::limit_ratio(spend, Some(limit));
            lines.push(row("Monthly limit", format_amount(limit), theme::normal_style()));
            lines.push(row(
                "80% threshold",
                format_amount(limit * Decimal::new(8, 1)),
                theme::normal_style(),
            ));
            lines.push(row(
                "Spent this month",
                format_amount(spend),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
            lines.push(row(
                "Remaining",
                format_amount(limit - spend),
                theme::normal_style(),
            ));
            lines.push(row(
                "Usage",
                format!("{} {:.0}%", progress_bar(ratio, 30), ratio * 100.0),
                Style::default().fg(color),
            ));
        }
        None => {
            lines.push(row("Monthly limit", "not set".into(), theme::dim_style()));
            lines.push(row("Spent this month", format_amount(spend), theme::normal_style()));
        }
    }

    lines.push(Line::from(""));
    let status = if warnings.exceeded {
        Span::styled(
            "Limit exceeded. This warning cannot be dismissed.",
            Style::default().fg(theme::RED).add_modifier(Modifier::BOLD),
        )
    } else if warnings.approaching {
        Span::styled(
            format!("Over 80% of the limit. Press x to hide for {RE_ALERT_DURATION_HOURS} hours."),
            Style::default().fg(theme::YELLOW).add_modifier(Modifier::BOLD),
        )
    } else if app.notifier.is_loaded() {
        Span::styled("Spending is within your set limit.", Style::default().fg(theme::GREEN))
    } else {
        Span::styled("No data loaded", theme::dim_style())
    };
    lines.push(Line::from(vec![Span::raw("  "), status]));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  :limit <amount> to set, :clear-limit to remove, :check to re-check now",
        theme::dim_style(),
    )));

    f.render_widget(
        Paragraph::new(lines).block(titled_block(&format!(
            "Spending Limit - {}",
            app.current_month
        ))),
        area,
    );
}
