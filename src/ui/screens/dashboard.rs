use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Gauge, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::titled_block;
use crate::analytics;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.user.is_none() {
        render_signed_out(f, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Length(3), // Limit gauge
            Constraint::Min(8),    // Category chart
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_limit_gauge(f, chunks[1], app);
    render_category_chart(f, chunks[2], app);
}

fn render_signed_out(f: &mut Frame, area: Rect) {
    let msg = vec![
        Line::from(""),
        Line::from(Span::styled("You are not signed in", theme::normal_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Start a session with :login <name>",
            theme::dim_style(),
        )),
    ];
    f.render_widget(
        Paragraph::new(msg).centered().block(titled_block("SpendWatch")),
        area,
    );
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let spend = app.notifier.current_month_spend();
    let limit = app.notifier.limit();

    render_card(
        f,
        cards[0],
        "Spent this month",
        format_amount(spend),
        theme::usage_color(spend, limit),
        format!("{} expenses", app.month_expense_count),
    );
    match limit {
        Some(limit) => {
            let remaining = limit - spend;
            render_card(
                f,
                cards[1],
                "Monthly limit",
                format_amount(limit),
                theme::ACCENT,
                format!("warns at {}", format_amount(limit * Decimal::new(8, 1))),
            );
            render_card(
                f,
                cards[2],
                "Remaining",
                format_amount(remaining),
                if remaining < Decimal::ZERO {
                    theme::RED
                } else {
                    theme::GREEN
                },
                String::new(),
            );
        }
        None => {
            render_card(
                f,
                cards[1],
                "Monthly limit",
                "not set".into(),
                theme::TEXT_DIM,
                ":limit <amount>".into(),
            );
            render_card(f, cards[2], "Remaining", "-".into(), theme::TEXT_DIM, String::new());
        }
    }
    render_card(
        f,
        cards[3],
        "All time",
        format_amount(app.total_spend),
        theme::TEXT,
        format!("{} months", app.monthly_totals.len()),
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    value: String,
    color: Color,
    subtitle: String,
) {
    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(titled_block(title));

    f.render_widget(text, area);
}

fn render_limit_gauge(f: &mut Frame, area: Rect, app: &App) {
    let spend = app.notifier.current_month_spend();
    let limit = app.notifier.limit();
    let ratio = analytics::limit_ratio(spend, limit);

    let label = match limit {
        Some(_) => format!("{:.0}% of limit used", ratio * 100.0),
        None => "No limit set".to_string(),
    };

    let gauge = Gauge::default()
        .block(titled_block(&format!("Limit usage - {}", app.current_month)))
        .gauge_style(
            Style::default()
                .fg(theme::usage_color(spend, limit))
                .bg(theme::SURFACE),
        )
        .ratio(ratio)
        .label(label);
    f.render_widget(gauge, area);
}

fn render_category_chart(f: &mut Frame, area: Rect, app: &App) {
    if app.month_by_category.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses this month. Add one with :add <amount> <category> <description>",
            theme::dim_style(),
        )))
        .centered()
        .block(titled_block("This month by category"));
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = app
        .month_by_category
        .iter()
        .map(|(category, amt)| {
            Bar::default()
                .value(amt.to_u64().unwrap_or(0))
                .label(Line::from(truncate(category.as_str(), 12)))
                .text_value(format_amount(*amt))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(titled_block("This month by category"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(2)
        .bar_style(Style::default().fg(theme::ACCENT));

    f.render_widget(chart, area);
}
