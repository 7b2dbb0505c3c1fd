use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::titled_block;
use crate::db::ExpenseFilter;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let filter = describe_filter(&app.expense_filter);

    if app.expenses.is_empty() {
        let hint = if app.user.is_none() {
            "Sign in with :login <name> to see your expenses"
        } else if filter.is_empty() {
            "Add one with :add <amount> <category> <description>"
        } else {
            "Nothing matches. Use :clear-filter to show everything"
        };
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No expenses found", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(hint, theme::dim_style())),
        ];
        f.render_widget(
            Paragraph::new(msg)
                .centered()
                .block(titled_block(&format!("Expenses (0){filter}"))),
            area,
        );
        return;
    }

    let header_cells = ["ID", "Date", "Description", "Category", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .expenses
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, exp)| {
            let style = if i == app.expense_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let amount = Span::styled(
                format!("{:>14}", format_amount(exp.amount)),
                if i == app.expense_index {
                    style
                } else {
                    theme::amount_style()
                },
            );

            Row::new(vec![
                Cell::from(exp.id.map(|id| format!("#{id}")).unwrap_or_default()),
                Cell::from(exp.date.clone()),
                Cell::from(truncate(&exp.description, 40)),
                Cell::from(exp.category.as_str()),
                Cell::from(amount),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(15),
        Constraint::Length(15),
    ];

    let total = crate::analytics::total_spend(&app.expenses);
    let table = Table::new(rows, widths).header(header).block(titled_block(&format!(
        "Expenses ({}) total {}{filter}",
        app.expenses.len(),
        format_amount(total),
    )));

    f.render_widget(table, area);
}

/// Title suffix such as " | Food | from 2025-06-01".
fn describe_filter(filter: &ExpenseFilter) -> String {
    let mut parts = Vec::new();
    if let Some(category) = filter.category {
        parts.push(category.to_string());
    }
    if let Some(month) = &filter.month {
        parts.push(format!("month {month}"));
    }
    if let Some(from) = &filter.from {
        parts.push(format!("from {from}"));
    }
    if let Some(to) = &filter.to {
        parts.push(format!("to {to}"));
    }
    parts.iter().map(|p| format!(" | {p}")).collect()
}
