use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};

use super::app::{AnalyticsView, App, InputMode, PendingAction, Screen, StatusLevel};
use super::util::format_amount;
use crate::db::{Database, ExpenseFilter};
use crate::models::{parse_amount, Expense, ExpenseCategory, DATE_FORMAT};
use crate::notifier::{DataSource, MonthKey};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit SpendWatch", cmd_quit, r);
    register_command!("quit", "Quit SpendWatch", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("analytics", "Go to Analytics", cmd_analytics, r);
    register_command!("limits", "Go to Spending Limit", cmd_limits, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "login",
        "Start a session (e.g. :login asha)",
        cmd_login,
        r
    );
    register_command!("logout", "Sign out and reset warnings", cmd_logout, r);
    register_command!(
        "add",
        "Add expense (e.g. :add 250 Food Lunch, or :add 2025-06-01 250 Food Lunch)",
        cmd_add,
        r
    );
    register_command!("a", "Add expense (e.g. :a 250 Food Lunch)", cmd_add, r);
    register_command!(
        "edit",
        "Edit selected expense (e.g. :edit amount 300)",
        cmd_edit,
        r
    );
    register_command!("delete", "Delete selected expense", cmd_delete, r);
    register_command!(
        "limit",
        "Set monthly spending limit (e.g. :limit 15000)",
        cmd_limit,
        r
    );
    register_command!(
        "clear-limit",
        "Remove the monthly spending limit",
        cmd_clear_limit,
        r
    );
    register_command!(
        "dismiss",
        "Hide the 80% warning for 24 hours",
        cmd_dismiss,
        r
    );
    register_command!("check", "Check spending against the limit now", cmd_check, r);
    register_command!("refresh", "Reload data and warnings", cmd_refresh, r);
    register_command!(
        "filter",
        "Filter expenses (e.g. :filter Food, :filter from 2025-06-01)",
        cmd_filter,
        r
    );
    register_command!("clear-filter", "Show all expenses", cmd_clear_filter, r);
    register_command!(
        "view",
        "Analytics view (e.g. :view monthly, :view category)",
        cmd_view,
        r
    );
    register_command!(
        "export",
        "Export expenses to CSV (e.g. :export ~/expenses.csv)",
        cmd_export,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Record `msg`, then reload. Notifier events raised by the reload replace it.
fn after_change(app: &mut App, db: &Database, msg: impl Into<String>) -> anyhow::Result<()> {
    app.set_status_level(msg, StatusLevel::Success);
    app.refresh_all(db)
}

fn signed_in(app: &mut App) -> bool {
    if app.user.is_none() {
        app.set_status_level("Not signed in. Use :login <name>", StatusLevel::Warning);
        return false;
    }
    true
}

fn lookup_category(app: &mut App, raw: &str) -> Option<ExpenseCategory> {
    let found = ExpenseCategory::lookup(raw);
    if found.is_none() {
        let names: Vec<&str> = ExpenseCategory::all().iter().map(|c| c.as_str()).collect();
        app.set_status_level(
            format!("Unknown category '{raw}'. Available: {}", names.join(", ")),
            StatusLevel::Warning,
        );
    }
    found
}

fn is_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok()
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    app.refresh_expenses(db)?;
    Ok(())
}

fn cmd_analytics(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Analytics;
    app.refresh_analytics(db)?;
    Ok(())
}

fn cmd_limits(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Limits;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_login(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :login <name>");
        return Ok(());
    }
    db.start_session(args)?;
    after_change(app, db, format!("Signed in as {args}"))
}

fn cmd_logout(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(user) = app.user.clone() else {
        app.set_status("Not signed in");
        return Ok(());
    };
    app.confirm_message = format!("Sign out {user}?");
    app.pending_action = Some(PendingAction::SignOut);
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if !signed_in(app) {
        return Ok(());
    }

    let mut parts: Vec<&str> = args.split_whitespace().collect();
    let date = match parts.first() {
        Some(first) if is_date(first) => parts.remove(0).to_string(),
        _ => Local::now().format(DATE_FORMAT).to_string(),
    };
    if parts.len() < 3 {
        app.set_status("Usage: :add [date] <amount> <category> <description>");
        return Ok(());
    }

    let amount = match parse_amount(parts[0]) {
        Ok(a) => a,
        Err(e) => {
            app.set_status_level(e.to_string(), StatusLevel::Warning);
            return Ok(());
        }
    };
    let Some(category) = lookup_category(app, parts[1]) else {
        return Ok(());
    };
    let description = parts[2..].join(" ");

    let expense = Expense::new(description, amount, category, date);
    if let Err(e) = expense.validate() {
        app.set_status_level(e.to_string(), StatusLevel::Warning);
        return Ok(());
    }
    db.insert_expense(&expense)?;
    after_change(
        app,
        db,
        format!(
            "Added: {} {}",
            expense.description,
            format_amount(expense.amount)
        ),
    )
}

fn cmd_edit(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Expenses {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    }
    let Some(mut expense) = app.selected_expense().cloned() else {
        app.set_status("No expense selected");
        return Ok(());
    };

    let mut parts = args.splitn(2, ' ');
    let field = parts.next().unwrap_or("");
    let value = parts.next().unwrap_or("").trim();
    if value.is_empty() {
        app.set_status("Usage: :edit <amount|category|description|date> <value>");
        return Ok(());
    }

    match field {
        "amount" => match parse_amount(value) {
            Ok(a) => expense.amount = a,
            Err(e) => {
                app.set_status_level(e.to_string(), StatusLevel::Warning);
                return Ok(());
            }
        },
        "category" => match lookup_category(app, value) {
            Some(c) => expense.category = c,
            None => return Ok(()),
        },
        "description" => expense.description = value.to_string(),
        "date" => expense.date = value.to_string(),
        other => {
            app.set_status(format!(
                "Unknown field '{other}'. Use amount, category, description or date"
            ));
            return Ok(());
        }
    }

    if let Err(e) = expense.validate() {
        app.set_status_level(e.to_string(), StatusLevel::Warning);
        return Ok(());
    }
    db.update_expense(&expense)?;
    after_change(app, db, format!("Updated: {}", expense.description))
}

fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Expenses || app.expenses.is_empty() {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    }
    request_delete(app);
    Ok(())
}

/// Ask to delete the expense under the cursor.
pub(crate) fn request_delete(app: &mut App) {
    if let Some(exp) = app.selected_expense() {
        if let Some(id) = exp.id {
            let description = exp.description.clone();
            app.confirm_message = format!("Delete '{description}'?");
            app.pending_action = Some(PendingAction::DeleteExpense { id, description });
            app.input_mode = InputMode::Confirm;
        }
    }
}

fn cmd_limit(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :limit <amount>");
        return Ok(());
    }
    let amount = match parse_amount(args) {
        Ok(a) => a,
        Err(e) => {
            app.set_status_level(e.to_string(), StatusLevel::Warning);
            return Ok(());
        }
    };
    match db.set_limit(amount) {
        Ok(()) => after_change(
            app,
            db,
            format!(
                "Spending limit set to {}",
                format_amount(amount)
            ),
        ),
        Err(e) => {
            app.set_status_level(e.to_string(), StatusLevel::Warning);
            Ok(())
        }
    }
}

fn cmd_clear_limit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.notifier.limit().is_none() {
        app.set_status("No spending limit set");
        return Ok(());
    }
    app.confirm_message = "Remove the monthly spending limit?".into();
    app.pending_action = Some(PendingAction::ClearLimit);
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_dismiss(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    dismiss_warning(app, db);
    Ok(())
}

/// Hide the approaching warning. Only offered while it is showing.
pub(crate) fn dismiss_warning(app: &mut App, db: &mut Database) {
    if !app.warnings().approaching {
        app.set_status("No warning to dismiss");
        return;
    }
    match app.notifier.dismiss(db, Local::now()) {
        Ok(event) => app.show_events(&[event]),
        Err(e) => app.set_status_level(
            format!("Warning hidden, but the dismissal was not saved: {e}"),
            StatusLevel::Error,
        ),
    }
}

fn cmd_check(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if !signed_in(app) {
        return Ok(());
    }
    app.refresh_all(db)?;
    if !app.notifier.is_loaded() {
        return Ok(());
    }
    if app.warnings().exceeded {
        app.set_status_level("Spending limit exceeded!", StatusLevel::Error);
    } else {
        app.set_status_level("Spending is within your set limit.", StatusLevel::Success);
    }
    Ok(())
}

fn cmd_refresh(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.set_status("Refreshed");
    app.refresh_all(db)
}

fn cmd_filter(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut parts = args.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("from"), Some(date)) if is_date(date) => {
            app.expense_filter.from = Some(date.to_string());
        }
        (Some("to"), Some(date)) if is_date(date) => {
            app.expense_filter.to = Some(date.to_string());
        }
        (Some("month"), Some(month)) if MonthKey::parse(month).is_some() => {
            app.expense_filter.month = Some(month.to_string());
        }
        (Some(raw), None) if !matches!(raw, "from" | "to" | "month") => {
            let Some(category) = lookup_category(app, raw) else {
                return Ok(());
            };
            app.expense_filter.category = Some(category);
        }
        _ => {
            app.set_status(
                "Usage: :filter <category> | from <YYYY-MM-DD> | to <YYYY-MM-DD> | month <YYYY-MM>",
            );
            return Ok(());
        }
    }

    app.screen = Screen::Expenses;
    app.expense_index = 0;
    app.expense_scroll = 0;
    app.refresh_expenses(db)?;
    app.set_status(format!("Showing {} expenses", app.expenses.len()));
    Ok(())
}

fn cmd_clear_filter(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.expense_filter = ExpenseFilter::default();
    app.expense_index = 0;
    app.expense_scroll = 0;
    app.refresh_expenses(db)?;
    app.set_status("Filters cleared - showing all expenses");
    Ok(())
}

fn cmd_view(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.analytics_view = match args {
        "monthly" | "month" | "m" => AnalyticsView::Monthly,
        "category" | "cat" | "c" => AnalyticsView::Category,
        "" => match app.analytics_view {
            AnalyticsView::Monthly => AnalyticsView::Category,
            AnalyticsView::Category => AnalyticsView::Monthly,
        },
        other => {
            app.set_status(format!("Unknown view '{other}'. Use monthly or category"));
            return Ok(());
        }
    };
    app.screen = Screen::Analytics;
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if !signed_in(app) {
        return Ok(());
    }
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/spendwatch-export-all.csv")
    } else {
        crate::run::cli::shellexpand(args)
    };

    let count = crate::export::write_csv(std::path::Path::new(&path), &app.expenses)?;
    if count == 0 {
        app.set_status("No expenses to export");
    } else {
        app.set_status_level(
            format!("Exported {count} expenses to {path}"),
            StatusLevel::Success,
        );
    }
    Ok(())
}

/// Carry out the action the user just confirmed with `y`.
pub(crate) fn confirm_pending(app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();
    let Some(action) = app.pending_action.take() else {
        return Ok(());
    };

    match action {
        PendingAction::DeleteExpense { id, description } => {
            if db.delete_expense(id)? {
                after_change(app, db, format!("Deleted: {description}"))?;
            } else {
                app.set_status(format!("'{description}' was already gone"));
                app.refresh_all(db)?;
            }
        }
        PendingAction::ClearLimit => {
            db.clear_spending_limit()?;
            after_change(app, db, "Spending limit removed")?;
        }
        PendingAction::SignOut => {
            if let Err(e) = app.notifier.sign_out(db, Local::now()) {
                tracing::warn!(error = %e, "could not clear warning state on sign-out");
            }
            db.end_session()?;
            app.clear_data();
            app.set_status("You have been signed out.");
        }
    }
    Ok(())
}

pub(crate) fn cancel_pending(app: &mut App) {
    app.pending_action = None;
    app.confirm_message.clear();
    app.input_mode = InputMode::Normal;
    app.set_status("Cancelled");
}
