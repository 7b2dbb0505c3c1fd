use anyhow::Result;
use chrono::Local;
use rust_decimal::Decimal;

use crate::analytics;
use crate::db::{Database, ExpenseFilter};
use crate::models::{Expense, ExpenseCategory};
use crate::notifier::{MonthKey, Notifier, NotifierEvent, WarningState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Expenses,
    Analytics,
    Limits,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Expenses, Self::Analytics, Self::Limits]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Expenses => write!(f, "Expenses"),
            Self::Analytics => write!(f, "Analytics"),
            Self::Limits => write!(f, "Spending Limit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Severity of the message in the command bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteExpense { id: i64, description: String },
    ClearLimit,
    SignOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnalyticsView {
    Monthly,
    Category,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) status_level: StatusLevel,
    pub(crate) show_help: bool,
    pub(crate) current_month: MonthKey,

    // Session + warnings
    pub(crate) user: Option<String>,
    pub(crate) notifier: Notifier,

    // Dashboard
    pub(crate) month_by_category: Vec<(ExpenseCategory, Decimal)>,
    pub(crate) month_expense_count: usize,

    // Expenses
    pub(crate) expenses: Vec<Expense>,
    pub(crate) expense_filter: ExpenseFilter,
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,

    // Analytics
    pub(crate) analytics_view: AnalyticsView,
    pub(crate) total_spend: Decimal,
    pub(crate) monthly_totals: Vec<(String, Decimal)>,
    pub(crate) category_totals: Vec<(ExpenseCategory, Decimal)>,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            status_level: StatusLevel::Info,
            show_help: false,
            current_month: MonthKey::from_local(Local::now()),

            user: None,
            notifier: Notifier::new(),

            month_by_category: Vec::new(),
            month_expense_count: 0,

            expenses: Vec::new(),
            expense_filter: ExpenseFilter::default(),
            expense_index: 0,
            expense_scroll: 0,

            analytics_view: AnalyticsView::Monthly,
            total_spend: Decimal::ZERO,
            monthly_totals: Vec::new(),
            category_totals: Vec::new(),

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn warnings(&self) -> WarningState {
        self.notifier.warnings()
    }

    /// Reload everything and run a notifier cycle. A failed fetch is reported
    /// in the status bar and keeps the previous data; an auth failure also
    /// drops the session view.
    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.current_month = MonthKey::from_local(Local::now());
        self.user = db.session_user()?;

        match self.notifier.refresh(db, db, Local::now()) {
            Ok(events) => self.show_events(&events),
            Err(e) => {
                tracing::warn!(error = %e, "refresh failed");
                self.show_events(&[NotifierEvent::fetch_failed(&e)]);
                if e.is_auth() {
                    self.clear_data();
                }
                return Ok(());
            }
        }

        self.refresh_expenses(db)?;
        self.refresh_analytics(db)?;
        Ok(())
    }

    pub(crate) fn refresh_expenses(&mut self, db: &Database) -> Result<()> {
        if self.user.is_none() {
            self.expenses.clear();
            return Ok(());
        }
        self.expenses = db.get_expenses(&self.expense_filter)?;
        if self.expense_index >= self.expenses.len() {
            self.expense_index = self.expenses.len().saturating_sub(1);
        }
        if self.expense_scroll > self.expense_index {
            self.expense_scroll = self.expense_index;
        }
        Ok(())
    }

    pub(crate) fn refresh_analytics(&mut self, db: &Database) -> Result<()> {
        if self.user.is_none() {
            return Ok(());
        }
        let all = db.get_all_expenses()?;
        let this_month: Vec<Expense> = all
            .iter()
            .filter(|e| e.parsed_date().is_some_and(|d| self.current_month.contains(d)))
            .cloned()
            .collect();

        self.total_spend = analytics::total_spend(&all);
        self.monthly_totals = analytics::spending_by_month(&all);
        self.category_totals = analytics::spending_by_category(&all);
        self.month_by_category = analytics::spending_by_category(&this_month);
        self.month_expense_count = this_month.len();
        Ok(())
    }

    /// Put notifier events in the status bar, most severe last so it wins.
    pub(crate) fn show_events(&mut self, events: &[NotifierEvent]) {
        for event in events {
            let level = match event {
                NotifierEvent::LimitApproachingEntered { .. } => StatusLevel::Warning,
                NotifierEvent::WarningDismissed { .. } => StatusLevel::Info,
                NotifierEvent::LimitExceededEntered { .. } | NotifierEvent::FetchFailed { .. } => {
                    StatusLevel::Error
                }
            };
            self.set_status_level(event.to_string(), level);
        }
    }

    pub(crate) fn clear_data(&mut self) {
        self.user = None;
        self.expenses.clear();
        self.expense_index = 0;
        self.expense_scroll = 0;
        self.month_by_category.clear();
        self.month_expense_count = 0;
        self.total_spend = Decimal::ZERO;
        self.monthly_totals.clear();
        self.category_totals.clear();
    }

    pub(crate) fn selected_expense(&self) -> Option<&Expense> {
        self.expenses.get(self.expense_index)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.set_status_level(msg, StatusLevel::Info);
    }

    pub(crate) fn set_status_level(&mut self, msg: impl Into<String>, level: StatusLevel) {
        self.status_message = msg.into();
        self.status_level = level;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::notifier::DataSource;
    use rust_decimal_macros::dec;

    fn seeded_db() -> Database {
        let mut db = Database::open_in_memory().unwrap();
        db.start_session("asha").unwrap();
        db.set_limit(dec!(1000)).unwrap();
        let today = Local::now().format("%Y-%m-%d").to_string();
        db.insert_expense(&Expense::new(
            "Rent share".into(),
            dec!(900),
            ExpenseCategory::Utilities,
            today,
        ))
        .unwrap();
        db
    }

    #[test]
    fn test_refresh_all_loads_and_warns() {
        let db = seeded_db();
        let mut app = App::new();
        app.refresh_all(&db).unwrap();

        assert_eq!(app.user.as_deref(), Some("asha"));
        assert_eq!(app.expenses.len(), 1);
        assert_eq!(app.month_expense_count, 1);
        assert!(app.warnings().approaching);
        assert_eq!(app.status_level, StatusLevel::Warning);
    }

    #[test]
    fn test_refresh_all_without_session_reports_failure() {
        let db = Database::open_in_memory().unwrap();
        let mut app = App::new();
        app.refresh_all(&db).unwrap();

        assert!(app.user.is_none());
        assert!(app.expenses.is_empty());
        assert_eq!(app.status_level, StatusLevel::Error);
        assert!(app.status_message.starts_with("Failed to load data"));
    }

    #[test]
    fn test_second_refresh_is_quiet() {
        let db = seeded_db();
        let mut app = App::new();
        app.refresh_all(&db).unwrap();
        app.set_status("");
        app.refresh_all(&db).unwrap();
        assert!(app.status_message.is_empty());
    }
}
