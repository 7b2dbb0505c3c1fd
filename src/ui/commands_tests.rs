#![allow(clippy::unwrap_used)]

use chrono::Local;
use rust_decimal_macros::dec;

use super::app::{App, InputMode, Screen, StatusLevel};
use super::commands::{confirm_pending, handle_command, COMMANDS};
use crate::db::Database;
use crate::notifier::MonthKey;

fn run(app: &mut App, db: &mut Database, input: &str) {
    handle_command(input, app, db).unwrap();
}

fn signed_in() -> (App, Database) {
    let mut db = Database::open_in_memory().unwrap();
    let mut app = App::new();
    run(&mut app, &mut db, "login asha");
    (app, db)
}

fn dismissal_key() -> String {
    MonthKey::from_local(Local::now()).dismissal_key()
}

// ── Registry ──────────────────────────────────────────────────

#[test]
fn test_registry_has_long_and_short_names() {
    for name in ["quit", "q", "add", "a", "dismiss", "limit", "clear-limit", "export"] {
        assert!(COMMANDS.contains_key(name), "missing :{name}");
    }
}

#[test]
fn test_unknown_command_suggests_closest() {
    let mut db = Database::open_in_memory().unwrap();
    let mut app = App::new();
    run(&mut app, &mut db, "dismis");
    assert_eq!(
        app.status_message,
        "Unknown command: :dismis. Did you mean :dismiss?"
    );
}

#[test]
fn test_quit() {
    let mut db = Database::open_in_memory().unwrap();
    let mut app = App::new();
    run(&mut app, &mut db, "q");
    assert!(!app.running);
}

// ── Expenses ──────────────────────────────────────────────────

#[test]
fn test_add_requires_session() {
    let mut db = Database::open_in_memory().unwrap();
    let mut app = App::new();
    run(&mut app, &mut db, "add 250 Food Lunch");
    assert_eq!(app.status_level, StatusLevel::Warning);
    assert!(db.get_all_expenses().unwrap().is_empty());
}

#[test]
fn test_add_defaults_to_today() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "add 250 food Lunch at the canteen");

    let all = db.get_all_expenses().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].description, "Lunch at the canteen");
    assert_eq!(all[0].amount, dec!(250));
    assert_eq!(all[0].date, Local::now().format("%Y-%m-%d").to_string());
    assert_eq!(app.status_message, "Added: Lunch at the canteen ₹250.00");
    assert_eq!(app.expenses.len(), 1);
}

#[test]
fn test_add_with_explicit_date() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "add 2025-05-20 1,200 Transport Train pass");
    let all = db.get_all_expenses().unwrap();
    assert_eq!(all[0].date, "2025-05-20");
    assert_eq!(all[0].amount, dec!(1200));
}

#[test]
fn test_add_rejects_bad_input_without_writing() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "add -5 Food Refund");
    assert_eq!(app.status_level, StatusLevel::Warning);
    run(&mut app, &mut db, "add 50 Groceries Milk");
    assert!(app.status_message.starts_with("Unknown category 'Groceries'"));
    run(&mut app, &mut db, "add 50 Food");
    assert!(app.status_message.starts_with("Usage:"));
    assert!(db.get_all_expenses().unwrap().is_empty());
}

#[test]
fn test_edit_selected_expense() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "add 100 Food Tea");
    run(&mut app, &mut db, "expenses");
    run(&mut app, &mut db, "edit amount 120.50");
    run(&mut app, &mut db, "edit category health");

    let all = db.get_all_expenses().unwrap();
    assert_eq!(all[0].amount, dec!(120.50));
    assert_eq!(all[0].category.as_str(), "Health");
}

#[test]
fn test_edit_outside_expenses_screen() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "add 100 Food Tea");
    run(&mut app, &mut db, "edit amount 5");
    assert_eq!(app.status_message, "Navigate to Expenses and select one first");
    assert_eq!(db.get_all_expenses().unwrap()[0].amount, dec!(100));
}

#[test]
fn test_delete_asks_first() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "add 100 Food Tea");
    run(&mut app, &mut db, "expenses");
    run(&mut app, &mut db, "delete");

    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.confirm_message, "Delete 'Tea'?");
    assert_eq!(db.get_all_expenses().unwrap().len(), 1);

    confirm_pending(&mut app, &mut db).unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(db.get_all_expenses().unwrap().is_empty());
    assert!(app.expenses.is_empty());
}

#[test]
fn test_filter_and_clear() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "add 100 Food Tea");
    run(&mut app, &mut db, "add 40 Transport Bus");

    run(&mut app, &mut db, "filter transport");
    assert_eq!(app.screen, Screen::Expenses);
    assert_eq!(app.expenses.len(), 1);
    assert_eq!(app.expenses[0].description, "Bus");

    run(&mut app, &mut db, "clear-filter");
    assert_eq!(app.expenses.len(), 2);

    run(&mut app, &mut db, "filter from 2999-01-01");
    assert!(app.expenses.is_empty());

    run(&mut app, &mut db, "filter from yesterday");
    assert!(app.status_message.starts_with("Usage: :filter"));
}

// ── Limit and warnings ────────────────────────────────────────

#[test]
fn test_crossing_80_percent_warns_once() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "limit 1000");
    assert_eq!(app.status_message, "Spending limit set to ₹1,000.00");

    run(&mut app, &mut db, "add 850 Food Groceries");
    assert!(app.warnings().approaching);
    assert_eq!(app.status_level, StatusLevel::Warning);
    assert_eq!(
        app.status_message,
        "You've spent over 80% of your limit! Current: ₹850.00 / Limit: ₹1000.00"
    );

    // staying in the band is quiet
    run(&mut app, &mut db, "add 10 Food Chai");
    assert_eq!(app.status_message, "Added: Chai ₹10.00");
}

#[test]
fn test_limit_rejects_non_positive() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "limit 0");
    assert_eq!(app.status_level, StatusLevel::Warning);
    assert!(app.status_message.starts_with("invalid input"));
    assert_eq!(db.get_spending_limit().unwrap(), None);
}

#[test]
fn test_clear_limit_after_confirm() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "limit 500");
    run(&mut app, &mut db, "clear-limit");
    assert_eq!(app.input_mode, InputMode::Confirm);
    confirm_pending(&mut app, &mut db).unwrap();

    assert_eq!(db.get_spending_limit().unwrap(), None);
    assert_eq!(app.notifier.limit(), None);
}

#[test]
fn test_dismiss_hides_and_persists() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "limit 1000");
    run(&mut app, &mut db, "add 900 Shopping Shoes");
    assert!(app.warnings().approaching);

    run(&mut app, &mut db, "dismiss");
    assert!(!app.warnings().approaching);
    assert_eq!(app.status_message, "80% spending warning dismissed for 24 hours.");
    assert!(db.get_flag(&dismissal_key()).unwrap().is_some());

    run(&mut app, &mut db, "refresh");
    assert!(!app.warnings().approaching);
}

#[test]
fn test_dismiss_without_warning_writes_nothing() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "dismiss");
    assert_eq!(app.status_message, "No warning to dismiss");
    assert_eq!(db.get_flag(&dismissal_key()).unwrap(), None);
}

#[test]
fn test_check_reports_exceeded() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "limit 100");
    run(&mut app, &mut db, "check");
    assert_eq!(app.status_message, "Spending is within your set limit.");

    run(&mut app, &mut db, "add 150 Entertainment Movie");
    run(&mut app, &mut db, "check");
    assert_eq!(app.status_message, "Spending limit exceeded!");
    assert_eq!(app.status_level, StatusLevel::Error);
}

// ── Session ───────────────────────────────────────────────────

#[test]
fn test_logout_resets_warnings_and_dismissal() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "limit 1000");
    run(&mut app, &mut db, "add 900 Shopping Shoes");
    run(&mut app, &mut db, "dismiss");

    run(&mut app, &mut db, "logout");
    assert_eq!(app.confirm_message, "Sign out asha?");
    confirm_pending(&mut app, &mut db).unwrap();

    assert!(app.user.is_none());
    assert!(!app.notifier.is_loaded());
    assert_eq!(db.session_user().unwrap(), None);
    assert_eq!(db.get_flag(&dismissal_key()).unwrap(), None);

    // signing back in re-raises the warning
    run(&mut app, &mut db, "login asha");
    assert!(app.warnings().approaching);
}

#[test]
fn test_export_writes_listed_expenses() {
    let (mut app, mut db) = signed_in();
    run(&mut app, &mut db, "add 100 Food Tea");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    run(&mut app, &mut db, &format!("export {}", path.display()));

    assert_eq!(app.status_level, StatusLevel::Success);
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2);
}
