#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn expense(desc: &str, amount: Decimal, category: ExpenseCategory, date: &str) -> Expense {
    Expense::new(desc.into(), amount, category, date.into())
}

fn setup_test_data(db: &Database) {
    let rows = [
        expense("Groceries", dec!(1200.50), ExpenseCategory::Food, "2025-05-28"),
        expense("Metro card", dec!(500), ExpenseCategory::Transport, "2025-06-01"),
        expense("Electricity", dec!(1800), ExpenseCategory::Utilities, "2025-06-05"),
        expense("Dinner out", dec!(950.25), ExpenseCategory::Food, "2025-06-12"),
        expense("Movie", dec!(400), ExpenseCategory::Entertainment, "2025-07-02"),
    ];
    for row in &rows {
        db.insert_expense(row).unwrap();
    }
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_open_file_database_twice() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spendwatch.db");
    {
        let db = Database::open(&path).unwrap();
        db.insert_expense(&expense("Tea", dec!(20), ExpenseCategory::Food, "2025-06-01"))
            .unwrap();
    }
    // Reopening must not re-create or wipe anything.
    let db = Database::open(&path).unwrap();
    assert_eq!(db.get_all_expenses().unwrap().len(), 1);
}

// ── Expense CRUD ──────────────────────────────────────────────

#[test]
fn test_expense_insert_and_fetch() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_expense(&expense("  Coffee  ", dec!(4.50), ExpenseCategory::Food, "2025-06-03"))
        .unwrap();

    let fetched = db.get_expense_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.id, Some(id));
    assert_eq!(fetched.description, "Coffee");
    assert_eq!(fetched.amount, dec!(4.50));
    assert_eq!(fetched.category, ExpenseCategory::Food);
    assert_eq!(fetched.date, "2025-06-03");
}

#[test]
fn test_expense_by_id_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_expense_by_id(99999).unwrap().is_none());
}

#[test]
fn test_insert_rejects_invalid_expense() {
    let db = Database::open_in_memory().unwrap();
    let err = db
        .insert_expense(&expense("Free", Decimal::ZERO, ExpenseCategory::Other, "2025-06-03"))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TrackerError>(),
        Some(TrackerError::Validation(_))
    ));
    assert!(db.get_all_expenses().unwrap().is_empty());
}

#[test]
fn test_update_expense() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_expense(&expense("Bus", dec!(30), ExpenseCategory::Transport, "2025-06-03"))
        .unwrap();

    let mut exp = db.get_expense_by_id(id).unwrap().unwrap();
    exp.amount = dec!(45);
    exp.category = ExpenseCategory::Other;
    db.update_expense(&exp).unwrap();

    let fetched = db.get_expense_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.amount, dec!(45));
    assert_eq!(fetched.category, ExpenseCategory::Other);
}

#[test]
fn test_update_missing_expense_fails() {
    let db = Database::open_in_memory().unwrap();
    let mut exp = expense("Ghost", dec!(1), ExpenseCategory::Other, "2025-06-03");
    assert!(db.update_expense(&exp).is_err());
    exp.id = Some(42);
    assert!(db.update_expense(&exp).is_err());
}

#[test]
fn test_delete_expense() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_expense(&expense("Snack", dec!(10), ExpenseCategory::Food, "2025-06-03"))
        .unwrap();
    assert!(db.delete_expense(id).unwrap());
    assert!(!db.delete_expense(id).unwrap());
    assert!(db.get_expense_by_id(id).unwrap().is_none());
}

#[test]
fn test_expenses_newest_first() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);
    let all = db.get_all_expenses().unwrap();
    assert_eq!(all.len(), 5);
    let dates: Vec<&str> = all.iter().map(|e| e.date.as_str()).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
}

#[test]
fn test_filter_by_category() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);
    let filter = ExpenseFilter {
        category: Some(ExpenseCategory::Food),
        ..Default::default()
    };
    let food = db.get_expenses(&filter).unwrap();
    assert_eq!(food.len(), 2);
    assert!(food.iter().all(|e| e.category == ExpenseCategory::Food));
}

#[test]
fn test_filter_by_date_range_inclusive() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);
    let filter = ExpenseFilter {
        from: Some("2025-06-01".into()),
        to: Some("2025-06-12".into()),
        ..Default::default()
    };
    let june = db.get_expenses(&filter).unwrap();
    assert_eq!(june.len(), 3);
}

#[test]
fn test_filter_by_month_and_category() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);
    let filter = ExpenseFilter {
        category: Some(ExpenseCategory::Food),
        month: Some("2025-06".into()),
        ..Default::default()
    };
    let rows = db.get_expenses(&filter).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "Dinner out");
}

// ── Spending limit ────────────────────────────────────────────

#[test]
fn test_limit_absent_by_default() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_spending_limit().unwrap().is_none());
}

#[test]
fn test_limit_upsert_and_clear() {
    let db = Database::open_in_memory().unwrap();
    db.set_spending_limit(SpendingLimit::new(dec!(10000)).unwrap())
        .unwrap();
    db.set_spending_limit(SpendingLimit::new(dec!(12500.75)).unwrap())
        .unwrap();
    assert_eq!(db.get_spending_limit().unwrap(), Some(dec!(12500.75)));

    db.clear_spending_limit().unwrap();
    assert!(db.get_spending_limit().unwrap().is_none());
}

// ── Flags & session ───────────────────────────────────────────

#[test]
fn test_flags_roundtrip() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_flag("k").unwrap().is_none());
    db.set_flag("k", "one").unwrap();
    db.set_flag("k", "two").unwrap();
    assert_eq!(db.get_flag("k").unwrap().as_deref(), Some("two"));
    db.remove_flag("k").unwrap();
    db.remove_flag("k").unwrap();
    assert!(db.get_flag("k").unwrap().is_none());
}

#[test]
fn test_session_lifecycle() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.session_user().unwrap().is_none());
    db.start_session(" asha@example.com ").unwrap();
    assert_eq!(db.session_user().unwrap().as_deref(), Some("asha@example.com"));
    db.end_session().unwrap();
    assert!(db.session_user().unwrap().is_none());
}

#[test]
fn test_session_requires_name() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.start_session("   ").is_err());
}

// ── DataSource / FlagStore ────────────────────────────────────

#[test]
fn test_list_expenses_requires_session() {
    let db = Database::open_in_memory().unwrap();
    setup_test_data(&db);
    let err = db.list_expenses().unwrap_err();
    assert!(err.is_auth());

    db.start_session("asha").unwrap();
    assert_eq!(db.list_expenses().unwrap().len(), 5);
}

#[test]
fn test_set_limit_validates_before_writing() {
    let mut db = Database::open_in_memory().unwrap();
    db.set_limit(dec!(2000)).unwrap();

    let err = db.set_limit(dec!(-5)).unwrap_err();
    assert!(matches!(err, TrackerError::Validation(_)));
    let err = db.set_limit(Decimal::ZERO).unwrap_err();
    assert!(matches!(err, TrackerError::Validation(_)));
    assert_eq!(db.get_limit().unwrap(), Some(dec!(2000)));
}

#[test]
fn test_flag_store_contract() {
    let mut db = Database::open_in_memory().unwrap();
    FlagStore::set(&mut db, "lastDismissed80PercentMonth", "2025-06").unwrap();
    assert_eq!(
        FlagStore::get(&db, "lastDismissed80PercentMonth").unwrap().as_deref(),
        Some("2025-06")
    );
    FlagStore::remove(&mut db, "lastDismissed80PercentMonth").unwrap();
    assert!(FlagStore::get(&db, "lastDismissed80PercentMonth").unwrap().is_none());
}

#[test]
fn test_notifier_against_database() {
    use crate::notifier::{Notifier, NotifierEvent};
    use chrono::{Local, TimeZone};

    let mut db = Database::open_in_memory().unwrap();
    db.start_session("asha").unwrap();
    db.set_limit(dec!(3500)).unwrap();
    setup_test_data(&db);

    let now = Local.with_ymd_and_hms(2025, 6, 20, 12, 0, 0).unwrap();
    Notifier::sweep_month_rollover(&mut db, now).unwrap();

    // June spend: 500 + 1800 + 950.25 = 3250.25, which is >= 80% of 3500.
    let mut notifier = Notifier::new();
    let events = notifier.refresh(&db, &db, now).unwrap();
    assert_eq!(notifier.current_month_spend(), dec!(3250.25));
    assert!(matches!(
        events.as_slice(),
        [NotifierEvent::LimitApproachingEntered { .. }]
    ));

    notifier.dismiss(&mut db, now).unwrap();
    assert!(db.get_flag("dismissed80PercentWarning_2025-06").unwrap().is_some());

    notifier.sign_out(&mut db, now).unwrap();
    assert!(db.get_flag("dismissed80PercentWarning_2025-06").unwrap().is_none());
    assert!(db.get_flag("lastDismissed80PercentMonth").unwrap().is_none());
}
