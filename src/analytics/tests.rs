#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn exp(amount: Decimal, category: ExpenseCategory, date: &str) -> Expense {
    Expense::new("x".into(), amount, category, date.into())
}

fn sample() -> Vec<Expense> {
    vec![
        exp(dec!(100), ExpenseCategory::Food, "2025-06-01"),
        exp(dec!(250), ExpenseCategory::Shopping, "2025-04-11"),
        exp(dec!(75.50), ExpenseCategory::Food, "2025-04-02"),
        exp(dec!(30), ExpenseCategory::Transport, "2025-06-20"),
        exp(dec!(999), ExpenseCategory::Other, "bogus"),
    ]
}

#[test]
fn test_total_spend_includes_everything() {
    assert_eq!(total_spend(&sample()), dec!(1454.50));
    assert_eq!(total_spend(&[]), Decimal::ZERO);
}

#[test]
fn test_spending_by_month_sorted_and_skips_bad_dates() {
    let months = spending_by_month(&sample());
    assert_eq!(
        months,
        vec![
            ("2025-04".to_string(), dec!(325.50)),
            ("2025-06".to_string(), dec!(130)),
        ]
    );
}

#[test]
fn test_spending_by_category_largest_first() {
    let cats = spending_by_category(&sample());
    assert_eq!(cats[0], (ExpenseCategory::Other, dec!(999)));
    assert_eq!(cats[1], (ExpenseCategory::Shopping, dec!(250)));
    assert_eq!(cats[2], (ExpenseCategory::Food, dec!(175.50)));
    assert_eq!(cats[3], (ExpenseCategory::Transport, dec!(30)));
}

#[test]
fn test_limit_ratio() {
    assert_eq!(limit_ratio(dec!(500), Some(dec!(1000))), 0.5);
    assert_eq!(limit_ratio(dec!(1500), Some(dec!(1000))), 1.0);
    assert_eq!(limit_ratio(dec!(500), None), 0.0);
    assert_eq!(limit_ratio(dec!(500), Some(Decimal::ZERO)), 0.0);
}
