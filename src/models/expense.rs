use chrono::{DateTime, Local, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::ExpenseCategory;
use crate::error::TrackerError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a user-entered money amount ("1200", "1,200.50", "₹99").
pub fn parse_amount(input: &str) -> Result<Decimal, TrackerError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    Decimal::from_str(&cleaned)
        .map_err(|_| TrackerError::Validation(format!("'{input}' is not a valid amount")))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: Option<i64>,
    pub description: String,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    /// Format: "YYYY-MM-DD"
    pub date: String,
}

impl Expense {
    pub fn new(description: String, amount: Decimal, category: ExpenseCategory, date: String) -> Self {
        Self {
            id: None,
            description,
            amount,
            category,
            date,
        }
    }

    /// Calendar date of the expense. Accepts a plain `YYYY-MM-DD` date or a
    /// full RFC 3339 timestamp (taken in local time).
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.date.trim();
        NaiveDate::parse_from_str(raw, DATE_FORMAT).ok().or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Local).date_naive())
        })
    }

    /// "YYYY-MM" of the expense date, if it parses.
    pub fn month(&self) -> Option<String> {
        self.parsed_date().map(|d| d.format("%Y-%m").to_string())
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.description.trim().is_empty() {
            return Err(TrackerError::Validation(
                "description must not be empty".into(),
            ));
        }
        if self.amount <= Decimal::ZERO {
            return Err(TrackerError::Validation(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }
        if self.parsed_date().is_none() {
            return Err(TrackerError::Validation(format!(
                "invalid date '{}', expected YYYY-MM-DD",
                self.date
            )));
        }
        Ok(())
    }
}
