use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{Expense, ExpenseCategory};

pub(crate) fn total_spend(expenses: &[Expense]) -> Decimal {
    expenses.iter().map(|e| e.amount).sum()
}

/// Spend per "YYYY-MM", oldest month first. Expenses with unreadable dates
/// are left out.
pub(crate) fn spending_by_month(expenses: &[Expense]) -> Vec<(String, Decimal)> {
    let mut months: BTreeMap<String, Decimal> = BTreeMap::new();
    for exp in expenses {
        match exp.month() {
            Some(month) => *months.entry(month).or_default() += exp.amount,
            None => tracing::warn!(id = ?exp.id, date = %exp.date, "expense left out of monthly totals"),
        }
    }
    months.into_iter().collect()
}

/// Spend per category, largest first. Ties keep category order.
pub(crate) fn spending_by_category(expenses: &[Expense]) -> Vec<(ExpenseCategory, Decimal)> {
    let mut categories: BTreeMap<ExpenseCategory, Decimal> = BTreeMap::new();
    for exp in expenses {
        *categories.entry(exp.category).or_default() += exp.amount;
    }
    let mut result: Vec<_> = categories.into_iter().collect();
    result.sort_by(|a, b| b.1.cmp(&a.1));
    result
}

/// Share of the limit already spent, as a 0..=1 ratio (clamped).
pub(crate) fn limit_ratio(spend: Decimal, limit: Option<Decimal>) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    match limit {
        Some(l) if l > Decimal::ZERO => (spend / l).to_f64().unwrap_or(0.0).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests;
