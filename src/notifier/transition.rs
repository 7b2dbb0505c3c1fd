use rust_decimal::Decimal;

use super::dismissal::MonthKey;
use super::event::NotifierEvent;
use crate::models::Expense;

/// Everything one evaluation cycle needs, already read from the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inputs {
    pub spend: Decimal,
    pub limit: Option<Decimal>,
    pub dismissed: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarningState {
    pub exceeded: bool,
    pub approaching: bool,
}

impl WarningState {
    pub fn evaluate(inputs: &Inputs) -> Self {
        let Some(limit) = inputs.limit.filter(|l| *l > Decimal::ZERO) else {
            return Self::default();
        };
        let threshold = limit * Decimal::new(8, 1);
        Self {
            exceeded: inputs.spend > limit,
            approaching: inputs.spend >= threshold && inputs.spend < limit && !inputs.dismissed,
        }
    }
}

/// `(previous, inputs) -> (next, events)`.
///
/// `previous` is the state produced by the last successful cycle (or by a
/// dismissal since then). The returned state is what the next cycle must be
/// given back.
pub fn transition(previous: WarningState, inputs: &Inputs) -> (WarningState, Vec<NotifierEvent>) {
    let next = WarningState::evaluate(inputs);
    let mut events = Vec::new();

    if let Some(limit) = inputs.limit {
        if next.approaching && !previous.approaching {
            events.push(NotifierEvent::LimitApproachingEntered {
                spend: inputs.spend,
                limit,
            });
        }
        if next.exceeded && !previous.exceeded {
            events.push(NotifierEvent::LimitExceededEntered {
                spend: inputs.spend,
                limit,
            });
        }
    }

    (next, events)
}

/// Sum of amounts dated inside `month`. Expenses whose date cannot be parsed
/// are skipped.
pub fn current_month_spend(expenses: &[Expense], month: MonthKey) -> Decimal {
    expenses
        .iter()
        .filter(|exp| match exp.parsed_date() {
            Some(date) => month.contains(date),
            None => {
                tracing::warn!(id = ?exp.id, date = %exp.date, "skipping expense with invalid date");
                false
            }
        })
        .map(|exp| exp.amount)
        .sum()
}
