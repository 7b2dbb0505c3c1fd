//! Spending-threshold notifier.
//!
//! The decision logic lives in [`transition`] and is pure. [`Notifier`] is the
//! boundary that reads the data source and flag store, feeds the transition
//! and keeps the result around for the next cycle.

mod dismissal;
mod event;
mod transition;

pub use dismissal::{
    is_expired, re_alert_window, DismissalRecord, MonthKey, RE_ALERT_DURATION_HOURS,
};
pub use event::NotifierEvent;
pub use transition::{current_month_spend, transition, Inputs, WarningState};

use chrono::{DateTime, Local, Utc};
use rust_decimal::Decimal;

use crate::error::TrackerError;
use crate::models::Expense;

/// Where expenses and the configured limit come from.
pub trait DataSource {
    fn list_expenses(&self) -> Result<Vec<Expense>, TrackerError>;
    fn get_limit(&self) -> Result<Option<Decimal>, TrackerError>;
    /// Rejects non-positive amounts with `Validation` before touching storage.
    fn set_limit(&mut self, amount: Decimal) -> Result<(), TrackerError>;
}

/// Durable string key/value store used to remember dismissals.
pub trait FlagStore {
    fn get(&self, key: &str) -> Result<Option<String>, TrackerError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), TrackerError>;
    fn remove(&mut self, key: &str) -> Result<(), TrackerError>;
}

#[derive(Debug, Clone, Default)]
pub struct Notifier {
    warnings: WarningState,
    spend: Decimal,
    limit: Option<Decimal>,
    loaded: bool,
    /// Last dismissal made in this process. Keeps the warning hidden for the
    /// window even when the flag store could not record it.
    session_dismissal: Option<(MonthKey, DismissalRecord)>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> WarningState {
        self.warnings
    }

    pub fn current_month_spend(&self) -> Decimal {
        self.spend
    }

    pub fn limit(&self) -> Option<Decimal> {
        self.limit
    }

    /// False until the first successful refresh (and again after sign-out).
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn session_dismissal_active(&self, month: MonthKey, now: DateTime<Utc>) -> bool {
        self.session_dismissal
            .is_some_and(|(m, record)| m == month && !is_expired(&record, now, re_alert_window()))
    }

    /// Run one evaluation cycle. On error nothing is changed.
    pub fn refresh<D, F>(
        &mut self,
        source: &D,
        flags: &F,
        now: DateTime<Local>,
    ) -> Result<Vec<NotifierEvent>, TrackerError>
    where
        D: DataSource + ?Sized,
        F: FlagStore + ?Sized,
    {
        let expenses = source.list_expenses()?;
        let limit = source.get_limit()?;

        let month = MonthKey::from_local(now);
        let spend = current_month_spend(&expenses, month);
        let now_utc = now.with_timezone(&Utc);
        let dismissed =
            self.session_dismissal_active(month, now_utc) || dismissal_active(flags, month, now_utc);

        let inputs = Inputs {
            spend,
            limit,
            dismissed,
        };
        let (next, events) = transition(self.warnings, &inputs);
        tracing::debug!(
            %month,
            %spend,
            limit = ?limit,
            dismissed,
            exceeded = next.exceeded,
            approaching = next.approaching,
            "notifier refreshed"
        );

        self.warnings = next;
        self.spend = spend;
        self.limit = limit;
        self.loaded = true;
        Ok(events)
    }

    /// Hide the approaching warning now and remember the dismissal for the
    /// current month. The in-memory state is updated even if the write fails.
    pub fn dismiss<F>(&mut self, flags: &mut F, now: DateTime<Local>) -> Result<NotifierEvent, TrackerError>
    where
        F: FlagStore + ?Sized,
    {
        self.warnings.approaching = false;

        let month = MonthKey::from_local(now);
        let record = DismissalRecord::at(now);
        self.session_dismissal = Some((month, record));
        record
            .encode()
            .and_then(|value| flags.set(&month.dismissal_key(), &value))
            .inspect_err(|e| {
                tracing::warn!(%month, error = %e, "could not persist warning dismissal");
            })?;

        tracing::info!(%month, "approaching-limit warning dismissed");
        Ok(NotifierEvent::WarningDismissed {
            month,
            window_hours: RE_ALERT_DURATION_HOURS,
        })
    }

    /// Once per application start: drop the previous month's dismissal when
    /// the month has changed, then record the current month.
    /// Returns the month that was swept, as stored.
    pub fn sweep_month_rollover<F>(flags: &mut F, now: DateTime<Local>) -> Result<Option<String>, TrackerError>
    where
        F: FlagStore + ?Sized,
    {
        let current = MonthKey::from_local(now).to_string();
        let swept = match flags.get(dismissal::LAST_MONTH_KEY)? {
            Some(previous) if previous != current => {
                flags.remove(&dismissal::dismissal_key(&previous))?;
                tracing::info!(%previous, %current, "month rolled over, cleared old dismissal");
                Some(previous)
            }
            _ => None,
        };
        flags.set(dismissal::LAST_MONTH_KEY, &current)?;
        Ok(swept)
    }

    /// Back to the initial no-data state, and forget this month's dismissal.
    pub fn sign_out<F>(&mut self, flags: &mut F, now: DateTime<Local>) -> Result<(), TrackerError>
    where
        F: FlagStore + ?Sized,
    {
        *self = Self::default();

        let month = MonthKey::from_local(now);
        let dismissal = flags.remove(&month.dismissal_key());
        let last_month = flags.remove(dismissal::LAST_MONTH_KEY);
        dismissal.and(last_month)
    }
}

/// Whether a still-valid dismissal exists for `month`. Unreadable records
/// count as absent.
fn dismissal_active<F>(flags: &F, month: MonthKey, now: DateTime<Utc>) -> bool
where
    F: FlagStore + ?Sized,
{
    let record = flags
        .get(&month.dismissal_key())
        .and_then(|raw| raw.as_deref().map(DismissalRecord::decode).transpose());

    match record {
        Ok(Some(record)) => !is_expired(&record, now, re_alert_window()),
        Ok(None) => false,
        Err(e) => {
            tracing::warn!(%month, error = %e, "ignoring unreadable dismissal record");
            false
        }
    }
}
