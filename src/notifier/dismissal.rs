use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Hours after which a dismissed approaching-limit warning may fire again.
pub const RE_ALERT_DURATION_HOURS: i64 = 24;

pub(crate) const DISMISSAL_KEY_PREFIX: &str = "dismissed80PercentWarning_";
pub(crate) const LAST_MONTH_KEY: &str = "lastDismissed80PercentMonth";

pub fn re_alert_window() -> Duration {
    Duration::hours(RE_ALERT_DURATION_HOURS)
}

/// A calendar month, rendered as "YYYY-MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn from_local(now: DateTime<Local>) -> Self {
        Self::from_date(now.date_naive())
    }

    pub fn parse(s: &str) -> Option<Self> {
        let (y, m) = s.trim().split_once('-')?;
        if y.len() != 4 || m.len() != 2 {
            return None;
        }
        let year: i32 = y.parse().ok()?;
        let month: u32 = m.parse().ok()?;
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn dismissal_key(&self) -> String {
        dismissal_key(&self.to_string())
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Flag-store key for a month given as raw text. Used for the rollover sweep,
/// where the stored month may not even be well formed.
pub(crate) fn dismissal_key(month: &str) -> String {
    format!("{DISMISSAL_KEY_PREFIX}{month}")
}

/// When the user dismissed the approaching-limit warning for a month.
/// Stored as `{"timestamp": "<RFC 3339>"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissalRecord {
    pub timestamp: DateTime<Utc>,
}

impl DismissalRecord {
    pub fn at(now: DateTime<Local>) -> Self {
        Self {
            timestamp: now.with_timezone(&Utc),
        }
    }

    pub fn encode(&self) -> Result<String, TrackerError> {
        serde_json::to_string(self).map_err(TrackerError::storage)
    }

    pub fn decode(raw: &str) -> Result<Self, TrackerError> {
        serde_json::from_str(raw).map_err(TrackerError::storage)
    }
}

/// A record stops suppressing the warning once `window` has fully elapsed.
pub fn is_expired(record: &DismissalRecord, now: DateTime<Utc>, window: Duration) -> bool {
    now.signed_duration_since(record.timestamp) >= window
}
