use rust_decimal::Decimal;

use super::dismissal::MonthKey;
use crate::error::TrackerError;

/// Outbound notifications for the presentation layer. The "entered" events
/// are edge-triggered: each fires once per false-to-true transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierEvent {
    LimitApproachingEntered { spend: Decimal, limit: Decimal },
    LimitExceededEntered { spend: Decimal, limit: Decimal },
    WarningDismissed { month: MonthKey, window_hours: i64 },
    FetchFailed { reason: String },
}

impl NotifierEvent {
    pub fn fetch_failed(err: &TrackerError) -> Self {
        Self::FetchFailed {
            reason: err.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::LimitExceededEntered { .. } | Self::FetchFailed { .. }
        )
    }
}

impl std::fmt::Display for NotifierEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LimitApproachingEntered { spend, limit } => write!(
                f,
                "You've spent over 80% of your limit! Current: ₹{spend:.2} / Limit: ₹{limit:.2}"
            ),
            Self::LimitExceededEntered { spend, limit } => write!(
                f,
                "Spending limit exceeded! Current: ₹{spend:.2} / Limit: ₹{limit:.2}"
            ),
            Self::WarningDismissed { window_hours, .. } => {
                write!(f, "80% spending warning dismissed for {window_hours} hours.")
            }
            Self::FetchFailed { reason } => write!(f, "Failed to load data: {reason}"),
        }
    }
}
