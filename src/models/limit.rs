use rust_decimal::Decimal;

use crate::error::TrackerError;

/// A validated monthly spending cap. Only positive amounts can be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendingLimit(Decimal);

impl SpendingLimit {
    pub fn new(amount: Decimal) -> Result<Self, TrackerError> {
        if amount <= Decimal::ZERO {
            return Err(TrackerError::Validation(format!(
                "spending limit must be a positive amount, got {amount}"
            )));
        }
        Ok(Self(amount))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Amount left before the cap is reached; negative once exceeded.
    pub fn remaining(&self, spend: Decimal) -> Decimal {
        self.0 - spend
    }
}

impl std::fmt::Display for SpendingLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
