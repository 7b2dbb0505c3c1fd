use thiserror::Error;

/// Failures surfaced by the data source, the flag store and input checks.
///
/// None of these are fatal: `Auth` asks the caller to sign in again,
/// `Service` and `Storage` can be retried, `Validation` is rejected before
/// anything is written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("not signed in: {0}")]
    Auth(String),
    #[error("service unavailable: {0}")]
    Service(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl TrackerError {
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    pub(crate) fn service(err: impl std::fmt::Display) -> Self {
        Self::Service(err.to_string())
    }

    pub(crate) fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }
}
