pub(crate) mod cli;
mod tui;

pub(crate) use cli::as_cli;
pub(crate) use tui::as_tui;

use chrono::Local;

use crate::db::Database;
use crate::notifier::Notifier;

/// Start-of-session housekeeping. Failures are logged and otherwise ignored:
/// a leftover dismissal from last month only delays a warning.
pub(crate) fn sweep_month_rollover(db: &mut Database) {
    if let Err(e) = Notifier::sweep_month_rollover(db, Local::now()) {
        tracing::warn!(error = %e, "month rollover sweep failed");
    }
}
