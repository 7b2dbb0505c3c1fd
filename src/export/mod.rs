use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Expense;

/// Write expenses as CSV with a header row. Returns the number of rows written.
pub(crate) fn write_csv(path: &Path, expenses: &[Expense]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(["id", "date", "description", "category", "amount"])?;
    for exp in expenses {
        wtr.write_record([
            exp.id.map(|id| id.to_string()).unwrap_or_default(),
            exp.date.clone(),
            exp.description.clone(),
            exp.category.to_string(),
            format!("{:.2}", exp.amount),
        ])?;
    }
    wtr.flush().context("Failed to flush CSV export")?;
    tracing::info!(path = %path.display(), rows = expenses.len(), "exported expenses");
    Ok(expenses.len())
}

#[cfg(test)]
mod tests;
