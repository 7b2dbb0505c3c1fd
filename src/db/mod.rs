mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::error::TrackerError;
use crate::models::*;
use crate::notifier::{DataSource, FlagStore};

pub(crate) const SESSION_KEY: &str = "sessionUser";

const EXPENSE_COLUMNS: &str = "id, description, amount, category, date";

/// Optional filters for listing expenses. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExpenseFilter {
    pub(crate) category: Option<ExpenseCategory>,
    pub(crate) from: Option<String>,
    pub(crate) to: Option<String>,
    /// "YYYY-MM"
    pub(crate) month: Option<String>,
}

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::info!(version = schema::CURRENT_VERSION, "created database schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::info!(from = current, to = schema::CURRENT_VERSION, "migrated database");
        }

        Ok(())
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        expense.validate()?;
        self.conn.execute(
            "INSERT INTO expenses (description, amount, category, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                expense.description.trim(),
                expense.amount.to_string(),
                expense.category.as_str(),
                expense.date,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, "inserted expense");
        Ok(id)
    }

    pub(crate) fn update_expense(&self, expense: &Expense) -> Result<()> {
        let id = expense
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update an expense without an ID"))?;
        expense.validate()?;
        let changed = self.conn.execute(
            "UPDATE expenses SET description = ?1, amount = ?2, category = ?3, date = ?4
             WHERE id = ?5",
            params![
                expense.description.trim(),
                expense.amount.to_string(),
                expense.category.as_str(),
                expense.date,
                id,
            ],
        )?;
        if changed == 0 {
            anyhow::bail!("Expense {id} not found");
        }
        Ok(())
    }

    pub(crate) fn delete_expense(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub(crate) fn get_expense_by_id(&self, id: i64) -> Result<Option<Expense>> {
        let sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], expense_from_row)
            .optional()?)
    }

    pub(crate) fn get_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let mut sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(cat) = filter.category {
            sql.push_str(&format!(" AND category = ?{}", param_values.len() + 1));
            param_values.push(Box::new(cat.as_str()));
        }
        if let Some(from) = &filter.from {
            sql.push_str(&format!(" AND date >= ?{}", param_values.len() + 1));
            param_values.push(Box::new(from.clone()));
        }
        if let Some(to) = &filter.to {
            // Dates may carry a time suffix; compare on the date prefix.
            sql.push_str(&format!(" AND substr(date, 1, 10) <= ?{}", param_values.len() + 1));
            param_values.push(Box::new(to.clone()));
        }
        if let Some(m) = &filter.month {
            sql.push_str(&format!(" AND date LIKE ?{}", param_values.len() + 1));
            param_values.push(Box::new(format!("{m}%")));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), expense_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_all_expenses(&self) -> Result<Vec<Expense>> {
        self.get_expenses(&ExpenseFilter::default())
    }

    // ── Spending limit ────────────────────────────────────────

    pub(crate) fn get_spending_limit(&self) -> Result<Option<Decimal>> {
        let amount: Option<String> = self
            .conn
            .query_row("SELECT amount FROM spending_limit WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        amount
            .map(|s| Decimal::from_str(&s).context("Stored spending limit is not a number"))
            .transpose()
    }

    pub(crate) fn set_spending_limit(&self, limit: SpendingLimit) -> Result<()> {
        self.conn.execute(
            "INSERT INTO spending_limit (id, amount, updated_at) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET amount = ?1, updated_at = ?2",
            params![limit.amount().to_string(), chrono::Utc::now().to_rfc3339()],
        )?;
        tracing::info!(limit = %limit, "spending limit set");
        Ok(())
    }

    pub(crate) fn clear_spending_limit(&self) -> Result<()> {
        self.conn
            .execute("DELETE FROM spending_limit WHERE id = 1", [])?;
        tracing::info!("spending limit cleared");
        Ok(())
    }

    // ── Flags ─────────────────────────────────────────────────

    pub(crate) fn get_flag(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM flags WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub(crate) fn set_flag(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO flags (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    pub(crate) fn remove_flag(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM flags WHERE key = ?1", params![key])?;
        Ok(())
    }

    // ── Session ───────────────────────────────────────────────

    pub(crate) fn session_user(&self) -> Result<Option<String>> {
        self.get_flag(SESSION_KEY)
    }

    pub(crate) fn start_session(&self, user: &str) -> Result<()> {
        let user = user.trim();
        if user.is_empty() {
            return Err(TrackerError::Validation("profile name must not be empty".into()).into());
        }
        self.set_flag(SESSION_KEY, user)?;
        tracing::info!(%user, "session started");
        Ok(())
    }

    pub(crate) fn end_session(&self) -> Result<()> {
        self.remove_flag(SESSION_KEY)?;
        tracing::info!("session ended");
        Ok(())
    }
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let amount_str: String = row.get(2)?;
    let category: String = row.get(3)?;
    Ok(Expense {
        id: Some(row.get(0)?),
        description: row.get(1)?,
        amount: Decimal::from_str(&amount_str).unwrap_or_default(),
        category: ExpenseCategory::parse(&category),
        date: row.get(4)?,
    })
}

// ── Collaborator contracts ────────────────────────────────────

impl DataSource for Database {
    fn list_expenses(&self) -> Result<Vec<Expense>, TrackerError> {
        match self.session_user() {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(TrackerError::Auth(
                    "no active session, run `spendwatch login <name>`".into(),
                ))
            }
            Err(e) => return Err(TrackerError::service(format!("{e:#}"))),
        }
        self.get_all_expenses()
            .map_err(|e| TrackerError::service(format!("{e:#}")))
    }

    fn get_limit(&self) -> Result<Option<Decimal>, TrackerError> {
        self.get_spending_limit()
            .map_err(|e| TrackerError::service(format!("{e:#}")))
    }

    fn set_limit(&mut self, amount: Decimal) -> Result<(), TrackerError> {
        let limit = SpendingLimit::new(amount)?;
        self.set_spending_limit(limit)
            .map_err(|e| TrackerError::service(format!("{e:#}")))
    }
}

impl FlagStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, TrackerError> {
        self.get_flag(key)
            .map_err(|e| TrackerError::storage(format!("{e:#}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), TrackerError> {
        self.set_flag(key, value)
            .map_err(|e| TrackerError::storage(format!("{e:#}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), TrackerError> {
        self.remove_flag(key)
            .map_err(|e| TrackerError::storage(format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests;
