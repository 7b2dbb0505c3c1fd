use anyhow::{Context, Result};
use std::path::PathBuf;

pub(crate) const DB_ENV: &str = "SPENDWATCH_DB";
pub(crate) const LOG_ENV: &str = "SPENDWATCH_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

/// Where things live on disk, plus the log filter. Resolved once at start.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) db_path: PathBuf,
    pub(crate) log_path: PathBuf,
    pub(crate) log_filter: String,
}

impl Config {
    pub(crate) fn load() -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "spendwatch", "SpendWatch")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(Self::resolve(
            data_dir,
            std::env::var(DB_ENV).ok(),
            std::env::var(LOG_ENV).ok(),
        ))
    }

    fn resolve(data_dir: PathBuf, db_override: Option<String>, log_filter: Option<String>) -> Self {
        let db_path = db_override
            .filter(|p| !p.trim().is_empty())
            .map(|p| PathBuf::from(crate::run::cli::shellexpand(p.trim())))
            .unwrap_or_else(|| data_dir.join("spendwatch.db"));
        Self {
            db_path,
            log_path: data_dir.join("spendwatch.log"),
            log_filter: log_filter
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}
