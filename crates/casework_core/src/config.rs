//! Environment-driven runtime configuration.
//!
//! # Invariants
//! - Blank or whitespace-only values are treated as unset.
//! - Resolution never fails; every key has a default or is optional.

use crate::bootstrap::dataset::ExampleDataSource;
use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "CASEWORK_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "CASEWORK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "CASEWORK_LOG_DIR";
pub const EXAMPLE_DATA_DIR_ENV: &str = "CASEWORK_EXAMPLE_DATA_DIR";

const DEFAULT_DB_FILE_NAME: &str = "casework.sqlite3";

/// Resolved settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub example_data_dir: Option<PathBuf>,
}

impl CoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        Self {
            db_path: value(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            log_level: value(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: value(LOG_DIR_ENV).map(PathBuf::from),
            example_data_dir: value(EXAMPLE_DATA_DIR_ENV).map(PathBuf::from),
        }
    }

    pub fn example_data_source(&self) -> ExampleDataSource {
        ExampleDataSource::from_dir(self.example_data_dir.clone())
    }
}

pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
