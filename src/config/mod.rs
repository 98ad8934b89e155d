//! Configuration management for the daybook application.
//!
//! This module handles loading and validating configuration settings from
//! environment variables, with sensible defaults. The only setting today is
//! the location of the SQLite database file.
//!
//! # Environment Variables
//!
//! - `DAYBOOK_DB`: Path to the database file (defaults to
//!   `~/.local/share/daybook/journal.db`)

use crate::constants::{DEFAULT_DB_PATH, ENV_VAR_DAYBOOK_DB};
use crate::errors::{AppError, AppResult};
use std::env;
use std::path::PathBuf;

/// Configuration for the daybook application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use daybook::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("/tmp/journal.db"),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file.
    ///
    /// Loaded from the `DAYBOOK_DB` environment variable with a fallback to
    /// `~/.local/share/daybook/journal.db`.
    pub db_path: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Tilde and `$VAR` references in the configured path are expanded.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the path cannot be expanded (e.g. it
    /// references an environment variable that is not set).
    pub fn load() -> AppResult<Self> {
        let raw = env::var(ENV_VAR_DAYBOOK_DB).unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());

        let expanded = shellexpand::full(&raw)
            .map_err(|e| AppError::Config(format!("Cannot expand database path '{}': {}", raw, e)))?;

        Ok(Config {
            db_path: PathBuf::from(expanded.as_ref()),
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the database path is empty or has no
    /// parent directory to create the file in.
    pub fn validate(&self) -> AppResult<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("Database path must not be empty".to_string()));
        }
        Ok(())
    }

    /// Ensures the parent directory of the database file exists.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub fn ensure_db_directory(&self) -> AppResult<()> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
