//! Error handling utilities for the daybook application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.

use chrono::NaiveDate;
use thiserror::Error;

/// Represents specific error cases that can occur during database operations.
///
/// This enum provides detailed, contextual error information for different
/// failure modes when reading or writing the journal database.
///
/// # Examples
///
/// ```
/// use daybook::errors::DatabaseError;
///
/// let error = DatabaseError::NotFound("Entry with id 123 not found".to_string());
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite database error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}\n\nThis may indicate database connection issues. Try closing other daybook instances.")]
    Pool(#[from] r2d2::Error),

    /// An entry already exists for the given calendar date.
    ///
    /// Exactly one entry per day is allowed; callers must not silently
    /// overwrite an existing entry.
    #[error("An entry for {date} already exists. Edit the existing entry instead of creating a new one.")]
    DuplicateDate {
        /// The date that is already taken
        date: NaiveDate,
    },

    /// Requested entry not found in database.
    #[error("Entry not found: {0}")]
    NotFound(String),
}

/// Represents error cases raised by the query engine.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Malformed date range: the end date precedes the start date.
    ///
    /// Raised instead of silently returning an empty result set, so caller
    /// bugs surface immediately.
    #[error("Invalid date range: end date {end} is before start date {start}")]
    InvalidRange {
        /// Start of the requested range
        start: NaiveDate,
        /// End of the requested range
        end: NaiveDate,
    },
}

/// Represents all possible errors that can occur in the daybook application.
///
/// This enum is the central error type used across the application, with
/// variants for different error categories. It uses `thiserror` for deriving
/// the `Error` trait implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use daybook::errors::AppError;
///
/// let error = AppError::Config("Missing database path".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: Missing database path");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors in journal entry logic (e.g., invalid date formats, unknown
    /// mood names).
    #[error("Journal logic error: {0}")]
    Journal(String),

    /// Errors related to database operations.
    ///
    /// This variant uses a dedicated DatabaseError type to provide detailed
    /// information about what went wrong with database operations.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Errors raised by the query engine.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
///
/// This type alias is used throughout the application to represent operations
/// that may fail with an `AppError`.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
    }

    #[test]
    fn test_duplicate_date_display() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        let error = DatabaseError::DuplicateDate { date };
        let message = format!("{}", error);
        assert!(message.contains("2024-03-14"));
        assert!(message.contains("already exists"));
    }

    #[test]
    fn test_invalid_range_display() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let error = QueryError::InvalidRange { start, end };
        let message = format!("{}", error);
        assert!(message.contains("2024-05-10"));
        assert!(message.contains("2024-05-01"));
        assert!(message.contains("before"));
    }

    #[test]
    fn test_database_error_conversion_to_app_error() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let db_error = DatabaseError::DuplicateDate { date };
        let app_error: AppError = db_error.into();

        match app_error {
            AppError::Database(DatabaseError::DuplicateDate { date: d }) => {
                assert_eq!(d, date);
            }
            _ => panic!("Expected AppError::Database variant"),
        }
    }

    #[test]
    fn test_query_error_conversion_to_app_error() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let app_error: AppError = QueryError::InvalidRange { start, end }.into();

        assert!(matches!(
            app_error,
            AppError::Query(QueryError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_error_source_chaining() {
        use std::error::Error;

        let db_error = DatabaseError::Sqlite(rusqlite::Error::QueryReturnedNoRows);
        let app_error = AppError::Database(db_error);

        // AppError -> DatabaseError -> rusqlite::Error
        let first = app_error.source().expect("AppError should have a source");
        let db = first
            .downcast_ref::<DatabaseError>()
            .expect("First source should be DatabaseError");
        assert!(db.source().is_some());
    }
}
