/*!
# Daybook

Daybook is a personal journal that keeps exactly one entry per calendar day.
Entries carry a title, free text, an optional category, a set of tags and up
to three moods (one primary, at most two secondary). From the entry history
the crate derives writing streaks and an analytics report (mood/tag/category
distributions, word counts, trends, missed days).

## Core Features

- One journal entry per calendar date, with tag and mood classification
- Filtered, paginated entry queries (search, moods, category, dates, tags)
- Current and longest consecutive-day streaks
- Analytics report over any fetched entry window

## Architecture

The codebase follows a modular architecture with clear separation of concerns:

- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `errors`: Error handling infrastructure
- `db`: SQLite-backed entry store, reference catalog and query engine
- `streak`: Pure streak calculation over entry dates
- `analytics`: Pure aggregation over fetched entries

Data flows one way: the store and query engine produce entry collections,
and the streak and analytics modules consume them without touching storage.

## Usage Example

```rust,no_run
use chrono::NaiveDate;
use daybook::db::entries::{self, JournalEntry};
use daybook::db::Database;

fn main() -> daybook::AppResult<()> {
    let db = Database::open(std::path::Path::new("/tmp/journal.db"))?;
    db.initialize_schema()?;

    let mut conn = db.get_conn()?;
    let mut entry = JournalEntry::new(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
    entry.content = "Slow morning, good coffee".to_string();
    entries::save_entry(&mut conn, &mut entry)?;
    Ok(())
}
```
*/

/// Pure aggregation over fetched journal entries
pub mod analytics;
/// Command-line interface for parsing user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Shared literal constants
pub mod constants;
/// SQLite-backed storage: schema, catalog, entry store, query engine
pub mod db;
/// Error types and utilities for error handling
pub mod errors;
/// Pure streak calculation over entry dates
pub mod streak;

// Re-export important types for convenience
pub use analytics::{JournalReport, ReportWindow};
pub use cli::CliArgs;
pub use config::Config;
pub use db::entries::JournalEntry;
pub use db::query::EntryFilter;
pub use db::Database;
pub use errors::{AppError, AppResult};
