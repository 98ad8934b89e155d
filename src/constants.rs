//! Constants used throughout the application.
//!
//! This module contains all constants used in the daybook application,
//! organized into logical groups. Having constants centralized makes them
//! easier to find, modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "daybook";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A one-entry-per-day journal with moods, tags and streaks";

// Configuration Keys & Environment Variables
/// Environment variable overriding the database file location.
pub const ENV_VAR_DAYBOOK_DB: &str = "DAYBOOK_DB";
/// Default database path, expanded relative to the user's home directory.
pub const DEFAULT_DB_PATH: &str = "~/.local/share/daybook/journal.db";

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD), used for stored dates.
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD), accepted on the CLI.
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";

// Entry Model
/// Maximum number of secondary moods an entry may carry (plus one primary).
pub const MAX_SECONDARY_MOODS: usize = 2;

// Query Engine
/// Default page size for entry listings.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

// Analytics
/// Default (and maximum) reporting window for the missed-day scan, in days.
pub const REPORT_WINDOW_DAYS: i64 = 90;
/// Number of entries included in the word-count trend line.
pub const WORD_TREND_POINTS: usize = 7;
/// Number of tags reported in the top-tags ranking.
pub const TOP_TAGS_LIMIT: usize = 10;
