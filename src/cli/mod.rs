//! Command-line interface for the daybook application.
//!
//! Parsing only lives here; command execution is wired up in `main`.

use crate::constants::{APP_DESCRIPTION, APP_NAME, DATE_FORMAT_COMPACT, DATE_FORMAT_ISO, DEFAULT_PAGE_SIZE};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// A one-entry-per-day journal with moods, tags and streaks.
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION, version)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Print verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write or update the entry for a date (defaults to today)
    Add {
        /// Entry date (YYYY-MM-DD or YYYYMMDD)
        #[arg(short, long)]
        date: Option<String>,

        /// Entry title
        #[arg(short, long)]
        title: Option<String>,

        /// Entry text
        #[arg(short, long)]
        content: String,

        /// Category name
        #[arg(long)]
        category: Option<String>,

        /// Tag name; repeat for several, unknown tags are created
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Mood name; repeat for several, the first one is the primary mood
        #[arg(long = "mood")]
        moods: Vec<String>,
    },

    /// Show the entry for a date (defaults to today)
    Show {
        /// Entry date (YYYY-MM-DD or YYYYMMDD)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List entries, optionally filtered
    List {
        /// Substring to look for in titles and content
        #[arg(short, long)]
        search: Option<String>,

        /// Only entries with this mood; repeat for "any of"
        #[arg(long = "mood")]
        moods: Vec<String>,

        /// Only entries in this category
        #[arg(long)]
        category: Option<String>,

        /// Inclusive start date
        #[arg(long)]
        from: Option<String>,

        /// Inclusive end date
        #[arg(long)]
        to: Option<String>,

        /// Only entries with this tag; repeat for "any of"
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Entries per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,
    },

    /// List the entries of one calendar month, oldest first
    Month {
        year: i32,
        month: u32,
    },

    /// Delete an entry by id
    Delete {
        id: i64,
    },

    /// List available tags
    Tags,

    /// Show analytics for a reporting window (default: last 90 days)
    Stats {
        /// Inclusive start date of the window
        #[arg(long)]
        from: Option<String>,

        /// Inclusive end date of the window (defaults to today)
        #[arg(long)]
        to: Option<String>,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current and longest writing streaks
    Streak,
}

/// Parses a date in YYYY-MM-DD or YYYYMMDD format.
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, DATE_FORMAT_ISO)
        .or_else(|_| NaiveDate::parse_from_str(date_str, DATE_FORMAT_COMPACT))
}
