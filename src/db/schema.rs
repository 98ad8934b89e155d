//! Database schema definitions and initialization.
//!
//! This module defines the SQLite schema for journal entries, their tag and
//! mood joins, and the reference tables. All tables are created with proper
//! indexes and foreign key constraints.

use crate::errors::{AppResult, DatabaseError};
use rusqlite::Connection;
use tracing::{debug, info};

/// Current schema version.
///
/// Increment this whenever schema changes are made to support future migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Creates all database tables and indexes.
///
/// This function is idempotent - it uses `CREATE TABLE IF NOT EXISTS`
/// so it's safe to call multiple times.
///
/// # Tables
///
/// - `users`: Local profile record (managed by the security layer)
/// - `categories`: Entry categories with display colors
/// - `moods`: The mood library
/// - `tags`: Unique tag names
/// - `journal_entries`: One journal entry per calendar date
/// - `journal_entry_tags` / `journal_entry_moods`: Join tables
///
/// # Errors
///
/// Returns an error if any DDL statement fails.
pub fn create_tables(conn: &Connection) -> AppResult<()> {
    debug!("Creating database tables");

    // Enable foreign key constraints
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(DatabaseError::Sqlite)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            password_salt TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            color_hex TEXT
        );

        CREATE TABLE IF NOT EXISTS moods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            icon TEXT,
            is_default INTEGER NOT NULL DEFAULT 0,
            kind TEXT NOT NULL DEFAULT 'Neutral'
        );

        CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    // Entries table: exactly one entry per calendar date
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS journal_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL UNIQUE,
            title TEXT,
            content TEXT,
            category_id INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (category_id) REFERENCES categories(id) ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_journal_entries_date ON journal_entries(date DESC);
        CREATE INDEX IF NOT EXISTS idx_journal_entries_category_id ON journal_entries(category_id);
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    // Join tables: deleting an entry cascades, deleting reference data cascades
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS journal_entry_tags (
            journal_entry_id INTEGER NOT NULL,
            tag_id INTEGER NOT NULL,
            PRIMARY KEY (journal_entry_id, tag_id),
            FOREIGN KEY (journal_entry_id) REFERENCES journal_entries(id) ON DELETE CASCADE,
            FOREIGN KEY (tag_id) REFERENCES tags(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS journal_entry_moods (
            journal_entry_id INTEGER NOT NULL,
            mood_id INTEGER NOT NULL,
            is_primary INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (journal_entry_id, mood_id),
            FOREIGN KEY (journal_entry_id) REFERENCES journal_entries(id) ON DELETE CASCADE,
            FOREIGN KEY (mood_id) REFERENCES moods(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_journal_entry_tags_entry ON journal_entry_tags(journal_entry_id);
        CREATE INDEX IF NOT EXISTS idx_journal_entry_moods_entry ON journal_entry_moods(journal_entry_id);
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    // Schema version tracking table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .map_err(DatabaseError::Sqlite)?;

    // Record schema version if not already recorded
    let current_version = get_schema_version(conn)?;
    if current_version.is_none() {
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?)",
            [SCHEMA_VERSION],
        )
        .map_err(DatabaseError::Sqlite)?;
        info!("Initialized database schema version {}", SCHEMA_VERSION);
    } else {
        debug!("Schema version already recorded: {:?}", current_version);
    }

    debug!("Database tables created successfully");
    Ok(())
}

/// Gets the current schema version from the database.
///
/// Returns `None` if the schema_version table doesn't exist or is empty.
///
/// # Errors
///
/// Returns an error if the query fails for reasons other than missing table.
pub fn get_schema_version(conn: &Connection) -> AppResult<Option<i32>> {
    let result = conn.query_row(
        "SELECT version FROM schema_version ORDER BY applied_at DESC LIMIT 1",
        [],
        |row| row.get(0),
    );

    match result {
        Ok(version) => Ok(Some(version)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) if e.to_string().contains("no such table") => Ok(None),
        Err(e) => Err(DatabaseError::Sqlite(e).into()),
    }
}

/// Seeds the mood, category and tag libraries into empty tables.
///
/// Each table is only seeded when it has no rows, so user-created reference
/// data is never touched. Journal entries are never seeded - entries exist
/// only through explicit saves.
///
/// # Errors
///
/// Returns an error if any insert fails.
pub fn seed_reference_data(conn: &Connection) -> AppResult<()> {
    let mood_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM moods", [], |row| row.get(0))
        .map_err(DatabaseError::Sqlite)?;
    if mood_count == 0 {
        debug!("Seeding mood library");
        conn.execute_batch(
            r#"
            INSERT INTO moods (name, icon, is_default, kind) VALUES
                ('Happy', '😊', 1, 'Positive'),
                ('Excited', '🤩', 0, 'Positive'),
                ('Relaxed', '😌', 0, 'Positive'),
                ('Grateful', '🙏', 0, 'Positive'),
                ('Confident', '😎', 0, 'Positive'),
                ('Calm', '🧘', 1, 'Neutral'),
                ('Thoughtful', '🤔', 0, 'Neutral'),
                ('Curious', '🧐', 0, 'Neutral'),
                ('Nostalgic', '📻', 0, 'Neutral'),
                ('Bored', '😴', 0, 'Neutral'),
                ('Neutral', '😐', 1, 'Neutral'),
                ('Sad', '😔', 1, 'Negative'),
                ('Angry', '😠', 0, 'Negative'),
                ('Stressed', '😫', 0, 'Negative'),
                ('Lonely', '🥺', 0, 'Negative'),
                ('Anxious', '😰', 0, 'Negative');
            "#,
        )
        .map_err(DatabaseError::Sqlite)?;
    }

    let category_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
        .map_err(DatabaseError::Sqlite)?;
    if category_count == 0 {
        debug!("Seeding starter categories");
        conn.execute_batch(
            r#"
            INSERT INTO categories (name, color_hex) VALUES
                ('Personal', '#FF5733'),
                ('Work', '#33FF57'),
                ('Health', '#3357FF'),
                ('Travel', '#F333FF');
            "#,
        )
        .map_err(DatabaseError::Sqlite)?;
    }

    let tag_count: i64 = conn
        .query_row("SELECT COUNT(*) FROM tags", [], |row| row.get(0))
        .map_err(DatabaseError::Sqlite)?;
    if tag_count == 0 {
        debug!("Seeding starter tags");
        for name in [
            "Work",
            "Family",
            "Health",
            "Fitness",
            "Hobbies",
            "Travel",
            "Planning",
            "Reflection",
        ] {
            conn.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", [name])
                .map_err(DatabaseError::Sqlite)?;
        }
    }

    Ok(())
}
