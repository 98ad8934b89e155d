//! Entry store: CRUD operations for journal entries.
//!
//! One journal entry exists per calendar date. An entry carries scalar
//! columns plus two join tables (tags and moods); every save rewrites the
//! joins from the in-memory entry inside a single transaction, so readers
//! never observe a half-replaced association set.

use crate::constants::{DATE_FORMAT_ISO, MAX_SECONDARY_MOODS};
use crate::db::catalog::{Category, Mood, Tag};
use crate::errors::{AppError, AppResult, DatabaseError};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// A journal entry for a single calendar date.
///
/// The mood encoding is split into an explicit primary mood and an ordered
/// list of at most [`MAX_SECONDARY_MOODS`] secondary moods. The positional
/// "index 0 is primary" list only exists at the storage boundary, where the
/// mood join rows are written in list order with the `is_primary` bit set
/// for the first row.
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntry {
    /// Storage id; `None` until the entry has been saved.
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub title: Option<String>,
    pub content: String,
    /// Persisted category link.
    pub category_id: Option<i64>,
    /// Category row hydrated on read; not consulted on save.
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub primary_mood: Option<Mood>,
    pub secondary_moods: Vec<Mood>,
}

impl JournalEntry {
    /// Creates a blank entry for the given date.
    pub fn new(date: NaiveDate) -> Self {
        let now = Utc::now();
        JournalEntry {
            id: None,
            date,
            title: None,
            content: String::new(),
            category_id: None,
            category: None,
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
            primary_mood: None,
            secondary_moods: Vec::new(),
        }
    }

    /// Iterates over all moods, primary first.
    pub fn moods(&self) -> impl Iterator<Item = &Mood> {
        self.primary_mood.iter().chain(self.secondary_moods.iter())
    }

    /// Sets the primary mood.
    ///
    /// If the mood is currently a secondary mood it is removed from the
    /// secondary list first, so a mood never appears twice on one entry.
    pub fn set_primary_mood(&mut self, mood: Mood) {
        self.secondary_moods.retain(|m| m.id != mood.id);
        self.primary_mood = Some(mood);
    }

    /// Adds or removes a secondary mood.
    ///
    /// Requires a primary mood to be set and refuses the current primary.
    /// Adding is capped at [`MAX_SECONDARY_MOODS`]; toggles beyond the cap
    /// are ignored. Returns whether the mood is a secondary afterwards.
    pub fn toggle_secondary_mood(&mut self, mood: Mood) -> bool {
        let Some(primary) = &self.primary_mood else {
            return false;
        };
        if primary.id == mood.id {
            return false;
        }

        if let Some(pos) = self.secondary_moods.iter().position(|m| m.id == mood.id) {
            self.secondary_moods.remove(pos);
            false
        } else if self.secondary_moods.len() < MAX_SECONDARY_MOODS {
            self.secondary_moods.push(mood);
            true
        } else {
            false
        }
    }

    /// Number of whitespace-delimited words in the entry content.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

fn parse_stored_date(s: &str, col: usize) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT_ISO).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_stored_timestamp(s: &str, col: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Column list shared by every entry select; keeps row mapping in one place.
pub(crate) const ENTRY_SELECT: &str = "SELECT e.id, e.date, e.title, e.content, e.category_id, \
     e.created_at, e.updated_at, c.name, c.color_hex \
     FROM journal_entries e \
     LEFT JOIN categories c ON e.category_id = c.id";

/// Maps one row of [`ENTRY_SELECT`] to an entry with empty joins.
pub(crate) fn entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<JournalEntry> {
    let category_id: Option<i64> = row.get(4)?;
    let category_name: Option<String> = row.get(7)?;
    let category = match (category_id, category_name) {
        (Some(id), Some(name)) => Some(Category {
            id,
            name,
            color_hex: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
        }),
        _ => None,
    };

    Ok(JournalEntry {
        id: Some(row.get(0)?),
        date: parse_stored_date(&row.get::<_, String>(1)?, 1)?,
        title: row.get(2)?,
        content: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        category_id,
        category,
        created_at: parse_stored_timestamp(&row.get::<_, String>(5)?, 5)?,
        updated_at: parse_stored_timestamp(&row.get::<_, String>(6)?, 6)?,
        tags: Vec::new(),
        primary_mood: None,
        secondary_moods: Vec::new(),
    })
}

/// Batch-loads tags and moods for the given entries and attaches them.
///
/// Runs exactly two queries regardless of how many entries are passed.
/// Moods come back primary-first in insertion order, so the first flagged
/// row becomes the entry's primary mood and the rest its secondaries.
pub(crate) fn attach_joins(conn: &Connection, entries: &mut [JournalEntry]) -> AppResult<()> {
    if entries.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = entries.iter().filter_map(|e| e.id).collect();
    let placeholders = vec!["?"; ids.len()].join(",");

    let tags_sql = format!(
        "SELECT jt.journal_entry_id, t.id, t.name \
         FROM tags t INNER JOIN journal_entry_tags jt ON t.id = jt.tag_id \
         WHERE jt.journal_entry_id IN ({}) ORDER BY jt.rowid",
        placeholders
    );
    let mut stmt = conn.prepare(&tags_sql).map_err(DatabaseError::Sqlite)?;
    let tag_rows = stmt
        .query_map(params_from_iter(ids.iter()), |row| {
            Ok((
                row.get::<_, i64>(0)?,
                Tag {
                    id: row.get(1)?,
                    name: row.get(2)?,
                },
            ))
        })
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    let moods_sql = format!(
        "SELECT jm.journal_entry_id, jm.is_primary, m.id, m.name, m.icon, m.is_default, m.kind \
         FROM moods m INNER JOIN journal_entry_moods jm ON m.id = jm.mood_id \
         WHERE jm.journal_entry_id IN ({}) \
         ORDER BY jm.is_primary DESC, jm.rowid",
        placeholders
    );
    let mut stmt = conn.prepare(&moods_sql).map_err(DatabaseError::Sqlite)?;
    let mood_rows = stmt
        .query_map(params_from_iter(ids.iter()), |row| {
            let kind_str: String = row.get(6)?;
            let kind = kind_str.parse().map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, e.into())
            })?;
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)? != 0,
                Mood {
                    id: row.get(2)?,
                    name: row.get(3)?,
                    icon: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                    is_default: row.get::<_, i64>(5)? != 0,
                    kind,
                },
            ))
        })
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    let mut tags_by_entry: HashMap<i64, Vec<Tag>> = HashMap::new();
    for (entry_id, tag) in tag_rows {
        tags_by_entry.entry(entry_id).or_default().push(tag);
    }

    let mut primary_by_entry: HashMap<i64, Mood> = HashMap::new();
    let mut secondary_by_entry: HashMap<i64, Vec<Mood>> = HashMap::new();
    for (entry_id, is_primary, mood) in mood_rows {
        if is_primary && !primary_by_entry.contains_key(&entry_id) {
            primary_by_entry.insert(entry_id, mood);
        } else {
            secondary_by_entry.entry(entry_id).or_default().push(mood);
        }
    }

    for entry in entries.iter_mut() {
        let Some(id) = entry.id else { continue };
        entry.tags = tags_by_entry.remove(&id).unwrap_or_default();
        entry.primary_mood = primary_by_entry.remove(&id);
        entry.secondary_moods = secondary_by_entry.remove(&id).unwrap_or_default();
    }

    Ok(())
}

/// Saves an entry, inserting or updating depending on whether it has an id.
///
/// The entry row and the full replacement of both join tables are written in
/// one transaction: either everything lands or nothing does. On success the
/// entry's `id` and `updated_at` (and `created_at` for inserts) are updated
/// in place and the id is returned.
///
/// # Errors
///
/// - [`DatabaseError::DuplicateDate`] when inserting for a date that already
///   has an entry. The existence check runs inside the same transaction as
///   the insert, so there is no race window between check and write.
/// - [`DatabaseError::NotFound`] when updating an id absent from storage.
/// - Any storage failure rolls the whole save back.
pub fn save_entry(conn: &mut Connection, entry: &mut JournalEntry) -> AppResult<i64> {
    debug!("Saving entry for date {}", entry.date);

    let tx = conn.transaction().map_err(DatabaseError::Sqlite)?;
    let now = Utc::now();
    let date_str = entry.date.format(DATE_FORMAT_ISO).to_string();

    let id = match entry.id {
        None => {
            let existing: Option<i64> = tx
                .query_row(
                    "SELECT id FROM journal_entries WHERE date = ?1",
                    params![date_str],
                    |row| row.get(0),
                )
                .optional()
                .map_err(DatabaseError::Sqlite)?;
            if existing.is_some() {
                return Err(DatabaseError::DuplicateDate { date: entry.date }.into());
            }

            entry.created_at = now;
            entry.updated_at = now;
            tx.execute(
                "INSERT INTO journal_entries (date, title, content, category_id, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    date_str,
                    entry.title,
                    entry.content,
                    entry.category_id,
                    entry.created_at.to_rfc3339(),
                    entry.updated_at.to_rfc3339(),
                ],
            )
            .map_err(DatabaseError::Sqlite)?;
            tx.last_insert_rowid()
        }
        Some(id) => {
            entry.updated_at = now;
            let affected = tx
                .execute(
                    "UPDATE journal_entries \
                     SET title = ?1, content = ?2, category_id = ?3, updated_at = ?4 \
                     WHERE id = ?5",
                    params![
                        entry.title,
                        entry.content,
                        entry.category_id,
                        entry.updated_at.to_rfc3339(),
                        id,
                    ],
                )
                .map_err(DatabaseError::Sqlite)?;
            if affected == 0 {
                return Err(
                    DatabaseError::NotFound(format!("Entry with id {} not found", id)).into(),
                );
            }

            tx.execute(
                "DELETE FROM journal_entry_tags WHERE journal_entry_id = ?1",
                params![id],
            )
            .map_err(DatabaseError::Sqlite)?;
            tx.execute(
                "DELETE FROM journal_entry_moods WHERE journal_entry_id = ?1",
                params![id],
            )
            .map_err(DatabaseError::Sqlite)?;
            id
        }
    };

    for tag in &entry.tags {
        tx.execute(
            "INSERT INTO journal_entry_tags (journal_entry_id, tag_id) VALUES (?1, ?2)",
            params![id, tag.id],
        )
        .map_err(DatabaseError::Sqlite)?;
    }

    // Mood joins are written in list order; only the first row is primary.
    for (idx, mood) in entry.moods().enumerate() {
        tx.execute(
            "INSERT INTO journal_entry_moods (journal_entry_id, mood_id, is_primary) \
             VALUES (?1, ?2, ?3)",
            params![id, mood.id, (idx == 0) as i64],
        )
        .map_err(DatabaseError::Sqlite)?;
    }

    tx.commit().map_err(DatabaseError::Sqlite)?;

    entry.id = Some(id);
    debug!("Entry saved with id {}", id);
    Ok(id)
}

/// Retrieves an entry by id, with category, tags and moods attached.
///
/// Returns `Ok(None)` if no entry exists with the given id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn get_entry(conn: &Connection, id: i64) -> AppResult<Option<JournalEntry>> {
    let sql = format!("{} WHERE e.id = ?1", ENTRY_SELECT);
    let entry = conn
        .query_row(&sql, params![id], entry_from_row)
        .optional()
        .map_err(DatabaseError::Sqlite)?;

    match entry {
        Some(entry) => {
            let mut entries = [entry];
            attach_joins(conn, &mut entries)?;
            let [entry] = entries;
            Ok(Some(entry))
        }
        None => Ok(None),
    }
}

/// Retrieves the entry for a calendar date.
///
/// Returns `Ok(None)` if no entry exists for the given date.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn get_entry_by_date(conn: &Connection, date: NaiveDate) -> AppResult<Option<JournalEntry>> {
    debug!("Getting entry for date {}", date);

    let sql = format!("{} WHERE e.date = ?1", ENTRY_SELECT);
    let entry = conn
        .query_row(
            &sql,
            params![date.format(DATE_FORMAT_ISO).to_string()],
            entry_from_row,
        )
        .optional()
        .map_err(DatabaseError::Sqlite)?;

    match entry {
        Some(entry) => {
            let mut entries = [entry];
            attach_joins(conn, &mut entries)?;
            let [entry] = entries;
            Ok(Some(entry))
        }
        None => Ok(None),
    }
}

/// Deletes an entry by id.
///
/// Join rows are removed by the store (foreign key cascade), never by the
/// caller. Deleting an id that does not exist is a no-op, not an error.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_entry(conn: &Connection, id: i64) -> AppResult<()> {
    debug!("Deleting entry {}", id);

    let affected = conn
        .execute("DELETE FROM journal_entries WHERE id = ?1", params![id])
        .map_err(DatabaseError::Sqlite)?;
    if affected == 0 {
        debug!("Entry {} did not exist", id);
    }
    Ok(())
}

/// Lists all entries within a calendar month, ascending by date.
///
/// # Errors
///
/// Returns `AppError::Journal` for an invalid year/month combination, or a
/// database error if the query fails.
pub fn list_by_month(conn: &Connection, year: i32, month: u32) -> AppResult<Vec<JournalEntry>> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Journal(format!("Invalid month: {}-{}", year, month)))?;
    let end = start
        .checked_add_months(chrono::Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| AppError::Journal(format!("Invalid month: {}-{}", year, month)))?;
    debug_assert_eq!(end.month(), month);

    let sql = format!(
        "{} WHERE e.date >= ?1 AND e.date <= ?2 ORDER BY e.date ASC",
        ENTRY_SELECT
    );
    let mut stmt = conn.prepare(&sql).map_err(DatabaseError::Sqlite)?;
    let mut entries = stmt
        .query_map(
            params![
                start.format(DATE_FORMAT_ISO).to_string(),
                end.format(DATE_FORMAT_ISO).to_string(),
            ],
            entry_from_row,
        )
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    attach_joins(conn, &mut entries)?;
    Ok(entries)
}

/// Returns the distinct entry dates, most recent first.
///
/// This is the input the streak calculator consumes.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn entry_dates(conn: &Connection) -> AppResult<Vec<NaiveDate>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT date FROM journal_entries ORDER BY date DESC")
        .map_err(DatabaseError::Sqlite)?;
    let dates = stmt
        .query_map([], |row| parse_stored_date(&row.get::<_, String>(0)?, 0))
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(dates)
}
