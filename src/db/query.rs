//! Filtered, paginated queries over journal entries.
//!
//! The filter is a plain struct whose fields are each independently
//! optional; every present field contributes one predicate and all
//! predicates are combined with AND. `count_entries` and `list_entries`
//! build their WHERE clause from the same code path, so the two can never
//! disagree about which entries match.

use crate::constants::DATE_FORMAT_ISO;
use crate::db::entries::{attach_joins, entry_from_row, JournalEntry, ENTRY_SELECT};
use crate::errors::{AppResult, DatabaseError, QueryError};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use tracing::debug;

/// A composable set of optional entry predicates.
///
/// Absent fields impose no constraint; empty id lists are treated as
/// absent. All present fields must hold at once for an entry to match.
///
/// # Examples
///
/// ```
/// use daybook::db::query::EntryFilter;
///
/// let filter = EntryFilter {
///     search_term: Some("coffee".to_string()),
///     ..EntryFilter::default()
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Case-insensitive substring match against title OR content.
    pub search_term: Option<String>,
    /// Entry matches if ANY of its moods is in the set.
    pub mood_ids: Vec<i64>,
    /// Exact category match.
    pub category_id: Option<i64>,
    /// Inclusive lower date bound.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub end_date: Option<NaiveDate>,
    /// Entry matches if ANY of its tags is in the set.
    pub tag_ids: Vec<i64>,
}

impl EntryFilter {
    /// Rejects malformed date ranges instead of silently matching nothing.
    fn validate(&self) -> Result<(), QueryError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(QueryError::InvalidRange { start, end });
            }
        }
        Ok(())
    }

    /// Builds the WHERE clause and its parameters.
    ///
    /// Returns an empty string when no field is set.
    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(term) = self
            .search_term
            .as_deref()
            .filter(|t| !t.trim().is_empty())
        {
            clauses.push("(e.title LIKE ? OR e.content LIKE ?)".to_string());
            let pattern = format!("%{}%", term);
            params.push(Value::Text(pattern.clone()));
            params.push(Value::Text(pattern));
        }
        if !self.mood_ids.is_empty() {
            clauses.push(format!(
                "EXISTS (SELECT 1 FROM journal_entry_moods jm \
                 WHERE jm.journal_entry_id = e.id AND jm.mood_id IN ({}))",
                vec!["?"; self.mood_ids.len()].join(",")
            ));
            params.extend(self.mood_ids.iter().map(|id| Value::Integer(*id)));
        }
        if let Some(category_id) = self.category_id {
            clauses.push("e.category_id = ?".to_string());
            params.push(Value::Integer(category_id));
        }
        if let Some(start) = self.start_date {
            clauses.push("e.date >= ?".to_string());
            params.push(Value::Text(start.format(DATE_FORMAT_ISO).to_string()));
        }
        if let Some(end) = self.end_date {
            clauses.push("e.date <= ?".to_string());
            params.push(Value::Text(end.format(DATE_FORMAT_ISO).to_string()));
        }
        if !self.tag_ids.is_empty() {
            clauses.push(format!(
                "EXISTS (SELECT 1 FROM journal_entry_tags jt \
                 WHERE jt.journal_entry_id = e.id AND jt.tag_id IN ({}))",
                vec!["?"; self.tag_ids.len()].join(",")
            ));
            params.extend(self.tag_ids.iter().map(|id| Value::Integer(*id)));
        }

        if clauses.is_empty() {
            (String::new(), params)
        } else {
            (format!(" WHERE {}", clauses.join(" AND ")), params)
        }
    }
}

/// Counts entries matching the filter.
///
/// Applies exactly the same predicate semantics as [`list_entries`].
///
/// # Errors
///
/// Returns [`QueryError::InvalidRange`] for a malformed date range, or a
/// database error if the query fails.
pub fn count_entries(conn: &Connection, filter: &EntryFilter) -> AppResult<u64> {
    filter.validate()?;
    let (where_sql, params) = filter.where_clause();
    let sql = format!("SELECT COUNT(*) FROM journal_entries e{}", where_sql);

    let count: i64 = conn
        .query_row(&sql, params_from_iter(params), |row| row.get(0))
        .map_err(DatabaseError::Sqlite)?;
    Ok(count as u64)
}

/// Lists a page of entries matching the filter, most recent date first.
///
/// `page` is 1-based. A page past the end yields an empty list, and a
/// `page_size` larger than the result count yields one page with
/// everything. Tags and moods for the returned page are loaded in two
/// batch queries, never one query per entry.
///
/// # Errors
///
/// Returns [`QueryError::InvalidRange`] for a malformed date range, or a
/// database error if the query fails.
pub fn list_entries(
    conn: &Connection,
    filter: &EntryFilter,
    page: u32,
    page_size: u32,
) -> AppResult<Vec<JournalEntry>> {
    filter.validate()?;
    let (where_sql, mut params) = filter.where_clause();
    let sql = format!(
        "{}{} ORDER BY e.date DESC LIMIT ? OFFSET ?",
        ENTRY_SELECT, where_sql
    );

    let offset = u64::from(page.saturating_sub(1)) * u64::from(page_size);
    params.push(Value::Integer(i64::from(page_size)));
    params.push(Value::Integer(offset as i64));
    debug!(page, page_size, "Listing entries");

    let mut stmt = conn.prepare(&sql).map_err(DatabaseError::Sqlite)?;
    let mut entries = stmt
        .query_map(params_from_iter(params), entry_from_row)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    attach_joins(conn, &mut entries)?;
    Ok(entries)
}
