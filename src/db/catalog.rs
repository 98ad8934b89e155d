//! Reference data: moods, categories and tags.
//!
//! These are mostly static after seeding. Tags can additionally be created
//! on demand from the editor, and categories can be removed (entries keep
//! existing with their category link nulled).

use crate::errors::{AppResult, DatabaseError};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Semantic classification of a mood.
///
/// Used for grouping in analytics, not enforced when saving entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoodKind {
    Positive,
    Neutral,
    Negative,
}

impl MoodKind {
    /// The string form stored in the `moods.kind` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodKind::Positive => "Positive",
            MoodKind::Neutral => "Neutral",
            MoodKind::Negative => "Negative",
        }
    }
}

impl fmt::Display for MoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(MoodKind::Positive),
            "Neutral" => Ok(MoodKind::Neutral),
            "Negative" => Ok(MoodKind::Negative),
            other => Err(format!("Unknown mood kind: {}", other)),
        }
    }
}

/// A mood from the mood library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mood {
    pub id: i64,
    pub name: String,
    /// Display glyph shown next to the name.
    pub icon: String,
    /// Library-level hint marking the mood as a suggested pick for its kind.
    /// Independent of whether a given entry uses it as the primary mood.
    pub is_default: bool,
    pub kind: MoodKind,
}

/// An entry category with a display color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color_hex: String,
}

/// A tag with a unique name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

fn mood_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Mood> {
    let kind_str: String = row.get("kind")?;
    let kind = MoodKind::from_str(&kind_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            e.into(),
        )
    })?;
    Ok(Mood {
        id: row.get("id")?,
        name: row.get("name")?,
        icon: row.get::<_, Option<String>>("icon")?.unwrap_or_default(),
        is_default: row.get::<_, i64>("is_default")? != 0,
        kind,
    })
}

/// Lists the whole mood library.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list_moods(conn: &Connection) -> AppResult<Vec<Mood>> {
    let mut stmt = conn
        .prepare("SELECT id, name, icon, is_default, kind FROM moods ORDER BY id")
        .map_err(DatabaseError::Sqlite)?;
    let moods = stmt
        .query_map([], mood_from_row)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(moods)
}

/// Lists all categories.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list_categories(conn: &Connection) -> AppResult<Vec<Category>> {
    let mut stmt = conn
        .prepare("SELECT id, name, color_hex FROM categories ORDER BY id")
        .map_err(DatabaseError::Sqlite)?;
    let categories = stmt
        .query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                color_hex: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            })
        })
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(categories)
}

/// Lists all tags.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn list_tags(conn: &Connection) -> AppResult<Vec<Tag>> {
    let mut stmt = conn
        .prepare("SELECT id, name FROM tags ORDER BY name")
        .map_err(DatabaseError::Sqlite)?;
    let tags = stmt
        .query_map([], |row| {
            Ok(Tag {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(tags)
}

/// Creates a tag with the given name and returns it.
///
/// Tag names are unique; creating a tag whose name already exists returns
/// the existing tag instead of failing, so the editor can offer
/// "type to create" without checking first.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn create_tag(conn: &Connection, name: &str) -> AppResult<Tag> {
    debug!("Creating tag '{}'", name);

    conn.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", params![name])
        .map_err(DatabaseError::Sqlite)?;

    let tag = conn
        .query_row(
            "SELECT id, name FROM tags WHERE name = ?1",
            params![name],
            |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )
        .map_err(DatabaseError::Sqlite)?;
    Ok(tag)
}

/// Deletes a category.
///
/// Entries referencing the category keep existing; their `category_id` is
/// nulled by the schema's ON DELETE SET NULL constraint. Deleting an
/// unknown id is a no-op.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_category(conn: &Connection, id: i64) -> AppResult<()> {
    debug!("Deleting category {}", id);

    conn.execute("DELETE FROM categories WHERE id = ?1", params![id])
        .map_err(DatabaseError::Sqlite)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn setup_test_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::schema::create_tables(&conn).unwrap();
        crate::db::schema::seed_reference_data(&conn).unwrap();
        conn
    }

    #[test]
    fn test_list_moods_seeded() {
        let conn = setup_test_db();
        let moods = list_moods(&conn).unwrap();

        assert_eq!(moods.len(), 16);
        let happy = moods.iter().find(|m| m.name == "Happy").unwrap();
        assert_eq!(happy.kind, MoodKind::Positive);
        assert!(happy.is_default);
        assert_eq!(happy.icon, "😊");
    }

    #[test]
    fn test_list_categories_seeded() {
        let conn = setup_test_db();
        let categories = list_categories(&conn).unwrap();

        assert_eq!(categories.len(), 4);
        assert!(categories.iter().any(|c| c.name == "Personal"));
    }

    #[test]
    fn test_list_tags_sorted_by_name() {
        let conn = setup_test_db();
        let tags = list_tags(&conn).unwrap();

        assert_eq!(tags.len(), 8);
        let names: Vec<_> = tags.iter().map(|t| t.name.clone()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_create_tag() {
        let conn = setup_test_db();
        let tag = create_tag(&conn, "gardening").unwrap();

        assert!(tag.id > 0);
        assert_eq!(tag.name, "gardening");
        assert!(list_tags(&conn).unwrap().iter().any(|t| t.name == "gardening"));
    }

    #[test]
    fn test_create_tag_existing_name_returns_existing() {
        let conn = setup_test_db();
        let first = create_tag(&conn, "gardening").unwrap();
        let second = create_tag(&conn, "gardening").unwrap();

        assert_eq!(first.id, second.id);
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM tags WHERE name = 'gardening'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_delete_category_missing_id_is_noop() {
        let conn = setup_test_db();
        delete_category(&conn, 999).unwrap();
        assert_eq!(list_categories(&conn).unwrap().len(), 4);
    }

    #[test]
    fn test_mood_kind_round_trip() {
        for kind in [MoodKind::Positive, MoodKind::Neutral, MoodKind::Negative] {
            assert_eq!(MoodKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(MoodKind::from_str("Melancholy").is_err());
    }
}
