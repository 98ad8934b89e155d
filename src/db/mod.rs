//! Database operations for journal entries, moods, tags and categories.
//!
//! This module provides SQLite database operations for the journal, using
//! connection pooling via r2d2. Multi-table writes (an entry row plus its
//! tag and mood joins) always run inside a single transaction.
//!
//! # Module Structure
//!
//! - `schema`: Table definitions, schema initialization and reference seeding
//! - `catalog`: Mood/Category/Tag reference data
//! - `entries`: Entry store (CRUD, month listings, distinct dates)
//! - `query`: Filtered, paginated entry queries
//!
//! # Example
//!
//! ```no_run
//! use daybook::db::Database;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/journal.db"))?;
//! db.initialize_schema()?;
//! # Ok::<(), daybook::AppError>(())
//! ```

pub mod catalog;
pub mod entries;
pub mod query;
pub mod schema;

use crate::errors::AppResult;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database handle with connection pooling.
///
/// Every connection handed out by the pool has foreign key enforcement
/// switched on, so join-table cascades and the nullify-on-delete category
/// link behave the same regardless of which connection runs a statement.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Opens or creates the journal database.
    ///
    /// If the database file doesn't exist, it will be created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database file cannot be opened or the
    /// connection pool cannot be initialized.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        debug!("Opening database at: {:?}", db_path);

        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(5) // Allow up to 5 concurrent readers
            .connection_customizer(Box::new(ForeignKeyConfig))
            .build(manager)
            .map_err(crate::errors::DatabaseError::Pool)?;

        // Test the connection
        let conn = pool.get().map_err(crate::errors::DatabaseError::Pool)?;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(crate::errors::DatabaseError::Sqlite)?;
        drop(conn);

        info!("Database opened successfully");
        Ok(Database { pool })
    }

    /// Gets a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the pool is exhausted.
    pub fn get_conn(&self) -> AppResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| crate::errors::DatabaseError::Pool(e).into())
    }

    /// Initializes the database schema and seeds reference data.
    ///
    /// Creates all necessary tables and indexes if they don't exist and
    /// inserts the stock mood/category/tag libraries into empty tables.
    /// This is idempotent and safe to call multiple times.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation or seeding fails.
    pub fn initialize_schema(&self) -> AppResult<()> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;
        schema::seed_reference_data(&conn)?;
        info!("Database schema initialized");
        Ok(())
    }
}

/// Connection customizer that enables foreign key enforcement.
#[derive(Debug)]
struct ForeignKeyConfig;

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ForeignKeyConfig {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    }

    fn on_release(&self, _conn: Connection) {}
}
