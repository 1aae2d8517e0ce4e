//! Record store for Equimetrics.
//!
//! This crate is the single source of truth for equipment storage. All
//! interfaces (HTTP server, CLI) go through [`EquipmentDb`]; nothing else
//! touches the database.
//!
//! The store holds exactly one dataset at a time: a successful ingestion
//! replaces the whole record set inside one transaction, so concurrent
//! readers observe either the previous dataset or the new one in full,
//! never a mix.
//!
//! # Usage
//!
//! ```rust,ignore
//! use equimetrics_db::{EquipmentDb, Result};
//!
//! let db = EquipmentDb::open("~/.equimetrics/equimetrics.sqlite3").await?;
//! db.replace_all(&records, "plant_a.csv").await?;
//! let summary = db.summarize().await?;
//! ```

mod error;
mod schema;

// Method implementations organized by domain
mod history;
mod records;
mod summary;

pub use error::{DbError, Result};

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::path::Path;
use tracing::info;

/// Handle to the equipment database.
///
/// Cheap to clone (wraps a connection pool); pass it to every operation
/// instead of reaching for ambient global state.
#[derive(Clone)]
pub struct EquipmentDb {
    pool: SqlitePool,
}

impl EquipmentDb {
    /// Open or create a database at the given path.
    ///
    /// Creates all tables if they don't exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Connect-time options so every pooled connection gets them, not
        // just the one a PRAGMA statement happens to run on.
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.ensure_schema().await?;

        info!(path = %path.display(), "Equipment database opened");

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    ///
    /// Capped at one connection: each connection to `sqlite::memory:` gets
    /// its own database, so a larger pool would not share tables.
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool };
        db.ensure_schema().await?;

        Ok(db)
    }

    /// Get the underlying connection pool (escape hatch for complex queries).
    ///
    /// Prefer using the typed methods instead.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

// Timestamp utilities
impl EquipmentDb {
    /// Current time as milliseconds since Unix epoch.
    pub fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Convert milliseconds to DateTime.
    pub fn millis_to_datetime(millis: i64) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp_millis(millis).unwrap_or_else(chrono::Utc::now)
    }
}
