//! Database schema creation.
//!
//! All CREATE TABLE statements live here - single source of truth.

use crate::error::Result;
use crate::EquipmentDb;
use tracing::info;

impl EquipmentDb {
    /// Ensure all tables exist.
    ///
    /// Journal mode and synchronous level are connect-time options on the
    /// pool, not statements here, so they hold on every connection.
    pub(crate) async fn ensure_schema(&self) -> Result<()> {
        // Equipment records: the rowid `id` preserves ingestion order, which
        // is what previews and `all()` order by.
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS equipment (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                equipment_id INTEGER NOT NULL DEFAULT 0,
                equipment_name TEXT NOT NULL DEFAULT '',
                equipment_type TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT 'Unknown',
                location TEXT NOT NULL DEFAULT 'Unknown',
                purchase_year INTEGER NOT NULL DEFAULT 0,
                condition TEXT NOT NULL DEFAULT 'Unknown'
            )"#,
        )
        .execute(self.pool())
        .await?;

        // One row per successful ingestion
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS upload_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                rows INTEGER NOT NULL,
                uploaded_at INTEGER NOT NULL
            )"#,
        )
        .execute(self.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_equipment_type ON equipment(equipment_type)")
            .execute(self.pool())
            .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_upload_history_at ON upload_history(uploaded_at DESC)",
        )
        .execute(self.pool())
        .await?;

        info!("Database schema verified");
        Ok(())
    }
}
