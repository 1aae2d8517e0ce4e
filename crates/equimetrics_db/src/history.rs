//! Upload history queries.

use crate::error::Result;
use crate::EquipmentDb;
use equimetrics_protocol::UploadEvent;
use sqlx::Row;

impl EquipmentDb {
    /// Recent successful uploads, newest first.
    pub async fn history(&self, limit: u32) -> Result<Vec<UploadEvent>> {
        let rows = sqlx::query(
            "SELECT id, filename, rows, uploaded_at FROM upload_history \
             ORDER BY uploaded_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .iter()
            .map(|row| UploadEvent {
                id: row.get("id"),
                filename: row.get("filename"),
                rows: row.get("rows"),
                uploaded_at: Self::millis_to_datetime(row.get("uploaded_at")),
            })
            .collect())
    }
}
