//! Record store operations: bulk replace and reads.

use crate::error::Result;
use crate::EquipmentDb;
use equimetrics_protocol::EquipmentRecord;
use sqlx::Row;
use tracing::info;

impl EquipmentDb {
    /// Atomically replace the entire record set.
    ///
    /// Runs in a single transaction: the old rows are deleted, the new rows
    /// inserted in order, and the upload recorded in the history, all
    /// committed together. Readers never observe the intermediate empty
    /// state, and concurrent replaces serialize on the SQLite write lock
    /// (last writer wins outright).
    pub async fn replace_all(&self, records: &[EquipmentRecord], source_name: &str) -> Result<()> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM equipment").execute(&mut *tx).await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO equipment
                    (equipment_id, equipment_name, equipment_type, status, location, purchase_year, condition)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.equipment_id)
            .bind(&record.equipment_name)
            .bind(&record.equipment_type)
            .bind(&record.status)
            .bind(&record.location)
            .bind(record.purchase_year)
            .bind(&record.condition)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("INSERT INTO upload_history (filename, rows, uploaded_at) VALUES (?, ?, ?)")
            .bind(source_name)
            .bind(records.len() as i64)
            .bind(Self::now_millis())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(rows = records.len(), source = source_name, "Record set replaced");

        Ok(())
    }

    /// Number of records currently stored.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM equipment")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    /// All records in ingestion order.
    pub async fn all(&self) -> Result<Vec<EquipmentRecord>> {
        let rows = sqlx::query(
            "SELECT equipment_id, equipment_name, equipment_type, status, location, purchase_year, condition \
             FROM equipment ORDER BY id",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.iter().map(row_to_record).collect())
    }

    /// The first `n` records in ingestion order, as a bounded query.
    pub async fn first_n(&self, n: u32) -> Result<Vec<EquipmentRecord>> {
        let rows = sqlx::query(
            "SELECT equipment_id, equipment_name, equipment_type, status, location, purchase_year, condition \
             FROM equipment ORDER BY id LIMIT ?",
        )
        .bind(n)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.iter().map(row_to_record).collect())
    }
}

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> EquipmentRecord {
    EquipmentRecord {
        equipment_id: row.get("equipment_id"),
        equipment_name: row.get("equipment_name"),
        equipment_type: row.get("equipment_type"),
        status: row.get("status"),
        location: row.get("location"),
        purchase_year: row.get("purchase_year"),
        condition: row.get("condition"),
    }
}
