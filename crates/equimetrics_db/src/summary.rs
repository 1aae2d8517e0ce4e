//! Aggregation queries over the current record set.

use crate::error::Result;
use crate::EquipmentDb;
use equimetrics_protocol::Summary;
use indexmap::IndexMap;
use sqlx::Row;

impl EquipmentDb {
    /// Derive summary statistics from the stored records.
    ///
    /// Read-only and deterministic: repeated calls against an unchanged
    /// store return identical results. The distribution is ordered by
    /// descending count, ties broken alphabetically, and types with zero
    /// occurrences are simply absent.
    pub async fn summarize(&self) -> Result<Summary> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM equipment")
            .fetch_one(self.pool())
            .await?;

        // AVG over an empty table is NULL, not a division error
        let avg: Option<f64> = sqlx::query_scalar("SELECT AVG(purchase_year) FROM equipment")
            .fetch_one(self.pool())
            .await?;
        let avg_purchase_year = (avg.unwrap_or(0.0) * 100.0).round() / 100.0;

        let rows = sqlx::query(
            "SELECT equipment_type, COUNT(*) AS n FROM equipment \
             GROUP BY equipment_type ORDER BY n DESC, equipment_type ASC",
        )
        .fetch_all(self.pool())
        .await?;

        let mut type_distribution = IndexMap::with_capacity(rows.len());
        for row in &rows {
            type_distribution.insert(row.get("equipment_type"), row.get("n"));
        }

        Ok(Summary {
            total_equipment: total,
            avg_purchase_year,
            type_distribution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equimetrics_protocol::EquipmentRecord;

    fn record(kind: &str, year: i64) -> EquipmentRecord {
        EquipmentRecord {
            equipment_name: format!("{kind}-unit"),
            equipment_type: kind.to_string(),
            purchase_year: year,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_summarize_empty_store_is_zero() {
        let db = EquipmentDb::open_in_memory().await.unwrap();

        let summary = db.summarize().await.unwrap();
        assert_eq!(summary, Summary::empty());
        assert_eq!(summary.avg_purchase_year, 0.0);
    }

    #[tokio::test]
    async fn test_summarize_counts_and_average() {
        let db = EquipmentDb::open_in_memory().await.unwrap();
        db.replace_all(
            &[record("Pump", 2019), record("Pump", 2021), record("Valve", 2020)],
            "plant.csv",
        )
        .await
        .unwrap();

        let summary = db.summarize().await.unwrap();
        assert_eq!(summary.total_equipment, 3);
        assert_eq!(summary.avg_purchase_year, 2020.0);
        assert_eq!(summary.type_distribution.get("Pump"), Some(&2));
        assert_eq!(summary.type_distribution.get("Valve"), Some(&1));
    }

    #[tokio::test]
    async fn test_summarize_rounds_average_to_two_decimals() {
        let db = EquipmentDb::open_in_memory().await.unwrap();
        db.replace_all(
            &[record("Pump", 2019), record("Pump", 2020), record("Pump", 2020)],
            "plant.csv",
        )
        .await
        .unwrap();

        let summary = db.summarize().await.unwrap();
        // 6059 / 3 = 2019.666... -> 2019.67
        assert_eq!(summary.avg_purchase_year, 2019.67);
    }

    #[tokio::test]
    async fn test_distribution_ordered_by_count_then_name() {
        let db = EquipmentDb::open_in_memory().await.unwrap();
        db.replace_all(
            &[
                record("Valve", 2018),
                record("Mixer", 2019),
                record("Valve", 2020),
                record("Compressor", 2021),
                record("Mixer", 2022),
            ],
            "plant.csv",
        )
        .await
        .unwrap();

        let summary = db.summarize().await.unwrap();
        let keys: Vec<_> = summary.type_distribution.keys().cloned().collect();
        // Mixer and Valve tie at 2, alphabetical; Compressor trails with 1
        assert_eq!(keys, vec!["Mixer", "Valve", "Compressor"]);
    }

    #[tokio::test]
    async fn test_distribution_conserves_total() {
        let db = EquipmentDb::open_in_memory().await.unwrap();
        let records: Vec<_> = (0..27)
            .map(|i| record(["Pump", "Valve", "Mixer"][i % 3], 2000 + i as i64))
            .collect();
        db.replace_all(&records, "plant.csv").await.unwrap();

        let summary = db.summarize().await.unwrap();
        let sum: i64 = summary.type_distribution.values().sum();
        assert_eq!(sum, summary.total_equipment);
    }

    #[tokio::test]
    async fn test_summarize_is_idempotent() {
        let db = EquipmentDb::open_in_memory().await.unwrap();
        db.replace_all(
            &[record("Pump", 2019), record("Valve", 2021)],
            "plant.csv",
        )
        .await
        .unwrap();

        let first = db.summarize().await.unwrap();
        let second = db.summarize().await.unwrap();
        assert_eq!(first, second);
        // and summarize left the store untouched
        assert_eq!(db.count().await.unwrap(), 2);
    }
}
