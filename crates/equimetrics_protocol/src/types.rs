//! Canonical record, summary and API body types.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column names an uploaded CSV must carry, exact and case-sensitive.
///
/// Order matters for error reporting: missing columns are listed in this
/// order regardless of the order they appear in the upload.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "equipment_id",
    "equipment_name",
    "equipment_type",
    "status",
    "location",
    "purchase_year",
    "condition",
];

/// Number of rows returned in upload previews.
pub const PREVIEW_ROWS: usize = 10;

/// Success message for the upload endpoint.
pub const MSG_UPLOAD_OK: &str = "File uploaded successfully";

fn unknown() -> String {
    "Unknown".to_string()
}

/// One unit of plant equipment.
///
/// Every field has a defined default so no field is ever null in storage.
/// `equipment_id` is an operator-assigned tag, not required to be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    #[serde(default)]
    pub equipment_id: i64,
    #[serde(default)]
    pub equipment_name: String,
    #[serde(default)]
    pub equipment_type: String,
    #[serde(default = "unknown")]
    pub status: String,
    #[serde(default = "unknown")]
    pub location: String,
    #[serde(default)]
    pub purchase_year: i64,
    #[serde(default = "unknown")]
    pub condition: String,
}

impl Default for EquipmentRecord {
    fn default() -> Self {
        Self {
            equipment_id: 0,
            equipment_name: String::new(),
            equipment_type: String::new(),
            status: unknown(),
            location: unknown(),
            purchase_year: 0,
            condition: unknown(),
        }
    }
}

/// Derived statistics over the current record set.
///
/// `type_distribution` is ordered by descending count, ties broken
/// alphabetically; the JSON body and the PDF report iterate it in the same
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_equipment: i64,
    /// Arithmetic mean of purchase year, rounded to 2 decimals. 0 when the
    /// store is empty (never NaN).
    pub avg_purchase_year: f64,
    pub type_distribution: IndexMap<String, i64>,
}

impl Summary {
    /// The summary of an empty store.
    pub fn empty() -> Self {
        Self {
            total_equipment: 0,
            avg_purchase_year: 0.0,
            type_distribution: IndexMap::new(),
        }
    }
}

/// Body returned by a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub message: String,
    pub rows: usize,
    /// Up to [`PREVIEW_ROWS`] records in ingestion order.
    pub data_preview: Vec<EquipmentRecord>,
}

impl UploadOutcome {
    pub fn new(rows: usize, data_preview: Vec<EquipmentRecord>) -> Self {
        Self {
            message: MSG_UPLOAD_OK.to_string(),
            rows,
            data_preview,
        }
    }
}

/// One successful ingestion, as recorded in the upload history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadEvent {
    pub id: i64,
    pub filename: String,
    pub rows: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// Body returned by the history endpoint, newest upload first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub uploads: Vec<UploadEvent>,
}

/// Structured error body. Every client-fault response carries one of these,
/// never a stack trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub const NO_FILE: &'static str = "No file uploaded";
    pub const NOT_CSV: &'static str = "Only CSV files are allowed";
    pub const BAD_COLUMNS: &'static str = "CSV columns do not match required format";

    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
