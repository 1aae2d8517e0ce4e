//! Error taxonomy for ingestion validation.

use thiserror::Error;

/// Why an uploaded payload was rejected.
///
/// All variants terminate the ingestion before any store mutation; there is
/// no partial recovery (bad rows are never skipped).
#[derive(Error, Debug)]
pub enum IngestError {
    /// Header lacks one or more required columns.
    #[error("missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// Payload is not parseable as delimited text.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A cell could not be coerced to its record field type.
    #[error("row {row}: column '{column}' value '{value}' is not an integer")]
    TypeCoercion {
        row: usize,
        column: &'static str,
        value: String,
    },
}
