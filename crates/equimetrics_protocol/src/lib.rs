//! Shared types for the Equimetrics pipeline.
//!
//! Everything that crosses a crate boundary lives here: the equipment record
//! itself, the derived summary, and the JSON bodies exchanged between the
//! HTTP server and its clients. All types use serde so the JSON renderer is
//! just `serde_json` over these definitions.

pub mod types;

// Re-export types for convenience
pub use types::{
    EquipmentRecord, ErrorBody, HistoryResponse, Summary, UploadEvent, UploadOutcome,
    MSG_UPLOAD_OK, PREVIEW_ROWS, REQUIRED_COLUMNS,
};
