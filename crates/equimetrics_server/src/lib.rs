//! HTTP surface for the Equimetrics pipeline.
//!
//! Thin axum wiring over the library crates: upload goes through the
//! ingestion validator into the record store, the read endpoints format the
//! aggregation result for their medium (JSON, preview, PDF). Handler logic
//! lives in plain functions in [`routes`] so it is testable without a
//! listening socket.

pub mod error;
pub mod logging;
pub mod routes;

pub use error::ApiError;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use equimetrics_db::EquipmentDb;
use std::path::PathBuf;

/// Upload size cap. Datasets are plant inventories, not bulk telemetry.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Shared state for all handlers: the one injected store handle.
#[derive(Clone)]
pub struct AppState {
    pub db: EquipmentDb,
}

/// Build the API router over the given store.
pub fn router(db: EquipmentDb) -> Router {
    Router::new()
        .route("/api/upload", post(routes::upload))
        .route("/api/summary", get(routes::summary))
        .route("/api/report/pdf", get(routes::report_pdf))
        .route("/api/history", get(routes::history))
        .route("/api/health", get(routes::health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(AppState { db })
}

/// The Equimetrics home directory: ~/.equimetrics
///
/// Override with the EQUIMETRICS_HOME environment variable.
pub fn equimetrics_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("EQUIMETRICS_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".equimetrics")
}

/// Default on-disk database location.
pub fn default_db_path() -> PathBuf {
    equimetrics_home().join("equimetrics.sqlite3")
}
