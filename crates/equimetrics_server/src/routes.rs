//! API endpoint handlers.
//!
//! Each axum handler delegates to a plain function over `(db, ...)` inputs;
//! tests drive those functions directly.

use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use equimetrics_db::EquipmentDb;
use equimetrics_ingest::parse_equipment_csv;
use equimetrics_protocol::{HistoryResponse, Summary, UploadOutcome, PREVIEW_ROWS};
use equimetrics_report::{render_pdf, REPORT_FILENAME};
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

const HISTORY_LIMIT: u32 = 50;

/// POST /api/upload — validate and ingest a CSV file.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadOutcome>, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            file = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let (filename, payload) = file.ok_or(ApiError::NoFile)?;
    let outcome = ingest_upload(&state.db, &filename, &payload).await?;
    Ok(Json(outcome))
}

/// Upload logic shared by the handler and tests: validate the whole payload,
/// then atomically replace the store, then answer with a bounded preview.
pub async fn ingest_upload(
    db: &EquipmentDb,
    filename: &str,
    payload: &[u8],
) -> Result<UploadOutcome, ApiError> {
    if filename.is_empty() {
        return Err(ApiError::NoFile);
    }
    if !filename.ends_with(".csv") {
        return Err(ApiError::NotCsv);
    }

    // Full validation happens before any store mutation
    let records = parse_equipment_csv(payload)?;

    db.replace_all(&records, filename).await?;

    info!(rows = records.len(), file = filename, "CSV ingested");

    let preview = records.iter().take(PREVIEW_ROWS).cloned().collect();
    Ok(UploadOutcome::new(records.len(), preview))
}

/// GET /api/summary — aggregate statistics as JSON.
pub async fn summary(State(state): State<AppState>) -> Result<Json<Summary>, ApiError> {
    Ok(Json(state.db.summarize().await?))
}

/// GET /api/report/pdf — printable report as an attachment.
pub async fn report_pdf(State(state): State<AppState>) -> Result<Response, ApiError> {
    let summary = state.db.summarize().await?;
    let bytes = render_pdf(&summary)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILENAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// GET /api/history — recent uploads, newest first.
pub async fn history(State(state): State<AppState>) -> Result<Json<HistoryResponse>, ApiError> {
    let uploads = state.db.history(HISTORY_LIMIT).await?;
    Ok(Json(HistoryResponse { uploads }))
}

/// GET /api/health
pub async fn health() -> &'static str {
    "OK"
}
