//! API error taxonomy and response mapping.
//!
//! Client-fault errors map to 400 with a structured body; storage failures
//! map to 500. No error path leaks a stack trace to the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use equimetrics_ingest::IngestError;
use equimetrics_protocol::ErrorBody;
use thiserror::Error;
use tracing::{error, warn};

/// Errors surfaced by the API handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request carried no file field.
    #[error("{}", ErrorBody::NO_FILE)]
    NoFile,

    /// Uploaded file is not a .csv.
    #[error("{}", ErrorBody::NOT_CSV)]
    NotCsv,

    /// Header does not satisfy the required-column contract.
    #[error("{}", ErrorBody::BAD_COLUMNS)]
    BadColumns,

    /// Any other client-fault parse or coercion failure.
    #[error("{0}")]
    BadRequest(String),

    /// Storage failure; the replace transaction has already rolled back.
    #[error("Storage error: {0}")]
    Storage(#[from] equimetrics_db::DbError),

    /// Report rendering failure.
    #[error("Report error: {0}")]
    Report(#[from] equimetrics_report::ReportError),
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::MissingColumns { .. } => ApiError::BadColumns,
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NoFile
            | ApiError::NotCsv
            | ApiError::BadColumns
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) | ApiError::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, "Request rejected");
        }
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}
