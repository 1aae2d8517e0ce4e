//! Client bridge to a remote Equimetrics server.
//!
//! A thin RPC-style wrapper over the HTTP API: upload a CSV for ingestion,
//! fetch the summary, download the PDF report or the summary JSON. Every
//! operation returns an explicit `Result`; transport and remote failures
//! become [`ClientError`] values and are never propagated as panics past
//! this boundary. The client holds no state beyond its reusable connection.

mod error;
pub mod offline;

pub use error::ClientError;

use equimetrics_protocol::{HistoryResponse, Summary, UploadEvent, UploadOutcome};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, warn};

/// Result type for client bridge operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Handle to a remote Equimetrics server.
pub struct EquipmentApi {
    base_url: String,
    http: reqwest::Client,
}

impl EquipmentApi {
    /// Create a client against a base URL such as `http://127.0.0.1:8000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    /// Upload a CSV file for ingestion.
    pub async fn upload_csv(&self, path: &Path) -> Result<UploadOutcome> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload.csv".to_string());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str("text/csv")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::decode(response).await
    }

    /// Fetch the current summary statistics.
    pub async fn get_summary(&self) -> Result<Summary> {
        let response = self
            .http
            .get(format!("{}/summary", self.base_url))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Fetch the upload history, newest first.
    pub async fn get_history(&self) -> Result<Vec<UploadEvent>> {
        let response = self
            .http
            .get(format!("{}/history", self.base_url))
            .send()
            .await?;
        let body: HistoryResponse = Self::decode(response).await?;
        Ok(body.uploads)
    }

    /// Download the PDF report to `save_path`.
    pub async fn generate_pdf(&self, save_path: &Path) -> Result<()> {
        let response = self
            .http
            .get(format!("{}/report/pdf", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::remote_error(response).await);
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(save_path, &bytes).await?;
        debug!(path = %save_path.display(), bytes = bytes.len(), "Report saved");
        Ok(())
    }

    /// Download the summary as pretty-printed JSON to `save_path`.
    pub async fn download_summary_json(&self, save_path: &Path) -> Result<()> {
        let summary = self.get_summary().await?;
        let json = serde_json::to_vec_pretty(&summary)?;
        tokio::fs::write(save_path, json).await?;
        Ok(())
    }

    /// Decode a JSON response, converting non-success statuses into
    /// [`ClientError::Remote`].
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::remote_error(response).await);
        }
        Ok(response.json().await?)
    }

    async fn remote_error(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let message = match response.json::<equimetrics_protocol::ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("HTTP {status}"),
        };
        warn!(status, message = %message, "Remote request failed");
        ClientError::Remote { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = EquipmentApi::new("http://127.0.0.1:8000/api/");
        assert_eq!(api.base_url, "http://127.0.0.1:8000/api");
    }

    #[tokio::test]
    async fn unreachable_server_yields_transport_error() {
        // Port 9 (discard) is not listening in test environments
        let api = EquipmentApi::new("http://127.0.0.1:9/api");
        let err = api.get_summary().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }

    #[tokio::test]
    async fn upload_of_missing_file_is_an_io_error() {
        let api = EquipmentApi::new("http://127.0.0.1:9/api");
        let err = api
            .upload_csv(Path::new("/nonexistent/plant.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }
}
