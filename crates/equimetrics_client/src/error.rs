//! Client bridge error types.

use thiserror::Error;

/// Failures surfaced by the client bridge.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network or protocol failure reaching the server.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Local file system failure (reading the upload, saving a download).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The server answered with an error body.
    #[error("Server error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Local serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
