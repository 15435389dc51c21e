//! Access to the NR Space REST endpoints.
//!
//! Components never talk to reqwest directly; they go through [`MediaApi`]
//! so tests can script server behavior.

mod http_client;

pub use http_client::{resolve_user_agent, ApiClient};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Category, DocumentRecord, MediaKind, UploadResponse, UploadTask};

/// Errors raised while talking to the server.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Connection error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Malformed response from {endpoint}: {reason}")]
    Malformed { endpoint: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn malformed(endpoint: &str, reason: impl Into<String>) -> Self {
        ApiError::Malformed {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the payload arrived but had the wrong shape.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ApiError::Malformed { .. })
    }
}

/// Server operations the components depend on.
#[async_trait]
pub trait MediaApi: Send + Sync {
    /// Fetch a list of media URLs (`/api/audio`, `/api/videos`, `/api/gallery`).
    async fn fetch_media(&self, kind: MediaKind) -> Result<Vec<String>, ApiError>;

    /// Fetch the document listing.
    async fn fetch_documents(&self) -> Result<Vec<DocumentRecord>, ApiError>;

    /// Upload one file to its category endpoint.
    async fn upload(&self, task: &UploadTask) -> Result<UploadResponse, ApiError>;
}

/// Decode a JSON array of URL strings.
pub fn parse_media_list(endpoint: &str, value: serde_json::Value) -> Result<Vec<String>, ApiError> {
    if !value.is_array() {
        return Err(ApiError::malformed(endpoint, "expected a JSON array"));
    }
    serde_json::from_value(value).map_err(|e| ApiError::malformed(endpoint, e.to_string()))
}

/// Decode a JSON array of document records, dropping `exists: false` entries.
pub fn parse_document_list(value: serde_json::Value) -> Result<Vec<DocumentRecord>, ApiError> {
    let endpoint = Category::Documents.list_endpoint();
    if !value.is_array() {
        return Err(ApiError::malformed(endpoint, "expected a JSON array"));
    }
    let records: Vec<DocumentRecord> =
        serde_json::from_value(value).map_err(|e| ApiError::malformed(endpoint, e.to_string()))?;
    Ok(records.into_iter().filter(|r| r.is_visible()).collect())
}
