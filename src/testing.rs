//! Scripted [`MediaApi`] used by component tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::client::{ApiError, MediaApi};
use crate::models::{DocumentRecord, MediaKind, UploadResponse, UploadTask};

/// Scripted answer for one upload call.
#[derive(Debug, Clone)]
pub enum MockUpload {
    Ok,
    Rejected(String),
    ConnectionError,
}

#[derive(Default)]
pub struct MockApi {
    media: Mutex<HashMap<MediaKind, Option<Vec<String>>>>,
    documents: Mutex<Option<Vec<DocumentRecord>>>,
    uploads: Mutex<VecDeque<MockUpload>>,
    document_gate: Mutex<Option<Arc<Notify>>>,
    upload_latency: Mutex<Duration>,
    media_calls: AtomicUsize,
    document_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    pub uploaded_names: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `None` makes the listing fail with HTTP 500.
    pub fn set_media(&self, kind: MediaKind, urls: Option<Vec<&str>>) {
        self.media
            .lock()
            .insert(kind, urls.map(|u| u.into_iter().map(str::to_string).collect()));
    }

    /// `None` makes the listing fail with HTTP 500.
    pub fn set_documents(&self, docs: Option<Vec<DocumentRecord>>) {
        *self.documents.lock() = docs;
    }

    /// Hold document fetches until the returned handle is notified.
    pub fn gate_documents(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.document_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn script_uploads(&self, script: Vec<MockUpload>) {
        *self.uploads.lock() = script.into();
    }

    pub fn set_upload_latency(&self, latency: Duration) {
        *self.upload_latency.lock() = latency;
    }

    pub fn media_calls(&self) -> usize {
        self.media_calls.load(Ordering::SeqCst)
    }

    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

fn server_error(endpoint: &str) -> ApiError {
    ApiError::Status {
        url: endpoint.to_string(),
        status: 500,
    }
}

#[async_trait]
impl MediaApi for MockApi {
    async fn fetch_media(&self, kind: MediaKind) -> Result<Vec<String>, ApiError> {
        self.media_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match self.media.lock().get(&kind) {
            Some(Some(urls)) => Ok(urls.clone()),
            Some(None) => Err(server_error(kind.endpoint())),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_documents(&self) -> Result<Vec<DocumentRecord>, ApiError> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.document_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.documents.lock().clone() {
            Some(docs) => Ok(docs.into_iter().filter(|d| d.is_visible()).collect()),
            None => Err(server_error("/api/documents")),
        }
    }

    async fn upload(&self, task: &UploadTask) -> Result<UploadResponse, ApiError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let latency = *self.upload_latency.lock();
        if latency.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.uploaded_names.lock().push(task.file.name.clone());

        let next = self.uploads.lock().pop_front().unwrap_or(MockUpload::Ok);
        match next {
            MockUpload::Ok => Ok(UploadResponse {
                success: true,
                error: None,
            }),
            MockUpload::Rejected(error) => Ok(UploadResponse {
                success: false,
                error: Some(error),
            }),
            MockUpload::ConnectionError => Err(ApiError::malformed(
                &task.category.upload_endpoint(),
                "connection reset",
            )),
        }
    }
}

/// Document fixture.
pub fn doc(name: &str, doc_type: &str, description: &str) -> DocumentRecord {
    DocumentRecord {
        name: name.to_string(),
        doc_type: doc_type.to_string(),
        size: 2048,
        url: format!("/Documents/{}", name),
        date: Some("2024-01-10".to_string()),
        description: description.to_string(),
        exists: None,
    }
}
