//! Document browser with search and type filtering.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::client::MediaApi;
use crate::models::{is_placeholder_url, DocumentRecord, FilterState};
use crate::surface::{DownloadLink, Surface};
use crate::view::{
    DocumentCard, DocumentsBody, DocumentsView, FilterBar, View, MSG_DOWNLOAD_UNAVAILABLE,
};

/// Result of a `load_documents` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    /// Another load was already running.
    Skipped,
    Failed,
}

/// Result of `download_document`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadAction {
    Started(DownloadLink),
    /// Placeholder URL; the user was notified.
    Unavailable,
}

#[derive(Debug, Default)]
struct DocumentState {
    documents: Vec<DocumentRecord>,
    filtered: Vec<DocumentRecord>,
    filter: FilterState,
}

/// Clears the loading flag when dropped.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Document listing component.
pub struct DocumentManager {
    api: Arc<dyn MediaApi>,
    surface: Arc<dyn Surface>,
    state: Mutex<DocumentState>,
    is_loading: AtomicBool,
}

impl DocumentManager {
    pub fn new(api: Arc<dyn MediaApi>, surface: Arc<dyn Surface>) -> Self {
        Self {
            api,
            surface,
            state: Mutex::new(DocumentState::default()),
            is_loading: AtomicBool::new(false),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.load(Ordering::SeqCst)
    }

    /// Full list from the last successful fetch.
    pub fn documents(&self) -> Vec<DocumentRecord> {
        self.state.lock().documents.clone()
    }

    /// Subset matching the current filter.
    pub fn filtered_documents(&self) -> Vec<DocumentRecord> {
        self.state.lock().filtered.clone()
    }

    pub fn filter_state(&self) -> FilterState {
        self.state.lock().filter.clone()
    }

    /// Fetch the listing and render it. A call made while another load is
    /// in flight returns `Skipped` without touching the network.
    pub async fn load_documents(&self) -> LoadOutcome {
        if self.is_loading.swap(true, Ordering::SeqCst) {
            debug!("document load already in progress, skipping");
            return LoadOutcome::Skipped;
        }
        let _guard = LoadingGuard(&self.is_loading);

        self.show(DocumentsBody::Loading);

        match self.api.fetch_documents().await {
            Ok(documents) => {
                let count = documents.len();
                {
                    let mut state = self.state.lock();
                    state.filtered = documents.clone();
                    state.documents = documents;
                    state.filter = FilterState::default();
                }
                info!(count, "documents loaded");
                self.render_documents();
                LoadOutcome::Loaded { count }
            }
            Err(e) => {
                error!("Error loading documents: {}", e);
                self.show(DocumentsBody::Error {
                    message: e.to_string(),
                });
                LoadOutcome::Failed
            }
        }
    }

    /// Recompute the filtered set from the full list and re-render.
    pub fn filter_documents(&self, search_term: &str, type_filter: &str) -> usize {
        let count = {
            let mut state = self.state.lock();
            state.filter = FilterState::new(search_term, type_filter);
            state.filtered = state.filter.apply(&state.documents);
            state.filtered.len()
        };
        debug!(search_term, type_filter, count, "documents filtered");
        self.render_documents();
        count
    }

    /// Render the current filtered set, or the empty state.
    pub fn render_documents(&self) {
        let view = self.view_with(None);
        self.surface.render(&View::Documents(view));
    }

    /// Current view of the component.
    pub fn view(&self) -> DocumentsView {
        self.view_with(None)
    }

    fn show(&self, body: DocumentsBody) {
        let view = self.view_with(Some(body));
        self.surface.render(&View::Documents(view));
    }

    fn view_with(&self, body: Option<DocumentsBody>) -> DocumentsView {
        let state = self.state.lock();
        let body = body.unwrap_or_else(|| {
            if state.filtered.is_empty() {
                DocumentsBody::Empty {
                    filtered: !state.documents.is_empty(),
                }
            } else {
                DocumentsBody::Cards(state.filtered.iter().map(DocumentCard::from_record).collect())
            }
        });
        DocumentsView {
            filter: FilterBar::new(&state.filter, &state.documents),
            body,
        }
    }

    /// Start a download, or tell the user the document has no real target.
    pub fn download_document(&self, url: &str, filename: &str) -> DownloadAction {
        if is_placeholder_url(url) {
            info!(filename, "download requested for placeholder document");
            self.surface.notice(MSG_DOWNLOAD_UNAVAILABLE);
            return DownloadAction::Unavailable;
        }

        let link = DownloadLink {
            url: url.to_string(),
            filename: filename.to_string(),
        };
        self.surface.download(&link);
        DownloadAction::Started(link)
    }

    /// Re-fetch the listing (refresh button).
    pub async fn refresh_documents(&self) -> LoadOutcome {
        self.load_documents().await
    }

    /// Re-fetch after an error (retry button).
    pub async fn retry(&self) -> LoadOutcome {
        self.load_documents().await
    }
}
