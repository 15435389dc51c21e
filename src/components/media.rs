//! Audio, video and gallery list loader.

use std::sync::Arc;

use tracing::{error, info};

use crate::client::MediaApi;
use crate::models::MediaKind;
use crate::surface::Surface;
use crate::view::{MediaListView, View};

/// Fetches a list of media URLs and renders one playable element per URL.
pub struct MediaListLoader {
    kind: MediaKind,
    api: Arc<dyn MediaApi>,
    surface: Arc<dyn Surface>,
}

impl MediaListLoader {
    pub fn new(kind: MediaKind, api: Arc<dyn MediaApi>, surface: Arc<dyn Surface>) -> Self {
        Self { kind, api, surface }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Fetch and render the list, replacing whatever was shown before.
    ///
    /// Never fails: transport errors and malformed payloads end in the
    /// error view.
    pub async fn load(&self) -> MediaListView {
        let view = match self.api.fetch_media(self.kind).await {
            Ok(urls) => {
                info!(endpoint = self.kind.endpoint(), count = urls.len(), "media list loaded");
                MediaListView::from_urls(self.kind, &urls)
            }
            Err(e) => {
                error!(endpoint = self.kind.endpoint(), "Error fetching media list: {}", e);
                MediaListView::Error { kind: self.kind }
            }
        };

        self.surface.render(&View::Media(view.clone()));
        view
    }
}
