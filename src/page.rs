//! Page bootstrap.
//!
//! Detects which category containers a page skeleton contains, mounts one
//! loader + uploader pair per category and wires each loader to the
//! completion signal of its category.

use std::sync::Arc;
use std::time::Duration;

use scraper::{Html, Selector};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::MediaApi;
use crate::components::{DocumentManager, FileUploader, MediaListLoader};
use crate::events::EventBus;
use crate::models::{Category, MediaKind};
use crate::surface::HtmlSurface;

/// Shared collaborators handed to every component of a page.
#[derive(Clone)]
pub struct PageDeps {
    pub api: Arc<dyn MediaApi>,
    pub bus: EventBus,
    pub settle_delay: Duration,
}

/// Loader half of a section.
#[derive(Clone)]
pub enum SectionContent {
    Media(Arc<MediaListLoader>),
    Documents(Arc<DocumentManager>),
}

impl SectionContent {
    /// Fetch and render again.
    pub async fn reload(&self) {
        match self {
            SectionContent::Media(loader) => {
                loader.load().await;
            }
            SectionContent::Documents(manager) => {
                manager.load_documents().await;
            }
        }
    }
}

/// One mounted category.
pub struct Section {
    pub category: Category,
    pub content: SectionContent,
    pub uploader: Arc<FileUploader>,
    pub content_surface: Arc<HtmlSurface>,
    pub upload_surface: Arc<HtmlSurface>,
}

impl Section {
    fn mount(category: Category, deps: &PageDeps) -> Self {
        let content_surface = Arc::new(HtmlSurface::new());
        let upload_surface = Arc::new(HtmlSurface::new());

        let content = match MediaKind::from_category(category) {
            Some(kind) => SectionContent::Media(Arc::new(MediaListLoader::new(
                kind,
                deps.api.clone(),
                content_surface.clone(),
            ))),
            None => SectionContent::Documents(Arc::new(DocumentManager::new(
                deps.api.clone(),
                content_surface.clone(),
            ))),
        };

        let uploader = Arc::new(FileUploader::new(
            category,
            deps.api.clone(),
            upload_surface.clone(),
            deps.bus.clone(),
            deps.settle_delay,
        ));

        Self {
            category,
            content,
            uploader,
            content_surface,
            upload_surface,
        }
    }

    /// Uploader markup followed by the content markup.
    pub fn html(&self) -> String {
        format!("{}\n{}", self.upload_surface.html(), self.content_surface.html())
    }
}

/// Categories whose container marker appears in `html`, in canonical order.
pub fn detect_categories(html: &str) -> Vec<Category> {
    let document = Html::parse_document(html);
    Category::ALL
        .into_iter()
        .filter(|category| {
            category.container_markers().iter().any(|marker| {
                Selector::parse(marker)
                    .map(|selector| document.select(&selector).next().is_some())
                    .unwrap_or(false)
            })
        })
        .collect()
}

/// A bootstrapped page.
pub struct Page {
    sections: Vec<Section>,
    subscriptions: Vec<JoinHandle<()>>,
}

impl Page {
    /// Mount every detected category, subscribe loaders to the bus and run
    /// the initial loads.
    pub async fn bootstrap(html: &str, deps: PageDeps) -> Self {
        let categories = detect_categories(html);
        info!(?categories, "bootstrapping page");
        Self::mount(&categories, deps).await
    }

    /// Mount an explicit list of categories (duplicates are ignored).
    pub async fn mount(categories: &[Category], deps: PageDeps) -> Self {
        let mut sections: Vec<Section> = Vec::new();
        for &category in categories {
            if sections.iter().any(|s| s.category == category) {
                continue;
            }
            sections.push(Section::mount(category, &deps));
        }

        let subscriptions = sections
            .iter()
            .map(|section| subscribe_refresh(&deps.bus, section.category, section.content.clone()))
            .collect();

        for section in &sections {
            section.content.reload().await;
        }

        Self {
            sections,
            subscriptions,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, category: Category) -> Option<&Section> {
        self.sections.iter().find(|s| s.category == category)
    }

    /// Markup of every section.
    pub fn html(&self) -> String {
        self.sections
            .iter()
            .map(Section::html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        for handle in &self.subscriptions {
            handle.abort();
        }
    }
}

/// Re-fetch `content` whenever an upload batch for `category` completes.
fn subscribe_refresh(bus: &EventBus, category: Category, content: SectionContent) -> JoinHandle<()> {
    let mut receiver = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) if event.category() == category => {
                    debug!(%category, "files uploaded, refreshing");
                    content.reload().await;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(n)) => {
                    warn!(%category, "event receiver lagged by {} messages, refreshing", n);
                    content.reload().await;
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SelectedFile;
    use crate::testing::{doc, MockApi};

    const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
    <section class="audio-section"><div class="audio-list"></div></section>
    <section class="documents-section"><div id="documents-container"></div></section>
</body></html>"#;

    fn deps(api: Arc<MockApi>) -> PageDeps {
        PageDeps {
            api: api as Arc<dyn MediaApi>,
            bus: EventBus::new(),
            settle_delay: Duration::ZERO,
        }
    }

    #[test]
    fn test_detect_categories() {
        assert_eq!(detect_categories(PAGE), vec![Category::Audio, Category::Documents]);
        assert_eq!(
            detect_categories(r#"<div class="video-grid"></div><div class="gallery-grid"></div>"#),
            vec![Category::Video, Category::Gallery]
        );
        assert!(detect_categories("<p>nothing here</p>").is_empty());
    }

    #[tokio::test]
    async fn test_bootstrap_mounts_and_loads() {
        let api = MockApi::new();
        api.set_media(MediaKind::Audio, Some(vec!["/Audio/a.mp3"]));
        api.set_documents(Some(vec![doc("a.pdf", "pdf", "")]));

        let page = Page::bootstrap(PAGE, deps(api.clone())).await;

        assert_eq!(page.sections().len(), 2);
        assert_eq!(api.media_calls(), 1);
        assert_eq!(api.document_calls(), 1);
        let html = page.html();
        assert!(html.contains("upload-area-audio"));
        assert!(html.contains("upload-area-documents"));
        assert!(html.contains("a.mp3"));
        assert!(html.contains("document-card"));
    }

    #[tokio::test]
    async fn test_upload_refreshes_matching_loader_only() {
        let api = MockApi::new();
        api.set_media(MediaKind::Audio, Some(vec!["/Audio/a.mp3"]));
        api.set_documents(Some(vec![]));
        let page = Page::bootstrap(PAGE, deps(api.clone())).await;

        api.set_media(MediaKind::Audio, Some(vec!["/Audio/a.mp3", "/Audio/new.mp3"]));
        let audio = page.section(Category::Audio).unwrap();
        audio
            .uploader
            .handle_files(vec![SelectedFile::new("new.mp3", b"id3".to_vec())])
            .await;

        tokio::time::timeout(Duration::from_secs(1), async {
            while !audio.content_surface.html().contains("new.mp3") {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("audio list was not refreshed");

        assert_eq!(api.media_calls(), 2);
        assert_eq!(api.document_calls(), 1);
    }

    #[tokio::test]
    async fn test_mount_ignores_duplicates() {
        let api = MockApi::new();
        let page = Page::mount(&[Category::Video, Category::Video], deps(api.clone())).await;
        assert_eq!(page.sections().len(), 1);
        assert_eq!(api.media_calls(), 1);
    }
}
