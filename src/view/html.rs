//! HTML rendering of the component views.
//!
//! Every interpolated value goes through `html_escape`. Class names match
//! the NR Space stylesheet.

use super::format::html_escape;
use super::{
    DocumentCard, DocumentsBody, DocumentsView, FilterBar, MediaListView, ResultKind, UploadView,
    View, MSG_DOCUMENTS_ERROR, MSG_DOCUMENTS_LOADING, MSG_NO_DOCUMENTS, MSG_NO_MATCHES,
};
use crate::models::{MediaItem, MediaKind};

/// Render any view.
pub fn render(view: &View) -> String {
    match view {
        View::Media(v) => media_list(v),
        View::Documents(v) => documents(v),
        View::Upload(v) => upload_section(v),
    }
}

/// Render a media list (audio, video or gallery).
pub fn media_list(view: &MediaListView) -> String {
    match view {
        MediaListView::Items { kind, items } => {
            let mut out = String::new();
            for item in items {
                out.push_str(&media_item(*kind, item));
            }
            out
        }
        MediaListView::Empty { .. } | MediaListView::Error { .. } => format!(
            r#"<div class="empty-state"><p>{}</p></div>"#,
            html_escape(&view.message().unwrap_or_default())
        ),
    }
}

fn media_item(kind: MediaKind, item: &MediaItem) -> String {
    let url = html_escape(&item.url);
    let title = html_escape(&item.title);
    match kind {
        MediaKind::Audio => format!(
            r#"
        <div class="audio-item opacity-animation">
            <audio controls preload="none" src="{}" style="width: 100%"></audio>
            <div class="audio-title">{}</div>
        </div>"#,
            url, title
        ),
        MediaKind::Video => video_item(&url, &title),
        MediaKind::Gallery if item.is_video() => video_item(&url, &title),
        MediaKind::Gallery => format!(
            r#"
        <div class="gallery-item">
            <img src="{}" alt="{}" loading="lazy">
        </div>"#,
            url, title
        ),
    }
}

fn video_item(url: &str, title: &str) -> String {
    format!(
        r#"
        <div class="video-item">
            <video controls width="400" height="225" data-fullscreen-on-click="true" title="{}">
                <source src="{}" type="video/mp4">
            </video>
        </div>"#,
        title, url
    )
}

/// Render the document browser.
pub fn documents(view: &DocumentsView) -> String {
    let body = match &view.body {
        DocumentsBody::Loading => format!(
            r#"
        <div class="loading-container">
            <div class="loading-spinner"></div>
            <p>{}</p>
        </div>"#,
            MSG_DOCUMENTS_LOADING
        ),
        DocumentsBody::Cards(cards) => {
            let mut rows = String::new();
            for (index, card) in cards.iter().enumerate() {
                rows.push_str(&document_card(card, index));
            }
            format!(r#"<div id="documents-container" class="documents-grid">{}</div>"#, rows)
        }
        DocumentsBody::Empty { filtered } => format!(
            r#"
        <div id="empty-state" class="empty-state">
            <div class="empty-state-icon">[ ]</div>
            <h2 class="empty-state-title">No documents found</h2>
            <p class="empty-state-description">{}</p>
        </div>"#,
            if *filtered { MSG_NO_MATCHES } else { MSG_NO_DOCUMENTS }
        ),
        DocumentsBody::Error { message } => format!(
            r#"
        <div class="error-message">
            <h3>{}</h3>
            <p>{}</p>
            <button class="btn btn-primary" data-action="retry">Retry</button>
        </div>"#,
            MSG_DOCUMENTS_ERROR,
            html_escape(message)
        ),
    };

    format!(
        r#"<section class="documents-section">{}{}
</section>"#,
        filter_bar(&view.filter),
        body
    )
}

fn filter_bar(bar: &FilterBar) -> String {
    let mut options = String::new();
    for option in &bar.type_options {
        let selected = if *option == bar.type_filter { " selected" } else { "" };
        let label = if option == "all" {
            "All types".to_string()
        } else {
            option.to_uppercase()
        };
        options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            html_escape(option),
            selected,
            html_escape(&label)
        ));
    }

    format!(
        r#"
    <div class="documents-filter">
        <input type="text" class="filter-input" id="search-input" placeholder="Search documents..." value="{}">
        <select class="filter-select" id="type-filter">{}</select>
        <button class="btn btn-secondary" data-action="refresh">Refresh</button>
    </div>"#,
        html_escape(&bar.search_term),
        options
    )
}

fn document_card(card: &DocumentCard, index: usize) -> String {
    let url = html_escape(&card.url);
    let name = html_escape(&card.name);
    format!(
        r#"
        <div class="document-card" style="animation-delay: {:.1}s">
            <div class="document-icon">{}</div>
            <div class="document-info">
                <h3 class="document-title" title="{}">{}</h3>
                <div class="document-meta">
                    <span class="document-type-badge">{}</span>
                    <span class="document-size">{}</span>
                </div>
                <p class="document-description">{}</p>
                <p class="document-date">{}</p>
            </div>
            <div class="document-actions">
                <a href="{}" class="btn btn-primary" target="_blank" rel="noopener">View</a>
                <button class="btn btn-secondary" data-action="download" data-url="{}" data-name="{}">Download</button>
            </div>
        </div>"#,
        index as f64 * 0.1,
        card.icon,
        name,
        html_escape(&card.title),
        html_escape(&card.type_badge),
        html_escape(&card.size),
        html_escape(&card.description),
        html_escape(&card.date),
        url,
        url,
        name
    )
}

/// Render an uploader: drop zone, progress bar and results.
pub fn upload_section(view: &UploadView) -> String {
    let category = view.category.as_str();
    let active = if view.drag_active { " drag-over" } else { "" };
    let display = if view.progress.visible { "block" } else { "none" };

    let mut results = String::new();
    for line in &view.results {
        let (class, icon) = match line.kind {
            ResultKind::Success => ("success", "✓"),
            ResultKind::Error => ("error", "✗"),
        };
        results.push_str(&format!(
            r#"
            <div class="upload-result {}">
                <span class="icon">{}</span>
                <span>{}</span>
            </div>"#,
            class,
            icon,
            html_escape(&line.message)
        ));
    }

    format!(
        r#"<div class="upload-section">
    <div class="upload-area{}" id="upload-area-{}">
        <p class="upload-text">Drop files here or <span class="upload-link">click to select</span></p>
        <input type="file" id="file-input-{}" multiple class="file-input" accept="{}">
    </div>
    <div class="upload-progress" id="upload-progress-{}" style="display: {};">
        <div class="progress-bar">
            <div class="progress-fill" id="progress-fill-{}" style="width: {}%"></div>
        </div>
        <span class="progress-text" id="progress-text-{}">{}</span>
    </div>
    <div class="upload-results" id="upload-results-{}">{}</div>
</div>"#,
        active,
        category,
        category,
        html_escape(view.accept),
        category,
        display,
        category,
        view.progress.percent,
        category,
        view.progress.label(),
        category,
        results
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, DocumentRecord, FilterState};
    use crate::view::{ProgressView, UploadResultLine};

    #[test]
    fn test_audio_list_markup() {
        let urls = vec!["/Audio/a&b.mp3".to_string()];
        let html = media_list(&MediaListView::from_urls(MediaKind::Audio, &urls));
        assert!(html.contains(r#"<audio controls preload="none" src="/Audio/a&amp;b.mp3""#));
        assert!(html.contains(r#"<div class="audio-title">a&amp;b.mp3</div>"#));
    }

    #[test]
    fn test_video_list_markup() {
        let urls = vec!["/Video/clip.mp4".to_string(), "/Video/other.mp4".to_string()];
        let html = media_list(&MediaListView::from_urls(MediaKind::Video, &urls));
        assert_eq!(html.matches("<video").count(), 2);
        assert!(html.contains("data-fullscreen-on-click"));
        assert!(html.contains(r#"<source src="/Video/clip.mp4" type="video/mp4">"#));
    }

    #[test]
    fn test_gallery_mixes_images_and_videos() {
        let urls = vec!["/Galleria/a.jpg".to_string(), "/Galleria/b.webm".to_string()];
        let html = media_list(&MediaListView::from_urls(MediaKind::Gallery, &urls));
        assert_eq!(html.matches("<img").count(), 1);
        assert_eq!(html.matches("<video").count(), 1);
    }

    #[test]
    fn test_media_empty_and_error() {
        let html = media_list(&MediaListView::Empty {
            kind: MediaKind::Video,
        });
        assert!(html.contains("No videos available"));

        let html = media_list(&MediaListView::Error {
            kind: MediaKind::Audio,
        });
        assert!(html.contains("Error loading audio files."));
    }

    #[test]
    fn test_documents_cards_escape_names() {
        let doc = DocumentRecord {
            name: "<script>.pdf".to_string(),
            doc_type: "pdf".to_string(),
            size: 1024,
            url: "/Documents/x.pdf".to_string(),
            date: None,
            description: String::new(),
            exists: None,
        };
        let view = DocumentsView {
            filter: FilterBar::new(&FilterState::default(), std::slice::from_ref(&doc)),
            body: DocumentsBody::Cards(vec![DocumentCard::from_record(&doc)]),
        };
        let html = documents(&view);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;.pdf"));
        assert!(html.contains(r#"target="_blank" rel="noopener""#));
        assert!(html.contains(r#"<span class="document-size">1.0 KB</span>"#));
        assert!(html.contains(r#"<option value="all" selected>All types</option>"#));
    }

    #[test]
    fn test_documents_error_has_retry() {
        let view = DocumentsView {
            filter: FilterBar::new(&FilterState::default(), &[]),
            body: DocumentsBody::Error {
                message: "HTTP 500".to_string(),
            },
        };
        let html = documents(&view);
        assert!(html.contains(r#"data-action="retry""#));
        assert!(html.contains("HTTP 500"));
    }

    #[test]
    fn test_upload_section_markup() {
        let mut view = UploadView::new(Category::Documents);
        let html = upload_section(&view);
        assert!(html.contains(r#"style="display: none;""#));
        assert!(html.contains(r#"accept=".pdf,.doc,.docx,.txt,.png,.jpg,.jpeg,.gif,.svg,.webp""#));
        assert!(!html.contains("drag-over"));

        view.drag_active = true;
        view.progress = ProgressView {
            visible: true,
            percent: 50.0,
        };
        view.results.push(UploadResultLine::success("a.pdf"));
        view.results.push(UploadResultLine::connection_error("b.pdf"));
        let html = upload_section(&view);
        assert!(html.contains("upload-area drag-over"));
        assert!(html.contains(r#"style="width: 50%""#));
        assert!(html.contains(">50%</span>"));
        assert_eq!(html.matches("upload-result success").count(), 1);
        assert_eq!(html.matches("upload-result error").count(), 1);
    }
}
