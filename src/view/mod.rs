//! View-models for every component.
//!
//! Components compute one of these from their state; [`html`] and [`text`]
//! turn them into markup. Both mappings are pure functions.

pub mod format;
pub mod html;
pub mod text;

use crate::models::{Category, DocumentRecord, FilterState, MediaItem, MediaKind, ALL_TYPES};

use format::{format_date, format_file_size, truncate_text};

pub const MSG_DOCUMENTS_LOADING: &str = "Loading documents...";
pub const MSG_DOCUMENTS_ERROR: &str = "Error loading documents";
pub const MSG_NO_DOCUMENTS: &str = "Upload your documents to the \"Documents\" folder to see them here.";
pub const MSG_NO_MATCHES: &str = "No documents match the selected filters.";
pub const MSG_DOWNLOAD_UNAVAILABLE: &str = "Download not available for this demo document";

/// Max characters of a document name shown on a card.
pub const CARD_NAME_CHARS: usize = 30;
/// Max characters of a document description shown on a card.
pub const CARD_DESCRIPTION_CHARS: usize = 50;

/// Type tags always offered by the type filter.
pub const BASE_TYPE_OPTIONS: &[&str] = &["pdf", "docx", "txt", "svg"];

/// Anything a surface can display.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Media(MediaListView),
    Documents(DocumentsView),
    Upload(UploadView),
}

/// State of a media list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaListView {
    Items { kind: MediaKind, items: Vec<MediaItem> },
    Empty { kind: MediaKind },
    Error { kind: MediaKind },
}

impl MediaListView {
    pub fn from_urls(kind: MediaKind, urls: &[String]) -> Self {
        if urls.is_empty() {
            return MediaListView::Empty { kind };
        }
        let items = urls
            .iter()
            .enumerate()
            .map(|(i, url)| MediaItem::from_url(url, i, kind))
            .collect();
        MediaListView::Items { kind, items }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            MediaListView::Items { kind, .. }
            | MediaListView::Empty { kind }
            | MediaListView::Error { kind } => *kind,
        }
    }

    pub fn items(&self) -> &[MediaItem] {
        match self {
            MediaListView::Items { items, .. } => items,
            _ => &[],
        }
    }

    pub fn message(&self) -> Option<String> {
        match self {
            MediaListView::Items { .. } => None,
            MediaListView::Empty { kind } => Some(match kind {
                MediaKind::Audio => "No audio files available at the moment.".to_string(),
                MediaKind::Video => "No videos available at the moment.".to_string(),
                MediaKind::Gallery => "No images or videos in the gallery yet.".to_string(),
            }),
            MediaListView::Error { kind } => Some(match kind {
                MediaKind::Audio => "Error loading audio files.".to_string(),
                MediaKind::Video => "Error loading videos.".to_string(),
                MediaKind::Gallery => "Error loading the gallery.".to_string(),
            }),
        }
    }
}

/// Full document browser view: filter bar plus body.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentsView {
    pub filter: FilterBar,
    pub body: DocumentsBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterBar {
    pub search_term: String,
    pub type_filter: String,
    /// Selectable type tags, `all` first.
    pub type_options: Vec<String>,
}

impl FilterBar {
    pub fn new(filter: &FilterState, documents: &[DocumentRecord]) -> Self {
        let mut type_options: Vec<String> = std::iter::once(ALL_TYPES)
            .chain(BASE_TYPE_OPTIONS.iter().copied())
            .map(str::to_string)
            .collect();
        for doc in documents {
            let tag = doc.doc_type.to_lowercase();
            if !tag.is_empty() && !type_options.contains(&tag) {
                type_options.push(tag);
            }
        }

        Self {
            search_term: filter.search_term.clone(),
            type_filter: filter.type_filter.clone(),
            type_options,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocumentsBody {
    Loading,
    Cards(Vec<DocumentCard>),
    /// `filtered` is true when documents exist but none match the filters.
    Empty { filtered: bool },
    /// Error panel with a retry action.
    Error { message: String },
}

impl DocumentsBody {
    pub fn cards(&self) -> &[DocumentCard] {
        match self {
            DocumentsBody::Cards(cards) => cards,
            _ => &[],
        }
    }
}

/// Display data for one document card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCard {
    pub name: String,
    pub title: String,
    pub type_badge: String,
    pub icon: &'static str,
    pub size: String,
    pub description: String,
    pub date: String,
    pub url: String,
}

impl DocumentCard {
    pub fn from_record(doc: &DocumentRecord) -> Self {
        Self {
            name: doc.name.clone(),
            title: truncate_text(&doc.name, CARD_NAME_CHARS),
            type_badge: doc.doc_type.to_uppercase(),
            icon: format::type_icon(&doc.doc_type),
            size: format_file_size(doc.size),
            description: truncate_text(&doc.description, CARD_DESCRIPTION_CHARS),
            date: doc
                .date
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "—".to_string()),
            url: doc.url.clone(),
        }
    }
}

/// Drop zone, progress bar and result list of one uploader.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadView {
    pub category: Category,
    pub accept: &'static str,
    pub drag_active: bool,
    pub progress: ProgressView,
    pub results: Vec<UploadResultLine>,
}

impl UploadView {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            accept: category.accept_types(),
            drag_active: false,
            progress: ProgressView::default(),
            results: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressView {
    pub visible: bool,
    /// Fill percentage, 0.0..=100.0.
    pub percent: f64,
}

impl ProgressView {
    /// Progress text as shown next to the bar.
    pub fn label(&self) -> String {
        format!("{}%", self.percent.round() as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResultLine {
    pub kind: ResultKind,
    pub message: String,
}

impl UploadResultLine {
    pub fn success(file_name: &str) -> Self {
        Self {
            kind: ResultKind::Success,
            message: format!("{} uploaded successfully", file_name),
        }
    }

    pub fn rejected(file_name: &str, error: Option<&str>) -> Self {
        Self {
            kind: ResultKind::Error,
            message: format!(
                "Error with {}: {}",
                file_name,
                error.unwrap_or("unknown error")
            ),
        }
    }

    pub fn connection_error(file_name: &str) -> Self {
        Self {
            kind: ResultKind::Error,
            message: format!("Connection error with {}", file_name),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == ResultKind::Success
    }
}
