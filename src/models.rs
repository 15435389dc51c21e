//! Domain models shared by the NR Space components.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Content category. Determines endpoints, accepted file types and the
/// page container a component is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Audio,
    Video,
    Documents,
    Gallery,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Audio,
        Category::Video,
        Category::Documents,
        Category::Gallery,
    ];

    /// Slug used in upload endpoints and in the completion signal.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Audio => "audio",
            Category::Video => "video",
            Category::Documents => "documents",
            Category::Gallery => "gallery",
        }
    }

    /// Listing endpoint for this category.
    pub fn list_endpoint(&self) -> &'static str {
        match self {
            Category::Audio => "/api/audio",
            Category::Video => "/api/videos",
            Category::Documents => "/api/documents",
            Category::Gallery => "/api/gallery",
        }
    }

    /// Upload endpoint for this category.
    pub fn upload_endpoint(&self) -> String {
        format!("/api/upload/{}", self.as_str())
    }

    /// Accept list for the file picker, in HTML `accept` attribute syntax.
    pub fn accept_types(&self) -> &'static str {
        match self {
            Category::Audio => "audio/*",
            Category::Video => "video/*",
            Category::Documents => ".pdf,.doc,.docx,.txt,.png,.jpg,.jpeg,.gif,.svg,.webp",
            Category::Gallery => "image/*,video/*",
        }
    }

    /// CSS selectors marking this category's container in a page skeleton.
    pub fn container_markers(&self) -> &'static [&'static str] {
        match self {
            Category::Audio => &[".audio-list", ".audio-grid"],
            Category::Video => &[".video-grid"],
            Category::Documents => &[".documents-grid", ".documents-section", "#documents-container"],
            Category::Gallery => &[".gallery-grid"],
        }
    }

    /// Check a file against the accept list.
    pub fn accepts(&self, file: &SelectedFile) -> bool {
        accept_list_matches(self.accept_types(), &file.name, file.mime.as_deref())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "audio" => Ok(Category::Audio),
            "video" | "videos" => Ok(Category::Video),
            "documents" | "document" | "docs" => Ok(Category::Documents),
            "gallery" | "galleria" => Ok(Category::Gallery),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

/// Match a file against an `accept` attribute value.
///
/// Entries are either extensions (`.pdf`), wildcard MIME types (`image/*`)
/// or exact MIME types. `*/*` and an empty list accept everything.
pub fn accept_list_matches(accept: &str, file_name: &str, mime: Option<&str>) -> bool {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()));

    let mut entries = accept.split(',').map(str::trim).filter(|e| !e.is_empty()).peekable();
    if entries.peek().is_none() {
        return true;
    }

    entries.any(|entry| {
        let entry = entry.to_ascii_lowercase();
        if entry == "*/*" {
            true
        } else if entry.starts_with('.') {
            ext.as_deref() == Some(entry.as_str())
        } else if let Some(prefix) = entry.strip_suffix("/*") {
            mime.map(|m| m.to_ascii_lowercase().starts_with(&format!("{}/", prefix)))
                .unwrap_or(false)
        } else {
            mime.map(|m| m.eq_ignore_ascii_case(&entry)).unwrap_or(false)
        }
    })
}

/// Kind of media list a loader renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
    Gallery,
}

impl MediaKind {
    pub fn category(&self) -> Category {
        match self {
            MediaKind::Audio => Category::Audio,
            MediaKind::Video => Category::Video,
            MediaKind::Gallery => Category::Gallery,
        }
    }

    pub fn from_category(category: Category) -> Option<Self> {
        match category {
            Category::Audio => Some(MediaKind::Audio),
            Category::Video => Some(MediaKind::Video),
            Category::Gallery => Some(MediaKind::Gallery),
            Category::Documents => None,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        self.category().list_endpoint()
    }

    /// Label used for untitled items and messages.
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Audio => "Audio",
            MediaKind::Video => "Video",
            MediaKind::Gallery => "Media",
        }
    }
}

/// Extensions rendered as a video element inside the gallery.
const GALLERY_VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov"];

/// One entry in a media listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub url: String,
    pub title: String,
}

impl MediaItem {
    /// Build an item from its URL; `index` is the zero-based list position.
    pub fn from_url(url: &str, index: usize, kind: MediaKind) -> Self {
        let segment = url
            .split(['?', '#'])
            .next()
            .unwrap_or("")
            .rsplit('/')
            .next()
            .unwrap_or("");

        let title = if segment.is_empty() {
            format!("{} {}", kind.label(), index + 1)
        } else {
            urlencoding::decode(segment)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| segment.to_string())
        };

        Self {
            url: url.to_string(),
            title,
        }
    }

    /// Whether a gallery item should be shown as a video.
    pub fn is_video(&self) -> bool {
        Path::new(&self.title)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| GALLERY_VIDEO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }
}

/// A document as listed by `/api/documents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub size: u64,
    pub url: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: String,
    /// `false` marks a record the client should not show.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exists: Option<bool>,
}

impl DocumentRecord {
    pub fn is_visible(&self) -> bool {
        self.exists != Some(false)
    }

    /// Whether the record points at a real download target.
    pub fn has_download(&self) -> bool {
        !is_placeholder_url(&self.url)
    }
}

/// The literal `#` used by demo data for "no real target".
pub fn is_placeholder_url(url: &str) -> bool {
    url.trim() == "#"
}

/// Type filter value meaning "every type".
pub const ALL_TYPES: &str = "all";

/// Current search/type filter of the document browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search_term: String,
    pub type_filter: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            type_filter: ALL_TYPES.to_string(),
        }
    }
}

impl FilterState {
    pub fn new(search_term: &str, type_filter: &str) -> Self {
        let type_filter = type_filter.trim();
        Self {
            search_term: search_term.to_lowercase(),
            type_filter: if type_filter.is_empty() {
                ALL_TYPES.to_string()
            } else {
                type_filter.to_string()
            },
        }
    }

    pub fn is_default(&self) -> bool {
        self.search_term.is_empty() && self.type_filter == ALL_TYPES
    }

    /// Check a record against both the search term and the type filter.
    pub fn matches(&self, doc: &DocumentRecord) -> bool {
        let matches_search = self.search_term.is_empty()
            || doc.name.to_lowercase().contains(&self.search_term)
            || doc.description.to_lowercase().contains(&self.search_term);
        let matches_type =
            self.type_filter == ALL_TYPES || doc.doc_type.eq_ignore_ascii_case(&self.type_filter);
        matches_search && matches_type
    }

    /// Recompute the filtered subset, preserving order.
    pub fn apply(&self, documents: &[DocumentRecord]) -> Vec<DocumentRecord> {
        documents.iter().filter(|d| self.matches(d)).cloned().collect()
    }
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl SelectedFile {
    /// Create a file, guessing its MIME type from the name.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_guess::from_path(&name).first().map(|m| m.essence_str().to_string());
        Self { name, bytes, mime }
    }

    /// Read a file from disk.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        Ok(Self::new(name, bytes))
    }
}

/// One queued upload.
#[derive(Debug, Clone)]
pub struct UploadTask {
    pub category: Category,
    pub file: SelectedFile,
}

/// Response body of `POST /api/upload/{category}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, doc_type: &str, description: &str) -> DocumentRecord {
        DocumentRecord {
            name: name.to_string(),
            doc_type: doc_type.to_string(),
            size: 1024,
            url: format!("/Documents/{}", name),
            date: None,
            description: description.to_string(),
            exists: None,
        }
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("audio".parse::<Category>(), Ok(Category::Audio));
        assert_eq!("Videos".parse::<Category>(), Ok(Category::Video));
        assert_eq!(" documents ".parse::<Category>(), Ok(Category::Documents));
        assert!("podcasts".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_endpoints() {
        assert_eq!(Category::Video.list_endpoint(), "/api/videos");
        assert_eq!(Category::Video.upload_endpoint(), "/api/upload/video");
        assert_eq!(Category::Gallery.upload_endpoint(), "/api/upload/gallery");
    }

    #[test]
    fn test_accept_list() {
        let pdf = SelectedFile::new("report.PDF", vec![]);
        let song = SelectedFile::new("song.mp3", vec![]);
        let clip = SelectedFile::new("clip.mp4", vec![]);

        assert!(Category::Documents.accepts(&pdf));
        assert!(!Category::Documents.accepts(&song));
        assert!(Category::Audio.accepts(&song));
        assert!(!Category::Audio.accepts(&clip));
        assert!(Category::Gallery.accepts(&clip));
        assert!(accept_list_matches("*/*", "anything", None));
        assert!(accept_list_matches("", "anything", None));
    }

    #[test]
    fn test_media_item_title() {
        let item = MediaItem::from_url("/Audio/My%20Song.mp3", 0, MediaKind::Audio);
        assert_eq!(item.title, "My Song.mp3");

        let item = MediaItem::from_url("/Audio/", 2, MediaKind::Audio);
        assert_eq!(item.title, "Audio 3");

        let item = MediaItem::from_url("/Galleria/clip.webm", 0, MediaKind::Gallery);
        assert!(item.is_video());
        let item = MediaItem::from_url("/Galleria/photo.jpg", 0, MediaKind::Gallery);
        assert!(!item.is_video());
    }

    #[test]
    fn test_document_record_wire_format() {
        let json = r#"{"name":"a.pdf","type":"PDF","url":"/Documents/a.pdf","size":10}"#;
        let record: DocumentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.doc_type, "PDF");
        assert_eq!(record.description, "");
        assert!(record.date.is_none());
        assert!(record.is_visible());

        let json = r##"{"name":"b","type":"txt","url":"#","size":0,"exists":false}"##;
        let record: DocumentRecord = serde_json::from_str(json).unwrap();
        assert!(!record.is_visible());
        assert!(!record.has_download());
    }

    #[test]
    fn test_filter_default_keeps_everything_in_order() {
        let docs = vec![
            doc("b.pdf", "pdf", ""),
            doc("a.txt", "txt", ""),
            doc("c.docx", "docx", ""),
        ];
        let filtered = FilterState::new("", "all").apply(&docs);
        assert_eq!(filtered, docs);
    }

    #[test]
    fn test_filter_search_and_type() {
        let docs = vec![
            doc("Privacy Policy.pdf", "pdf", "Informativa"),
            doc("Manual.docx", "docx", "user manual, detailed"),
            doc("Setup.txt", "txt", "initial setup"),
        ];

        let filtered = FilterState::new("MANUAL", "all").apply(&docs);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Manual.docx");

        // Description matches too
        let filtered = FilterState::new("setup", "all").apply(&docs);
        assert_eq!(filtered[0].name, "Setup.txt");

        let filtered = FilterState::new("", "PDF").apply(&docs);
        assert_eq!(filtered.len(), 1);

        let filtered = FilterState::new("manual", "pdf").apply(&docs);
        assert!(filtered.is_empty());

        let filtered = FilterState::new("zzz", "all").apply(&docs);
        assert!(filtered.is_empty());
    }

    #[tokio::test]
    async fn test_selected_file_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Track 01.mp3");
        std::fs::write(&path, b"ID3").unwrap();

        let file = SelectedFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "Track 01.mp3");
        assert_eq!(file.bytes, b"ID3");
        assert_eq!(file.mime.as_deref(), Some("audio/mpeg"));
        assert!(Category::Audio.accepts(&file));
        assert!(!Category::Documents.accepts(&file));
    }
}
