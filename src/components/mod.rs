//! Page components: media loaders, document browser and uploader.

pub mod documents;
pub mod media;
pub mod upload_queue;
pub mod uploader;

pub use documents::{DocumentManager, DownloadAction, LoadOutcome};
pub use media::MediaListLoader;
pub use upload_queue::{UploadOutcome, UploadQueue};
pub use uploader::{DragEvent, FileUploader, UploadSummary};
