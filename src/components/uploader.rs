//! Drag-and-drop uploader bound to one category.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{info, warn};

use super::upload_queue::{UploadOutcome, UploadQueue};
use crate::client::MediaApi;
use crate::events::{EventBus, PageEvent};
use crate::models::{Category, SelectedFile, UploadTask};
use crate::surface::Surface;
use crate::view::{UploadResultLine, UploadView, View};

/// Pointer events on the drop zone.
#[derive(Debug, Clone)]
pub enum DragEvent {
    Over,
    Enter,
    /// `related_inside` is true when the pointer moved onto a child of the
    /// zone rather than leaving it.
    Leave { related_inside: bool },
    Drop(Vec<SelectedFile>),
}

/// Counts for one `handle_files` batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub total: usize,
    pub uploaded: usize,
    pub failed: usize,
}

impl UploadSummary {
    /// Progress fill reached by the batch.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.uploaded as f64 / self.total as f64 * 100.0
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

pub struct FileUploader {
    category: Category,
    queue: UploadQueue,
    surface: Arc<dyn Surface>,
    bus: EventBus,
    settle_delay: Duration,
    view: Mutex<UploadView>,
}

impl FileUploader {
    /// Create an uploader with its own upload queue and render the empty
    /// drop zone.
    pub fn new(
        category: Category,
        api: Arc<dyn MediaApi>,
        surface: Arc<dyn Surface>,
        bus: EventBus,
        settle_delay: Duration,
    ) -> Self {
        Self::with_queue(category, UploadQueue::spawn(api), surface, bus, settle_delay)
    }

    /// Create an uploader sharing an existing queue.
    pub fn with_queue(
        category: Category,
        queue: UploadQueue,
        surface: Arc<dyn Surface>,
        bus: EventBus,
        settle_delay: Duration,
    ) -> Self {
        let uploader = Self {
            category,
            queue,
            surface,
            bus,
            settle_delay,
            view: Mutex::new(UploadView::new(category)),
        };
        uploader.render();
        uploader
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn view(&self) -> UploadView {
        self.view.lock().clone()
    }

    /// Apply a drag event; a drop forwards its files to `handle_files`.
    pub async fn handle_drag(&self, event: DragEvent) -> Option<UploadSummary> {
        match event {
            DragEvent::Over | DragEvent::Enter => {
                self.set_drag_active(true);
                None
            }
            DragEvent::Leave { related_inside } => {
                if !related_inside {
                    self.set_drag_active(false);
                }
                None
            }
            DragEvent::Drop(files) => {
                self.set_drag_active(false);
                Some(self.handle_files(files).await)
            }
        }
    }

    /// Files picked through the file dialog. Files outside the accept list
    /// are skipped.
    pub async fn browse(&self, files: Vec<SelectedFile>) -> UploadSummary {
        let (accepted, skipped): (Vec<_>, Vec<_>) =
            files.into_iter().partition(|f| self.category.accepts(f));
        for file in &skipped {
            warn!(
                category = %self.category,
                file = %file.name,
                accept = self.category.accept_types(),
                "skipping file outside accept list"
            );
        }
        self.handle_files(accepted).await
    }

    /// Upload `files` one after another, reporting each outcome as it
    /// arrives, then signal completion after the settle delay.
    pub async fn handle_files(&self, files: Vec<SelectedFile>) -> UploadSummary {
        if files.is_empty() {
            return UploadSummary::default();
        }

        let mut summary = UploadSummary {
            total: files.len(),
            ..Default::default()
        };

        self.update(|view| {
            view.progress.visible = true;
            view.results.clear();
        });

        for file in files {
            let name = file.name.clone();
            let task = UploadTask {
                category: self.category,
                file,
            };

            let line = match self.queue.submit(task).await {
                UploadOutcome::Uploaded => {
                    summary.uploaded += 1;
                    UploadResultLine::success(&name)
                }
                UploadOutcome::Rejected { error } => {
                    summary.failed += 1;
                    warn!(category = %self.category, file = %name, ?error, "upload rejected");
                    UploadResultLine::rejected(&name, error.as_deref())
                }
                UploadOutcome::ConnectionError { reason } => {
                    summary.failed += 1;
                    warn!(category = %self.category, file = %name, %reason, "upload failed");
                    UploadResultLine::connection_error(&name)
                }
            };

            let percent = summary.percent();
            self.update(|view| {
                view.progress.percent = percent;
                view.results.push(line);
            });
        }

        info!(
            category = %self.category,
            total = summary.total,
            uploaded = summary.uploaded,
            failed = summary.failed,
            "upload batch finished"
        );

        tokio::time::sleep(self.settle_delay).await;

        self.update(|view| {
            view.progress.visible = false;
            view.progress.percent = 0.0;
        });
        self.bus.emit(PageEvent::FilesUploaded {
            category: self.category,
        });

        summary
    }

    fn set_drag_active(&self, active: bool) {
        let changed = {
            let mut view = self.view.lock();
            let changed = view.drag_active != active;
            view.drag_active = active;
            changed
        };
        if changed {
            self.render();
        }
    }

    fn update(&self, f: impl FnOnce(&mut UploadView)) {
        let view = {
            let mut view = self.view.lock();
            f(&mut view);
            view.clone()
        };
        self.surface.render(&View::Upload(view));
    }

    fn render(&self) {
        let view = self.view.lock().clone();
        self.surface.render(&View::Upload(view));
    }
}
