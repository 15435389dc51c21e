//! Single-worker upload queue.
//!
//! All uploads go through one worker task fed by a channel of capacity 1,
//! so at most one POST is in flight per queue regardless of how many
//! callers submit.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::MediaApi;
use crate::models::UploadTask;

/// How one upload ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded,
    /// Server answered `success: false`.
    Rejected { error: Option<String> },
    /// Transport failure or unreadable response.
    ConnectionError { reason: String },
}

struct QueuedUpload {
    task: UploadTask,
    reply: oneshot::Sender<UploadOutcome>,
}

/// Handle to the upload worker. Dropping every handle stops the worker
/// once its current upload finishes.
#[derive(Clone)]
pub struct UploadQueue {
    sender: mpsc::Sender<QueuedUpload>,
    worker: Arc<JoinHandle<()>>,
}

impl UploadQueue {
    /// Spawn the worker on the current tokio runtime.
    pub fn spawn(api: Arc<dyn MediaApi>) -> Self {
        let (sender, mut receiver) = mpsc::channel::<QueuedUpload>(1);

        let worker = tokio::spawn(async move {
            while let Some(queued) = receiver.recv().await {
                let outcome = perform(api.as_ref(), &queued.task).await;
                if queued.reply.send(outcome).is_err() {
                    debug!(file = %queued.task.file.name, "upload submitter went away");
                }
            }
            debug!("upload queue closed");
        });

        Self {
            sender,
            worker: Arc::new(worker),
        }
    }

    /// Queue one upload and wait for its outcome.
    pub async fn submit(&self, task: UploadTask) -> UploadOutcome {
        let (reply, response) = oneshot::channel();
        let name = task.file.name.clone();

        if self.sender.send(QueuedUpload { task, reply }).await.is_err() {
            warn!(file = %name, "upload queue is closed");
            return UploadOutcome::ConnectionError {
                reason: "upload queue closed".to_string(),
            };
        }

        response.await.unwrap_or_else(|_| UploadOutcome::ConnectionError {
            reason: "upload worker stopped".to_string(),
        })
    }

    pub fn is_running(&self) -> bool {
        !self.worker.is_finished()
    }
}

async fn perform(api: &dyn MediaApi, task: &UploadTask) -> UploadOutcome {
    match api.upload(task).await {
        Ok(response) if response.success => UploadOutcome::Uploaded,
        Ok(response) => UploadOutcome::Rejected {
            error: response.error,
        },
        Err(e) => UploadOutcome::ConnectionError {
            reason: e.to_string(),
        },
    }
}
