//! Page-wide event bus.
//!
//! Uploaders emit on the bus they were constructed with; loaders subscribe
//! and filter on category.

use tokio::sync::broadcast;
use tracing::debug;

use crate::models::Category;

/// Capacity of the broadcast channel. Receivers that fall further behind
/// skip to the newest events.
const BUS_CAPACITY: usize = 64;

/// Events broadcast between components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// An upload batch for `category` finished.
    FilesUploaded { category: Category },
}

impl PageEvent {
    pub fn category(&self) -> Category {
        match self {
            PageEvent::FilesUploaded { category } => *category,
        }
    }
}

/// Cloneable handle to the broadcast channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PageEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BUS_CAPACITY);
        Self { sender }
    }

    /// Broadcast an event. Returns how many subscribers received it.
    pub fn emit(&self, event: PageEvent) -> usize {
        match self.sender.send(event) {
            Ok(n) => n,
            Err(broadcast::error::SendError(event)) => {
                debug!(?event, "no subscribers for event");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
