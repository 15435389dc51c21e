//! NR Space client components.
//!
//! Media gallery loaders, a filterable document browser and a sequential
//! drag-and-drop uploader for the NR Space file-sharing server, plus the
//! page bootstrap that wires them together through an [`events::EventBus`].

pub mod client;
pub mod components;
pub mod config;
pub mod events;
pub mod models;
pub mod page;
pub mod surface;
pub mod view;

#[cfg(test)]
mod testing;

pub use client::{ApiClient, ApiError, MediaApi};
pub use config::{Config, Settings};
pub use events::{EventBus, PageEvent};
pub use models::{Category, DocumentRecord, FilterState, MediaKind, SelectedFile};
pub use page::{Page, PageDeps};
