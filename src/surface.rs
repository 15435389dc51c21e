//! Render targets for the components.
//!
//! A surface is the container one component owns. Components push whole
//! views (never diffs), user notices and download requests into it.

use parking_lot::Mutex;

use crate::view::{self, View};

/// A download the component asked the surface to start (the transient
/// anchor of a browser page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub url: String,
    pub filename: String,
}

/// Container a component renders into.
pub trait Surface: Send + Sync {
    /// Replace the displayed content with `view`.
    fn render(&self, view: &View);

    /// Show a user-facing notice (an alert box in a browser).
    fn notice(&self, message: &str);

    /// Start a download of `link`.
    fn download(&self, link: &DownloadLink);
}

#[derive(Debug, Default)]
struct HtmlState {
    markup: String,
    last_view: Option<View>,
    renders: usize,
    notices: Vec<String>,
    downloads: Vec<DownloadLink>,
}

/// In-memory surface holding the current HTML markup.
#[derive(Debug, Default)]
pub struct HtmlSurface {
    state: Mutex<HtmlState>,
}

impl HtmlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current markup.
    pub fn html(&self) -> String {
        self.state.lock().markup.clone()
    }

    /// Last view rendered, if any.
    pub fn view(&self) -> Option<View> {
        self.state.lock().last_view.clone()
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        self.state.lock().renders
    }

    pub fn notices(&self) -> Vec<String> {
        self.state.lock().notices.clone()
    }

    pub fn downloads(&self) -> Vec<DownloadLink> {
        self.state.lock().downloads.clone()
    }
}

impl Surface for HtmlSurface {
    fn render(&self, view: &View) {
        let markup = view::html::render(view);
        let mut state = self.state.lock();
        state.markup = markup;
        state.last_view = Some(view.clone());
        state.renders += 1;
    }

    fn notice(&self, message: &str) {
        self.state.lock().notices.push(message.to_string());
    }

    fn download(&self, link: &DownloadLink) {
        self.state.lock().downloads.push(link.clone());
    }
}

/// Surface printing views to the terminal.
///
/// Upload views and the document loading placeholder are skipped; the CLI
/// shows uploads on a progress bar instead.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    term: Option<console::Term>,
}

impl ConsoleSurface {
    pub fn stdout() -> Self {
        Self {
            term: Some(console::Term::stdout()),
        }
    }

    fn write(&self, text: &str) {
        if let Some(ref term) = self.term {
            let _ = term.write_str(text);
        }
    }
}

impl Surface for ConsoleSurface {
    fn render(&self, view: &View) {
        match view {
            View::Upload(_) => {}
            View::Documents(v) if v.body == crate::view::DocumentsBody::Loading => {}
            _ => self.write(&view::text::render(view)),
        }
    }

    fn notice(&self, message: &str) {
        self.write(&format!("{}\n", console::style(message).yellow()));
    }

    fn download(&self, link: &DownloadLink) {
        self.write(&format!("downloading {} ...\n", link.filename));
    }
}
