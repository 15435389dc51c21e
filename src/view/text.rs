//! Plain-text rendering of the component views for the terminal.

use console::style;

use super::{
    DocumentsBody, DocumentsView, MediaListView, ResultKind, UploadResultLine, UploadView, View,
    MSG_DOCUMENTS_ERROR, MSG_DOCUMENTS_LOADING, MSG_NO_DOCUMENTS, MSG_NO_MATCHES,
};
use crate::models::MediaKind;

pub fn render(view: &View) -> String {
    match view {
        View::Media(v) => media_list(v),
        View::Documents(v) => documents(v),
        View::Upload(v) => upload_section(v),
    }
}

pub fn media_list(view: &MediaListView) -> String {
    match view {
        MediaListView::Items { kind, items } => {
            let mut out = String::new();
            for item in items {
                let tag = match kind {
                    MediaKind::Audio => "[audio]",
                    MediaKind::Video => "[video]",
                    MediaKind::Gallery if item.is_video() => "[video]",
                    MediaKind::Gallery => "[image]",
                };
                out.push_str(&format!(
                    "{} {}  {}\n",
                    style(tag).dim(),
                    style(&item.title).bold(),
                    style(&item.url).dim()
                ));
            }
            out
        }
        MediaListView::Empty { .. } => format!("{}\n", view.message().unwrap_or_default()),
        MediaListView::Error { .. } => {
            format!("{}\n", style(view.message().unwrap_or_default()).red())
        }
    }
}

pub fn documents(view: &DocumentsView) -> String {
    let mut out = String::new();
    if !view.filter.search_term.is_empty() || view.filter.type_filter != "all" {
        out.push_str(&format!(
            "{}\n",
            style(format!(
                "filter: \"{}\" type: {}",
                view.filter.search_term, view.filter.type_filter
            ))
            .dim()
        ));
    }

    match &view.body {
        DocumentsBody::Loading => out.push_str(&format!("{}\n", MSG_DOCUMENTS_LOADING)),
        DocumentsBody::Cards(cards) => {
            for card in cards {
                out.push_str(&format!(
                    "{} {:<33} {:>5} {:>9}  {}\n",
                    card.icon,
                    style(&card.title).bold(),
                    card.type_badge,
                    card.size,
                    style(&card.date).dim()
                ));
                if !card.description.is_empty() {
                    out.push_str(&format!("      {}\n", card.description));
                }
            }
        }
        DocumentsBody::Empty { filtered } => {
            out.push_str(if *filtered { MSG_NO_MATCHES } else { MSG_NO_DOCUMENTS });
            out.push('\n');
        }
        DocumentsBody::Error { message } => {
            out.push_str(&format!(
                "{}: {}\n",
                style(MSG_DOCUMENTS_ERROR).red().bold(),
                message
            ));
        }
    }
    out
}

pub fn upload_section(view: &UploadView) -> String {
    let mut out = String::new();
    if view.progress.visible {
        out.push_str(&format!(
            "{} {}\n",
            style(view.category.as_str()).bold(),
            view.progress.label()
        ));
    }
    for line in &view.results {
        out.push_str(&result_line(line));
        out.push('\n');
    }
    out
}

pub fn result_line(line: &UploadResultLine) -> String {
    match line.kind {
        ResultKind::Success => format!("{} {}", style("✓").green(), line.message),
        ResultKind::Error => format!("{} {}", style("✗").red(), line.message),
    }
}
