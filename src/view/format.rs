//! Value formatting for document cards and markup.

use chrono::{DateTime, NaiveDate};

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Human-readable size with binary (1024-based) prefixes.
///
/// Values below 1 KB are printed as whole bytes; larger values get one
/// decimal place. GB is the largest unit.
pub fn format_file_size(bytes: u64) -> String {
    let mut unit = 0;
    let mut threshold: u64 = 1024;
    while unit < SIZE_UNITS.len() - 1 && bytes >= threshold {
        unit += 1;
        threshold = threshold.saturating_mul(1024);
    }

    if unit == 0 {
        return format!("{} B", bytes);
    }
    let value = bytes as f64 / 1024f64.powi(unit as i32);
    format!("{:.1} {}", value, SIZE_UNITS[unit])
}

/// Format an ISO date (`2024-01-15`) or RFC 3339 timestamp as `15 Jan 2024`.
/// Anything else is returned unchanged.
pub fn format_date(date: &str) -> String {
    let trimmed = date.trim();
    let parsed = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(trimmed).ok().map(|dt| dt.date_naive()));

    match parsed {
        Some(d) => d.format("%-d %b %Y").to_string(),
        None => trimmed.to_string(),
    }
}

/// Cut `text` to `max_chars` characters, appending `...` when shortened.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Short tag shown next to a document.
pub fn type_icon(doc_type: &str) -> &'static str {
    match doc_type.to_ascii_lowercase().as_str() {
        "pdf" => "[pdf]",
        "doc" | "docx" => "[doc]",
        "txt" => "[txt]",
        "svg" => "[svg]",
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" => "[img]",
        _ => "[---]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(500), "500 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1_048_576), "1.0 MB");
        assert_eq!(format_file_size(2_457_600), "2.3 MB");
        assert_eq!(format_file_size(1_073_741_824), "1.0 GB");
        // GB is the largest unit
        assert_eq!(format_file_size(2 * 1024 * 1_073_741_824), "2048.0 GB");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-15"), "15 Jan 2024");
        assert_eq!(format_date("2024-03-05T10:30:00Z"), "5 Mar 2024");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 30), "short");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        // Multi-byte characters count as one
        assert_eq!(truncate_text("àèìòù", 2), "àè...");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom's & co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom&#39;s &amp; co&lt;/a&gt;"
        );
    }

    #[test]
    fn test_type_icon() {
        assert_eq!(type_icon("PDF"), "[pdf]");
        assert_eq!(type_icon("docx"), "[doc]");
        assert_eq!(type_icon("zip"), "[---]");
    }
}
