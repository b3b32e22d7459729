//! # Domain Model: PDF Records
//!
//! A [`PdfRecord`] is the single persisted entity of scanmate: one generated PDF
//! document plus the metadata needed to list it without touching the file.
//!
//! ## Persisted Shape
//!
//! Records are stored as a JSON array under the `pdfs` key, newest first:
//!
//! ```text
//! [{"id":"1736...k3f","name":"Scan_1736....pdf","date":"2025-01-14",
//!   "uri":"/data/documents/Scan_1736....pdf","thumbUri":"/data/documents/ScanThumb_....jpg"}]
//! ```
//!
//! `uri` and `thumbUri` are optional. A missing `uri` is a legitimate state
//! (the record was written before its file), and `thumbUri` has a lifetime
//! independent of the PDF itself.
//!
//! ## Identity
//!
//! Ids are generated once by [`new_record_id`] and never change. They combine
//! the creation timestamp in milliseconds with a random suffix, so two records
//! produced in the same millisecond still differ.
//!
//! ## Names
//!
//! The stored `name` is a file name (`Report.pdf`). The list views show it
//! through [`display_name`], which hides the extension and tidies casing.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ID_SUFFIX_LEN: usize = 11;
const UNTITLED: &str = "Untitled Document";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfRecord {
    pub id: String,
    pub name: String,
    /// Creation day, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(
        default,
        rename = "thumbUri",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumb_uri: Option<String>,
}

impl PdfRecord {
    /// Creates a record dated today with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            name: name.into(),
            date: today(),
            uri: None,
            thumb_uri: None,
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_thumb_uri(mut self, thumb_uri: Option<String>) -> Self {
        self.thumb_uri = thumb_uri;
        self
    }

    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }
}

/// Millisecond timestamp followed by a random lowercase alphanumeric suffix.
pub fn new_record_id() -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(ID_SUFFIX_LEN)
        .collect();
    format!("{}{}", Utc::now().timestamp_millis(), suffix)
}

/// Local calendar date in `YYYY-MM-DD` form.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Presentation form of a stored PDF name.
///
/// Strips the `.pdf` extension, falls back to `"Untitled Document"` when
/// nothing readable remains, and capitalizes each space-separated word.
pub fn display_name(name: &str) -> String {
    let stem = strip_pdf_suffix(name).trim();

    let readable = stem
        .chars()
        .any(|c| c.is_alphanumeric() || c == '_' || c.is_whitespace());
    if stem.is_empty() || !readable {
        return UNTITLED.to_string();
    }

    stem.split(' ')
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes one trailing `.pdf` extension, case-insensitively.
pub fn strip_pdf_suffix(name: &str) -> &str {
    let len = name.len();
    if len >= 4
        && name.is_char_boundary(len - 4)
        && name[len - 4..].eq_ignore_ascii_case(".pdf")
    {
        &name[..len - 4]
    } else {
        name
    }
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Human readable file size for detail views.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let value = bytes as f64;
    if value >= MB {
        format!("{:.1} MB", value / MB)
    } else if value >= KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_camel_case_thumb() {
        let record = PdfRecord {
            id: "1".into(),
            name: "Scan_1.pdf".into(),
            date: "2025-01-01".into(),
            uri: Some("/a/1.pdf".into()),
            thumb_uri: Some("/a/1.jpg".into()),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"id":"1","name":"Scan_1.pdf","date":"2025-01-01","uri":"/a/1.pdf","thumbUri":"/a/1.jpg"}"#
        );
    }

    #[test]
    fn test_record_omits_missing_optionals() {
        let record = PdfRecord {
            id: "1".into(),
            name: "x.pdf".into(),
            date: "2025-01-01".into(),
            uri: None,
            thumb_uri: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":"1","name":"x.pdf","date":"2025-01-01"}"#);

        let back: PdfRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_new_record_ids_differ() {
        let a = new_record_id();
        let b = new_record_id();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(a.chars().take(13).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_today_shape() {
        let day = today();
        assert_eq!(day.len(), 10);
        assert_eq!(&day[4..5], "-");
        assert_eq!(&day[7..8], "-");
    }

    #[test]
    fn test_display_name_strips_extension_and_capitalizes() {
        assert_eq!(display_name("monthly report.pdf"), "Monthly Report");
        assert_eq!(display_name("SCAN_123.PDF"), "Scan_123");
    }

    #[test]
    fn test_display_name_untitled_fallbacks() {
        assert_eq!(display_name(".pdf"), UNTITLED);
        assert_eq!(display_name("   "), UNTITLED);
        assert_eq!(display_name("!!!.pdf"), UNTITLED);
    }

    #[test]
    fn test_strip_pdf_suffix() {
        assert_eq!(strip_pdf_suffix("a.pdf"), "a");
        assert_eq!(strip_pdf_suffix("a.PdF"), "a");
        assert_eq!(strip_pdf_suffix("a.txt"), "a.txt");
        assert_eq!(strip_pdf_suffix("pdf"), "pdf");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
