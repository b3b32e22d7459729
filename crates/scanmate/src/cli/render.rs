//! Output rendering for the scanmate CLI.
//!
//! Turns a [`CmdResult`] into what the user sees. Sections are written in a
//! fixed order: the list table, detail blocks, bare paths, then messages.
//! Paths are printed unstyled, one per line, so `scanmate share 1 | xargs ...`
//! works.
//!
//! ## List Layout
//!
//! ```text
//!   1. Tax Return                                               2025-03-14
//!   2. Scan_1741950000000                                       2025-03-13
//! ```
//!
//! The title column takes whatever [`LINE_WIDTH`] leaves after the index and
//! date columns. Titles are measured in display columns, not bytes, so wide
//! characters truncate correctly.

use crate::cli::styles::Palette;
use scanmateapp::commands::{CmdResult, DisplayRecord, RecordDetails};
use scanmateapp::error::ScanmateError;
use scanmateapp::model::format_size;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 80;
pub const COL_INDEX: usize = 5; // "  1. "
pub const COL_DATE: usize = 11; // " 2025-03-14"

const ELLIPSIS: char = '…';

pub struct Renderer {
    palette: Palette,
    json: bool,
}

impl Renderer {
    pub fn new(palette: Palette, json: bool) -> Self {
        Self { palette, json }
    }

    pub fn render(&self, result: &CmdResult) -> anyhow::Result<String> {
        if self.json {
            let mut out = serde_json::to_string_pretty(result)?;
            out.push('\n');
            return Ok(out);
        }

        let mut out = String::new();
        for display in &result.listed_records {
            out.push_str(&self.list_line(display));
            out.push('\n');
        }
        for (i, details) in result.details.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&self.details_block(details));
        }
        for path in &result.paths {
            out.push_str(&path.display().to_string());
            out.push('\n');
        }
        for message in &result.messages {
            out.push_str(
                &self
                    .palette
                    .message(message.level)
                    .apply_to(&message.content)
                    .to_string(),
            );
            out.push('\n');
        }
        Ok(out)
    }

    fn list_line(&self, display: &DisplayRecord) -> String {
        let title_width = LINE_WIDTH.saturating_sub(COL_INDEX + COL_DATE);
        let title = pad_to_width(
            &truncate_to_width(&display.record.display_name(), title_width),
            title_width,
        );
        format!(
            "{} {} {}",
            self.palette
                .list_index
                .apply_to(format!("{:>3}.", display.index)),
            self.palette.list_title.apply_to(title),
            self.palette.muted.apply_to(&display.record.date),
        )
    }

    fn details_block(&self, details: &RecordDetails) -> String {
        let size = match details.size {
            Some(bytes) => format_size(bytes),
            None => "file missing".to_string(),
        };
        let size_style = if details.missing {
            &self.palette.warning
        } else {
            &self.palette.regular
        };

        let mut rows = vec![
            ("Name", self.palette.regular.apply_to(details.display_name.clone())),
            ("File", self.palette.muted.apply_to(details.record.name.clone())),
            ("Date", self.palette.regular.apply_to(details.record.date.clone())),
            ("Size", size_style.apply_to(size)),
            ("Id", self.palette.muted.apply_to(details.record.id.clone())),
        ];
        if let Some(uri) = &details.record.uri {
            rows.push(("Location", self.palette.muted.apply_to(uri.clone())));
        }

        let mut out = format!(
            "{}\n",
            self.palette
                .list_index
                .apply_to(format!("{}.", details.index))
        );
        for (label, value) in rows {
            out.push_str(&format!(
                "  {} {}\n",
                self.palette.label.apply_to(format!("{:<9}", format!("{}:", label))),
                value
            ));
        }
        out
    }
}

/// Cuts `text` to at most `max_width` display columns, ending in `…` when cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - ELLIPSIS.width().unwrap_or(1);
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    out
}

fn pad_to_width(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

/// The one-line error shown on failure. Remote failures show the provider's
/// own response when there was one.
pub fn error_text(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ScanmateError>() {
        Some(ScanmateError::Remote(remote)) => remote.user_message(),
        _ => format!("{:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanmateapp::commands::CmdMessage;
    use scanmateapp::compress::{RemoteError, RemoteStage};
    use scanmateapp::model::PdfRecord;
    use std::path::PathBuf;

    fn record(name: &str) -> PdfRecord {
        PdfRecord {
            id: "1741950000000abcdefghijk".to_string(),
            name: name.to_string(),
            date: "2025-03-14".to_string(),
            uri: Some("file:///data/documents/tax_return.pdf".to_string()),
            thumb_uri: None,
        }
    }

    fn renderer() -> Renderer {
        Renderer::new(Palette::plain(), false)
    }

    #[test]
    fn test_list_line_layout() {
        let result = CmdResult::default().with_listed_records(vec![DisplayRecord {
            index: 1,
            record: record("tax return.pdf"),
        }]);
        let out = renderer().render(&result).unwrap();
        let line = out.lines().next().unwrap();
        assert!(line.starts_with("  1. Tax Return "));
        assert!(line.ends_with(" 2025-03-14"));
        assert_eq!(line.width(), LINE_WIDTH);
    }

    #[test]
    fn test_long_titles_truncate() {
        let long = "word ".repeat(40);
        let result = CmdResult::default().with_listed_records(vec![DisplayRecord {
            index: 12,
            record: record(&long),
        }]);
        let out = renderer().render(&result).unwrap();
        let line = out.lines().next().unwrap();
        assert!(line.contains('…'));
        assert_eq!(line.width(), LINE_WIDTH);
    }

    #[test]
    fn test_truncate_counts_display_columns() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdef", 4), "abc…");
        assert_eq!(truncate_to_width("日本語文書", 5), "日本…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_details_block() {
        let mut result = CmdResult::default();
        result.details.push(RecordDetails {
            index: 2,
            record: record("tax_return.pdf"),
            display_name: "Tax_return".to_string(),
            size: None,
            missing: true,
        });
        let out = renderer().render(&result).unwrap();
        assert!(out.starts_with("2.\n"));
        assert!(out.contains("Name:     Tax_return"));
        assert!(out.contains("Size:     file missing"));
        assert!(out.contains("Location: file:///data/documents/tax_return.pdf"));
    }

    #[test]
    fn test_paths_then_messages() {
        let mut result = CmdResult::default();
        result.paths.push(PathBuf::from("/tmp/a.pdf"));
        result.add_message(CmdMessage::warning("File missing (2): b.pdf"));
        let out = renderer().render(&result).unwrap();
        assert_eq!(out, "/tmp/a.pdf\nFile missing (2): b.pdf\n");
    }

    #[test]
    fn test_json_output() {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success("Theme set to dark"));
        let out = Renderer::new(Palette::plain(), true).render(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["messages"][0]["level"], "success");
        assert_eq!(value["messages"][0]["content"], "Theme set to dark");
    }

    #[test]
    fn test_remote_errors_show_provider_payload() {
        let err = anyhow::Error::new(ScanmateError::Remote(
            RemoteError::new(RemoteStage::Compress, "HTTP 402").with_payload("Not enough credits"),
        ));
        assert_eq!(
            error_text(&err),
            "Compression compress failed: Not enough credits"
        );

        let err = anyhow::Error::new(ScanmateError::RecordNotFound("9".to_string()));
        assert_eq!(error_text(&err), "PDF not found: 9");
    }
}
