//! # Command Layer
//!
//! This module contains the **core business logic** behind every user-facing
//! operation. Each command lives in its own submodule and works on a
//! [`RegistryHandle`](crate::registry::queue::RegistryHandle) (or a preference service), never on terminal I/O.
//!
//! ## Structured Returns
//!
//! Commands return [`CmdResult`], not strings. It carries:
//! - `listed_records`: records to display, each with its 1-based index
//! - `affected_records`: records created, renamed or removed
//! - `details`: size and file state for the `details` view
//! - `paths`: files produced or resolved (save, share)
//! - `messages`: leveled messages (info, success, warning, error)
//!
//! A command returns `Err` only when it could not do anything meaningful. Per-item
//! problems in a multi-item command (one save failing out of three) are reported
//! as messages and the remaining items still run.
//!
//! ## Selectors
//!
//! Records are addressed either by their 1-based position in the current list
//! (newest first) or by id. See [`helpers::resolve_selectors`].
//!
//! ## Command Modules
//!
//! - [`list`]: reconcile and list records
//! - [`details`]: size and missing-file state
//! - [`rename`]: validated rename
//! - [`delete`]: remove records and their files
//! - [`export`]: save copies into the downloads directory
//! - [`share`]: resolve local file paths for sharing
//! - [`compress`]: remote compression into a new record
//! - [`scan`]: build a PDF from images
//! - [`clear`]: remove every record and file
//! - [`doctor`]: report records whose file has gone
//! - [`settings`]: theme, scan quality and onboarding

use crate::model::PdfRecord;
use serde::Serialize;
use std::path::PathBuf;

pub mod clear;
pub mod compress;
pub mod delete;
pub mod details;
pub mod doctor;
pub mod export;
pub mod helpers;
pub mod list;
pub mod rename;
pub mod scan;
pub mod settings;
pub mod share;

/// Directories the commands read from and write to.
#[derive(Debug, Clone)]
pub struct ScanmatePaths {
    pub data_dir: PathBuf,
    pub documents_dir: PathBuf,
    pub downloads_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A record paired with its 1-based position in the list it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRecord {
    pub index: usize,
    pub record: PdfRecord,
}

/// Pairs records with their positions; index 1 is the newest.
pub fn index_records(records: Vec<PdfRecord>) -> Vec<DisplayRecord> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| DisplayRecord {
            index: i + 1,
            record,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordDetails {
    pub index: usize,
    pub record: PdfRecord,
    pub display_name: String,
    pub size: Option<u64>,
    pub missing: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    pub affected_records: Vec<DisplayRecord>,
    pub listed_records: Vec<DisplayRecord>,
    pub details: Vec<RecordDetails>,
    pub paths: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed_records(mut self, records: Vec<DisplayRecord>) -> Self {
        self.listed_records = records;
        self
    }

    pub fn with_affected_records(mut self, records: Vec<DisplayRecord>) -> Self {
        self.affected_records = records;
        self
    }

    /// True if any message is an error.
    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_records_is_one_based() {
        let records = vec![PdfRecord::new("b.pdf"), PdfRecord::new("a.pdf")];
        let indexed = index_records(records);
        assert_eq!(indexed[0].index, 1);
        assert_eq!(indexed[0].record.name, "b.pdf");
        assert_eq!(indexed[1].index, 2);
    }

    #[test]
    fn test_has_errors() {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::warning("careful"));
        assert!(!result.has_errors());
        result.add_message(CmdMessage::error("broken"));
        assert!(result.has_errors());
    }
}
