//! # PDF Registry
//!
//! The registry is the single source of truth for "what documents exist". It
//! keeps an ordered list of [`PdfRecord`]s (newest first) in memory and mirrors
//! it to the `pdfs` key of the persisted store.
//!
//! ## Invariants
//!
//! - **Unique ids**: no two records share an `id`. [`PdfRegistry::insert`] is
//!   idempotent; a replayed insert is dropped silently.
//! - **Recency order**: a new record always lands at index 0; the relative order
//!   of existing records never changes.
//! - **Whole-list writes**: every mutation re-serializes the full list.
//!
//! ## Failure Policy
//!
//! - **Reads fail soft**: a missing key is an empty registry; an unreadable or
//!   corrupt value is *also* treated as empty, with a warning logged. A corrupt
//!   cache must never brick the list.
//! - **Writes fail loud**: a failed save is logged and returned. The in-memory
//!   list may then be ahead of the store until the next successful save.
//! - **Files are best-effort**: removing a record persists the removal first,
//!   then deletes its PDF and thumbnail. A file that cannot be deleted is
//!   reported, never used to undo the removal.
//!
//! ## Reconciliation
//!
//! The registry is not the only writer. Producers may persist new records while
//! the viewer is inactive, so [`PdfRegistry::reconcile`] replaces the in-memory
//! list with the persisted one wholesale. Viewers call it whenever they regain
//! focus.
//!
//! External deletion of a PDF is tolerated: [`PdfRegistry::missing_files`]
//! surfaces such records, but nothing corrects them automatically.

use crate::error::Result;
use crate::files;
use crate::model::PdfRecord;
use crate::naming::normalize_pdf_name;
use crate::store::backend::StorageBackend;
use crate::store::PDFS_KEY;
use std::path::PathBuf;
use tracing::{debug, error, warn};

pub mod queue;

/// Producer-facing contract: persist a freshly created record.
///
/// Implemented by both [`PdfRegistry`] and [`queue::RegistryHandle`], so
/// producers do not care whether writes are serialized through a queue.
pub trait RecordSink {
    fn register(&mut self, record: PdfRecord) -> Result<Vec<PdfRecord>>;
}

/// Backing files that could not be deleted after a removal.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub failed: Vec<PathBuf>,
}

impl FileReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of [`PdfRegistry::remove_with_report`].
#[derive(Debug, Clone, Default)]
pub struct Removal {
    pub records: Vec<PdfRecord>,
    pub removed: Option<PdfRecord>,
    pub files: FileReport,
}

/// Outcome of [`PdfRegistry::clear_all`].
#[derive(Debug, Clone, Default)]
pub struct ClearReport {
    pub removed: usize,
    pub files: FileReport,
}

pub struct PdfRegistry<B: StorageBackend> {
    backend: B,
    records: Vec<PdfRecord>,
}

impl<B: StorageBackend> PdfRegistry<B> {
    /// Creates a registry and performs the initial load.
    pub fn open(backend: B) -> Self {
        let mut registry = Self {
            backend,
            records: Vec::new(),
        };
        registry.reconcile();
        registry
    }

    pub fn records(&self) -> &[PdfRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&PdfRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads the persisted list, failing soft.
    pub fn load(&self) -> Vec<PdfRecord> {
        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "could not read PDF registry, treating as empty");
                Vec::new()
            }
        }
    }

    /// Reads the persisted list, surfacing read and parse errors.
    pub fn try_load(&self) -> Result<Vec<PdfRecord>> {
        match self.backend.get_item(PDFS_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => Ok(serde_json::from_str(&raw)?),
        }
    }

    /// Overwrites the persisted list with `records`.
    pub fn save(&self, records: &[PdfRecord]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.backend.set_item(PDFS_KEY, &raw).inspect_err(|e| {
            error!(error = %e, count = records.len(), "failed to save PDF registry");
        })?;
        debug!(count = records.len(), "saved PDF registry");
        Ok(())
    }

    /// Prepends `record` unless its id is already present. Does not persist.
    pub fn insert(&mut self, record: PdfRecord) -> Vec<PdfRecord> {
        if self.records.iter().any(|r| r.id == record.id) {
            debug!(id = %record.id, "record already registered, ignoring insert");
        } else {
            self.records.insert(0, record);
        }
        self.records.clone()
    }

    /// Renames a record after validating `new_name`, then persists.
    ///
    /// An unknown id leaves the list untouched and is not an error.
    pub fn rename(&mut self, id: &str, new_name: &str) -> Result<Vec<PdfRecord>> {
        let name = normalize_pdf_name(new_name)?;

        let mut updated = self.records.clone();
        match updated.iter_mut().find(|r| r.id == id) {
            Some(record) => record.name = name,
            None => return Ok(self.records.clone()),
        }

        self.save(&updated)?;
        self.records = updated;
        Ok(self.records.clone())
    }

    /// Removes a record, persists, then deletes its files best-effort.
    pub fn remove(&mut self, id: &str) -> Result<Vec<PdfRecord>> {
        self.remove_with_report(id).map(|removal| removal.records)
    }

    pub fn remove_with_report(&mut self, id: &str) -> Result<Removal> {
        let Some(position) = self.records.iter().position(|r| r.id == id) else {
            return Ok(Removal {
                records: self.records.clone(),
                ..Default::default()
            });
        };

        let mut updated = self.records.clone();
        let removed = updated.remove(position);

        // Committed in memory even if the save fails: the user asked for it gone.
        self.records = updated;
        self.save(&self.records)?;

        let files = discard_files(std::slice::from_ref(&removed));
        Ok(Removal {
            records: self.records.clone(),
            removed: Some(removed),
            files,
        })
    }

    /// Replaces the in-memory list with the persisted one.
    pub fn reconcile(&mut self) -> &[PdfRecord] {
        self.records = self.load();
        &self.records
    }

    /// Deletes every record's files and drops the persisted list.
    pub fn clear_all(&mut self) -> Result<ClearReport> {
        let doomed = self.load();
        let files = discard_files(&doomed);

        self.backend.remove_item(PDFS_KEY).inspect_err(|e| {
            error!(error = %e, "failed to clear PDF registry");
        })?;
        self.records.clear();

        Ok(ClearReport {
            removed: doomed.len(),
            files,
        })
    }

    /// Records whose `uri` does not point at an existing file.
    pub fn missing_files(&self) -> Vec<PdfRecord> {
        self.records
            .iter()
            .filter(|r| r.uri.as_deref().is_some_and(|uri| !files::exists(uri)))
            .cloned()
            .collect()
    }
}

impl<B: StorageBackend> RecordSink for PdfRegistry<B> {
    /// Absorbs writes made elsewhere, inserts, and persists.
    ///
    /// The in-memory list only takes the new record once the save succeeded.
    fn register(&mut self, record: PdfRecord) -> Result<Vec<PdfRecord>> {
        self.reconcile();
        let mut updated = self.records.clone();
        if updated.iter().any(|r| r.id == record.id) {
            debug!(id = %record.id, "record already registered, ignoring insert");
        } else {
            updated.insert(0, record);
        }
        self.save(&updated)?;
        self.records = updated;
        Ok(self.records.clone())
    }
}

fn discard_files(records: &[PdfRecord]) -> FileReport {
    let mut report = FileReport::default();
    let uris = records
        .iter()
        .flat_map(|r| [r.uri.as_deref(), r.thumb_uri.as_deref()])
        .flatten();

    for uri in uris {
        if let Err(e) = files::delete_best_effort(uri) {
            warn!(error = %e, uri, "could not delete document file");
            report.failed.push(files::local_path(uri));
        }
    }
    report
}
