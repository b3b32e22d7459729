//! Document file helpers.
//!
//! Records reference their files by URI. Producers have historically written
//! both bare absolute paths and `file://` URIs, so every helper here accepts
//! either form via [`local_path`].
//!
//! None of these helpers touch the registry. Callers decide whether a failure
//! is fatal (producers writing a new PDF) or best-effort (deleting files of a
//! removed record).

use crate::error::{Result, ScanmateError};
use chrono::Utc;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const FILE_SCHEME: &str = "file://";

/// Converts a stored URI into a filesystem path.
pub fn local_path(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix(FILE_SCHEME).unwrap_or(uri))
}

pub fn exists(uri: &str) -> bool {
    local_path(uri).is_file()
}

/// Size in bytes, or `None` if the file is missing or unreadable.
pub fn file_size(uri: &str) -> Option<u64> {
    fs::metadata(local_path(uri))
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.len())
}

/// Deletes the file behind `uri`. A file that is already gone counts as deleted.
pub fn delete_best_effort(uri: &str) -> Result<()> {
    let path = local_path(uri);
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ScanmateError::file(path, e)),
    }
}

/// Copies the file behind `uri` into `dir` as `name`, returning the new path.
pub fn copy_to_dir(uri: &str, dir: &Path, name: &str) -> Result<PathBuf> {
    let source = local_path(uri);
    fs::create_dir_all(dir).map_err(|e| ScanmateError::file(dir, e))?;
    let dest = dir.join(name);
    fs::copy(&source, &dest).map_err(|e| ScanmateError::file(&source, e))?;
    Ok(dest)
}

/// Writes `bytes` to `path` through a temp file that is flushed and synced
/// before the rename, so a reader never sees a partial document.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| ScanmateError::Store(format!("No parent for {}", path.display())))?;
    fs::create_dir_all(dir).map_err(|e| ScanmateError::file(dir, e))?;

    let tmp_path = dir.join(format!(".write-{}.tmp", Uuid::new_v4()));
    let written = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.flush()?;
        file.sync_all()
    })();
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(ScanmateError::file(&tmp_path, e));
    }

    fs::rename(&tmp_path, path).map_err(|e| ScanmateError::file(path, e))?;
    Ok(())
}

/// Directory where producers place new PDFs and thumbnails.
#[derive(Debug, Clone)]
pub struct DocumentsDir {
    root: PathBuf,
}

impl DocumentsDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A path that does not exist yet: `<root>/<prefix>_<millis>.<ext>`.
    pub fn fresh_path(&self, prefix: &str, ext: &str) -> PathBuf {
        let stamp = Utc::now().timestamp_millis();
        let candidate = self.root.join(format!("{}_{}.{}", prefix, stamp, ext));
        if !candidate.exists() {
            return candidate;
        }
        (1..)
            .map(|n| self.root.join(format!("{}_{}_{}.{}", prefix, stamp, n, ext)))
            .find(|p| !p.exists())
            .unwrap_or(candidate)
    }
}

/// File name component of a path, lossily converted.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
