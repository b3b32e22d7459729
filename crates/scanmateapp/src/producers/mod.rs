//! # Producers
//!
//! Producers are the flows that create new PDF files and register them:
//!
//! - [`capture::CaptureProducer`]: camera scans and image imports
//! - [`compression::CompressionProducer`]: remote compression of an existing PDF
//!
//! Both honor the same contract toward the registry (see [`RecordSink`]):
//!
//! 1. Every file a record points at is fully written and synced *before*
//!    `register` is called.
//! 2. A record is registered exactly once, with a fresh id and today's date.
//! 3. A failed or cancelled flow registers nothing and removes the files it
//!    wrote. The source record of a compression is never touched.
//!
//! ## Cancellation
//!
//! Cancellation is explicit: callers hand in a [`CancellationToken`] and the
//! producer checks it between stages and right before registering. A producer
//! that is never cancelled runs to completion and registers its record even if
//! whoever started it has gone away.
//!
//! [`RecordSink`]: crate::registry::RecordSink

use crate::error::{Result, ScanmateError};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

pub mod capture;
pub mod compression;

/// Cancellation token for cooperative producer cancellation.
///
/// Clones share the same underlying flag.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel this token. All clones observe the cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Returns `Err(Cancelled)` once the token has been cancelled.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ScanmateError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Files written so far by a producer run; removed unless the run commits.
pub(crate) struct WrittenFiles {
    paths: Vec<std::path::PathBuf>,
    committed: bool,
}

impl WrittenFiles {
    pub(crate) fn new() -> Self {
        Self {
            paths: Vec::new(),
            committed: false,
        }
    }

    pub(crate) fn track(&mut self, path: &std::path::Path) {
        self.paths.push(path.to_path_buf());
    }

    pub(crate) fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for WrittenFiles {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for path in &self.paths {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "could not remove partial output");
                }
            }
        }
    }
}
