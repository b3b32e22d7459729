//! Compression producer: an existing record in, a new smaller PDF out.
//!
//! The source record and its file are only read. The compressed file lands in
//! the documents directory as `Compressed_<millis>.pdf` and is registered as a
//! separate record that borrows the source's thumbnail.

use super::{CancellationToken, WrittenFiles};
use crate::compress::{CompressionService, RemoteError, RemoteStage};
use crate::error::{Result, ScanmateError};
use crate::files::{self, DocumentsDir};
use crate::model::PdfRecord;
use crate::prefs::Quality;
use crate::registry::RecordSink;
use std::sync::Arc;
use tracing::{debug, info};

const OUTPUT_PREFIX: &str = "Compressed";

#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    pub record: PdfRecord,
    pub original_size: u64,
    pub compressed_size: u64,
}

impl CompressionOutcome {
    /// Size reduction in whole percent; negative when the file grew.
    pub fn savings_percent(&self) -> i64 {
        if self.original_size == 0 {
            return 0;
        }
        let saved = self.original_size as i64 - self.compressed_size as i64;
        saved * 100 / self.original_size as i64
    }
}

pub struct CompressionProducer {
    service: Arc<dyn CompressionService>,
    docs: DocumentsDir,
}

impl CompressionProducer {
    pub fn new(service: Arc<dyn CompressionService>, docs: DocumentsDir) -> Self {
        Self { service, docs }
    }

    pub fn compress(
        &self,
        source: &PdfRecord,
        tier: Quality,
        cancel: &CancellationToken,
        sink: &mut dyn RecordSink,
    ) -> Result<CompressionOutcome> {
        let uri = source.uri.as_deref().ok_or_else(|| {
            ScanmateError::Api(format!("{} has no file to compress.", source.display_name()))
        })?;
        let path = files::local_path(uri);
        let original_size = files::file_size(uri).ok_or_else(|| {
            ScanmateError::Api(format!("The file for {} is missing.", source.display_name()))
        })?;

        cancel.check()?;
        let uploaded = self.service.upload(&path)?;
        debug!(source = %source.id, "uploaded");

        cancel.check()?;
        let result_url = self.service.compress(&uploaded, tier)?;
        debug!(source = %source.id, %tier, "compressed remotely");

        cancel.check()?;
        let mut written = WrittenFiles::new();
        let dest = self.docs.fresh_path(OUTPUT_PREFIX, "pdf");
        written.track(&dest);
        let compressed_size = self.service.download(&result_url, &dest)?;
        if compressed_size == 0 {
            return Err(RemoteError::new(RemoteStage::Download, "provider returned an empty file").into());
        }

        cancel.check()?;
        let record = PdfRecord::new(files::file_name(&dest))
            .with_uri(dest.to_string_lossy())
            .with_thumb_uri(source.thumb_uri.clone());
        sink.register(record.clone())?;
        written.commit();

        let outcome = CompressionOutcome {
            record,
            original_size,
            compressed_size,
        };
        info!(
            source = %source.id,
            id = %outcome.record.id,
            original_size,
            compressed_size,
            "registered compressed PDF"
        );
        Ok(outcome)
    }
}
