//! Fixtures shared by unit and integration tests.

use crate::model::PdfRecord;
use crate::registry::queue::RegistryHandle;
use crate::registry::PdfRegistry;
use crate::store::mem_backend::MemBackend;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    // Keeps the directory alive for the duration of the test.
    pub _temp_dir: TempDir,
    pub root: PathBuf,
    pub docs: PathBuf,
    pub backend: MemBackend,
    pub registry: RegistryHandle,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let docs = root.join("documents");
        fs::create_dir_all(&docs).expect("failed to create documents dir");
        let backend = MemBackend::new();
        let registry = RegistryHandle::spawn(PdfRegistry::open(backend.clone()))
            .expect("failed to start registry writer");
        Self {
            _temp_dir: temp_dir,
            root,
            docs,
            backend,
            registry,
        }
    }

    /// Writes a small file named `name` into the documents dir and registers
    /// a record for it. The new record becomes index 1.
    pub fn add_pdf(&self, name: &str) -> PdfRecord {
        let path = self.docs.join(name);
        fs::write(&path, format!("%PDF-1.5 {}", name)).expect("failed to write pdf");
        let record = PdfRecord::new(name).with_uri(path.to_string_lossy());
        self.registry
            .register(record.clone())
            .expect("failed to register record");
        record
    }

    /// Registers a record whose file does not exist.
    pub fn add_dangling(&self, name: &str) -> PdfRecord {
        let record =
            PdfRecord::new(name).with_uri(self.docs.join(name).to_string_lossy().into_owned());
        self.registry
            .register(record.clone())
            .expect("failed to register record");
        record
    }
}
