//! Registry behavior against the filesystem backend, across reopen.

use scanmateapp::model::PdfRecord;
use scanmateapp::registry::queue::RegistryHandle;
use scanmateapp::registry::{PdfRegistry, RecordSink};
use scanmateapp::store::backend::StorageBackend;
use scanmateapp::store::fs_backend::FsBackend;
use scanmateapp::store::PDFS_KEY;
use std::fs;
use tempfile::TempDir;

fn record(id: &str, name: &str, uri: Option<String>) -> PdfRecord {
    PdfRecord {
        id: id.to_string(),
        name: name.to_string(),
        date: "2025-01-01".to_string(),
        uri,
        thumb_uri: None,
    }
}

#[test]
fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("store"));

    let mut registry = PdfRegistry::open(backend.clone());
    registry
        .register(record("1", "Scan_1.pdf", Some("/a/1.pdf".into())))
        .unwrap();
    registry.register(record("2", "Scan_2.pdf", None)).unwrap();
    drop(registry);

    let reopened = PdfRegistry::open(backend);
    let ids: Vec<_> = reopened.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);
}

#[test]
fn test_persisted_json_uses_expected_field_names() {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("store"));
    let mut registry = PdfRegistry::open(backend.clone());
    let mut scan = record("1", "Scan_1.pdf", Some("file:///docs/1.pdf".into()));
    scan.thumb_uri = Some("file:///docs/1.jpg".into());
    registry.register(scan).unwrap();

    let raw = backend.get_item(PDFS_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["thumbUri"], "file:///docs/1.jpg");
    assert_eq!(value[0]["uri"], "file:///docs/1.pdf");
    assert!(value[0].get("thumb_uri").is_none());
}

#[test]
fn test_corrupt_file_reads_as_empty_and_recovers() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("store");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join(PDFS_KEY), "{not json").unwrap();

    let mut registry = PdfRegistry::open(FsBackend::new(&root));
    assert!(registry.records().is_empty());

    registry.register(record("fresh", "Fresh.pdf", None)).unwrap();
    let reopened = PdfRegistry::open(FsBackend::new(&root));
    assert_eq!(reopened.records().len(), 1);
}

#[test]
fn test_delete_removes_pdf_and_thumbnail() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("Scan_1.pdf");
    let thumb = dir.path().join("ScanThumb_1.jpg");
    fs::write(&pdf, b"%PDF").unwrap();
    fs::write(&thumb, b"jpeg").unwrap();

    let handle =
        RegistryHandle::spawn(PdfRegistry::open(FsBackend::new(dir.path().join("store")))).unwrap();
    let mut scan = record("1", "Scan_1.pdf", Some(pdf.to_string_lossy().into_owned()));
    scan.thumb_uri = Some(format!("file://{}", thumb.display()));
    handle.register(scan).unwrap();

    let removal = handle.remove("1").unwrap();
    assert!(removal.files.is_clean());
    assert!(!pdf.exists());
    assert!(!thumb.exists());
    assert!(handle.records().unwrap().is_empty());
}

#[test]
fn test_writers_on_separate_registries_are_reconciled() {
    // A producer holding its own registry writes while the viewer is away.
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("store"));
    let mut viewer = PdfRegistry::open(backend.clone());
    viewer.register(record("a", "A.pdf", None)).unwrap();

    let mut producer = PdfRegistry::open(backend.clone());
    producer.register(record("b", "B.pdf", None)).unwrap();

    assert_eq!(viewer.records().len(), 1);
    let ids: Vec<_> = viewer.reconcile().iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec!["b", "a"]);

    // register() reconciles first, so the viewer's next write keeps b.
    viewer.register(record("c", "C.pdf", None)).unwrap();
    let persisted = PdfRegistry::open(backend);
    assert_eq!(persisted.records().len(), 3);
}
