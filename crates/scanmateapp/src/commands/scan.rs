use crate::commands::{CmdMessage, CmdResult, DisplayRecord};
use crate::error::Result;
use crate::producers::capture::{CaptureKind, CaptureProducer};
use crate::producers::CancellationToken;
use crate::registry::queue::RegistryHandle;
use std::path::PathBuf;

/// Builds one PDF from `images` and registers it as index 1.
pub fn run(
    registry: &RegistryHandle,
    producer: &CaptureProducer,
    images: &[PathBuf],
    kind: CaptureKind,
    cancel: &CancellationToken,
) -> Result<CmdResult> {
    let mut sink = registry.clone();
    let record = producer.produce(images, kind, cancel, &mut sink)?;

    let mut result = CmdResult::default();
    let pages = if images.len() == 1 { "page" } else { "pages" };
    result.add_message(CmdMessage::success(format!(
        "Created {} ({} {})",
        record.name,
        images.len(),
        pages
    )));
    Ok(result.with_affected_records(vec![DisplayRecord { index: 1, record }]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::DocumentsDir;
    use crate::prefs::Quality;
    use crate::test_utils::TestEnv;
    use image::{Luma, GrayImage};

    #[test]
    fn test_import_registers_record() {
        let env = TestEnv::new();
        env.add_pdf("older.pdf");
        let image = env.root.join("page.png");
        GrayImage::from_pixel(5, 5, Luma([128])).save(&image).unwrap();
        let producer = CaptureProducer::new(DocumentsDir::new(&env.docs), Quality::Medium);

        let result = run(
            &env.registry,
            &producer,
            &[image],
            CaptureKind::ImageImport,
            &CancellationToken::new(),
        )
        .unwrap();

        let created = &result.affected_records[0].record;
        assert!(created.name.starts_with("ImagePDF_"));
        assert!(result.messages[0].content.contains("1 page"));
        let records = env.registry.records().unwrap();
        assert_eq!(records[0].id, created.id);
        assert_eq!(records.len(), 2);
    }
}
