use crate::commands::helpers::resolve_one;
use crate::commands::{CmdMessage, CmdResult, DisplayRecord};
use crate::error::Result;
use crate::model::format_size;
use crate::prefs::Quality;
use crate::producers::compression::CompressionProducer;
use crate::producers::CancellationToken;
use crate::registry::queue::RegistryHandle;

/// Compresses one record into a new record, which becomes index 1.
pub fn run(
    registry: &RegistryHandle,
    producer: &CompressionProducer,
    selector: &str,
    tier: Quality,
    cancel: &CancellationToken,
) -> Result<CmdResult> {
    let records = registry.records()?;
    let source = resolve_one(&records, selector)?;

    let mut sink = registry.clone();
    let outcome = producer.compress(&source.record, tier, cancel, &mut sink)?;

    let savings = outcome.savings_percent();
    let change = if savings >= 0 {
        format!("{}% smaller", savings)
    } else {
        format!("{}% larger", -savings)
    };
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Compressed {} from {} to {} ({})",
        source.record.display_name(),
        format_size(outcome.original_size),
        format_size(outcome.compressed_size),
        change
    )));
    Ok(result.with_affected_records(vec![DisplayRecord {
        index: 1,
        record: outcome.record,
    }]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::{CompressionService, RemoteError, RemoteResult, RemoteStage};
    use crate::error::ScanmateError;
    use crate::files::{self, DocumentsDir};
    use crate::test_utils::TestEnv;
    use std::path::Path;
    use std::sync::Arc;

    struct HalvingService {
        fail: bool,
    }

    impl CompressionService for HalvingService {
        fn upload(&self, path: &Path) -> RemoteResult<String> {
            Ok(path.to_string_lossy().into_owned())
        }

        fn compress(&self, url: &str, _tier: Quality) -> RemoteResult<String> {
            if self.fail {
                return Err(RemoteError::new(RemoteStage::Compress, "quota exceeded")
                    .with_payload(r#"{"error":true,"message":"quota exceeded"}"#));
            }
            Ok(url.to_string())
        }

        fn download(&self, url: &str, dest: &Path) -> RemoteResult<u64> {
            let bytes = std::fs::read(url).map_err(|e| RemoteError::new(RemoteStage::Download, e.to_string()))?;
            let half = &bytes[..bytes.len() / 2];
            files::write_atomic(dest, half).map_err(|e| RemoteError::new(RemoteStage::Download, e.to_string()))?;
            Ok(half.len() as u64)
        }
    }

    fn producer(env: &TestEnv, fail: bool) -> CompressionProducer {
        CompressionProducer::new(Arc::new(HalvingService { fail }), DocumentsDir::new(&env.docs))
    }

    #[test]
    fn test_new_record_lands_first() {
        let env = TestEnv::new();
        let source = env.add_pdf("Contract.pdf");

        let result = run(&env.registry, &producer(&env, false), "1", Quality::Low, &CancellationToken::new()).unwrap();
        let created = &result.affected_records[0].record;
        assert!(created.name.starts_with("Compressed_"));
        assert!(result.messages[0].content.contains("% smaller"));

        let records = env.registry.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, created.id);
        assert_eq!(records[1].id, source.id);
    }

    #[test]
    fn test_remote_failure_leaves_list_alone() {
        let env = TestEnv::new();
        env.add_pdf("Contract.pdf");

        let err = run(&env.registry, &producer(&env, true), "1", Quality::High, &CancellationToken::new()).unwrap_err();
        match err {
            ScanmateError::Remote(remote) => {
                assert_eq!(remote.stage, RemoteStage::Compress);
                assert!(remote.user_message().contains("quota exceeded"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(env.registry.records().unwrap().len(), 1);
    }
}
