use crate::commands::helpers::resolve_selectors;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ScanmateError};
use crate::files;
use crate::registry::queue::RegistryHandle;
use std::path::Path;
use tracing::warn;

/// Copies the selected PDFs into `downloads_dir` under their record names.
///
/// Each selection succeeds or fails on its own; failures become error
/// messages and never touch the registry.
pub fn run<S: AsRef<str>>(
    registry: &RegistryHandle,
    downloads_dir: Option<&Path>,
    selectors: &[S],
) -> Result<CmdResult> {
    let dir = downloads_dir.ok_or_else(|| {
        ScanmateError::Config(
            "No downloads directory found. Set downloads_dir or SCANMATE_DOWNLOADS_DIR.".to_string(),
        )
    })?;
    let records = registry.records()?;
    let resolved = resolve_selectors(&records, selectors)?;
    let mut result = CmdResult::default();

    for display in resolved {
        let record = &display.record;
        let uri = match record.uri.as_deref() {
            Some(uri) if files::exists(uri) => uri,
            _ => {
                result.add_message(CmdMessage::error(format!(
                    "Could not save {}: the file is missing",
                    record.display_name()
                )));
                continue;
            }
        };

        match files::copy_to_dir(uri, dir, &record.name) {
            Ok(dest) => {
                result.add_message(CmdMessage::success(format!(
                    "Saved {} to {}",
                    record.display_name(),
                    dest.display()
                )));
                result.paths.push(dest);
            }
            Err(e) => {
                warn!(id = %record.id, error = %e, "save to device failed");
                result.add_message(CmdMessage::error(format!(
                    "Could not save {}: {}",
                    record.display_name(),
                    e
                )));
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;
    use std::fs;

    #[test]
    fn test_copies_into_downloads() {
        let env = TestEnv::new();
        env.add_pdf("Invoice.pdf");
        let downloads = env.root.join("Downloads");

        let result = run(&env.registry, Some(&downloads), &["1"]).unwrap();
        assert_eq!(result.paths, vec![downloads.join("Invoice.pdf")]);
        assert_eq!(
            fs::read_to_string(downloads.join("Invoice.pdf")).unwrap(),
            "%PDF-1.5 Invoice.pdf"
        );
        assert!(!result.has_errors());
    }

    #[test]
    fn test_missing_file_does_not_stop_others() {
        let env = TestEnv::new();
        env.add_pdf("kept.pdf");
        env.add_dangling("gone.pdf");
        let downloads = env.root.join("Downloads");

        let result = run(&env.registry, Some(&downloads), &["1", "2"]).unwrap();
        assert!(result.has_errors());
        assert_eq!(result.paths.len(), 1);
        assert_eq!(env.registry.records().unwrap().len(), 2);
    }

    #[test]
    fn test_no_downloads_dir() {
        let env = TestEnv::new();
        env.add_pdf("a.pdf");
        assert!(matches!(
            run(&env.registry, None, &["1"]),
            Err(ScanmateError::Config(_))
        ));
    }
}
