use crate::commands::helpers::resolve_selectors;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::registry::queue::RegistryHandle;
use tracing::warn;

/// Removes the selected records, then their files. A file that cannot be
/// deleted becomes a warning; the record stays removed. A record whose
/// removal cannot be persisted becomes an error message and the rest of the
/// selection still runs.
pub fn run<S: AsRef<str>>(registry: &RegistryHandle, selectors: &[S]) -> Result<CmdResult> {
    let records = registry.records()?;
    let resolved = resolve_selectors(&records, selectors)?;
    let mut result = CmdResult::default();

    for display in resolved {
        let removal = match registry.remove(&display.record.id) {
            Ok(removal) => removal,
            Err(e) => {
                let id = &display.record.id;
                warn!(id = %id, error = %e, "delete failed");
                result.add_message(CmdMessage::error(format!(
                    "Could not delete ({}): {}: {}",
                    display.index,
                    display.record.display_name(),
                    e
                )));
                continue;
            }
        };
        if removal.removed.is_none() {
            // Already removed by someone else between listing and removing.
            continue;
        }
        result.add_message(CmdMessage::success(format!(
            "Deleted ({}): {}",
            display.index,
            display.record.display_name()
        )));
        for path in &removal.files.failed {
            result.add_message(CmdMessage::warning(format!(
                "Could not delete file {}",
                path.display()
            )));
        }
        result.affected_records.push(display);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::files;
    use crate::test_utils::TestEnv;

    #[test]
    fn test_deletes_records_and_files() {
        let env = TestEnv::new();
        let a = env.add_pdf("a.pdf");
        let b = env.add_pdf("b.pdf");
        env.add_pdf("c.pdf");

        // Indices are resolved up front, so "1 3" means c and a.
        let result = run(&env.registry, &["1", "3"]).unwrap();
        assert_eq!(result.affected_records.len(), 2);

        let left = env.registry.records().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, b.id);
        assert!(!files::exists(a.uri.as_deref().unwrap()));
        assert!(files::exists(b.uri.as_deref().unwrap()));
    }

    #[test]
    fn test_missing_file_still_removes_record() {
        let env = TestEnv::new();
        env.add_dangling("ghost.pdf");

        let result = run(&env.registry, &["1"]).unwrap();
        assert_eq!(result.affected_records.len(), 1);
        assert!(env.registry.records().unwrap().is_empty());
        assert!(!result.has_errors());
    }

    #[test]
    fn test_save_failure_is_reported_per_item() {
        let env = TestEnv::new();
        env.add_pdf("a.pdf");
        env.add_pdf("b.pdf");
        env.backend.set_simulate_write_error(true);

        let result = run(&env.registry, &["1", "2"]).unwrap();
        assert!(result.has_errors());
        assert!(result.affected_records.is_empty());
        let errors: Vec<_> = result
            .messages
            .iter()
            .filter(|m| m.level == MessageLevel::Error)
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("Could not delete (1): B"));
        assert!(errors[1].starts_with("Could not delete (2): A"));
    }
}
