use crate::commands::{index_records, CmdMessage, CmdResult};
use crate::error::Result;
use crate::registry::queue::RegistryHandle;
use std::collections::HashSet;

/// Reports records whose PDF is gone from disk. Nothing is changed.
pub fn run(registry: &RegistryHandle) -> Result<CmdResult> {
    let records = registry.reconcile()?;
    let total = records.len();
    let missing_ids: HashSet<String> = registry
        .missing_files()?
        .into_iter()
        .map(|r| r.id)
        .collect();
    let missing: Vec<_> = index_records(records)
        .into_iter()
        .filter(|d| missing_ids.contains(&d.record.id))
        .collect();

    let mut result = CmdResult::default();
    if missing.is_empty() {
        result.add_message(CmdMessage::success(format!(
            "All {} PDFs have their files",
            total
        )));
    } else {
        for display in &missing {
            result.add_message(CmdMessage::warning(format!(
                "File missing ({}): {}",
                display.index,
                display.record.display_name()
            )));
        }
        result.add_message(CmdMessage::info(
            "Delete these entries to remove them from the list.",
        ));
    }
    Ok(result.with_listed_records(missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    #[test]
    fn test_reports_missing_only() {
        let env = TestEnv::new();
        env.add_pdf("ok.pdf");
        let gone = env.add_dangling("gone.pdf");

        let result = run(&env.registry).unwrap();
        assert_eq!(result.listed_records.len(), 1);
        assert_eq!(result.listed_records[0].record.id, gone.id);
        assert_eq!(result.listed_records[0].index, 1);
        assert_eq!(env.registry.records().unwrap().len(), 2);
    }

    #[test]
    fn test_healthy_registry() {
        let env = TestEnv::new();
        env.add_pdf("ok.pdf");
        let result = run(&env.registry).unwrap();
        assert!(result.listed_records.is_empty());
        assert_eq!(result.messages[0].content, "All 1 PDFs have their files");
    }
}
