use crate::commands::{index_records, CmdResult};
use crate::error::Result;
use crate::registry::queue::RegistryHandle;

/// Lists every record, newest first, after picking up records written by
/// producers since the last look.
pub fn run(registry: &RegistryHandle) -> Result<CmdResult> {
    let records = registry.reconcile()?;
    Ok(CmdResult::default().with_listed_records(index_records(records)))
}
