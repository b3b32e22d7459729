use crate::commands::helpers::resolve_one;
use crate::commands::{CmdMessage, CmdResult, DisplayRecord};
use crate::error::{Result, ScanmateError};
use crate::registry::queue::RegistryHandle;

/// Renames one record. The new name is validated and normalized; on any
/// failure the registry is unchanged.
pub fn run(registry: &RegistryHandle, selector: &str, new_name: &str) -> Result<CmdResult> {
    let records = registry.records()?;
    let target = resolve_one(&records, selector)?;
    let old_name = target.record.name.clone();

    let updated = registry.rename(&target.record.id, new_name)?;
    let record = updated
        .into_iter()
        .find(|r| r.id == target.record.id)
        .ok_or_else(|| ScanmateError::RecordNotFound(target.record.id.clone()))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Renamed {} to {}",
        old_name, record.name
    )));
    Ok(result.with_affected_records(vec![DisplayRecord {
        index: target.index,
        record,
    }]))
}
