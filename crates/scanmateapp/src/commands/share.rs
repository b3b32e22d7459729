use crate::commands::helpers::resolve_selectors;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::files;
use crate::registry::queue::RegistryHandle;

/// Resolves the local files behind the selected records for a share target.
pub fn run<S: AsRef<str>>(registry: &RegistryHandle, selectors: &[S]) -> Result<CmdResult> {
    let records = registry.records()?;
    let resolved = resolve_selectors(&records, selectors)?;
    let mut result = CmdResult::default();

    for display in resolved {
        match display.record.uri.as_deref() {
            Some(uri) if files::exists(uri) => {
                result.paths.push(files::local_path(uri));
                result.affected_records.push(display);
            }
            _ => result.add_message(CmdMessage::warning(format!(
                "Cannot share {}: the file is missing",
                display.record.display_name()
            ))),
        }
    }
    Ok(result)
}
