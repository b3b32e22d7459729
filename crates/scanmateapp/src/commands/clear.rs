use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::registry::queue::RegistryHandle;

/// Deletes every PDF and thumbnail, then drops the registry.
pub fn run(registry: &RegistryHandle) -> Result<CmdResult> {
    let report = registry.clear_all()?;
    let mut result = CmdResult::default();

    let noun = if report.removed == 1 { "PDF" } else { "PDFs" };
    result.add_message(CmdMessage::success(format!(
        "Removed {} {}",
        report.removed, noun
    )));
    for path in &report.files.failed {
        result.add_message(CmdMessage::warning(format!(
            "Could not delete file {}",
            path.display()
        )));
    }
    Ok(result)
}
