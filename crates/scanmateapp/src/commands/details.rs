use crate::commands::helpers::resolve_selectors;
use crate::commands::{CmdResult, RecordDetails};
use crate::error::Result;
use crate::files;
use crate::registry::queue::RegistryHandle;

pub fn run<S: AsRef<str>>(registry: &RegistryHandle, selectors: &[S]) -> Result<CmdResult> {
    let records = registry.records()?;
    let resolved = resolve_selectors(&records, selectors)?;
    let mut result = CmdResult::default();

    for display in resolved {
        let size = display.record.uri.as_deref().and_then(files::file_size);
        result.details.push(RecordDetails {
            index: display.index,
            display_name: display.record.display_name(),
            missing: size.is_none(),
            size,
            record: display.record,
        });
    }
    Ok(result)
}
