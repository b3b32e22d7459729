use crate::commands::DisplayRecord;
use crate::error::{Result, ScanmateError};
use crate::model::PdfRecord;
use std::collections::HashSet;

/// Resolves user selectors against `records` (newest first).
///
/// A selector is a 1-based list position or a record id. A number that is out
/// of range is still tried as an id before giving up. Duplicates collapse to
/// the first occurrence; order otherwise follows the selectors.
pub fn resolve_selectors<S: AsRef<str>>(
    records: &[PdfRecord],
    selectors: &[S],
) -> Result<Vec<DisplayRecord>> {
    if selectors.is_empty() {
        return Err(ScanmateError::Api("No PDF selected".to_string()));
    }

    let mut seen = HashSet::new();
    let mut resolved = Vec::new();
    for selector in selectors {
        let found = resolve_one(records, selector.as_ref())?;
        if seen.insert(found.record.id.clone()) {
            resolved.push(found);
        }
    }
    Ok(resolved)
}

pub fn resolve_one(records: &[PdfRecord], selector: &str) -> Result<DisplayRecord> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(ScanmateError::Api("Empty selector".to_string()));
    }

    if let Ok(index) = selector.parse::<usize>() {
        if (1..=records.len()).contains(&index) {
            return Ok(DisplayRecord {
                index,
                record: records[index - 1].clone(),
            });
        }
    }

    records
        .iter()
        .position(|r| r.id == selector)
        .map(|pos| DisplayRecord {
            index: pos + 1,
            record: records[pos].clone(),
        })
        .ok_or_else(|| ScanmateError::RecordNotFound(selector.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<PdfRecord> {
        ["c.pdf", "b.pdf", "a.pdf"]
            .iter()
            .enumerate()
            .map(|(i, name)| PdfRecord {
                id: format!("17000000000{}x", i),
                name: name.to_string(),
                date: "2025-01-01".to_string(),
                uri: None,
                thumb_uri: None,
            })
            .collect()
    }

    #[test]
    fn test_index_selector() {
        let resolved = resolve_selectors(&records(), &["2"]).unwrap();
        assert_eq!(resolved[0].index, 2);
        assert_eq!(resolved[0].record.name, "b.pdf");
    }

    #[test]
    fn test_id_selector_reports_position() {
        let resolved = resolve_selectors(&records(), &["170000000002x"]).unwrap();
        assert_eq!(resolved[0].index, 3);
        assert_eq!(resolved[0].record.name, "a.pdf");
    }

    #[test]
    fn test_duplicates_collapse() {
        let resolved = resolve_selectors(&records(), &["1", "170000000000x", "1"]).unwrap();
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn test_unknown_selectors_fail() {
        assert!(matches!(
            resolve_selectors(&records(), &["4"]),
            Err(ScanmateError::RecordNotFound(_))
        ));
        assert!(matches!(
            resolve_selectors(&records(), &["0"]),
            Err(ScanmateError::RecordNotFound(_))
        ));
        assert!(matches!(
            resolve_selectors(&records(), &["nope"]),
            Err(ScanmateError::RecordNotFound(_))
        ));
        assert!(resolve_selectors::<&str>(&records(), &[]).is_err());
        assert!(resolve_selectors(&records(), &["  "]).is_err());
    }
}
