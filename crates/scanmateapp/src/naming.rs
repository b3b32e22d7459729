//! PDF name validation for rename.
//!
//! A new name is accepted when something readable survives sanitizing:
//! - Leading/trailing whitespace is trimmed
//! - One trailing `.pdf` is ignored, so `Report` and `Report.pdf` are equivalent
//! - Characters other than ASCII word characters (`A-Z`, `a-z`, `0-9`, `_`),
//!   whitespace and hyphens (`-`) are removed
//! - The result always carries a `.pdf` suffix

use crate::model::strip_pdf_suffix;
use std::fmt;

/// Validates and normalizes a user-entered PDF name.
///
/// # Examples
/// ```
/// use scanmateapp::naming::{normalize_pdf_name, NameError};
///
/// assert_eq!(normalize_pdf_name("Report").unwrap(), "Report.pdf");
/// assert_eq!(normalize_pdf_name("Report.pdf").unwrap(), "Report.pdf");
/// assert_eq!(normalize_pdf_name("My Report!!").unwrap(), "My Report.pdf");
///
/// assert_eq!(normalize_pdf_name("   "), Err(NameError::Empty));
/// assert_eq!(normalize_pdf_name("?!*"), Err(NameError::Invalid));
/// ```
pub fn normalize_pdf_name(raw: &str) -> Result<String, NameError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }

    let cleaned: String = strip_pdf_suffix(trimmed)
        .chars()
        .filter(|&ch| is_valid_name_char(ch))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(NameError::Invalid);
    }

    Ok(format!("{}.pdf", cleaned))
}

fn is_valid_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' || ch.is_whitespace()
}

/// Error type for rename validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Name is empty after trimming
    Empty,
    /// Nothing remains after removing disallowed characters
    Invalid,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameError::Empty => write!(f, "Name cannot be empty."),
            NameError::Invalid => write!(f, "Name contains invalid characters."),
        }
    }
}

impl std::error::Error for NameError {}
