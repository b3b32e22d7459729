//! User preferences stored next to the registry.
//!
//! Each preference is a plain string under its own key (see [`crate::store`]).
//! Reads never fail: a missing, unknown or unreadable value falls back to the
//! default and the problem is logged. Writes return their error so the caller
//! can tell the user the setting did not stick.

use crate::error::{Result, ScanmateError};
use crate::store::backend::StorageBackend;
use crate::store::{ONBOARDING_KEY, SCAN_QUALITY_KEY, THEME_MODE_KEY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

const COMPLETED: &str = "true";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = ScanmateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            other => Err(ScanmateError::Api(format!(
                "Unknown theme mode '{}' (expected light, dark or system)",
                other
            ))),
        }
    }
}

/// Quality tier shared by scanning and compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    #[default]
    High,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Low => "low",
            Quality::Medium => "medium",
            Quality::High => "high",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = ScanmateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Quality::Low),
            "medium" => Ok(Quality::Medium),
            "high" => Ok(Quality::High),
            other => Err(ScanmateError::Api(format!(
                "Unknown quality '{}' (expected low, medium or high)",
                other
            ))),
        }
    }
}

#[derive(Clone)]
pub struct Preferences<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> Preferences<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.read_parsed(THEME_MODE_KEY)
    }

    pub fn set_theme_mode(&self, mode: ThemeMode) -> Result<()> {
        self.backend.set_item(THEME_MODE_KEY, mode.as_str())
    }

    pub fn scan_quality(&self) -> Quality {
        self.read_parsed(SCAN_QUALITY_KEY)
    }

    pub fn set_scan_quality(&self, quality: Quality) -> Result<()> {
        self.backend.set_item(SCAN_QUALITY_KEY, quality.as_str())
    }

    pub fn onboarding_completed(&self) -> bool {
        self.read(ONBOARDING_KEY).as_deref() == Some(COMPLETED)
    }

    pub fn mark_onboarding_completed(&self) -> Result<()> {
        self.backend.set_item(ONBOARDING_KEY, COMPLETED)
    }

    pub fn reset_onboarding(&self) -> Result<()> {
        self.backend.remove_item(ONBOARDING_KEY)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.backend.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "could not read preference, using default");
                None
            }
        }
    }

    fn read_parsed<T: FromStr + Default>(&self, key: &str) -> T {
        match self.read(key) {
            None => T::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(key, value = %raw, "ignoring unknown preference value");
                T::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::new(MemBackend::new());
        assert_eq!(prefs.theme_mode(), ThemeMode::System);
        assert_eq!(prefs.scan_quality(), Quality::High);
        assert!(!prefs.onboarding_completed());
    }

    #[test]
    fn test_values_persist_as_plain_strings() {
        let backend = MemBackend::new();
        let prefs = Preferences::new(backend.clone());
        prefs.set_theme_mode(ThemeMode::Dark).unwrap();
        prefs.set_scan_quality(Quality::Low).unwrap();
        prefs.mark_onboarding_completed().unwrap();

        assert_eq!(backend.raw(THEME_MODE_KEY).as_deref(), Some("dark"));
        assert_eq!(backend.raw(SCAN_QUALITY_KEY).as_deref(), Some("low"));
        assert_eq!(backend.raw(ONBOARDING_KEY).as_deref(), Some("true"));
        assert_eq!(prefs.theme_mode(), ThemeMode::Dark);
        assert_eq!(prefs.scan_quality(), Quality::Low);
    }

    #[test]
    fn test_unknown_value_falls_back() {
        let backend = MemBackend::new();
        backend.put_raw(THEME_MODE_KEY, "sepia");
        backend.put_raw(SCAN_QUALITY_KEY, "ultra");
        let prefs = Preferences::new(backend);
        assert_eq!(prefs.theme_mode(), ThemeMode::System);
        assert_eq!(prefs.scan_quality(), Quality::High);
    }

    #[test]
    fn test_onboarding_reset() {
        let prefs = Preferences::new(MemBackend::new());
        prefs.mark_onboarding_completed().unwrap();
        assert!(prefs.onboarding_completed());
        prefs.reset_onboarding().unwrap();
        assert!(!prefs.onboarding_completed());
    }

    #[test]
    fn test_read_error_uses_default() {
        let backend = MemBackend::new();
        backend.put_raw(THEME_MODE_KEY, "dark");
        backend.set_simulate_read_error(true);
        let prefs = Preferences::new(backend);
        assert_eq!(prefs.theme_mode(), ThemeMode::System);
    }

    #[test]
    fn test_write_error_is_returned() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        let prefs = Preferences::new(backend);
        assert!(prefs.set_theme_mode(ThemeMode::Light).is_err());
    }
}
