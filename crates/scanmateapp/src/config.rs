//! # Configuration
//!
//! Scanmate configuration is managed by [`confique`], which handles layered
//! loading from a TOML file and environment variables.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `SCANMATE_API_KEY`, `SCANMATE_API_BASE`, etc.
//! 2. **Config file**: `<data>/scanmate.toml`.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `documents_dir` | `<data>/documents` | Where new PDFs and thumbnails are written |
//! | `downloads_dir` | OS downloads dir | Target of "save to device" |
//! | `compression.api_base` | `https://api.pdf.co` | Compression provider base URL |
//! | `compression.api_key` | none | Provider API key |
//! | `compression.timeout_secs` | `120` | HTTP timeout per request |
//!
//! User preferences (theme, scan quality, onboarding) are *not* configuration:
//! they live in the key-value store, see [`crate::prefs`].

use crate::error::{Result, ScanmateError};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "scanmate.toml";
pub const DEFAULT_API_BASE: &str = "https://api.pdf.co";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for scanmate, stored in `scanmate.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanmateConfig {
    /// Directory for generated PDFs and thumbnails.
    #[config(env = "SCANMATE_DOCUMENTS_DIR")]
    pub documents_dir: Option<PathBuf>,

    /// Directory that "save to device" copies into.
    #[config(env = "SCANMATE_DOWNLOADS_DIR")]
    pub downloads_dir: Option<PathBuf>,

    #[config(nested)]
    pub compression: CompressionConfig,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompressionConfig {
    #[config(default = "https://api.pdf.co", env = "SCANMATE_API_BASE")]
    pub api_base: String,

    #[config(env = "SCANMATE_API_KEY")]
    pub api_key: Option<String>,

    #[config(default = 120, env = "SCANMATE_TIMEOUT_SECS")]
    pub timeout_secs: u64,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ScanmateConfig {
    /// Loads `<data_dir>/scanmate.toml` layered under the environment.
    /// A missing file is fine; a malformed one is an error.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::builder()
            .env()
            .file(data_dir.join(CONFIG_FILE_NAME))
            .load()
            .map_err(|e| ScanmateError::Config(e.to_string()))
    }

    pub fn documents_dir(&self, data_dir: &Path) -> PathBuf {
        self.documents_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("documents"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = ScanmateConfig::default();
        assert_eq!(config.compression.api_base, "https://api.pdf.co");
        assert_eq!(config.compression.timeout_secs, 120);
        assert!(config.compression.api_key.is_none());
        assert!(config.documents_dir.is_none());
        assert!(config.downloads_dir.is_none());
    }

    #[test]
    fn test_documents_dir_defaults_under_data() {
        let config = ScanmateConfig::default();
        assert_eq!(
            config.documents_dir(Path::new("/data")),
            PathBuf::from("/data/documents")
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "documents_dir = \"/srv/docs\"\n\n[compression]\napi_base = \"http://localhost:9000\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = ScanmateConfig::load(dir.path()).unwrap();
        assert_eq!(config.documents_dir, Some(PathBuf::from("/srv/docs")));
        assert_eq!(config.compression.api_base, "http://localhost:9000");
        assert_eq!(config.compression.timeout_secs, 5);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "documents_dir = [").unwrap();
        assert!(matches!(
            ScanmateConfig::load(dir.path()),
            Err(ScanmateError::Config(_))
        ));
    }
}
