//! # Initialization
//!
//! Resolves where scanmate keeps its data and builds a ready [`ScanmateApi`].
//!
//! ## Data Directory
//!
//! Resolved in priority order:
//! 1. An explicit override (the CLI's `--data`).
//! 2. The `SCANMATE_DATA_DIR` environment variable, mostly for tests.
//! 3. The OS data directory (via the `directories` crate).
//!
//! ## Layout
//!
//! ```text
//! <data>/
//!   scanmate.toml      # optional configuration
//!   store/
//!     pdfs             # registry (JSON array)
//!     themeMode        # light | dark | system
//!     scanQuality      # low | medium | high
//!     onboardingCompleted
//!   documents/         # generated PDFs and thumbnails
//! ```
//!
//! "Save to device" copies into the configured `downloads_dir`, falling back
//! to the user's download folder.

use crate::api::ScanmateApi;
use crate::commands::ScanmatePaths;
use crate::config::ScanmateConfig;
use crate::error::{Result, ScanmateError};
use crate::store::fs_backend::FsBackend;
use directories::{ProjectDirs, UserDirs};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DATA_DIR_ENV: &str = "SCANMATE_DATA_DIR";
const STORE_DIR: &str = "store";

pub struct ScanmateContext {
    pub api: ScanmateApi<FsBackend>,
    pub config: ScanmateConfig,
    pub data_dir: PathBuf,
}

pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("com", "scanmate", "scanmate")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            ScanmateError::Config(format!(
                "Could not determine a data directory; set {}",
                DATA_DIR_ENV
            ))
        })
}

fn downloads_dir(config: &ScanmateConfig) -> Option<PathBuf> {
    config.downloads_dir.clone().or_else(|| {
        UserDirs::new().and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
    })
}

/// Loads configuration and opens the registry under the resolved data dir.
pub fn initialize(data_override: Option<PathBuf>) -> Result<ScanmateContext> {
    let data_dir = resolve_data_dir(data_override)?;
    let config = ScanmateConfig::load(&data_dir)?;

    let paths = ScanmatePaths {
        documents_dir: config.documents_dir(&data_dir),
        downloads_dir: downloads_dir(&config),
        data_dir: data_dir.clone(),
    };
    debug!(
        data = %data_dir.display(),
        documents = %paths.documents_dir.display(),
        "initializing scanmate"
    );

    let backend = FsBackend::new(data_dir.join(STORE_DIR));
    let api = ScanmateApi::new(backend, paths, config.clone())?;

    Ok(ScanmateContext {
        api,
        config,
        data_dir,
    })
}
