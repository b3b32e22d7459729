//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every scanmate operation, regardless of the UI in front.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns the context**: the registry writer, preferences, app services and
//!   directories a client would otherwise have to thread through every call
//! - **Builds producers** with the current settings (scan quality, documents
//!   directory, compression provider)
//! - **Dispatches** to the matching command and returns `Result<CmdResult>`
//!
//! It never prints, prompts or exits.
//!
//! ## Single Writer
//!
//! All registry traffic goes through one [`RegistryHandle`]. Producers started
//! from the API register through a clone of the same handle, so a delete issued
//! while a compression is downloading is applied in order, never overwritten.
//!
//! ## Generic Over StorageBackend
//!
//! `ScanmateApi<B: StorageBackend>`:
//! - Production: `ScanmateApi<FsBackend>`
//! - Testing: `ScanmateApi<MemBackend>`

use crate::commands::{self, CmdResult, ScanmatePaths};
use crate::compress::{CompressionService, PdfCoClient};
use crate::config::ScanmateConfig;
use crate::error::Result;
use crate::files::DocumentsDir;
use crate::prefs::{Preferences, Quality, ThemeMode};
use crate::producers::capture::{CaptureKind, CaptureProducer};
use crate::producers::compression::CompressionProducer;
use crate::producers::CancellationToken;
use crate::registry::queue::RegistryHandle;
use crate::registry::PdfRegistry;
use crate::services::{BusyIndicator, ColorScheme, OnboardingService, ThemeService};
use crate::store::backend::StorageBackend;
use std::path::PathBuf;
use std::sync::Arc;

pub struct ScanmateApi<B: StorageBackend> {
    registry: RegistryHandle,
    prefs: Preferences<B>,
    theme: ThemeService<B>,
    onboarding: OnboardingService<B>,
    busy: BusyIndicator,
    paths: ScanmatePaths,
    config: ScanmateConfig,
    compressor: Option<Arc<dyn CompressionService>>,
}

impl<B> ScanmateApi<B>
where
    B: StorageBackend + Clone + Send + 'static,
{
    /// Opens the registry on `backend` and starts its writer thread.
    pub fn new(backend: B, paths: ScanmatePaths, config: ScanmateConfig) -> Result<Self> {
        let registry = RegistryHandle::spawn(PdfRegistry::open(backend.clone()))?;
        let prefs = Preferences::new(backend);
        Ok(Self {
            registry,
            theme: ThemeService::new(prefs.clone()),
            onboarding: OnboardingService::new(prefs.clone()),
            prefs,
            busy: BusyIndicator::new(),
            paths,
            config,
            compressor: None,
        })
    }

    /// Uses `service` for compression instead of the configured provider.
    pub fn with_compression_service(mut self, service: Arc<dyn CompressionService>) -> Self {
        self.compressor = Some(service);
        self
    }

    pub fn registry(&self) -> &RegistryHandle {
        &self.registry
    }

    pub fn paths(&self) -> &ScanmatePaths {
        &self.paths
    }

    pub fn config(&self) -> &ScanmateConfig {
        &self.config
    }

    pub fn busy(&self) -> &BusyIndicator {
        &self.busy
    }

    pub fn theme(&self) -> &ThemeService<B> {
        &self.theme
    }

    pub fn list(&self) -> Result<CmdResult> {
        commands::list::run(&self.registry)
    }

    pub fn details<S: AsRef<str>>(&self, selectors: &[S]) -> Result<CmdResult> {
        commands::details::run(&self.registry, selectors)
    }

    pub fn rename(&self, selector: &str, new_name: &str) -> Result<CmdResult> {
        commands::rename::run(&self.registry, selector, new_name)
    }

    pub fn delete<S: AsRef<str>>(&self, selectors: &[S]) -> Result<CmdResult> {
        commands::delete::run(&self.registry, selectors)
    }

    pub fn save<S: AsRef<str>>(&self, selectors: &[S]) -> Result<CmdResult> {
        commands::export::run(&self.registry, self.paths.downloads_dir.as_deref(), selectors)
    }

    pub fn share<S: AsRef<str>>(&self, selectors: &[S]) -> Result<CmdResult> {
        commands::share::run(&self.registry, selectors)
    }

    pub fn compress(
        &self,
        selector: &str,
        tier: Quality,
        cancel: &CancellationToken,
    ) -> Result<CmdResult> {
        let service: Arc<dyn CompressionService> = match &self.compressor {
            Some(service) => Arc::clone(service),
            None => Arc::new(PdfCoClient::new(&self.config.compression)?),
        };
        let producer = CompressionProducer::new(service, self.documents());
        let _busy = self.busy.show("Compressing PDF...");
        commands::compress::run(&self.registry, &producer, selector, tier, cancel)
    }

    pub fn scan(
        &self,
        images: &[PathBuf],
        kind: CaptureKind,
        cancel: &CancellationToken,
    ) -> Result<CmdResult> {
        let producer = CaptureProducer::new(self.documents(), self.prefs.scan_quality());
        let _busy = self.busy.show("Creating PDF...");
        commands::scan::run(&self.registry, &producer, images, kind, cancel)
    }

    pub fn clear(&self) -> Result<CmdResult> {
        commands::clear::run(&self.registry)
    }

    pub fn doctor(&self) -> Result<CmdResult> {
        commands::doctor::run(&self.registry)
    }

    pub fn theme_show(&self, platform: Option<ColorScheme>) -> CmdResult {
        commands::settings::theme_show(&self.theme, platform)
    }

    pub fn set_theme(&self, mode: ThemeMode) -> Result<CmdResult> {
        commands::settings::theme_set(&self.theme, mode)
    }

    pub fn toggle_theme(&self) -> Result<CmdResult> {
        commands::settings::theme_toggle(&self.theme)
    }

    pub fn quality_show(&self) -> CmdResult {
        commands::settings::quality_show(&self.prefs)
    }

    pub fn set_quality(&self, quality: Quality) -> Result<CmdResult> {
        commands::settings::quality_set(&self.prefs, quality)
    }

    pub fn onboarding_show(&self) -> CmdResult {
        commands::settings::onboarding_show(&self.onboarding)
    }

    pub fn complete_onboarding(&self) -> Result<CmdResult> {
        commands::settings::onboarding_complete(&self.onboarding)
    }

    pub fn reset_onboarding(&self) -> Result<CmdResult> {
        commands::settings::onboarding_reset(&self.onboarding)
    }

    fn documents(&self) -> DocumentsDir {
        DocumentsDir::new(&self.paths.documents_dir)
    }
}
