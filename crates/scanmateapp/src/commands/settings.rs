//! Theme, scan quality and onboarding.
//!
//! Reads never fail (preferences fall back to defaults). Writes that do not
//! stick are returned as errors so the caller can say so.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::prefs::{Preferences, Quality, ThemeMode};
use crate::services::{ColorScheme, OnboardingService, ThemeService};
use crate::store::backend::StorageBackend;

fn scheme_name(scheme: ColorScheme) -> &'static str {
    match scheme {
        ColorScheme::Light => "light",
        ColorScheme::Dark => "dark",
    }
}

pub fn theme_show<B: StorageBackend>(
    theme: &ThemeService<B>,
    platform: Option<ColorScheme>,
) -> CmdResult {
    let mut result = CmdResult::default();
    let mode = theme.mode();
    let message = match mode {
        ThemeMode::System => format!(
            "Theme: system (currently {})",
            scheme_name(theme.effective_scheme(platform))
        ),
        _ => format!("Theme: {}", mode),
    };
    result.add_message(CmdMessage::info(message));
    result
}

pub fn theme_set<B: StorageBackend>(theme: &ThemeService<B>, mode: ThemeMode) -> Result<CmdResult> {
    theme.set_mode(mode)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Theme set to {}", mode)));
    Ok(result)
}

pub fn theme_toggle<B: StorageBackend>(theme: &ThemeService<B>) -> Result<CmdResult> {
    let mode = theme.toggle()?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Theme set to {}", mode)));
    Ok(result)
}

pub fn quality_show<B: StorageBackend>(prefs: &Preferences<B>) -> CmdResult {
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "Scan quality: {}",
        prefs.scan_quality()
    )));
    result
}

pub fn quality_set<B: StorageBackend>(prefs: &Preferences<B>, quality: Quality) -> Result<CmdResult> {
    prefs.set_scan_quality(quality)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Scan quality set to {}",
        quality
    )));
    Ok(result)
}

pub fn onboarding_show<B: StorageBackend>(onboarding: &OnboardingService<B>) -> CmdResult {
    let mut result = CmdResult::default();
    let state = if onboarding.is_completed() {
        "completed"
    } else {
        "not completed"
    };
    result.add_message(CmdMessage::info(format!("Onboarding: {}", state)));
    result
}

pub fn onboarding_complete<B: StorageBackend>(onboarding: &OnboardingService<B>) -> Result<CmdResult> {
    onboarding.complete()?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Onboarding marked as completed"));
    Ok(result)
}

pub fn onboarding_reset<B: StorageBackend>(onboarding: &OnboardingService<B>) -> Result<CmdResult> {
    onboarding.reset()?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(
        "Onboarding reset; it will show again on next launch",
    ));
    Ok(result)
}
