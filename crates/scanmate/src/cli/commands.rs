//! Context creation and dispatch.
//!
//! `run` parses arguments, opens the data directory, calls exactly one API
//! method and prints what it returns. Errors that stop the command come back
//! as `Err`; per-item problems come back inside the `CmdResult` and only
//! affect the exit code.

use super::render::Renderer;
use super::setup::{Cli, Commands, OnboardingArg};
use super::styles::{platform_scheme, Palette};
use anyhow::Context;
use clap::Parser;
use console::Term;
use scanmateapp::api::ScanmateApi;
use scanmateapp::commands::{CmdMessage, CmdResult};
use scanmateapp::error::Result;
use scanmateapp::init::initialize;
use scanmateapp::prefs::ThemeMode;
use scanmateapp::producers::capture::CaptureKind;
use scanmateapp::producers::CancellationToken;
use scanmateapp::store::fs_backend::FsBackend;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = initialize(cli.data.clone()).context("Could not open the scanmate data directory")?;
    let api = &ctx.api;
    debug!(data = %ctx.data_dir.display(), "context ready");

    show_busy_on_stderr(api);

    let command = cli.command.unwrap_or(Commands::List);
    let is_list = matches!(command, Commands::List);
    let mut result = dispatch(api, command)?;
    if is_list && result.listed_records.is_empty() {
        result.add_message(CmdMessage::info(
            "No PDFs yet. Create one with `scanmate scan <image>` or `scanmate import <images...>`.",
        ));
    }

    let renderer = Renderer::new(palette(api), cli.json);
    print!("{}", renderer.render(&result)?);

    Ok(if result.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn dispatch(api: &ScanmateApi<FsBackend>, command: Commands) -> Result<CmdResult> {
    let cancel = CancellationToken::new();
    match command {
        Commands::List => api.list(),
        Commands::Details { indexes } => api.details(&indexes),
        Commands::Rename { index, name } => api.rename(&index, &name.join(" ")),
        Commands::Delete { indexes } => api.delete(&indexes),
        Commands::Save { indexes } => api.save(&indexes),
        Commands::Share { indexes } => api.share(&indexes),
        Commands::Compress { index, quality } => api.compress(&index, quality.into(), &cancel),
        Commands::Scan { image } => api.scan(&[image], CaptureKind::Scan, &cancel),
        Commands::Import { images } => api.scan(&images, CaptureKind::ImageImport, &cancel),
        Commands::Clear { yes } => clear(api, yes),
        Commands::Doctor => api.doctor(),
        Commands::Theme { mode: None } => {
            let platform = (api.theme().mode() == ThemeMode::System).then(platform_scheme);
            Ok(api.theme_show(platform))
        }
        Commands::Theme { mode: Some(arg) } => match arg.mode() {
            Some(mode) => api.set_theme(mode),
            None => api.toggle_theme(),
        },
        Commands::Quality { level: None } => Ok(api.quality_show()),
        Commands::Quality { level: Some(level) } => api.set_quality(level.into()),
        Commands::Onboarding { action: None } => Ok(api.onboarding_show()),
        Commands::Onboarding {
            action: Some(OnboardingArg::Complete),
        } => api.complete_onboarding(),
        Commands::Onboarding {
            action: Some(OnboardingArg::Reset),
        } => api.reset_onboarding(),
    }
}

/// Clearing is irreversible, so without `--yes` it only reports what would go.
fn clear(api: &ScanmateApi<FsBackend>, confirmed: bool) -> Result<CmdResult> {
    if confirmed {
        return api.clear();
    }
    let count = api.list()?.listed_records.len();
    let mut result = CmdResult::default();
    if count == 0 {
        result.add_message(CmdMessage::info("Nothing to clear"));
    } else {
        let noun = if count == 1 { "PDF" } else { "PDFs" };
        result.add_message(CmdMessage::warning(format!(
            "This deletes {} {} and their files. Run `scanmate clear --yes` to confirm.",
            count, noun
        )));
    }
    Ok(result)
}

/// Long operations report progress on stderr, and only for a human watching.
fn show_busy_on_stderr(api: &ScanmateApi<FsBackend>) {
    if !Term::stderr().is_term() {
        return;
    }
    let muted = console::Style::new().dim();
    api.busy().observe().subscribe(move |state| {
        if let (true, Some(message)) = (state.is_busy(), state.message.as_deref()) {
            let _ = Term::stderr().write_line(&muted.apply_to(message).to_string());
        }
    });
}

/// Colors only matter on a terminal, so the platform is only asked then.
fn palette(api: &ScanmateApi<FsBackend>) -> Palette {
    let theme = api.theme();
    let platform = (console::colors_enabled() && theme.mode() == ThemeMode::System)
        .then(platform_scheme);
    Palette::for_scheme(theme.effective_scheme(platform))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("scanmate=debug,scanmateapp=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
