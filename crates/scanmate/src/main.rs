//! # Scanmate CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and turns its outcome into an exit code.
//!
//! ## Workspace Structure
//!
//! - `crates/scanmateapp/`: the UI-agnostic library (registry, producers,
//!   compression client, preferences and services)
//! - `crates/scanmate/`: this CLI, one client of that library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/scanmate/src/cli/)                       │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal rendering (render.rs, styles.rs)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/scanmateapp/src/api.rs)                  │
//! │  - Owns the registry writer and app services                │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward never touches stdout, stderr or exit
//! codes. The CLI owns all of that, including the color theme: the stored
//! theme preference is resolved against the terminal's light/dark mode.
//!
//! ## Logging
//!
//! Diagnostics go through `tracing` to stderr. `RUST_LOG` selects the filter;
//! `-v` turns on debug output for both crates.
//!
//! ## Testing Approach
//!
//! - Library commands and producers carry the bulk of the unit tests.
//! - `src/cli/` tests check argument parsing and rendering of canned results.
//! - `tests/cli.rs` drives the built binary against a temporary data dir.

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", cli::error_text(&e));
            ExitCode::FAILURE
        }
    }
}
