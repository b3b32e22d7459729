//! # CLI Behavior
//!
//! This is **one possible UI client** for scanmate, not the application
//! itself. It is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! ## Naked Execution
//!
//! Running `scanmate` with no arguments defaults to `scanmate list`.
//!
//! ## Selecting PDFs
//!
//! Commands that act on PDFs take selectors: the 1-based position shown by
//! `list` (newest first) or a record id. Several selectors may be given where
//! the command accepts more than one.
//!
//! ## Exit Codes
//!
//! `0` when the command ran and reported no errors, `1` otherwise. Per-item
//! failures (one of three saves failing) still print the other results.
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap, version string
//! - `commands`: context creation, tracing setup and dispatch
//! - `render`: turning a `CmdResult` into text or JSON
//! - `styles`: light and dark palettes

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
pub use render::error_text;
