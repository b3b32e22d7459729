//! # Scanmate Architecture
//!
//! Scanmate is a **UI-agnostic document scanning library**: it turns photos
//! into PDFs, keeps the list of PDFs the user owns, and shrinks them through a
//! hosted compression service. The `scanmate` binary is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (scanmate crate)                                       │
//! │  - Parses arguments, renders CmdResult, owns exit codes     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Owns the registry writer, preferences and services       │
//! │  - Builds producers, dispatches to commands                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)   Producers (producers/*.rs)      │
//! │  - Business logic, structured results, no I/O to terminal   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Registry (registry/) over Storage (store/)                 │
//! │  - PdfRegistry + single-writer RegistryHandle               │
//! │  - StorageBackend: FsBackend (production), MemBackend       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Registry Contract
//!
//! The registry is the one place that knows which documents exist. Producers
//! write their files completely first and only then register a record; a
//! failed or cancelled producer registers nothing. Reads fail soft (a corrupt
//! list reads as empty), writes fail loud. See [`registry`].
//!
//! ## Module Overview
//!
//! - [`api`]: the facade every client talks to
//! - [`commands`]: one module per user-facing operation
//! - [`registry`]: the PDF list and its single-writer queue
//! - [`producers`]: capture/import and compression flows
//! - [`compress`]: the remote compression client
//! - [`store`]: key-value storage backends
//! - [`prefs`] and [`services`]: preferences and observable app state
//! - [`identity`]: account sign-in and profile
//! - [`model`], [`naming`], [`files`]: records, name rules and file helpers
//! - [`config`], [`init`], [`error`]: configuration, startup and errors

pub mod api;
pub mod commands;
pub mod compress;
pub mod config;
pub mod error;
pub mod files;
pub mod identity;
pub mod init;
pub mod model;
pub mod naming;
pub mod prefs;
pub mod producers;
pub mod registry;
pub mod services;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
