//! # Storage Layer
//!
//! Scanmate persists everything that is not a document file in a single
//! key-value namespace. The [`backend::StorageBackend`] trait is the only
//! thing the registry and the preferences know about it.
//!
//! ## Keys
//!
//! | Key | Value |
//! |-----|-------|
//! | `pdfs` | JSON array of PDF records, newest first |
//! | `onboardingCompleted` | `"true"` or absent |
//! | `themeMode` | `light`, `dark` or `system` |
//! | `scanQuality` | `low`, `medium` or `high` |
//!
//! ## Philosophy
//!
//! - **Whole-value writes**: a key is always replaced in full. There are no
//!   partial or delta updates, so a reader never observes half a list.
//! - **Absent is not an error**: reading a key that was never written yields
//!   `None`. Interpreting a value (and deciding what a corrupt value means)
//!   is the caller's business.
//! - **Files are not here**: PDFs and thumbnails live in the documents
//!   directory and are referenced by path from the records.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one file per key, atomic replace on write.
//! - [`mem_backend::MemBackend`]: for testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data>/
//! ├── scanmate.toml       # Configuration
//! ├── store/
//! │   ├── pdfs            # Registry
//! │   ├── themeMode
//! │   └── ...
//! └── documents/          # PDF and thumbnail files
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub const PDFS_KEY: &str = "pdfs";
pub const ONBOARDING_KEY: &str = "onboardingCompleted";
pub const THEME_MODE_KEY: &str = "themeMode";
pub const SCAN_QUALITY_KEY: &str = "scanQuality";
