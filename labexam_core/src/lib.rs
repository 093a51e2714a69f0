#![forbid(unsafe_code)]

//! Core domain model and business logic for the laboratory exam manager.
//!
//! This crate provides:
//! - Domain types (reference ranges, profiles, results, statuses)
//! - The built-in reference catalog
//! - Value classification against reference ranges
//! - Input validation
//! - Profile store with favorites and default seeding
//! - Text, tabular and PDF report rendering
//! - Backup export/import of the profile store

pub mod types;
pub mod error;
pub mod catalog;
pub mod classify;
pub mod validate;
pub mod store;
pub mod format;
pub mod pdf;
pub mod backup;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog, ReferenceCatalog};
pub use classify::{classify, classify_str};
pub use store::ProfileStore;
pub use format::ResultFormatter;
pub use pdf::{Orientation, PdfExporter};
pub use backup::StoreBackup;
pub use config::Config;
