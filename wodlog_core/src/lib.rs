#![forbid(unsafe_code)]

//! Core import pipeline for Wodify workout-performance exports.
//!
//! This crate provides:
//! - Domain types (export rows, catalog entities, sessions, performances)
//! - Row parsing and free-text result grammars
//! - Grouping by workout date and catalog reconciliation
//! - The two-phase preview/confirm importer
//! - A JSON-backed library with the standard catalog

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod result_parser;
pub mod rows;
pub mod grouping;
pub mod reconcile;
pub mod store;
pub mod import;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::get_standard_catalog;
pub use config::Config;
pub use reconcile::{Catalog, DEFAULT_SEARCH_LIMIT};
pub use store::{Library, LibraryLock, SessionStore};
pub use import::{confirm_import, preview_import, Importer};
