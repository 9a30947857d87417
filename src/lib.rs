// SPDX-License-Identifier: GPL-3.0-only

//! bookscan - Scan book barcodes into a local ISBN list
//!
//! This library provides the core functionality for bookscan: camera
//! capture, code decoding, confirmation of scanned codes, a persisted
//! deduplicated list, and text/CSV export.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Application model, scan session, confirmation flow and view
//! - [`backends`]: Camera backend abstraction
//! - [`list`]: The ordered, duplicate-free code list
//! - [`storage`]: Key-value persistence of the code list
//! - [`export`]: Plain text and CSV export
//! - [`config`]: User configuration handling
//! - [`terminal`]: Terminal user interface
//!
//! # Example
//!
//! ```ignore
//! // This is a terminal application, typically run via:
//! // bookscan
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod export;
pub mod i18n;
pub mod list;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{AppModel, AppServices, Message};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use export::ExportFormat;
pub use list::CodeList;
