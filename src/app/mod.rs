// SPDX-License-Identifier: GPL-3.0-only

//! Main application module for bookscan
//!
//! This module contains the application state, message handling, terminal
//! rendering, and the scanning workflow.
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, ScannerStatus)
//! - `scan_session`: Camera decode session running on a worker thread
//! - `confirmation`: Pending-scan accept/cancel state machine
//! - `frame_processor`: Decoders turning frames into codes
//! - `camera_preview`: Half-block camera preview widget
//! - `view`: Terminal rendering
//! - `update`: Message handling
//!
//! # Main Types
//!
//! - `AppModel`: Owns the list store, the confirmation flow and the scan view
//! - `Message`: All possible user interactions and session events

pub mod camera_preview;
pub mod confirmation;
pub mod frame_processor;
mod handlers;
pub mod scan_session;
mod state;
mod update;
pub mod view;

// Re-export public API
pub use confirmation::{AcceptOutcome, ConfirmationFlow};
pub use scan_session::{ScanEvent, ScanOptions, ScanSession};
pub use state::{AppModel, AppServices, Message, ScannerState, ScannerStatus, StatusMessage};

use crate::backends::camera::GstCameraBackend;
use crate::config::Config;
use crate::export::{DialogSaver, DirectorySaver, FileSaver};
use crate::storage::FileStore;
use std::sync::Arc;
use tracing::info;

impl AppServices {
    /// Production collaborators as configured: file store, GStreamer camera,
    /// compiled-in decoder and the export saver
    pub fn from_config(config: &Config) -> Self {
        let storage_path = config.storage_path();
        let export_directory = config.export_directory();
        info!(
            storage = %storage_path.display(),
            exports = %export_directory.display(),
            save_dialog = config.use_save_dialog,
            "Creating application services"
        );

        let saver: Box<dyn FileSaver> = if config.use_save_dialog {
            Box::new(DialogSaver::new(export_directory))
        } else {
            Box::new(DirectorySaver::new(export_directory))
        };

        Self {
            store: Box::new(FileStore::new(storage_path)),
            camera_backend: Arc::new(GstCameraBackend::new()),
            decoder: frame_processor::default_decoder(config.decode_max_dimension),
            saver,
        }
    }
}
