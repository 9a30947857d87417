// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::confirmation::ConfirmationFlow;
use crate::app::frame_processor::Decoder;
use crate::app::scan_session::ScanSession;
use crate::backends::camera::CameraBackend;
use crate::backends::camera::types::{CameraDevice, CameraFrame};
use crate::config::Config;
use crate::errors::CameraError;
use crate::export::{ExportFormat, FileSaver};
use crate::storage::{CodeListStore, KeyValueStore};
use std::sync::Arc;

/// Camera status shown in the scan view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannerStatus {
    /// Waiting for the camera to open
    Starting,
    Streaming(CameraDevice),
    /// Camera unavailable; shown inline until the scanner is reopened
    Failed(CameraError),
}

/// The open scan view: one session plus what the view shows of it
pub struct ScannerState {
    pub session: ScanSession,
    pub status: ScannerStatus,
    pub preview: Option<Arc<CameraFrame>>,
}

/// Status bar message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            StatusMessage::Info(text) | StatusMessage::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::Error(_))
    }
}

/// Collaborators the model is built from
///
/// Everything with a side effect outside the process is injected here, so
/// tests can swap in memory stores, fake cameras and recording savers.
pub struct AppServices {
    pub store: Box<dyn KeyValueStore>,
    pub camera_backend: Arc<dyn CameraBackend>,
    pub decoder: Arc<dyn Decoder>,
    pub saver: Box<dyn FileSaver>,
}

/// Main application model
pub struct AppModel {
    /// Configuration data that persists between application runs
    pub config: Config,
    /// The persisted code list
    pub store: CodeListStore<Box<dyn KeyValueStore>>,
    /// Pending scan awaiting accept/cancel
    pub confirmation: ConfirmationFlow,
    /// The scan view, when open; at most one session exists at a time
    pub scanner: Option<ScannerState>,
    /// Cursor position in the list view
    pub selected: usize,
    pub status: Option<StatusMessage>,
    pub show_help: bool,
    pub should_quit: bool,

    pub(crate) camera_backend: Arc<dyn CameraBackend>,
    pub(crate) decoder: Arc<dyn Decoder>,
    pub(crate) saver: Box<dyn FileSaver>,
}

impl AppModel {
    pub fn new(config: Config, services: AppServices) -> Self {
        Self {
            config,
            store: CodeListStore::open(services.store),
            confirmation: ConfirmationFlow::default(),
            scanner: None,
            selected: 0,
            status: None,
            show_help: false,
            should_quit: false,
            camera_backend: services.camera_backend,
            decoder: services.decoder,
            saver: services.saver,
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.scanner.is_some()
    }

    /// Code under the list cursor
    pub fn selected_code(&self) -> Option<&str> {
        self.store.get().get(self.selected)
    }
}

/// Messages emitted by the terminal loop and the scan session
#[derive(Debug, Clone)]
pub enum Message {
    // ===== Scanner =====
    /// Open the scan view and start a camera session
    OpenScanner,
    /// Close the scan view, stopping the session
    CloseScanner,
    /// Camera acquired by the session
    CameraOpened(CameraDevice),
    /// Camera could not be acquired or was lost
    CameraFailed(CameraError),
    /// Code decoded by the session
    CodeDecoded(String),
    /// New preview frame
    PreviewFrame(Arc<CameraFrame>),

    // ===== Confirmation =====
    AcceptPending,
    CancelPending,

    // ===== List =====
    SelectNext,
    SelectPrevious,
    DeleteSelected,
    Delete(String),
    Export(ExportFormat),

    // ===== System =====
    ToggleHelp,
    Quit,
}
