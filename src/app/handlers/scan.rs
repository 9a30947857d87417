// SPDX-License-Identifier: GPL-3.0-only

//! Scanner handlers
//!
//! Opening and closing the scan view, camera status, decoded codes and the
//! accept/cancel decision on the pending code.

use crate::app::confirmation::AcceptOutcome;
use crate::app::scan_session::{ScanOptions, ScanSession};
use crate::app::state::{AppModel, ScannerState, ScannerStatus, StatusMessage};
use crate::backends::camera::types::{CameraDevice, CameraFrame, CameraRequest};
use crate::errors::CameraError;
use crate::fl;
use std::sync::Arc;
use tracing::{debug, info, warn};

impl AppModel {
    // =========================================================================
    // Scan View
    // =========================================================================

    pub(crate) fn handle_open_scanner(&mut self) {
        if self.scanner.is_some() {
            debug!("Scanner already open");
            return;
        }
        if self.confirmation.is_pending() {
            debug!("Confirmation open, not starting scanner");
            return;
        }

        let options = ScanOptions {
            request: CameraRequest {
                facing: self.config.preferred_facing,
                device_name: self.config.camera_device.clone(),
            },
            decode_interval: self.config.decode_interval(),
        };

        info!("Opening scanner");
        let session = ScanSession::start(
            Arc::clone(&self.camera_backend),
            Arc::clone(&self.decoder),
            options,
        );
        self.scanner = Some(ScannerState {
            session,
            status: ScannerStatus::Starting,
            preview: None,
        });
        self.status = None;
    }

    pub(crate) fn handle_close_scanner(&mut self) {
        if let Some(mut scanner) = self.scanner.take() {
            info!("Closing scanner");
            scanner.session.stop();
        }
    }

    pub(crate) fn handle_camera_opened(&mut self, device: CameraDevice) {
        let Some(scanner) = self.scanner.as_mut() else {
            return;
        };
        info!(device = %device.name, location = %device.location, "Camera streaming");
        scanner.status = ScannerStatus::Streaming(device);
    }

    pub(crate) fn handle_camera_failed(&mut self, error: CameraError) {
        let Some(scanner) = self.scanner.as_mut() else {
            return;
        };
        warn!(error = %error, "Camera unavailable");
        self.status = Some(StatusMessage::Error(
            fl!("status-camera-error", error = error.to_string()),
        ));
        scanner.status = ScannerStatus::Failed(error);
        scanner.preview = None;
    }

    pub(crate) fn handle_preview_frame(&mut self, frame: Arc<CameraFrame>) {
        if let Some(scanner) = self.scanner.as_mut() {
            scanner.preview = Some(frame);
        }
    }

    /// A decode moves the flow to pending and closes the scan view
    pub(crate) fn handle_code_decoded(&mut self, code: String) {
        if self.scanner.is_none() {
            debug!(code = %code, "Ignoring decode with no scan view open");
            return;
        }
        if self.confirmation.on_decoded(code) {
            self.handle_close_scanner();
        }
    }

    // =========================================================================
    // Confirmation
    // =========================================================================

    pub(crate) fn handle_accept_pending(&mut self) {
        match self.confirmation.accept(&mut self.store) {
            AcceptOutcome::Added(code) => {
                self.selected = self.store.get().len().saturating_sub(1);
                self.status = Some(StatusMessage::Info(fl!("status-added", code = code)));
            }
            AcceptOutcome::Duplicate(code) => {
                self.status = Some(StatusMessage::Error(fl!(
                    "status-duplicate",
                    code = code
                )));
            }
            AcceptOutcome::NothingPending => {}
        }
    }

    pub(crate) fn handle_cancel_pending(&mut self) {
        if self.confirmation.cancel().is_some() {
            self.status = None;
        }
    }

    /// Drain session events and the newest preview frame into messages
    pub fn poll_scanner(&mut self) -> Vec<crate::app::state::Message> {
        use crate::app::scan_session::ScanEvent;
        use crate::app::state::Message;

        let Some(scanner) = self.scanner.as_mut() else {
            return Vec::new();
        };

        let mut messages = Vec::new();
        while let Some(event) = scanner.session.try_next_event() {
            messages.push(match event {
                ScanEvent::Opened(device) => Message::CameraOpened(device),
                ScanEvent::Decoded(code) => Message::CodeDecoded(code),
                ScanEvent::Failed(error) => Message::CameraFailed(error),
            });
        }
        if let Some(frame) = scanner.session.latest_frame() {
            messages.push(Message::PreviewFrame(frame));
        }
        messages
    }
}
