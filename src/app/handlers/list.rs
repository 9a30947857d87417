// SPDX-License-Identifier: GPL-3.0-only

//! List view handlers
//!
//! Cursor movement, deletion and export.

use crate::app::state::{AppModel, StatusMessage};
use crate::export::{ExportArtifact, ExportFormat};
use crate::fl;
use tracing::{error, info};

impl AppModel {
    pub(crate) fn handle_select_next(&mut self) {
        let len = self.store.get().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub(crate) fn handle_select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub(crate) fn handle_delete_selected(&mut self) {
        if let Some(code) = self.selected_code().map(str::to_owned) {
            self.handle_delete(code);
        }
    }

    /// Remove one code; absent codes are a no-op
    pub(crate) fn handle_delete(&mut self, code: String) {
        if !self.store.remove(&code) {
            return;
        }
        info!(code = %code, "Code deleted");
        let len = self.store.get().len();
        self.selected = self.selected.min(len.saturating_sub(1));
        self.status = Some(StatusMessage::Info(fl!("status-deleted", code = code)));
    }

    pub(crate) fn handle_export(&mut self, format: ExportFormat) {
        let artifact = ExportArtifact::new(self.store.get(), format);
        info!(
            format = format.display_name(),
            count = self.store.get().len(),
            "Exporting code list"
        );

        self.status = match self.saver.save(&artifact) {
            Ok(Some(path)) => Some(StatusMessage::Info(fl!(
                "status-exported",
                path = path.display().to_string()
            ))),
            Ok(None) => Some(StatusMessage::Info(fl!("status-export-cancelled"))),
            Err(e) => {
                error!(error = %e, "Export failed");
                Some(StatusMessage::Error(fl!(
                    "status-export-failed",
                    error = e.to_string()
                )))
            }
        };
    }
}
