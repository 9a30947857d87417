// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The `update()` function is a dispatcher; the handlers live in the
//! `handlers` submodules:
//!
//! - `handlers::scan`: scan view, camera status, decoded codes, accept/cancel
//! - `handlers::list`: cursor, delete, export

use crate::app::state::{AppModel, Message};
use tracing::info;

impl AppModel {
    /// Main message handler, routes messages to handler methods
    pub fn update(&mut self, message: Message) {
        match message {
            // ===== Scanner =====
            Message::OpenScanner => self.handle_open_scanner(),
            Message::CloseScanner => self.handle_close_scanner(),
            Message::CameraOpened(device) => self.handle_camera_opened(device),
            Message::CameraFailed(error) => self.handle_camera_failed(error),
            Message::CodeDecoded(code) => self.handle_code_decoded(code),
            Message::PreviewFrame(frame) => self.handle_preview_frame(frame),

            // ===== Confirmation =====
            Message::AcceptPending => self.handle_accept_pending(),
            Message::CancelPending => self.handle_cancel_pending(),

            // ===== List =====
            Message::SelectNext => self.handle_select_next(),
            Message::SelectPrevious => self.handle_select_previous(),
            Message::DeleteSelected => self.handle_delete_selected(),
            Message::Delete(code) => self.handle_delete(code),
            Message::Export(format) => self.handle_export(format),

            // ===== System =====
            Message::ToggleHelp => self.show_help = !self.show_help,
            Message::Quit => {
                info!("Quit requested");
                if let Some(mut scanner) = self.scanner.take() {
                    scanner.session.stop_and_wait();
                }
                self.should_quit = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::confirmation::ConfirmationFlow;
    use crate::app::frame_processor::DecodeOutcome;
    use crate::app::state::{AppModel, AppServices, Message, ScannerStatus};
    use crate::backends::camera::{
        BackendResult, CameraBackend, CameraDevice, CameraFrame, CameraLocation, CameraRequest,
        CameraStream, PixelFormat,
    };
    use crate::config::Config;
    use crate::constants::storage::LIST_KEY;
    use crate::errors::{CameraError, ExportError};
    use crate::export::{ExportArtifact, ExportFormat, FileSaver};
    use crate::storage::MemoryStore;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    struct StaticStream(CameraDevice);

    impl CameraStream for StaticStream {
        fn device(&self) -> &CameraDevice {
            &self.0
        }

        fn next_frame(&mut self, _timeout: Duration) -> BackendResult<Option<CameraFrame>> {
            std::thread::sleep(Duration::from_millis(2));
            Ok(Some(CameraFrame::packed(1, 1, PixelFormat::Gray8, vec![0])))
        }
    }

    struct TestBackend(Option<CameraError>);

    impl CameraBackend for TestBackend {
        fn enumerate_cameras(&self) -> BackendResult<Vec<CameraDevice>> {
            Ok(Vec::new())
        }

        fn open(&self, _request: &CameraRequest) -> BackendResult<Box<dyn CameraStream>> {
            match &self.0 {
                Some(err) => Err(err.clone()),
                None => Ok(Box::new(StaticStream(CameraDevice::new(
                    "Test camera",
                    CameraLocation::Back,
                )))),
            }
        }

        fn name(&self) -> &'static str {
            "test"
        }
    }

    struct CrashingBackend;

    impl CameraBackend for CrashingBackend {
        fn enumerate_cameras(&self) -> BackendResult<Vec<CameraDevice>> {
            Ok(Vec::new())
        }

        fn open(&self, _request: &CameraRequest) -> BackendResult<Box<dyn CameraStream>> {
            panic!("camera driver crashed");
        }

        fn name(&self) -> &'static str {
            "crashing"
        }
    }

    #[derive(Default, Clone)]
    struct RecordingSaver(Arc<Mutex<Vec<ExportArtifact>>>);

    impl FileSaver for RecordingSaver {
        fn save(&self, artifact: &ExportArtifact) -> Result<Option<PathBuf>, ExportError> {
            self.0.lock().unwrap().push(artifact.clone());
            Ok(Some(PathBuf::from("/tmp").join(&artifact.file_name)))
        }
    }

    fn model(backend: TestBackend, codes: &str, saver: RecordingSaver) -> AppModel {
        let store = MemoryStore::new().with_entry(LIST_KEY, codes);
        AppModel::new(
            Config::default(),
            AppServices {
                store: Box::new(store),
                camera_backend: Arc::new(backend),
                decoder: Arc::new(|_: &CameraFrame| DecodeOutcome::Found("9780306406157".into())),
                saver: Box::new(saver),
            },
        )
    }

    /// Poll the scanner until `pred` matches a message, applying everything
    fn pump_until(app: &mut AppModel, pred: impl Fn(&Message) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let messages = app.poll_scanner();
            let mut hit = false;
            for message in messages {
                hit |= pred(&message);
                app.update(message);
            }
            if hit {
                return;
            }
            assert!(Instant::now() < deadline, "timed out polling scanner");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_camera_failure_leaves_list_and_flow_unchanged() {
        let mut app = model(
            TestBackend(Some(CameraError::NoCameraFound)),
            r#"["A","B"]"#,
            RecordingSaver::default(),
        );

        app.update(Message::OpenScanner);
        pump_until(&mut app, |m| matches!(m, Message::CameraFailed(_)));

        let scanner = app.scanner.as_ref().expect("scan view stays open");
        assert_eq!(
            scanner.status,
            ScannerStatus::Failed(CameraError::NoCameraFound)
        );
        assert!(app.status.as_ref().is_some_and(|s| s.is_error()));
        assert_eq!(app.store.get().as_slice(), ["A", "B"]);
        assert_eq!(app.confirmation, ConfirmationFlow::Idle);

        app.update(Message::CloseScanner);
        app.update(Message::CloseScanner);
        assert!(!app.is_scanning());
    }

    #[test]
    fn test_crashed_worker_shows_camera_error() {
        let mut app = AppModel::new(
            Config::default(),
            AppServices {
                store: Box::new(MemoryStore::new().with_entry(LIST_KEY, r#"["A"]"#)),
                camera_backend: Arc::new(CrashingBackend),
                decoder: Arc::new(|_: &CameraFrame| DecodeOutcome::NotFound),
                saver: Box::new(RecordingSaver::default()),
            },
        );

        app.update(Message::OpenScanner);
        pump_until(&mut app, |m| matches!(m, Message::CameraFailed(_)));

        let scanner = app.scanner.as_ref().expect("scan view stays open");
        assert_eq!(scanner.status, ScannerStatus::Failed(CameraError::Disconnected));
        assert!(app.status.as_ref().is_some_and(|s| s.is_error()));
        assert_eq!(app.store.get().as_slice(), ["A"]);

        app.update(Message::CloseScanner);
        assert!(!app.is_scanning());
    }

    #[test]
    fn test_decode_opens_confirmation_and_closes_scanner() {
        let mut app = model(TestBackend(None), "[]", RecordingSaver::default());

        app.update(Message::OpenScanner);
        pump_until(&mut app, |m| matches!(m, Message::CodeDecoded(_)));

        assert!(!app.is_scanning());
        assert_eq!(app.confirmation.pending(), Some("9780306406157"));

        app.update(Message::AcceptPending);
        assert_eq!(app.store.get().as_slice(), ["9780306406157"]);
        assert_eq!(app.confirmation, ConfirmationFlow::Idle);
    }

    #[test]
    fn test_decode_without_scan_view_is_ignored() {
        let mut app = model(TestBackend(None), "[]", RecordingSaver::default());
        app.update(Message::CodeDecoded("late".into()));
        assert_eq!(app.confirmation, ConfirmationFlow::Idle);
    }

    #[test]
    fn test_duplicate_accept_is_noop() {
        let mut app = model(TestBackend(None), r#"["A"]"#, RecordingSaver::default());
        app.update(Message::OpenScanner);
        app.update(Message::CodeDecoded("A".into()));
        assert!(!app.is_scanning());

        app.update(Message::AcceptPending);
        assert_eq!(app.store.get().as_slice(), ["A"]);
        assert_eq!(app.confirmation.pending(), Some("A"));

        app.update(Message::CancelPending);
        assert_eq!(app.confirmation, ConfirmationFlow::Idle);
    }

    #[test]
    fn test_delete_and_selection() {
        let mut app = model(TestBackend(None), r#"["A","B","C"]"#, RecordingSaver::default());

        app.update(Message::SelectNext);
        app.update(Message::SelectNext);
        app.update(Message::SelectNext);
        assert_eq!(app.selected_code(), Some("C"));

        app.update(Message::DeleteSelected);
        assert_eq!(app.store.get().as_slice(), ["A", "B"]);
        assert_eq!(app.selected_code(), Some("B"));

        app.update(Message::Delete("missing".into()));
        assert_eq!(app.store.get().as_slice(), ["A", "B"]);

        app.update(Message::SelectPrevious);
        app.update(Message::SelectPrevious);
        assert_eq!(app.selected_code(), Some("A"));
    }

    #[test]
    fn test_export_hands_artifact_to_saver() {
        let saver = RecordingSaver::default();
        let mut app = model(TestBackend(None), r#"["A","B"]"#, saver.clone());

        app.update(Message::Export(ExportFormat::Csv));
        app.update(Message::Export(ExportFormat::Text));

        let saved = saver.0.lock().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].content, "ISBN\nA\nB");
        assert_eq!(saved[0].file_name, "isbns.csv");
        assert_eq!(saved[1].content, "A\nB");
        assert_eq!(saved[1].mime_type, "text/plain");
        assert!(app.status.as_ref().is_some_and(|s| !s.is_error()));
    }

    #[test]
    fn test_quit_stops_scanner() {
        let mut app = model(TestBackend(None), "[]", RecordingSaver::default());
        app.update(Message::OpenScanner);
        app.update(Message::Quit);
        assert!(app.should_quit);
        assert!(!app.is_scanning());
    }
}
