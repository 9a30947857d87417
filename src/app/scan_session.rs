// SPDX-License-Identifier: GPL-3.0-only

//! Camera decode session
//!
//! A session pairs one open camera stream with one decode loop. Both live on
//! a worker thread; the UI only sees two channels:
//!
//! - events ([`ScanEvent`]): camera opened, camera failed, code decoded
//! - preview frames: newest frames for display, dropped when the UI lags
//!
//! A worker that goes away without reporting (it panicked, or could not be
//! spawned) shows up as a single [`ScanEvent::Failed`].
//!
//! Stopping a session closes and drops both receivers. Anything the worker
//! produces afterwards, including a decode that was already running, has
//! nowhere to go: the next send fails and the worker exits, dropping the
//! camera stream.

use crate::backends::camera::{CameraBackend, CameraDevice, CameraFrame, CameraRequest};
use crate::app::frame_processor::{DecodeOutcome, Decoder};
use crate::constants::{channels, timing};
use crate::errors::CameraError;
use futures::channel::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Event delivered by a running session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// The camera was acquired and frames are flowing
    Opened(CameraDevice),
    /// A code was decoded from a frame
    Decoded(String),
    /// The camera could not be acquired or the stream died; terminal
    Failed(CameraError),
}

/// Session settings
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub request: CameraRequest,
    /// Minimum time between two decode attempts
    pub decode_interval: Duration,
}

struct SessionChannels {
    events: mpsc::Receiver<ScanEvent>,
    frames: mpsc::Receiver<Arc<CameraFrame>>,
}

/// Handle to a running camera decode session
///
/// At most one should exist at a time; the application enforces this by
/// keeping it in a single `Option`. Dropping the handle stops the session.
pub struct ScanSession {
    channels: Option<SessionChannels>,
    worker: Option<JoinHandle<()>>,
    /// A terminal `Failed` event has been handed out
    failed: bool,
}

impl ScanSession {
    /// Spawn the worker, which requests the camera and starts decoding
    ///
    /// Camera acquisition happens on the worker, so this returns immediately;
    /// the outcome arrives as [`ScanEvent::Opened`] or [`ScanEvent::Failed`].
    pub fn start(
        backend: Arc<dyn CameraBackend>,
        decoder: Arc<dyn Decoder>,
        options: ScanOptions,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel(channels::EVENT_CAPACITY);
        let (frame_tx, frame_rx) = mpsc::channel(channels::PREVIEW_CAPACITY);

        info!(backend = backend.name(), facing = ?options.request.facing, "Starting scan session");

        let worker = thread::Builder::new()
            .name("scan-session".to_string())
            .spawn(move || {
                let worker = SessionWorker {
                    backend,
                    decoder,
                    options,
                    events: event_tx,
                    frames: frame_tx,
                };
                worker.run();
            });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                // Without a worker the session is dead from the start
                warn!(error = %e, "Failed to spawn scan session thread");
                None
            }
        };

        Self {
            channels: Some(SessionChannels {
                events: event_rx,
                frames: frame_rx,
            }),
            worker,
            failed: false,
        }
    }

    /// Next pending event, without blocking
    ///
    /// Always `None` once the session is stopped.
    pub fn try_next_event(&mut self) -> Option<ScanEvent> {
        let channels = self.channels.as_mut()?;
        match channels.events.try_next() {
            Ok(Some(event)) => {
                if matches!(event, ScanEvent::Failed(_)) {
                    self.failed = true;
                }
                Some(event)
            }
            // Sender gone without a Failed event
            Ok(None) if !self.failed => {
                warn!("Scan session worker exited without reporting");
                self.failed = true;
                Some(ScanEvent::Failed(CameraError::Disconnected))
            }
            Ok(None) | Err(_) => None,
        }
    }

    /// Newest preview frame received since the last call
    pub fn latest_frame(&mut self) -> Option<Arc<CameraFrame>> {
        let channels = self.channels.as_mut()?;
        let mut latest = None;
        while let Ok(Some(frame)) = channels.frames.try_next() {
            latest = Some(frame);
        }
        latest
    }

    /// Stop the session without waiting for the worker
    ///
    /// Closes both channels and discards anything buffered. Safe to call any
    /// number of times, including after the camera failed to open.
    pub fn stop(&mut self) {
        if let Some(mut channels) = self.channels.take() {
            debug!("Closing scan session channels");
            channels.events.close();
            channels.frames.close();
        }
    }

    /// Stop the session and wait until the camera has been released
    pub fn stop_and_wait(&mut self) {
        self.stop();
        if let Some(handle) = self.worker.take() {
            debug!("Waiting for scan session thread to finish");
            if let Err(e) = handle.join() {
                warn!("Scan session thread panicked: {:?}", e);
            }
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.channels.is_none()
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.stop();
    }
}

struct SessionWorker {
    backend: Arc<dyn CameraBackend>,
    decoder: Arc<dyn Decoder>,
    options: ScanOptions,
    events: mpsc::Sender<ScanEvent>,
    frames: mpsc::Sender<Arc<CameraFrame>>,
}

impl SessionWorker {
    fn run(mut self) {
        let mut stream = match self.backend.open(&self.options.request) {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "Camera unavailable");
                let _ = self.events.try_send(ScanEvent::Failed(e));
                return;
            }
        };

        let device = stream.device().clone();
        if self.events.try_send(ScanEvent::Opened(device)).is_err() {
            debug!("Session stopped while the camera was opening");
            return;
        }

        let mut last_decode: Option<Instant> = None;

        loop {
            if self.events.is_closed() {
                break;
            }

            let frame = match stream.next_frame(timing::FRAME_POLL_TIMEOUT) {
                Ok(Some(frame)) => Arc::new(frame),
                Ok(None) => continue,
                Err(e) => {
                    warn!(error = %e, "Camera stream failed");
                    let _ = self.events.try_send(ScanEvent::Failed(e));
                    break;
                }
            };

            if let Err(e) = self.frames.try_send(Arc::clone(&frame))
                && e.is_disconnected()
            {
                break;
            }

            if last_decode.is_some_and(|at| at.elapsed() < self.options.decode_interval) {
                continue;
            }
            last_decode = Some(Instant::now());

            if let DecodeOutcome::Found(text) = self.decoder.decode(&frame) {
                match self.events.try_send(ScanEvent::Decoded(text)) {
                    Ok(()) => {}
                    Err(e) if e.is_disconnected() => break,
                    Err(_) => debug!("Event channel full, dropping repeated decode"),
                }
            }
        }

        drop(stream);
        info!("Scan session finished, camera released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::camera::{
        BackendResult, CameraLocation, CameraStream, PixelFormat,
    };
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::mpsc as std_mpsc;

    struct FakeStream {
        device: CameraDevice,
        released: Arc<AtomicBool>,
    }

    impl CameraStream for FakeStream {
        fn device(&self) -> &CameraDevice {
            &self.device
        }

        fn next_frame(&mut self, _timeout: Duration) -> BackendResult<Option<CameraFrame>> {
            thread::sleep(Duration::from_millis(2));
            Ok(Some(CameraFrame::packed(2, 2, PixelFormat::Gray8, vec![0; 4])))
        }
    }

    impl Drop for FakeStream {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    struct FakeBackend {
        fail_with: Option<CameraError>,
        released: Arc<AtomicBool>,
    }

    impl FakeBackend {
        fn working() -> Self {
            Self {
                fail_with: None,
                released: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    impl CameraBackend for FakeBackend {
        fn enumerate_cameras(&self) -> BackendResult<Vec<CameraDevice>> {
            Ok(vec![CameraDevice::new("Fake", CameraLocation::Back)])
        }

        fn open(&self, _request: &CameraRequest) -> BackendResult<Box<dyn CameraStream>> {
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            Ok(Box::new(FakeStream {
                device: CameraDevice::new("Fake", CameraLocation::Back),
                released: Arc::clone(&self.released),
            }))
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    fn wait_for_event(session: &mut ScanSession) -> ScanEvent {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(event) = session.try_next_event() {
                return event;
            }
            assert!(Instant::now() < deadline, "timed out waiting for event");
            thread::sleep(Duration::from_millis(1));
        }
    }

    fn always_found(_frame: &CameraFrame) -> DecodeOutcome {
        DecodeOutcome::Found("9780306406157".to_string())
    }

    #[test]
    fn test_decodes_are_delivered() {
        let mut session = ScanSession::start(
            Arc::new(FakeBackend::working()),
            Arc::new(always_found),
            ScanOptions::default(),
        );

        assert!(matches!(wait_for_event(&mut session), ScanEvent::Opened(_)));
        assert_eq!(
            wait_for_event(&mut session),
            ScanEvent::Decoded("9780306406157".to_string())
        );
        session.stop_and_wait();
    }

    #[test]
    fn test_open_failure_is_reported() {
        let backend = FakeBackend {
            fail_with: Some(CameraError::PermissionDenied),
            released: Arc::new(AtomicBool::new(false)),
        };
        let mut session =
            ScanSession::start(Arc::new(backend), Arc::new(always_found), ScanOptions::default());

        assert_eq!(
            wait_for_event(&mut session),
            ScanEvent::Failed(CameraError::PermissionDenied)
        );

        // Stopping a dead session is fine, twice
        session.stop_and_wait();
        session.stop_and_wait();
        assert!(session.is_stopped());
        assert!(session.try_next_event().is_none());
    }

    struct PanickingBackend;

    impl CameraBackend for PanickingBackend {
        fn enumerate_cameras(&self) -> BackendResult<Vec<CameraDevice>> {
            Ok(Vec::new())
        }

        fn open(&self, _request: &CameraRequest) -> BackendResult<Box<dyn CameraStream>> {
            panic!("camera driver crashed");
        }

        fn name(&self) -> &'static str {
            "panicking"
        }
    }

    #[test]
    fn test_worker_panic_is_reported_once() {
        let mut session = ScanSession::start(
            Arc::new(PanickingBackend),
            Arc::new(always_found),
            ScanOptions::default(),
        );

        assert_eq!(
            wait_for_event(&mut session),
            ScanEvent::Failed(CameraError::Disconnected)
        );
        assert!(session.try_next_event().is_none());
        assert!(session.try_next_event().is_none());
        session.stop_and_wait();
    }

    #[test]
    fn test_reported_failure_is_not_repeated() {
        let backend = FakeBackend {
            fail_with: Some(CameraError::Busy),
            released: Arc::new(AtomicBool::new(false)),
        };
        let mut session =
            ScanSession::start(Arc::new(backend), Arc::new(always_found), ScanOptions::default());

        assert_eq!(wait_for_event(&mut session), ScanEvent::Failed(CameraError::Busy));

        // The worker is gone now; its closed channel must not add a second failure
        thread::sleep(Duration::from_millis(50));
        assert!(session.try_next_event().is_none());
        session.stop_and_wait();
    }

    #[test]
    fn test_no_events_after_stop_even_mid_decode() {
        let (entered_tx, entered_rx) = std_mpsc::channel::<()>();
        let (release_tx, release_rx) = std_mpsc::channel::<()>();
        let entered_tx = Mutex::new(entered_tx);
        let release_rx = Mutex::new(release_rx);

        // Blocks inside the first decode until the test lets it finish
        let blocking_decoder = move |_frame: &CameraFrame| {
            let _ = entered_tx.lock().unwrap().send(());
            let _ = release_rx.lock().unwrap().recv();
            DecodeOutcome::Found("late".to_string())
        };

        let backend = FakeBackend::working();
        let released = Arc::clone(&backend.released);
        let mut session =
            ScanSession::start(Arc::new(backend), Arc::new(blocking_decoder), ScanOptions::default());

        assert!(matches!(wait_for_event(&mut session), ScanEvent::Opened(_)));
        entered_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("decoder was never called");

        session.stop();
        drop(release_tx);

        session.stop_and_wait();
        assert!(session.try_next_event().is_none());
        assert!(session.latest_frame().is_none());
        assert!(released.load(Ordering::SeqCst), "camera was not released");
    }

    #[test]
    fn test_decode_interval_is_respected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let counting_decoder = move |_frame: &CameraFrame| {
            counter.fetch_add(1, Ordering::SeqCst);
            DecodeOutcome::NotFound
        };

        let mut session = ScanSession::start(
            Arc::new(FakeBackend::working()),
            Arc::new(counting_decoder),
            ScanOptions {
                request: CameraRequest::default(),
                decode_interval: Duration::from_secs(60),
            },
        );

        assert!(matches!(wait_for_event(&mut session), ScanEvent::Opened(_)));
        thread::sleep(Duration::from_millis(50));
        session.stop_and_wait();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_preview_frames_are_available() {
        let mut session = ScanSession::start(
            Arc::new(FakeBackend::working()),
            Arc::new(|_: &CameraFrame| DecodeOutcome::NotFound),
            ScanOptions::default(),
        );

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut frame = None;
        while frame.is_none() && Instant::now() < deadline {
            frame = session.latest_frame();
            thread::sleep(Duration::from_millis(1));
        }
        assert!(frame.is_some());
        session.stop_and_wait();
    }
}
