// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │     ScanSession     │  ← owns one stream on its worker thread
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│  ← enumeration + open
//! └──────────┬──────────┘
//!            │
//!            ▼
//!      ┌───────────┐
//!      │ GStreamer │  ← device monitor + appsink
//!      └───────────┘
//! ```

pub mod gst;
pub mod types;

pub use gst::GstCameraBackend;
pub use types::*;

use std::time::Duration;

/// Camera backend trait
///
/// Backends are shared between the UI thread and the session worker, so
/// they must be `Send + Sync`. Opening returns an owned stream; dropping the
/// stream releases the device.
pub trait CameraBackend: Send + Sync {
    /// Enumerate available cameras
    fn enumerate_cameras(&self) -> BackendResult<Vec<CameraDevice>>;

    /// Acquire the camera best matching `request` and start streaming
    ///
    /// # Returns
    /// * `Ok(stream)` - Camera acquired, frames are flowing
    /// * `Err(CameraError)` - Permission denied, no device, busy, ...
    fn open(&self, request: &CameraRequest) -> BackendResult<Box<dyn CameraStream>>;

    /// Short backend identifier for logs
    fn name(&self) -> &'static str;
}

/// An open camera stream
pub trait CameraStream: Send {
    /// Device backing this stream
    fn device(&self) -> &CameraDevice;

    /// Wait up to `timeout` for the next frame
    ///
    /// # Returns
    /// * `Ok(Some(frame))` - A new frame
    /// * `Ok(None)` - No frame within the timeout
    /// * `Err(CameraError)` - The stream failed and will not recover
    fn next_frame(&mut self, timeout: Duration) -> BackendResult<Option<CameraFrame>>;
}

/// Get the default backend (GStreamer)
pub fn get_backend() -> Box<dyn CameraBackend> {
    Box::new(GstCameraBackend::new())
}
