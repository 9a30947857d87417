// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer capture pipeline
//!
//! `source ! videoconvert ! appsink(video/x-raw,format=RGBA)`. Frames are
//! pulled from the appsink by the session worker, so no callback outlives
//! the pipeline.

use super::super::CameraStream;
use super::super::types::*;
use crate::constants::timing;
use crate::errors::CameraError;
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Running camera pipeline
///
/// Dropping it sets the pipeline to `Null`, which releases the device.
pub struct GstCameraStream {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    device: CameraDevice,
    frame_count: u64,
}

impl GstCameraStream {
    /// Build the pipeline around `source` and bring it to PLAYING
    pub fn start(source: gstreamer::Element, device: CameraDevice) -> BackendResult<Self> {
        info!(device = %device.name, location = %device.location, "Creating camera pipeline");

        let pipeline = gstreamer::Pipeline::new();
        let convert = gstreamer::ElementFactory::make("videoconvert")
            .build()
            .map_err(|e| CameraError::InitializationFailed(e.to_string()))?;

        let caps = gstreamer::Caps::builder("video/x-raw")
            .field("format", "RGBA")
            .build();
        let appsink = AppSink::builder().caps(&caps).build();

        // Only the newest frames matter for scanning
        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", crate::constants::pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);

        pipeline
            .add_many([
                &source,
                &convert,
                appsink.upcast_ref::<gstreamer::Element>(),
            ])
            .map_err(|e| CameraError::InitializationFailed(e.to_string()))?;
        gstreamer::Element::link_many([
            &source,
            &convert,
            appsink.upcast_ref::<gstreamer::Element>(),
        ])
        .map_err(|e| CameraError::InitializationFailed(e.to_string()))?;

        let stream = Self {
            pipeline,
            appsink,
            device,
            frame_count: 0,
        };

        debug!("Setting pipeline to PLAYING state");
        if stream
            .pipeline
            .set_state(gstreamer::State::Playing)
            .is_err()
        {
            return Err(stream.pending_error(Duration::from_millis(500)).unwrap_or_else(|| {
                CameraError::InitializationFailed("Failed to start pipeline".to_string())
            }));
        }

        let (result, state, pending) = stream.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, pending = ?pending, "Pipeline state");
        if result.is_err() {
            return Err(stream.pending_error(Duration::ZERO).unwrap_or_else(|| {
                CameraError::InitializationFailed("Pipeline did not start".to_string())
            }));
        }

        info!("Camera pipeline running");
        Ok(stream)
    }

    /// First error posted on the bus, if any
    fn pending_error(&self, wait: Duration) -> Option<CameraError> {
        let bus = self.pipeline.bus()?;
        let message = bus.timed_pop_filtered(
            gstreamer::ClockTime::from_mseconds(wait.as_millis() as u64),
            &[gstreamer::MessageType::Error],
        )?;

        match message.view() {
            gstreamer::MessageView::Error(err) => {
                warn!(
                    error = %err.error(),
                    debug = ?err.debug(),
                    "Camera pipeline error"
                );
                Some(camera_error_from(&err.error()))
            }
            _ => None,
        }
    }
}

/// Map a GStreamer resource error onto the camera error kinds
fn camera_error_from(error: &gstreamer::glib::Error) -> CameraError {
    if error.matches(gstreamer::ResourceError::NotAuthorized) {
        CameraError::PermissionDenied
    } else if error.matches(gstreamer::ResourceError::Busy) {
        CameraError::Busy
    } else if error.matches(gstreamer::ResourceError::NotFound) {
        CameraError::NoCameraFound
    } else {
        CameraError::BackendError(error.to_string())
    }
}

impl CameraStream for GstCameraStream {
    fn device(&self) -> &CameraDevice {
        &self.device
    }

    fn next_frame(&mut self, timeout: Duration) -> BackendResult<Option<CameraFrame>> {
        if let Some(err) = self.pending_error(Duration::ZERO) {
            return Err(err);
        }

        let Some(sample) = self
            .appsink
            .try_pull_sample(gstreamer::ClockTime::from_mseconds(timeout.as_millis() as u64))
        else {
            if self.appsink.is_eos() {
                return Err(CameraError::Disconnected);
            }
            return Ok(None);
        };

        let frame = sample_to_frame(&sample);
        if frame.is_some() {
            self.frame_count += 1;
            if self.frame_count % 300 == 0 {
                debug!(frames = self.frame_count, "Camera frames received");
            }
        }
        Ok(frame)
    }
}

/// Copy an RGBA appsink sample into a [`CameraFrame`]
fn sample_to_frame(sample: &gstreamer::Sample) -> Option<CameraFrame> {
    let captured_at = Instant::now();
    let buffer = sample.buffer()?;
    let caps = sample.caps()?;
    let video_info = VideoInfo::from_caps(caps).ok()?;
    let map = buffer.map_readable().ok()?;

    Some(CameraFrame {
        width: video_info.width(),
        height: video_info.height(),
        data: Arc::from(map.as_slice()),
        format: PixelFormat::RGBA,
        stride: video_info.stride()[0] as u32,
        captured_at,
    })
}

impl Drop for GstCameraStream {
    fn drop(&mut self) {
        info!(device = %self.device.name, "Releasing camera");
        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            warn!(error = ?e, "Failed to stop camera pipeline");
            return;
        }
        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, "Camera pipeline stopped");
    }
}
