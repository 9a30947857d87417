// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer camera backend
//!
//! Enumerates cameras with the device monitor and streams RGBA frames
//! through an appsink. When the monitor reports nothing, `autovideosrc`
//! gets a chance to find a camera on its own.

mod enumeration;
mod pipeline;

pub use pipeline::GstCameraStream;

use super::types::*;
use super::{CameraBackend, CameraStream};
use crate::errors::CameraError;
use gstreamer::prelude::*;
use tracing::{info, warn};

/// GStreamer backend implementation
#[derive(Debug, Default)]
pub struct GstCameraBackend;

impl GstCameraBackend {
    pub fn new() -> Self {
        Self
    }
}

fn init_gstreamer() -> BackendResult<()> {
    gstreamer::init().map_err(|e| CameraError::InitializationFailed(e.to_string()))
}

impl CameraBackend for GstCameraBackend {
    fn enumerate_cameras(&self) -> BackendResult<Vec<CameraDevice>> {
        init_gstreamer()?;
        Ok(enumeration::discover_cameras()
            .into_iter()
            .map(|camera| camera.info)
            .collect())
    }

    fn open(&self, request: &CameraRequest) -> BackendResult<Box<dyn CameraStream>> {
        init_gstreamer()?;

        let cameras = enumeration::discover_cameras();
        let (source, device) = if cameras.is_empty() {
            warn!("Device monitor found no cameras, trying autovideosrc");
            let source = gstreamer::ElementFactory::make("autovideosrc")
                .name("source")
                .build()
                .map_err(|_| CameraError::NoCameraFound)?;
            (
                source,
                CameraDevice::new("Default camera", CameraLocation::Unknown),
            )
        } else {
            let infos: Vec<CameraDevice> = cameras.iter().map(|c| c.info.clone()).collect();
            let index = select_device(&infos, request).ok_or(CameraError::NoCameraFound)?;
            let camera = &cameras[index];
            info!(
                device = %camera.info.name,
                location = %camera.info.location,
                facing = ?request.facing,
                "Selected camera"
            );
            let source = camera
                .device
                .create_element(Some("source"))
                .map_err(|e| CameraError::InitializationFailed(e.to_string()))?;
            (source, camera.info.clone())
        };

        Ok(Box::new(GstCameraStream::start(source, device)?))
    }

    fn name(&self) -> &'static str {
        "gstreamer"
    }
}
