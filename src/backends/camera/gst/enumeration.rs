// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer camera enumeration
//!
//! Cameras are discovered through a `DeviceMonitor` filtered on
//! `Video/Source`, which covers PipeWire, libcamera and V4L2 providers.

use super::super::types::{CameraDevice, CameraLocation};
use gstreamer::prelude::*;
use tracing::{debug, info, warn};

/// Device properties that carry the camera mounting location
const LOCATION_PROPERTIES: [&str; 3] = [
    "api.libcamera.location",
    "camera.location",
    "device.location",
];

/// A discovered camera together with the GStreamer device used to open it
pub(super) struct DiscoveredCamera {
    pub info: CameraDevice,
    pub device: gstreamer::Device,
}

/// Enumerate video sources through the GStreamer device monitor
pub(super) fn discover_cameras() -> Vec<DiscoveredCamera> {
    let monitor = gstreamer::DeviceMonitor::new();
    let _ = monitor.add_filter(Some("Video/Source"), None);

    if let Err(e) = monitor.start() {
        warn!(error = %e, "Failed to start device monitor");
        return Vec::new();
    }

    let devices = monitor.devices();
    monitor.stop();

    let cameras: Vec<DiscoveredCamera> = devices
        .into_iter()
        .map(|device| {
            let name = device.display_name().to_string();
            let location = read_location(&device, &name);
            debug!(name = %name, location = %location, "Found video source");
            DiscoveredCamera {
                info: CameraDevice::new(name, location),
                device,
            }
        })
        .collect();

    info!(count = cameras.len(), "Cameras enumerated");
    cameras
}

fn read_location(device: &gstreamer::Device, name: &str) -> CameraLocation {
    if let Some(props) = device.properties() {
        for key in LOCATION_PROPERTIES {
            if let Ok(value) = props.get::<String>(key) {
                let location = CameraLocation::from_property(&value);
                if location != CameraLocation::Unknown {
                    return location;
                }
            }
        }
    }

    CameraLocation::from_name(name)
}
