// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use crate::errors::CameraError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, CameraError>;

/// Which way the requested camera should face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CameraFacing {
    /// Rear camera pointing away from the user (best for scanning)
    #[default]
    Environment,
    /// Front camera pointing at the user
    User,
    /// First camera found
    Any,
}

/// Physical mounting of a camera, as reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CameraLocation {
    Back,
    Front,
    External,
    #[default]
    Unknown,
}

impl CameraLocation {
    /// Parse a location property value ("back", "front", "external")
    pub fn from_property(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "back" | "rear" | "environment" => CameraLocation::Back,
            "front" | "user" => CameraLocation::Front,
            "external" => CameraLocation::External,
            _ => CameraLocation::Unknown,
        }
    }

    /// Guess the location from a device display name
    pub fn from_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if ["back", "rear", "environment", "world"]
            .iter()
            .any(|hint| name.contains(hint))
        {
            CameraLocation::Back
        } else if ["front", "user", "selfie"]
            .iter()
            .any(|hint| name.contains(hint))
        {
            CameraLocation::Front
        } else {
            CameraLocation::Unknown
        }
    }

    /// Rank for a facing preference, lower is better
    fn rank(&self, facing: CameraFacing) -> u8 {
        match (facing, self) {
            (CameraFacing::Any, _) => 0,
            (CameraFacing::Environment, CameraLocation::Back) => 0,
            (CameraFacing::Environment, CameraLocation::External) => 1,
            (CameraFacing::Environment, CameraLocation::Unknown) => 2,
            (CameraFacing::Environment, CameraLocation::Front) => 3,
            (CameraFacing::User, CameraLocation::Front) => 0,
            (CameraFacing::User, CameraLocation::External) => 1,
            (CameraFacing::User, CameraLocation::Unknown) => 2,
            (CameraFacing::User, CameraLocation::Back) => 3,
        }
    }
}

impl std::fmt::Display for CameraLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraLocation::Back => write!(f, "back"),
            CameraLocation::Front => write!(f, "front"),
            CameraLocation::External => write!(f, "external"),
            CameraLocation::Unknown => write!(f, "unknown"),
        }
    }
}

/// Represents a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    pub location: CameraLocation,
}

impl CameraDevice {
    pub fn new(name: impl Into<String>, location: CameraLocation) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// What the session asks the backend for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraRequest {
    pub facing: CameraFacing,
    /// Pin a device whose name contains this (case-insensitive)
    pub device_name: Option<String>,
}

/// Pick the device best matching `request`
///
/// A pinned name wins when it matches; otherwise the facing preference
/// decides, keeping enumeration order among equals.
pub fn select_device(devices: &[CameraDevice], request: &CameraRequest) -> Option<usize> {
    if let Some(wanted) = request.device_name.as_deref() {
        let wanted = wanted.to_ascii_lowercase();
        if let Some(index) = devices
            .iter()
            .position(|d| d.name.to_ascii_lowercase().contains(&wanted))
        {
            return Some(index);
        }
        tracing::warn!(device = %wanted, "Pinned camera not found, using facing preference");
    }

    devices
        .iter()
        .enumerate()
        .min_by_key(|(index, d)| (d.location.rank(request.facing), *index))
        .map(|(index, _)| index)
}

/// Pixel format for camera frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// RGBA - 32-bit with alpha (4 bytes per pixel)
    RGBA,
    /// Gray8 - 8-bit grayscale (single channel)
    Gray8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            PixelFormat::RGBA => 4,
            PixelFormat::Gray8 => 1,
        }
    }
}

/// A single frame from the camera
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
    pub format: PixelFormat,
    /// Bytes per row, may include padding
    pub stride: u32,
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build a tightly packed frame
    pub fn packed(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            stride: width * format.bytes_per_pixel(),
            data: Arc::from(data),
            format,
            captured_at: Instant::now(),
        }
    }

    /// Luma of the pixel at (x, y), clamped to the frame
    pub fn luma_at(&self, x: u32, y: u32) -> u8 {
        let (r, g, b) = self.rgb_at(x, y);
        // BT.601 weights
        ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000) as u8
    }

    /// RGB of the pixel at (x, y), clamped to the frame
    pub fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        if self.width == 0 || self.height == 0 {
            return (0, 0, 0);
        }
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let idx = (y * self.stride + x * self.format.bytes_per_pixel()) as usize;

        match self.format {
            PixelFormat::RGBA => match self.data.get(idx..idx + 3) {
                Some(px) => (px[0], px[1], px[2]),
                None => (0, 0, 0),
            },
            PixelFormat::Gray8 => {
                let v = self.data.get(idx).copied().unwrap_or(0);
                (v, v, v)
            }
        }
    }
}
