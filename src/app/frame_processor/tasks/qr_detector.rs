// SPDX-License-Identifier: GPL-3.0-only

//! QR code detection task
//!
//! Converts camera frames to grayscale, downscales them, and hands them to
//! `rqrr`. The first grid that decodes to a non-empty payload wins.

use crate::app::frame_processor::types::{DecodeOutcome, Decoder};
use crate::backends::camera::types::CameraFrame;
use crate::constants::decoder::DEFAULT_MAX_DIMENSION;
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use tracing::{debug, trace};

/// QR code detector
///
/// Optimized for real-time processing with frame downscaling.
#[derive(Debug, Clone)]
pub struct QrDetector {
    /// Maximum dimension for processing (frames are downscaled to this)
    max_dimension: u32,
}

impl Default for QrDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl QrDetector {
    pub fn new() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }

    /// Create a QR detector with custom max dimension
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }
}

impl QrDetector {
    /// Look for a QR code in an already prepared grayscale image
    pub(crate) fn decode_gray(&self, gray: &GrayImage) -> DecodeOutcome {
        let start = std::time::Instant::now();

        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return DecodeOutcome::NotFound;
        }

        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width as usize, height as usize, |x, y| {
                gray.get_pixel(x as u32, y as u32)[0]
            });
        let grids = prepared.detect_grids();
        trace!(
            grids = grids.len(),
            width,
            height,
            elapsed_ms = start.elapsed().as_millis(),
            "QR grid detection complete"
        );

        for grid in grids {
            match grid.decode() {
                Ok((_meta, content)) => {
                    let content = content.trim();
                    if content.is_empty() {
                        continue;
                    }
                    debug!(
                        content = %content,
                        total_ms = start.elapsed().as_millis(),
                        "Detected code"
                    );
                    return DecodeOutcome::Found(content.to_string());
                }
                Err(e) => debug!(error = ?e, "Failed to decode QR grid"),
            }
        }

        DecodeOutcome::NotFound
    }
}

impl Decoder for QrDetector {
    fn decode(&self, frame: &CameraFrame) -> DecodeOutcome {
        self.decode_gray(&prepare_grayscale(frame, self.max_dimension))
    }
}

/// Grayscale copy of the frame, downscaled so neither side exceeds `max_dimension`
pub(crate) fn prepare_grayscale(frame: &CameraFrame, max_dimension: u32) -> GrayImage {
    let gray = GrayImage::from_fn(frame.width, frame.height, |x, y| {
        Luma([frame.luma_at(x, y)])
    });

    if frame.width <= max_dimension && frame.height <= max_dimension {
        return gray;
    }

    let scale = (frame.width as f32 / max_dimension as f32)
        .max(frame.height as f32 / max_dimension as f32);
    let new_width = ((frame.width as f32 / scale) as u32).max(1);
    let new_height = ((frame.height as f32 / scale) as u32).max(1);

    imageops::resize(&gray, new_width, new_height, FilterType::Triangle)
}
