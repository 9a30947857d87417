// SPDX-License-Identifier: GPL-3.0-only

//! Book barcode detection task
//!
//! ISBNs are printed as EAN-13 barcodes. Frames are converted to grayscale and
//! downscaled the same way as for QR detection, then handed to `rxing`'s
//! EAN-13 reader. Frames without a barcode fall through to [`QrDetector`].

use super::qr_detector::{QrDetector, prepare_grayscale};
use crate::app::frame_processor::types::{DecodeOutcome, Decoder};
use crate::backends::camera::types::CameraFrame;
use crate::constants::decoder::DEFAULT_MAX_DIMENSION;
use image::GrayImage;
use rxing::BarcodeFormat;
use tracing::{debug, trace};

/// EAN-13 barcode detector with a QR fallback
#[derive(Debug, Clone)]
pub struct BarcodeDetector {
    /// Maximum dimension for processing (frames are downscaled to this)
    max_dimension: u32,
    qr: QrDetector,
}

impl Default for BarcodeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl BarcodeDetector {
    pub fn new() -> Self {
        Self::with_max_dimension(DEFAULT_MAX_DIMENSION)
    }

    pub fn with_max_dimension(max_dimension: u32) -> Self {
        let max_dimension = max_dimension.max(1);
        Self {
            max_dimension,
            qr: QrDetector::with_max_dimension(max_dimension),
        }
    }

    fn decode_linear(&self, gray: &GrayImage) -> DecodeOutcome {
        let start = std::time::Instant::now();
        let (width, height) = gray.dimensions();

        match rxing::helpers::detect_in_luma(
            gray.as_raw().clone(),
            width,
            height,
            Some(BarcodeFormat::EAN_13),
        ) {
            Ok(result) => {
                let text = result.getText().trim();
                if text.is_empty() {
                    return DecodeOutcome::NotFound;
                }
                debug!(
                    content = %text,
                    total_ms = start.elapsed().as_millis(),
                    "Detected barcode"
                );
                DecodeOutcome::Found(text.to_string())
            }
            Err(e) => {
                trace!(error = %e, elapsed_ms = start.elapsed().as_millis(), "No barcode in frame");
                DecodeOutcome::NotFound
            }
        }
    }
}

impl Decoder for BarcodeDetector {
    fn decode(&self, frame: &CameraFrame) -> DecodeOutcome {
        let gray = prepare_grayscale(frame, self.max_dimension);
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return DecodeOutcome::NotFound;
        }

        match self.decode_linear(&gray) {
            DecodeOutcome::NotFound => self.qr.decode_gray(&gray),
            found => found,
        }
    }
}
