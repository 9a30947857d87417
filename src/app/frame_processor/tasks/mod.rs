// SPDX-License-Identifier: GPL-3.0-only

//! Frame analysis tasks

pub mod barcode_detector;
pub mod qr_detector;

pub use barcode_detector::BarcodeDetector;
pub use qr_detector::QrDetector;
