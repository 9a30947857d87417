// SPDX-License-Identifier: GPL-3.0-only

//! Frame processing: turning camera frames into decoded codes
//!
//! [`Decoder`] is the contract the scan session depends on;
//! [`default_decoder`] picks the implementation compiled into the binary.

pub mod tasks;
pub mod types;

pub use tasks::{BarcodeDetector, QrDetector};
pub use types::{DecodeOutcome, Decoder};

use std::sync::Arc;

/// Decoder used by the application, sized by `max_dimension`
///
/// Reads EAN-13 book barcodes, falling back to QR codes.
pub fn default_decoder(max_dimension: u32) -> Arc<dyn Decoder> {
    Arc::new(BarcodeDetector::with_max_dimension(max_dimension))
}
