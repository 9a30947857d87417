// SPDX-License-Identifier: GPL-3.0-only

//! Decoder contract shared by the scan session and detector implementations

use crate::backends::camera::types::CameraFrame;

/// Result of one decode attempt on one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// A code was read from the frame
    Found(String),
    /// Nothing readable in this frame (normal, not an error)
    NotFound,
}

/// Barcode decoder
///
/// The decoder is a compiled-in collaborator handed to the session at
/// construction; there is no runtime loading. Implementations run on the
/// session worker thread and may take tens of milliseconds per frame.
pub trait Decoder: Send + Sync {
    fn decode(&self, frame: &CameraFrame) -> DecodeOutcome;
}

impl<F> Decoder for F
where
    F: Fn(&CameraFrame) -> DecodeOutcome + Send + Sync,
{
    fn decode(&self, frame: &CameraFrame) -> DecodeOutcome {
        self(frame)
    }
}
