// SPDX-License-Identifier: GPL-3.0-only

//! Camera preview module
//!
//! This module handles the camera preview display widget, drawn into the
//! terminal with half-block characters.

pub mod widget;

// Re-export for convenience
pub use widget::FrameWidget;
