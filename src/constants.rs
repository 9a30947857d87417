// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Application directory name under the XDG config/data/cache dirs
pub const APP_DIR_NAME: &str = "bookscan";

/// Persistence constants
pub mod storage {
    /// Key under which the serialized code list is stored
    pub const LIST_KEY: &str = "isbns";
    /// File name of the key-value store inside the data directory
    pub const STORE_FILE_NAME: &str = "storage.json";
    /// File name of the configuration inside the config directory
    pub const CONFIG_FILE_NAME: &str = "config.json";
    /// Environment variable that overrides the configuration path
    pub const CONFIG_ENV_VAR: &str = "BOOKSCAN_CONFIG";
}

/// Export constants
pub mod export {
    /// Header line of the CSV export
    pub const CSV_HEADER: &str = "ISBN";
    /// File name of the plain text export
    pub const TEXT_FILE_NAME: &str = "isbns.txt";
    /// File name of the CSV export
    pub const CSV_FILE_NAME: &str = "isbns.csv";
    pub const TEXT_MIME_TYPE: &str = "text/plain";
    pub const CSV_MIME_TYPE: &str = "text/csv";
}

/// Scan session timing
pub mod timing {
    use super::Duration;

    /// Default minimum time between two decode attempts
    pub const DEFAULT_DECODE_INTERVAL_MS: u64 = 150;
    /// How long the worker waits for a frame before re-checking its channels
    pub const FRAME_POLL_TIMEOUT: Duration = Duration::from_millis(100);
    /// Timeout for the camera pipeline to reach PLAYING
    pub const START_TIMEOUT_SECS: u64 = 5;
    /// Timeout for the camera pipeline to reach NULL
    pub const STOP_TIMEOUT_SECS: u64 = 2;
    /// Terminal UI input poll interval (~60 fps redraw)
    pub const UI_POLL_INTERVAL: Duration = Duration::from_millis(16);
}

/// Scan session channel sizes
pub mod channels {
    /// Capacity of the session event channel (decodes, open/fail)
    pub const EVENT_CAPACITY: usize = 16;
    /// Capacity of the preview frame channel; frames are dropped when full
    pub const PREVIEW_CAPACITY: usize = 2;
}

/// Decoder settings
pub mod decoder {
    /// Frames are downscaled so that neither side exceeds this
    pub const DEFAULT_MAX_DIMENSION: u32 = 640;
}

/// Capture pipeline settings
pub mod pipeline {
    /// appsink queue depth
    pub const MAX_BUFFERS: u32 = 2;
}
