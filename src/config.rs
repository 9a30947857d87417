// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::CameraFacing;
use crate::constants::{APP_DIR_NAME, decoder, storage, timing};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Location of the key-value store holding the code list
    pub storage_path: Option<PathBuf>,
    /// Directory used for exports when the save dialog is disabled
    pub export_directory: Option<PathBuf>,
    /// Ask where to save exports with a native dialog
    pub use_save_dialog: bool,
    /// Which way the preferred camera should face
    pub preferred_facing: CameraFacing,
    /// Pin a camera by (part of) its display name
    pub camera_device: Option<String>,
    /// Minimum time between two decode attempts
    pub decode_interval_ms: u64,
    /// Frames are downscaled to this size before decoding
    pub decode_max_dimension: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: None,
            export_directory: None,
            use_save_dialog: true,
            preferred_facing: CameraFacing::Environment,
            camera_device: None,
            decode_interval_ms: timing::DEFAULT_DECODE_INTERVAL_MS,
            decode_max_dimension: decoder::DEFAULT_MAX_DIMENSION,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file yields the defaults, a malformed one is logged and
    /// also yields the defaults.
    pub fn load() -> Self {
        match resolve_config_path() {
            Some(path) => Self::load_from_path(&path),
            None => {
                debug!("No config directory available, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                return Self::default();
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read config");
                return Self::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded config");
                config
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Errors loading config");
                Self::default()
            }
        }
    }

    /// Store path, falling back to `<data_dir>/bookscan/storage.json`
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME)
                .join(storage::STORE_FILE_NAME)
        })
    }

    /// Export directory, falling back to the downloads directory
    pub fn export_directory(&self) -> PathBuf {
        self.export_directory
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn decode_interval(&self) -> Duration {
        Duration::from_millis(self.decode_interval_ms)
    }
}

/// Resolve the configuration file path
///
/// `BOOKSCAN_CONFIG` wins over `<config_dir>/bookscan/config.json`.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(storage::CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(storage::CONFIG_FILE_NAME))
}

/// Directory for the terminal UI log file
pub fn log_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}
