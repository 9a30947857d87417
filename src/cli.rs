// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for list operations
//!
//! This module provides command-line functionality for:
//! - Printing the saved list
//! - Removing a code
//! - Exporting the list without the save dialog
//! - Listing available cameras

use bookscan::{AppResult, ExportFormat};
use bookscan::backends::camera::{CameraRequest, get_backend, select_device};
use bookscan::config::Config;
use bookscan::export::{DirectorySaver, ExportArtifact, FileSaver};
use bookscan::storage::{CodeListStore, FileStore};
use std::path::PathBuf;

fn open_store(config: &Config) -> CodeListStore<FileStore> {
    CodeListStore::open(FileStore::new(config.storage_path()))
}

/// Print all saved codes, one per line
pub fn list_codes(config: &Config) -> AppResult<()> {
    let store = open_store(config);
    let list = store.get();

    if list.is_empty() {
        eprintln!("No ISBNs saved.");
        return Ok(());
    }

    for code in list.iter() {
        println!("{}", code);
    }
    Ok(())
}

/// Remove one code from the list
pub fn remove_code(config: &Config, code: &str) -> AppResult<()> {
    let mut store = open_store(config);

    if store.remove(code) {
        println!("Removed {}", code);
    } else {
        println!("{} is not in the list", code);
    }
    Ok(())
}

/// Write the list to `output` (or the configured export directory)
pub fn export_list(
    config: &Config,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> AppResult<()> {
    let store = open_store(config);
    let directory = output.unwrap_or_else(|| config.export_directory());
    let saver = DirectorySaver::new(directory);

    let artifact = ExportArtifact::new(store.get(), format);
    match saver.save(&artifact)? {
        Some(path) => println!(
            "Exported {} ISBNs as {} to {}",
            store.get().len(),
            format.display_name(),
            path.display()
        ),
        None => println!("Export cancelled"),
    }
    Ok(())
}

/// List all available cameras, marking the one the scanner would pick
pub fn list_cameras(config: &Config) -> AppResult<()> {
    let backend = get_backend();
    let cameras = backend.enumerate_cameras()?;

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    let request = CameraRequest {
        facing: config.preferred_facing,
        device_name: config.camera_device.clone(),
    };
    let selected = select_device(&cameras, &request);

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        let marker = if Some(index) == selected { "*" } else { " " };
        println!("{} [{}] {} ({})", marker, index, camera.name, camera.location);
    }
    println!();
    println!("* = used for scanning");
    Ok(())
}
