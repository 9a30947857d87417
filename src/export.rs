// SPDX-License-Identifier: GPL-3.0-only

//! List export as plain text or CSV
//!
//! Codes are assumed not to contain newlines or commas, so no escaping is
//! applied: both formats are the codes joined by `\n`, CSV adds an `ISBN`
//! header line.

use crate::constants::export;
use crate::errors::ExportError;
use crate::list::CodeList;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One code per line
    Text,
    /// Single `ISBN` column with a header line
    Csv,
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Text => export::TEXT_FILE_NAME,
            ExportFormat::Csv => export::CSV_FILE_NAME,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Text => export::TEXT_MIME_TYPE,
            ExportFormat::Csv => export::CSV_MIME_TYPE,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Text => "TXT",
            ExportFormat::Csv => "CSV",
        }
    }

    /// Serialize `list` in this format
    pub fn render(&self, list: &CodeList) -> String {
        match self {
            ExportFormat::Text => export_text(list),
            ExportFormat::Csv => export_csv(list),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(ExportFormat::Text),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!(
                "Invalid export format: '{}'. Valid options: txt, csv",
                other
            )),
        }
    }
}

/// Codes joined with newlines, no trailing newline
pub fn export_text(list: &CodeList) -> String {
    list.as_slice().join("\n")
}

/// `ISBN` header line followed by the codes joined with newlines
pub fn export_csv(list: &CodeList) -> String {
    format!("{}\n{}", export::CSV_HEADER, export_text(list))
}

/// Serialized list ready to be handed to a [`FileSaver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub content: String,
    pub file_name: String,
    pub mime_type: String,
    pub format: ExportFormat,
}

impl ExportArtifact {
    pub fn new(list: &CodeList, format: ExportFormat) -> Self {
        Self {
            content: format.render(list),
            file_name: format.file_name().to_string(),
            mime_type: format.mime_type().to_string(),
            format,
        }
    }
}

/// Platform file-save interaction
pub trait FileSaver {
    /// Save the artifact
    ///
    /// Returns the written path, or `Ok(None)` when the user cancelled.
    fn save(&self, artifact: &ExportArtifact) -> Result<Option<PathBuf>, ExportError>;
}

/// Writes exports into a fixed directory, overwriting existing files
#[derive(Debug, Clone)]
pub struct DirectorySaver {
    directory: PathBuf,
}

impl DirectorySaver {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl FileSaver for DirectorySaver {
    fn save(&self, artifact: &ExportArtifact) -> Result<Option<PathBuf>, ExportError> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(&artifact.file_name);
        write_artifact(&path, artifact)?;
        Ok(Some(path))
    }
}

/// Native "save as" dialog
#[derive(Debug, Clone)]
pub struct DialogSaver {
    start_directory: PathBuf,
}

impl DialogSaver {
    pub fn new(start_directory: impl Into<PathBuf>) -> Self {
        Self {
            start_directory: start_directory.into(),
        }
    }
}

impl FileSaver for DialogSaver {
    fn save(&self, artifact: &ExportArtifact) -> Result<Option<PathBuf>, ExportError> {
        let format = artifact.format;
        let chosen = rfd::FileDialog::new()
            .set_title(format!("Export {}", format.display_name()))
            .set_directory(&self.start_directory)
            .set_file_name(&artifact.file_name)
            .add_filter(format.display_name(), &[format.extension()])
            .save_file();

        let Some(path) = chosen else {
            debug!("Export cancelled in save dialog");
            return Ok(None);
        };

        write_artifact(&path, artifact)?;
        Ok(Some(path))
    }
}

fn write_artifact(path: &Path, artifact: &ExportArtifact) -> Result<(), ExportError> {
    std::fs::write(path, artifact.content.as_bytes())?;
    info!(
        path = %path.display(),
        mime_type = %artifact.mime_type,
        bytes = artifact.content.len(),
        "Exported code list"
    );
    Ok(())
}
