//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::InvgridError;

/// Report formats accepted in `report.format`.
pub const REPORT_FORMATS: [&str; 3] = ["csv", "json", "xlsx"];

/// Main configuration for invgrid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvgridConfig {
    /// Sheet selection and template configuration.
    pub extraction: ExtractionConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,

    /// Report output configuration.
    pub report: ReportConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Sheet names that never hold invoice data.
    pub skip_sheets: Vec<String>,

    /// Sheets with fewer characters than this are treated as placeholders.
    pub min_sheet_name_len: usize,

    /// Optional JSON template replacing the built-in one.
    pub template: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            skip_sheets: vec!["book".to_string()],
            min_sheet_name_len: 4,
            template: None,
        }
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of files processed concurrently.
    pub jobs: usize,

    /// File extensions picked up when scanning a directory.
    pub extensions: Vec<String>,

    /// Descend into subdirectories.
    pub recursive: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            extensions: vec!["xlsx".to_string(), "xls".to_string()],
            recursive: true,
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Default report format (`csv`, `json` or `xlsx`).
    pub format: String,

    /// Write the summary next to CSV/JSON reports without `--summary`.
    pub summary: bool,

    /// Directory for generated reports (current directory when unset).
    pub output_dir: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "xlsx".to_string(),
            summary: false,
            output_dir: None,
        }
    }
}

impl InvgridConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.batch.jobs == 0 {
            return Err(InvgridError::Config("batch.jobs must be at least 1".to_string()));
        }
        if self.batch.extensions.is_empty() {
            return Err(InvgridError::Config("batch.extensions is empty".to_string()));
        }
        if !REPORT_FORMATS.contains(&self.report.format.to_ascii_lowercase().as_str()) {
            return Err(InvgridError::Config(format!(
                "unknown report.format '{}' (expected one of {})",
                self.report.format,
                REPORT_FORMATS.join(", ")
            )));
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
