//! Error types for the invgrid-core library.

use thiserror::Error;

/// Main error type for the invgrid library.
#[derive(Error, Debug)]
pub enum InvgridError {
    /// Workbook could not be opened or materialized.
    #[error("workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    /// Template could not be loaded.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading spreadsheet containers.
#[derive(Error, Debug)]
pub enum WorkbookError {
    /// Failed to open/parse the workbook file.
    #[error("failed to open workbook: {0}")]
    Open(String),

    /// The workbook contains no sheets.
    #[error("workbook has no sheets")]
    NoSheets,

    /// A sheet could not be read into a grid.
    #[error("failed to read sheet '{name}': {reason}")]
    Sheet { name: String, reason: String },
}

/// Errors related to matcher templates.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The template file is not valid JSON for a template.
    #[error("failed to parse template: {0}")]
    Parse(#[from] serde_json::Error),

    /// The template parsed but describes an unusable matcher set.
    #[error("invalid template '{template}': {reason}")]
    Invalid { template: String, reason: String },
}

/// Result type for the invgrid library.
pub type Result<T> = std::result::Result<T, InvgridError>;
