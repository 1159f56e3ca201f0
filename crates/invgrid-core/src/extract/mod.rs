//! Per-file extraction: sheet selection, grid normalization, field location.

mod pipeline;

pub use pipeline::{ExtractionResult, SpreadsheetExtractor};

use std::path::Path;

use crate::models::record::InvoiceRecord;
use crate::workbook::SheetSource;

/// Trait for turning a workbook into an [`InvoiceRecord`].
///
/// Implementations never fail: document-level errors are reported through
/// the record's extraction status.
pub trait InvoiceExtractor {
    /// Extract from a workbook file on disk.
    fn extract_file(&self, path: &Path) -> InvoiceRecord;

    /// Extract from an already opened sheet source.
    fn extract_source(&self, file_name: &str, source: &mut dyn SheetSource) -> InvoiceRecord;
}

/// File name component of a path, for record identity.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
