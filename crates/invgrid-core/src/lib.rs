//! Core library for extracting invoice fields from spreadsheet exports.
//!
//! This crate provides:
//! - Workbook access through calamine (xlsx, xls, xlsb, ods)
//! - Sheet selection and normalization of a sheet into a text grid
//! - A template-driven field locator built from declarative matchers
//! - Per-file extraction with errors captured in the record
//! - Batch statistics for reports

pub mod error;
pub mod extract;
pub mod locator;
pub mod models;
pub mod summary;
pub mod workbook;

pub use error::{InvgridError, Result, TemplateError, WorkbookError};
pub use extract::{ExtractionResult, InvoiceExtractor, SpreadsheetExtractor};
pub use locator::{Candidate, FieldLocator, Template};
pub use models::{ExtractionStatus, Field, InvgridConfig, InvoiceFields, InvoiceRecord};
pub use summary::BatchSummary;
pub use workbook::{CalamineWorkbook, Grid, MemoryWorkbook, SheetSelector, SheetSource};
