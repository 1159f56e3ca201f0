//! Selector → normalizer → locator pipeline with a per-file error boundary.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::InvgridError;
use crate::locator::{Candidate, FieldLocator, Template};
use crate::models::config::ExtractionConfig;
use crate::models::record::InvoiceRecord;
use crate::workbook::{CalamineWorkbook, SheetSelector, SheetSource};

use super::{file_name_of, InvoiceExtractor};

/// Result of extracting one workbook, with diagnostics.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// The record handed to report writers.
    pub record: InvoiceRecord,
    /// Values committed by the locator, in commit order.
    pub candidates: Vec<Candidate>,
    /// Grid dimensions as (rows, columns), when a grid was built.
    pub grid_size: Option<(usize, usize)>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Extractor for spreadsheet exports following one template.
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetExtractor {
    selector: SheetSelector,
    locator: FieldLocator,
}

impl SpreadsheetExtractor {
    /// Extractor with the default sheet rules and the standard template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configuration, loading the template file if one is set.
    pub fn from_config(config: &ExtractionConfig) -> crate::Result<Self> {
        let template = match &config.template {
            Some(path) => {
                info!("Loading template from {}", path.display());
                Template::from_file(path)?
            }
            None => Template::standard(),
        };
        Ok(Self {
            selector: SheetSelector::from_config(config),
            locator: FieldLocator::with_template(template),
        })
    }

    /// Set the sheet selector.
    pub fn with_selector(mut self, selector: SheetSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Set the template.
    pub fn with_template(mut self, template: Template) -> Self {
        self.locator = FieldLocator::with_template(template);
        self
    }

    pub fn selector(&self) -> &SheetSelector {
        &self.selector
    }

    pub fn locator(&self) -> &FieldLocator {
        &self.locator
    }

    /// Extract from a file, keeping the locator's candidates.
    pub fn extract_file_detailed(&self, path: &Path) -> ExtractionResult {
        let start = Instant::now();
        let file_name = file_name_of(path);

        let mut result = match CalamineWorkbook::open(path) {
            Ok(mut workbook) => self.run(&file_name, &mut workbook),
            Err(e) => failed(&file_name, None, e.into()),
        };

        result.processing_time_ms = start.elapsed().as_millis() as u64;
        log_outcome(&result);
        result
    }

    /// Extract from a sheet source, keeping the locator's candidates.
    pub fn extract_source_detailed(
        &self,
        file_name: &str,
        source: &mut dyn SheetSource,
    ) -> ExtractionResult {
        let start = Instant::now();
        let mut result = self.run(file_name, source);
        result.processing_time_ms = start.elapsed().as_millis() as u64;
        log_outcome(&result);
        result
    }

    fn run(&self, file_name: &str, source: &mut dyn SheetSource) -> ExtractionResult {
        let names = source.sheet_names();
        let sheet = match self.selector.select(&names) {
            Ok(sheet) => sheet.to_string(),
            Err(e) => return failed(file_name, None, e.into()),
        };
        debug!("{}: selected sheet '{}' of {:?}", file_name, sheet, names);

        let grid = match source.read_grid(&sheet) {
            Ok(grid) => grid,
            Err(e) => return failed(file_name, Some(sheet), e.into()),
        };

        let (fields, candidates) = self.locator.locate_with_trace(&grid);
        ExtractionResult {
            record: InvoiceRecord::success(file_name, sheet, fields),
            candidates,
            grid_size: Some((grid.height(), grid.width())),
            processing_time_ms: 0,
        }
    }
}

impl InvoiceExtractor for SpreadsheetExtractor {
    fn extract_file(&self, path: &Path) -> InvoiceRecord {
        self.extract_file_detailed(path).record
    }

    fn extract_source(&self, file_name: &str, source: &mut dyn SheetSource) -> InvoiceRecord {
        self.extract_source_detailed(file_name, source).record
    }
}

fn failed(file_name: &str, sheet: Option<String>, error: InvgridError) -> ExtractionResult {
    // Workbook errors already carry a descriptive message; drop the outer prefix.
    let message = match error {
        InvgridError::Workbook(e) => e.to_string(),
        other => other.to_string(),
    };
    ExtractionResult {
        record: InvoiceRecord::failure(file_name, sheet.unwrap_or_default(), message),
        candidates: Vec::new(),
        grid_size: None,
        processing_time_ms: 0,
    }
}

fn log_outcome(result: &ExtractionResult) {
    let record = &result.record;
    if record.is_success() {
        info!(
            "{}: {} of 9 fields from sheet '{}' in {}ms",
            record.file_name,
            record.fields.filled_count(),
            record.sheet_name,
            result.processing_time_ms
        );
    } else {
        warn!("{}: {}", record.file_name, record.extraction_status);
    }
}
