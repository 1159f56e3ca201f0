//! Workbook access: sheet listing, sheet selection and grid normalization.

mod grid;
pub mod normalize;
mod selector;

pub use grid::Grid;
pub use selector::SheetSelector;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use calamine::{open_workbook_auto, Reader, Sheets};
use tracing::debug;

use crate::error::WorkbookError;

/// Result type for workbook operations.
pub type Result<T> = std::result::Result<T, WorkbookError>;

/// Anything that can list sheets and materialize one of them as a grid.
pub trait SheetSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Read the named sheet as a text grid.
    fn read_grid(&mut self, name: &str) -> Result<Grid>;
}

/// A spreadsheet file read through calamine (xlsx, xls, xlsb, ods).
pub struct CalamineWorkbook {
    sheets: Sheets<BufReader<File>>,
}

impl CalamineWorkbook {
    /// Open a workbook, detecting the container format from the extension.
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Opening workbook {}", path.display());
        let sheets = guarded(
            || open_workbook_auto(path).map_err(|e| WorkbookError::Open(e.to_string())),
            || WorkbookError::Open("reader panicked on malformed input".to_string()),
        )?;
        Ok(Self { sheets })
    }
}

impl SheetSource for CalamineWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn read_grid(&mut self, name: &str) -> Result<Grid> {
        let sheets = &mut self.sheets;
        let range = guarded(
            || {
                sheets.worksheet_range(name).map_err(|e| WorkbookError::Sheet {
                    name: name.to_string(),
                    reason: e.to_string(),
                })
            },
            || WorkbookError::Sheet {
                name: name.to_string(),
                reason: "reader panicked on malformed input".to_string(),
            },
        )?;

        let grid = Grid::from_range(&range);
        debug!(
            "Sheet '{}' normalized to {}x{} grid",
            name,
            grid.height(),
            grid.width()
        );
        Ok(grid)
    }
}

/// Run a calamine call, turning a panic inside the reader into an error.
fn guarded<T>(
    call: impl FnOnce() -> Result<T>,
    on_panic: impl FnOnce() -> WorkbookError,
) -> Result<T> {
    catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|_| Err(on_panic()))
}

/// An in-memory workbook, for tests and for callers that already hold grids.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    order: Vec<String>,
    grids: BTreeMap<String, Grid>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet.
    pub fn with_sheet(mut self, name: impl Into<String>, grid: Grid) -> Self {
        let name = name.into();
        if !self.grids.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.grids.insert(name, grid);
        self
    }
}

impl SheetSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn read_grid(&mut self, name: &str) -> Result<Grid> {
        self.grids
            .get(name)
            .cloned()
            .ok_or_else(|| WorkbookError::Sheet {
                name: name.to_string(),
                reason: "sheet not found".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_workbook_order() {
        let mut workbook = MemoryWorkbook::new()
            .with_sheet("book", Grid::default())
            .with_sheet("Sheet1", Grid::from_rows(vec![vec!["x"]]));

        assert_eq!(workbook.sheet_names(), vec!["book", "Sheet1"]);
        assert_eq!(workbook.read_grid("Sheet1").unwrap().cell(0, 0), Some("x"));
        assert!(workbook.read_grid("missing").is_err());
    }

    #[test]
    fn test_guarded_turns_panic_into_error() {
        let result: Result<()> = guarded(
            || panic!("bad record"),
            || WorkbookError::Open("reader panicked".to_string()),
        );
        assert!(matches!(result, Err(WorkbookError::Open(_))));
    }

    #[test]
    fn test_open_missing_file() {
        let result = CalamineWorkbook::open(Path::new("does/not/exist.xlsx"));
        assert!(matches!(result, Err(WorkbookError::Open(_))));
    }
}
