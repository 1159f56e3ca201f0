//! Choice of the one sheet to scan in a workbook.

use tracing::debug;

use crate::error::WorkbookError;
use crate::models::config::ExtractionConfig;

/// Picks the data sheet out of a workbook's sheet list.
#[derive(Debug, Clone)]
pub struct SheetSelector {
    /// Sheet names that are skipped outright.
    skip_names: Vec<String>,
    /// Names shorter than this are placeholder sheets.
    min_name_len: usize,
}

impl SheetSelector {
    /// Selector with the default rules: skip `book` and names of 3 or fewer characters.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            skip_names: config.skip_sheets.clone(),
            min_name_len: config.min_sheet_name_len,
        }
    }

    /// Set the skipped sheet names.
    pub fn with_skip_names(mut self, names: Vec<String>) -> Self {
        self.skip_names = names;
        self
    }

    /// Set the minimum sheet name length.
    pub fn with_min_name_len(mut self, len: usize) -> Self {
        self.min_name_len = len;
        self
    }

    fn is_data_sheet(&self, name: &str) -> bool {
        !self.skip_names.iter().any(|skip| skip == name)
            && name.chars().count() >= self.min_name_len
    }

    /// First sheet that passes both filters, else the first sheet.
    pub fn select<'a>(&self, names: &'a [String]) -> Result<&'a str, WorkbookError> {
        let first = names.first().ok_or(WorkbookError::NoSheets)?;

        match names.iter().find(|name| self.is_data_sheet(name)) {
            Some(name) => Ok(name.as_str()),
            None => {
                debug!("No data sheet among {:?}, falling back to '{}'", names, first);
                Ok(first.as_str())
            }
        }
    }
}

impl Default for SheetSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_skips_book_sheet() {
        let selector = SheetSelector::new();
        assert_eq!(selector.select(&names(&["book", "Sheet1"])).unwrap(), "Sheet1");
    }

    #[test]
    fn test_falls_back_to_first() {
        let selector = SheetSelector::new();
        assert_eq!(selector.select(&names(&["book", "ab"])).unwrap(), "book");
    }

    #[test]
    fn test_short_names_are_placeholders() {
        let selector = SheetSelector::new();
        let sheets = names(&["abc", "book", "01-04-2024", "Sheet2"]);
        assert_eq!(selector.select(&sheets).unwrap(), "01-04-2024");
        assert_eq!(selector.select(&names(&["Data"])).unwrap(), "Data");
    }

    #[test]
    fn test_empty_list_fails() {
        let selector = SheetSelector::new();
        assert!(matches!(selector.select(&[]), Err(WorkbookError::NoSheets)));
    }

    #[test]
    fn test_custom_rules() {
        let selector = SheetSelector::new()
            .with_skip_names(names(&["Cover"]))
            .with_min_name_len(1);
        assert_eq!(selector.select(&names(&["Cover", "ab"])).unwrap(), "ab");
    }
}
