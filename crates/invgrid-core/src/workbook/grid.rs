//! Rectangular grid of text cells.

use calamine::{Data, Range};
use serde::{Deserialize, Serialize};

/// A sheet materialized as text, anchored at cell A1.
///
/// Every row has the same width; missing cells are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<String>>,
    width: usize,
}

impl Grid {
    /// Build a grid from rows of possibly different lengths, padding short rows.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let mut rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { rows, width }
    }

    /// Normalize a calamine range into a grid.
    ///
    /// Calamine ranges start at the first used cell; leading empty rows and
    /// columns are restored so that column indices match the sheet.
    pub fn from_range(range: &Range<Data>) -> Self {
        let Some((end_row, end_col)) = range.end() else {
            return Self::default();
        };
        let height = end_row as usize + 1;
        let width = end_col as usize + 1;

        let mut rows = vec![vec![String::new(); width]; height];
        for (row, col, value) in range.used_cells() {
            let (abs_row, abs_col) = match range.start() {
                Some((r, c)) => (r as usize + row, c as usize + col),
                None => (row, col),
            };
            if let Some(cell) = rows.get_mut(abs_row).and_then(|r| r.get_mut(abs_col)) {
                *cell = super::normalize::cell_text(value);
            }
        }

        Self { rows, width }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text, or `None` outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }
}
