//! Field locator: walks a grid once and fills invoice fields.

pub mod matcher;
pub mod rules;
mod template;

pub use matcher::{AmountRule, Extraction, Matcher, Scope, TextMatch, Trigger, Window};
pub use template::Template;

use tracing::{debug, trace};

use crate::models::record::{Field, InvoiceFields};
use crate::workbook::Grid;

/// A value accepted by a matcher, with its position in the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub field: Field,
    pub value: String,
    pub row: usize,
    pub col: usize,
    /// Name of the matcher that produced the value.
    pub matcher: String,
}

/// Grid walker driven by a [`Template`].
///
/// Rows are visited top to bottom; within a row the template's matchers run
/// in order, and a matcher whose field is already filled is skipped. The
/// result is a pure function of the template and the grid.
#[derive(Debug, Clone, Default)]
pub struct FieldLocator {
    template: Template,
}

impl FieldLocator {
    /// Locator using the standard template.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(template: Template) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Scan the grid and return the filled fields.
    pub fn locate(&self, grid: &Grid) -> InvoiceFields {
        self.locate_with_trace(grid).0
    }

    /// Scan the grid, also returning every committed candidate in commit order.
    pub fn locate_with_trace(&self, grid: &Grid) -> (InvoiceFields, Vec<Candidate>) {
        let mut fields = InvoiceFields::new();
        let mut committed = Vec::new();

        for (row_idx, row) in grid.rows().enumerate() {
            if self.template.matchers.iter().all(|m| fields.is_set(m.field)) {
                trace!("All template fields filled at row {}", row_idx);
                break;
            }

            let row_text = row.join(" ");
            for matcher in &self.template.matchers {
                if fields.is_set(matcher.field) {
                    continue;
                }
                let Some((col, value)) = matcher.scan_row(row, &row_text) else {
                    continue;
                };

                debug!(
                    "{} = '{}' at ({}, {}) via {}",
                    matcher.field, value, row_idx, col, matcher.name
                );
                fields.commit(matcher.field, value.clone());
                committed.push(Candidate {
                    field: matcher.field,
                    value,
                    row: row_idx,
                    col,
                    matcher: matcher.name.clone(),
                });
            }
        }

        (fields, committed)
    }
}
