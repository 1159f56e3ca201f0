//! Batch statistics over extracted records.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::record::{Field, InvoiceRecord};

/// Counts over one batch of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percentage of successful records, rounded to two decimals.
    pub success_rate: Decimal,
    /// Number of records with a non-empty value, per field.
    pub field_counts: BTreeMap<Field, usize>,
}

impl BatchSummary {
    pub fn from_records(records: &[InvoiceRecord]) -> Self {
        let total_files = records.len();
        let successful = records.iter().filter(|r| r.is_success()).count();

        let success_rate = if total_files == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(successful) * Decimal::ONE_HUNDRED / Decimal::from(total_files))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        };

        let field_counts = Field::ALL
            .iter()
            .map(|field| {
                let count = records.iter().filter(|r| r.fields.is_set(*field)).count();
                (*field, count)
            })
            .collect();

        Self {
            total_files,
            successful,
            failed: total_files - successful,
            success_rate,
            field_counts,
        }
    }

    /// Count of records with `field` filled.
    pub fn count(&self, field: Field) -> usize {
        self.field_counts.get(&field).copied().unwrap_or(0)
    }

    /// Success rate as a float, for progress output.
    pub fn success_rate_f64(&self) -> f64 {
        self.success_rate.to_f64().unwrap_or(0.0)
    }

    /// `(metric, value)` rows for the summary sheet, in display order.
    pub fn metrics(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("Total Files Processed".to_string(), self.total_files.to_string()),
            ("Successful Extractions".to_string(), self.successful.to_string()),
            ("Failed Extractions".to_string(), self.failed.to_string()),
            ("Success Rate (%)".to_string(), self.success_rate.to_string()),
        ];
        rows.extend(
            Field::ALL
                .iter()
                .map(|f| (format!("Files with {}", f.label()), self.count(*f).to_string())),
        );
        rows
    }
}
