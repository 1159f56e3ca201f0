//! Invoice record model produced for every scanned workbook.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::locator::rules::amounts::parse_amount;

/// A semantic field the locator can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    InvoiceNumber,
    InvoiceDate,
    CompanyName,
    VendorCode,
    PoNumber,
    PoDate,
    Gstin,
    TotalValue,
    GrossTotalAfterTax,
}

impl Field {
    /// All fields in report column order.
    pub const ALL: [Field; 9] = [
        Field::InvoiceNumber,
        Field::InvoiceDate,
        Field::CompanyName,
        Field::VendorCode,
        Field::PoNumber,
        Field::PoDate,
        Field::Gstin,
        Field::TotalValue,
        Field::GrossTotalAfterTax,
    ];

    /// Column name used in reports and JSON output.
    pub fn name(&self) -> &'static str {
        match self {
            Field::InvoiceNumber => "invoice_number",
            Field::InvoiceDate => "invoice_date",
            Field::CompanyName => "company_name",
            Field::VendorCode => "vendor_code",
            Field::PoNumber => "po_number",
            Field::PoDate => "po_date",
            Field::Gstin => "gstin",
            Field::TotalValue => "total_value",
            Field::GrossTotalAfterTax => "gross_total_after_tax",
        }
    }

    /// Human-readable label for summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Field::InvoiceNumber => "Invoice Numbers",
            Field::InvoiceDate => "Dates",
            Field::CompanyName => "Company Names",
            Field::VendorCode => "Vendor Codes",
            Field::PoNumber => "PO Numbers",
            Field::PoDate => "PO Dates",
            Field::Gstin => "GSTINs",
            Field::TotalValue => "Total Values",
            Field::GrossTotalAfterTax => "Gross Total After Tax",
        }
    }

    /// Whether the field only accepts numeric values.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Field::TotalValue | Field::GrossTotalAfterTax)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields extracted from a single grid.
///
/// Every field is written at most once: [`InvoiceFields::commit`] ignores
/// empty values and values for fields that are already filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceFields {
    pub invoice_number: String,
    pub invoice_date: String,
    pub company_name: String,
    pub vendor_code: String,
    pub po_number: String,
    pub po_date: String,
    pub gstin: String,
    pub total_value: String,
    pub gross_total_after_tax: String,
}

impl InvoiceFields {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a field (empty when unset).
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::InvoiceNumber => &self.invoice_number,
            Field::InvoiceDate => &self.invoice_date,
            Field::CompanyName => &self.company_name,
            Field::VendorCode => &self.vendor_code,
            Field::PoNumber => &self.po_number,
            Field::PoDate => &self.po_date,
            Field::Gstin => &self.gstin,
            Field::TotalValue => &self.total_value,
            Field::GrossTotalAfterTax => &self.gross_total_after_tax,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::InvoiceNumber => &mut self.invoice_number,
            Field::InvoiceDate => &mut self.invoice_date,
            Field::CompanyName => &mut self.company_name,
            Field::VendorCode => &mut self.vendor_code,
            Field::PoNumber => &mut self.po_number,
            Field::PoDate => &mut self.po_date,
            Field::Gstin => &mut self.gstin,
            Field::TotalValue => &mut self.total_value,
            Field::GrossTotalAfterTax => &mut self.gross_total_after_tax,
        }
    }

    /// Whether the field already holds a value.
    pub fn is_set(&self, field: Field) -> bool {
        !self.get(field).is_empty()
    }

    /// Commit a value. Returns `true` if the field was filled by this call.
    pub fn commit(&mut self, field: Field, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() || self.is_set(field) {
            return false;
        }
        *self.slot_mut(field) = value;
        true
    }

    /// Numeric interpretation of a total field.
    pub fn amount(&self, field: Field) -> Option<Decimal> {
        if !field.is_numeric() {
            return None;
        }
        parse_amount(self.get(field))
    }

    /// Number of filled fields.
    pub fn filled_count(&self) -> usize {
        Field::ALL.iter().filter(|f| self.is_set(**f)).count()
    }

    /// Iterate over `(field, value)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.iter().map(move |f| (*f, self.get(*f)))
    }
}

/// Outcome of processing one workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ExtractionStatus {
    Success,
    Error(String),
}

impl ExtractionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionStatus::Success)
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStatus::Success => f.write_str("Success"),
            ExtractionStatus::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl From<ExtractionStatus> for String {
    fn from(status: ExtractionStatus) -> Self {
        status.to_string()
    }
}

impl TryFrom<String> for ExtractionStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, String> {
        if s == "Success" {
            return Ok(ExtractionStatus::Success);
        }
        match s.strip_prefix("Error:") {
            Some(msg) => Ok(ExtractionStatus::Error(msg.trim_start().to_string())),
            None => Err(format!("unknown extraction status: {:?}", s)),
        }
    }
}

/// The per-file output unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// File name (without directory).
    pub file_name: String,

    /// Sheet that was scanned (empty when selection never happened).
    pub sheet_name: String,

    /// Extracted fields.
    #[serde(flatten)]
    pub fields: InvoiceFields,

    /// `Success` or `Error: <message>`.
    pub extraction_status: ExtractionStatus,
}

impl InvoiceRecord {
    /// A successful record.
    pub fn success(
        file_name: impl Into<String>,
        sheet_name: impl Into<String>,
        fields: InvoiceFields,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            sheet_name: sheet_name.into(),
            fields,
            extraction_status: ExtractionStatus::Success,
        }
    }

    /// A failed record: identity only, every field empty.
    pub fn failure(
        file_name: impl Into<String>,
        sheet_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            sheet_name: sheet_name.into(),
            fields: InvoiceFields::default(),
            extraction_status: ExtractionStatus::Error(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.extraction_status.is_success()
    }

    /// Column names of [`InvoiceRecord::to_row`].
    pub fn header() -> Vec<&'static str> {
        let mut header = vec!["file_name", "sheet_name"];
        header.extend(Field::ALL.iter().map(|f| f.name()));
        header.push("extraction_status");
        header
    }

    /// Flat row representation for tabular reports.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = vec![self.file_name.clone(), self.sheet_name.clone()];
        row.extend(self.fields.iter().map(|(_, v)| v.to_string()));
        row.push(self.extraction_status.to_string());
        row
    }
}
