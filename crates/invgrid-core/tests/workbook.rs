//! End-to-end extraction from xlsx files written to a temp directory.

use std::path::{Path, PathBuf};

use invgrid_core::{
    BatchSummary, CalamineWorkbook, Field, InvoiceExtractor, SheetSource, SpreadsheetExtractor,
};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use tempfile::TempDir;

/// Writes a two-sheet workbook: an empty `book` sheet followed by the invoice.
fn write_invoice(dir: &Path, name: &str) -> PathBuf {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    workbook.add_worksheet().set_name("book").unwrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name("01-07-2024").unwrap();
    sheet.write_string(2, 0, "Name  :ACME INDUSTRIES").unwrap();
    sheet.write_string(3, 0, "GSTIN :33AAACA1234B1Z5").unwrap();
    sheet.write_string(4, 5, "SSH/24-25/101").unwrap();
    sheet
        .write_datetime_with_format(5, 5, &ExcelDateTime::from_ymd(2024, 7, 1).unwrap(), &date_format)
        .unwrap();
    sheet.write_string(6, 3, "Vendor Code").unwrap();
    sheet.write_string(6, 5, "VC-102").unwrap();
    sheet.write_string(7, 3, "PO Date").unwrap();
    sheet.write_string(7, 5, "4500012345").unwrap();
    sheet.write_string(8, 3, "Purchase Order No").unwrap();
    sheet
        .write_datetime_with_format(8, 5, &ExcelDateTime::from_ymd(2024, 6, 15).unwrap(), &date_format)
        .unwrap();
    sheet.write_string(15, 4, "Total Value").unwrap();
    sheet.write_string(15, 6, "1,04,500.00").unwrap();
    sheet.write_string(17, 4, "GROSS TOTAL AFTER TAX").unwrap();
    sheet.write_number(17, 7, 123310.5).unwrap();

    let path = dir.join(name);
    workbook.save(&path).unwrap();
    path
}

#[test]
fn test_extracts_all_fields_from_xlsx() {
    let dir = TempDir::new().unwrap();
    let path = write_invoice(dir.path(), "invoice.xlsx");

    let record = SpreadsheetExtractor::new().extract_file(&path);

    assert!(record.is_success(), "{}", record.extraction_status);
    assert_eq!(record.file_name, "invoice.xlsx");
    assert_eq!(record.sheet_name, "01-07-2024");
    assert_eq!(record.fields.company_name, "ACME INDUSTRIES");
    assert_eq!(record.fields.gstin, "33AAACA1234B1Z5");
    assert_eq!(record.fields.invoice_number, "SSH/24-25/101");
    assert_eq!(record.fields.invoice_date, "2024-07-01");
    assert_eq!(record.fields.vendor_code, "VC-102");
    assert_eq!(record.fields.po_number, "4500012345");
    assert_eq!(record.fields.po_date, "2024-06-15");
    assert_eq!(record.fields.total_value, "1,04,500.00");
    assert_eq!(record.fields.gross_total_after_tax, "123310.5");
}

#[test]
fn test_grid_keeps_sheet_coordinates() {
    let dir = TempDir::new().unwrap();
    let path = write_invoice(dir.path(), "invoice.xlsx");

    let mut workbook = CalamineWorkbook::open(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["book", "01-07-2024"]);

    let grid = workbook.read_grid("01-07-2024").unwrap();
    assert_eq!(grid.cell(0, 0), Some(""));
    assert_eq!(grid.cell(6, 5), Some("VC-102"));
    assert_eq!(grid.width(), 8);
}

#[test]
fn test_corrupt_file_becomes_error_record() {
    let dir = TempDir::new().unwrap();
    let good = write_invoice(dir.path(), "good.xlsx");
    let bad = dir.path().join("bad.xlsx");
    std::fs::write(&bad, b"this is not a zip archive").unwrap();

    let extractor = SpreadsheetExtractor::new();
    let records = vec![extractor.extract_file(&good), extractor.extract_file(&bad)];

    assert!(records[0].is_success());
    assert_eq!(records[1].file_name, "bad.xlsx");
    assert!(records[1].extraction_status.to_string().starts_with("Error:"));
    assert_eq!(records[1].fields.filled_count(), 0);

    let summary = BatchSummary::from_records(&records);
    assert_eq!(summary.successful, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.count(Field::VendorCode), 1);
}

#[test]
fn test_placeholder_only_workbook_uses_first_sheet() {
    let dir = TempDir::new().unwrap();
    let mut workbook = Workbook::new();
    workbook.add_worksheet().set_name("book").unwrap();
    let sheet = workbook.add_worksheet();
    sheet.set_name("ab").unwrap();
    sheet.write_string(0, 0, "Name  :IGNORED").unwrap();
    let path = dir.path().join("placeholders.xlsx");
    workbook.save(&path).unwrap();

    let record = SpreadsheetExtractor::new().extract_file(&path);
    assert!(record.is_success());
    assert_eq!(record.sheet_name, "book");
    assert_eq!(record.fields.filled_count(), 0);
}
