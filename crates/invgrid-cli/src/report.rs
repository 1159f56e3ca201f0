//! Batch report writers (CSV, JSON, XLSX).

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::debug;

use invgrid_core::{BatchSummary, InvoiceRecord};

const DATA_SHEET: &str = "Extracted_Data";
const SUMMARY_SHEET: &str = "Summary";
const REPORT_PREFIX: &str = "invoice_data_extracted";

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// One CSV row per file
    Csv,
    /// JSON array of records
    Json,
    /// Workbook with data and summary sheets
    Xlsx,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
            ReportFormat::Xlsx => "xlsx",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            "xlsx" => Ok(ReportFormat::Xlsx),
            other => anyhow::bail!("Unknown report format: {}", other),
        }
    }
}

/// `invoice_data_extracted_<YYYYmmdd_HHMMSS>.<ext>`
pub fn default_report_name(format: ReportFormat, now: DateTime<Local>) -> String {
    format!(
        "{}_{}.{}",
        REPORT_PREFIX,
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Write the report and, where the format keeps it separate, the summary.
///
/// Returns every path written, report first.
pub fn write_report(
    path: &Path,
    format: ReportFormat,
    records: &[InvoiceRecord],
    summary: Option<&BatchSummary>,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = vec![path.to_path_buf()];

    match format {
        ReportFormat::Csv => {
            write_records_csv(path, records)?;
            if let Some(summary) = summary {
                let summary_path = sibling(path, "summary", "csv");
                write_summary_csv(&summary_path, summary)?;
                written.push(summary_path);
            }
        }
        ReportFormat::Json => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, records)?;
            if let Some(summary) = summary {
                let summary_path = sibling(path, "summary", "json");
                let writer = BufWriter::new(File::create(&summary_path)?);
                serde_json::to_writer_pretty(writer, summary)?;
                written.push(summary_path);
            }
        }
        ReportFormat::Xlsx => write_xlsx(path, records, summary)?,
    }

    debug!("Wrote {:?}", written);
    Ok(written)
}

/// `<dir>/<stem>_<suffix>.<ext>` next to `path`.
fn sibling(path: &Path, suffix: &str, ext: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(REPORT_PREFIX);
    path.with_file_name(format!("{}_{}.{}", stem, suffix, ext))
}

fn write_records_csv(path: &Path, records: &[InvoiceRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(InvoiceRecord::header())?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_summary_csv(path: &Path, summary: &BatchSummary) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["Metric", "Value"])?;
    for (metric, value) in summary.metrics() {
        wtr.write_record([metric, value])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_xlsx(
    path: &Path,
    records: &[InvoiceRecord],
    summary: Option<&BatchSummary>,
) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(DATA_SHEET)?;
    write_header(sheet, &InvoiceRecord::header(), &bold)?;
    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, value) in record.to_row().iter().enumerate() {
            sheet.write_string(row, col as u16, value)?;
        }
    }
    sheet.autofit();

    if let Some(summary) = summary {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SUMMARY_SHEET)?;
        write_header(sheet, &["Metric", "Value"], &bold)?;
        for (i, (metric, value)) in summary.metrics().iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, metric)?;
            match value.parse::<f64>() {
                Ok(number) => sheet.write_number(row, 1, number)?,
                Err(_) => sheet.write_string(row, 1, value)?,
            };
        }
        sheet.autofit();
    }

    workbook.save(path)?;
    Ok(())
}

fn write_header(sheet: &mut Worksheet, header: &[&str], format: &Format) -> anyhow::Result<()> {
    for (col, name) in header.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, format)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use invgrid_core::{CalamineWorkbook, Field, InvoiceFields, SheetSource};

    fn records() -> Vec<InvoiceRecord> {
        let mut fields = InvoiceFields::new();
        fields.commit(Field::InvoiceNumber, "SSH/24-25/101");
        fields.commit(Field::TotalValue, "12,345.50");
        vec![
            InvoiceRecord::success("a.xlsx", "Sheet1", fields),
            InvoiceRecord::failure("b.xlsx", "", "workbook has no sheets"),
        ]
    }

    #[test]
    fn test_default_report_name() {
        let now = Local.with_ymd_and_hms(2024, 7, 1, 9, 5, 3).unwrap();
        assert_eq!(
            default_report_name(ReportFormat::Xlsx, now),
            "invoice_data_extracted_20240701_090503.xlsx"
        );
    }

    #[test]
    fn test_format_from_config_string() {
        assert_eq!("XLSX".parse::<ReportFormat>().unwrap(), ReportFormat::Xlsx);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_csv_report_with_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let records = records();
        let summary = BatchSummary::from_records(&records);

        let written = write_report(&path, ReportFormat::Csv, &records, Some(&summary)).unwrap();
        assert_eq!(written, vec![path.clone(), dir.path().join("report_summary.csv")]);

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("file_name,sheet_name,invoice_number"));
        assert!(lines.next().unwrap().contains("\"12,345.50\""));
        assert!(lines.next().unwrap().ends_with("Error: workbook has no sheets"));

        let summary_text = std::fs::read_to_string(&written[1]).unwrap();
        assert!(summary_text.contains("Success Rate (%),50"));
    }

    #[test]
    fn test_json_report_is_record_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        write_report(&path, ReportFormat::Json, &records(), None).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["invoice_number"], "SSH/24-25/101");
        assert!(!dir.path().join("report_summary.json").exists());
    }

    #[test]
    fn test_xlsx_report_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let records = records();
        let summary = BatchSummary::from_records(&records);

        let written = write_report(&path, ReportFormat::Xlsx, &records, Some(&summary)).unwrap();
        assert_eq!(written, vec![path.clone()]);

        let mut workbook = CalamineWorkbook::open(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec![DATA_SHEET, SUMMARY_SHEET]);

        let data = workbook.read_grid(DATA_SHEET).unwrap();
        assert_eq!(data.height(), 3);
        assert_eq!(data.cell(1, 2), Some("SSH/24-25/101"));

        let metrics = workbook.read_grid(SUMMARY_SHEET).unwrap();
        assert_eq!(metrics.cell(1, 0), Some("Total Files Processed"));
        assert_eq!(metrics.cell(1, 1), Some("2"));
    }
}
