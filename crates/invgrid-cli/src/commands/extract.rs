//! Extract command - pull invoice fields out of a single workbook.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{debug, info};

use invgrid_core::{InvoiceRecord, SpreadsheetExtractor};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input workbook (.xlsx, .xls, .xlsb, .ods)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show which matcher produced each value
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let extractor = SpreadsheetExtractor::from_config(&config.extraction)?;
    let result = extractor.extract_file_detailed(&args.input);
    let record = &result.record;

    let output = format_record(record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.trace {
        eprintln!();
        if result.candidates.is_empty() {
            eprintln!("{} No values matched", style("ℹ").blue());
        }
        for candidate in &result.candidates {
            eprintln!(
                "{} {} = {:?} at row {}, col {} ({})",
                style("ℹ").blue(),
                candidate.field,
                candidate.value,
                candidate.row,
                candidate.col,
                candidate.matcher
            );
        }
    }

    debug!("Total processing time: {}ms", result.processing_time_ms);

    if !record.is_success() {
        anyhow::bail!("{}: {}", record.file_name, record.extraction_status);
    }

    Ok(())
}

fn format_record(record: &InvoiceRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &InvoiceRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(InvoiceRecord::header())?;
    wtr.write_record(record.to_row())?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &InvoiceRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("File:   {}\n", record.file_name));
    output.push_str(&format!("Sheet:  {}\n", record.sheet_name));
    output.push_str(&format!("Status: {}\n", record.extraction_status));
    output.push('\n');

    for (field, value) in record.fields.iter() {
        let shown = if value.is_empty() { "-" } else { value };
        output.push_str(&format!("  {:<22} {}\n", field.name(), shown));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use invgrid_core::{Field, InvoiceFields};

    #[test]
    fn test_text_format_marks_missing_fields() {
        let mut fields = InvoiceFields::new();
        fields.commit(Field::VendorCode, "VC-102");
        let record = InvoiceRecord::success("a.xlsx", "Sheet1", fields);

        let text = format_text(&record);
        assert!(text.contains("Status: Success"));
        assert!(text.contains("vendor_code            VC-102"));
        assert!(text.contains("gstin                  -"));
    }

    #[test]
    fn test_csv_format_has_header_and_row() {
        let record = InvoiceRecord::failure("bad.xlsx", "", "workbook has no sheets");
        let csv = format_csv(&record).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("extraction_status"));
        assert!(lines[1].starts_with("bad.xlsx,,"));
    }
}
