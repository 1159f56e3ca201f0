//! Batch command - extract every workbook in a directory or glob.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

use invgrid_core::extract::file_name_of;
use invgrid_core::models::config::BatchConfig;
use invgrid_core::{BatchSummary, InvoiceExtractor, InvoiceRecord, SpreadsheetExtractor};

use crate::report::{default_report_name, write_report, ReportFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input directory, file or glob pattern
    #[arg(required = true)]
    input: String,

    /// Report file (default: invoice_data_extracted_<timestamp>.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,

    /// Also write the batch summary next to CSV/JSON reports
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers (default: from config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Only scan the top level of a directory
    #[arg(long)]
    no_recursive: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let mut batch_config = config.batch.clone();
    if args.no_recursive {
        batch_config.recursive = false;
    }

    let files = discover(&args.input, &batch_config)?;
    if files.is_empty() {
        anyhow::bail!("No matching workbooks found for: {}", args.input);
    }

    println!(
        "{} Found {} workbooks to process",
        style("ℹ").blue(),
        files.len()
    );

    let format = match args.format {
        Some(format) => format,
        None => config.report.format.parse()?,
    };
    let jobs = args.jobs.unwrap_or(batch_config.jobs).max(1);
    let extractor = Arc::new(SpreadsheetExtractor::from_config(&config.extraction)?);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let records = extract_all(files, extractor, jobs, &pb).await;
    pb.finish_with_message("Complete");

    let summary = BatchSummary::from_records(&records);

    let output_path = match args.output {
        Some(path) => path,
        None => {
            let name = default_report_name(format, chrono::Local::now());
            match &config.report.output_dir {
                Some(dir) => dir.join(name),
                None => PathBuf::from(name),
            }
        }
    };
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    // XLSX reports always carry their summary sheet.
    let with_summary = format == ReportFormat::Xlsx || args.summary || config.report.summary;
    let written = write_report(
        &output_path,
        format,
        &records,
        with_summary.then_some(&summary),
    )?;
    for path in &written {
        println!("{} Wrote {}", style("✓").green(), path.display());
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        summary.total_files,
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed ({}% success)",
        style(summary.successful).green(),
        style(summary.failed).red(),
        summary.success_rate
    );

    let failed: Vec<&InvoiceRecord> = records.iter().filter(|r| !r.is_success()).collect();
    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for record in failed {
            println!("  - {}: {}", record.file_name, record.extraction_status);
        }
    }

    Ok(())
}

/// Run the extractor over `files` with at most `jobs` in flight, keeping input order.
async fn extract_all(
    files: Vec<PathBuf>,
    extractor: Arc<SpreadsheetExtractor>,
    jobs: usize,
    pb: &ProgressBar,
) -> Vec<InvoiceRecord> {
    stream::iter(files)
        .map(|path| {
            let extractor = Arc::clone(&extractor);
            async move {
                let file_name = file_name_of(&path);
                let task = tokio::task::spawn_blocking(move || extractor.extract_file(&path));
                match task.await {
                    Ok(record) => record,
                    Err(e) => {
                        error!("Worker for {} failed: {}", file_name, e);
                        InvoiceRecord::failure(file_name, "", format!("worker failed: {}", e))
                    }
                }
            }
        })
        .buffered(jobs)
        .inspect(|_| pb.inc(1))
        .collect()
        .await
}

/// Expand the input into a sorted list of workbook paths.
///
/// A directory is walked for files with a configured extension; an existing
/// file is taken as-is; anything else is treated as a glob pattern.
fn discover(input: &str, config: &BatchConfig) -> anyhow::Result<Vec<PathBuf>> {
    let path = Path::new(input);

    let mut files: Vec<PathBuf> = if path.is_dir() {
        let max_depth = if config.recursive { usize::MAX } else { 1 };
        WalkDir::new(path)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Error walking {}: {}", input, e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|p| has_extension(p, &config.extensions))
            .collect()
    } else if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        glob(input)?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file() && has_extension(p, &config.extensions))
            .collect()
    };

    files.sort();
    debug!("Discovered {} workbooks under {}", files.len(), input);
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext))
}
