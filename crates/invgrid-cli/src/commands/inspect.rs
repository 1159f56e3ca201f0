//! Inspect command - print a workbook's layout for template debugging.

use std::path::PathBuf;

use clap::Args;
use console::style;

use invgrid_core::locator::rules::{INVOICE_SERIES, LABEL_COLON, LOOSE_DATE};
use invgrid_core::{CalamineWorkbook, FieldLocator, Grid, SheetSelector, SheetSource, Template};

/// Rows shown in the detailed view, where invoice headers usually sit.
const HEADER_ROWS: std::ops::Range<usize> = 5..13;
const HITS_SHOWN: usize = 5;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Workbook to inspect
    #[arg(required = true)]
    input: PathBuf,

    /// Sheet to show instead of the automatically selected one
    #[arg(short, long)]
    sheet: Option<String>,

    /// Number of leading rows to scan for content
    #[arg(short, long, default_value = "20")]
    rows: usize,
}

/// Cells of one kind found while scanning a grid.
struct PatternHits {
    label: &'static str,
    hits: Vec<(usize, usize, String)>,
}

pub async fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let mut workbook = CalamineWorkbook::open(&args.input)?;
    let names = workbook.sheet_names();

    println!("{}", style(format!("Workbook: {}", args.input.display())).bold());
    println!("Sheets: {:?}", names);

    let sheet = match args.sheet {
        Some(sheet) => sheet,
        None => SheetSelector::from_config(&config.extraction)
            .select(&names)?
            .to_string(),
    };
    let grid = workbook.read_grid(&sheet)?;

    println!("Selected sheet: '{}'", sheet);
    println!("Dimensions: {} rows x {} columns", grid.height(), grid.width());

    println!();
    println!("{}", style(format!("First {} rows with content:", args.rows)).cyan());
    for (i, row) in grid.rows().enumerate().take(args.rows) {
        let cells: Vec<&str> = row
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        if !cells.is_empty() {
            println!("Row {:2}: {:?}", i, cells);
        }
    }

    println!();
    println!("{}", style("Pattern hits:").cyan());
    for group in find_patterns(&grid) {
        println!("{}:", group.label);
        if group.hits.is_empty() {
            println!("  {} none", style("✗").red());
            continue;
        }
        for (row, col, text) in group.hits.iter().take(HITS_SHOWN) {
            println!("  {} Row {}, Col {}: {}", style("✓").green(), row, col, text);
        }
        if group.hits.len() > HITS_SHOWN {
            println!("  ... and {} more", group.hits.len() - HITS_SHOWN);
        }
    }

    println!();
    println!(
        "{}",
        style(format!(
            "Detailed view, rows {}-{}:",
            HEADER_ROWS.start,
            HEADER_ROWS.end - 1
        ))
        .cyan()
    );
    for i in HEADER_ROWS {
        let Some(row) = grid.row(i) else { break };
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.trim().is_empty())
            .map(|(j, c)| format!("[Col{}:{}]", j, c.trim()))
            .collect();
        println!("Row {:2}: {}", i, cells.join(" "));
    }

    let template = match &config.extraction.template {
        Some(path) => Template::from_file(path)?,
        None => Template::standard(),
    };
    let (_, candidates) = FieldLocator::with_template(template).locate_with_trace(&grid);

    println!();
    println!("{}", style("Matched values:").cyan());
    if candidates.is_empty() {
        println!("  {} none", style("✗").red());
    }
    for candidate in candidates {
        println!(
            "  {:<22} {:?} at row {}, col {} ({})",
            candidate.field.name(),
            candidate.value,
            candidate.row,
            candidate.col,
            candidate.matcher
        );
    }

    Ok(())
}

fn find_patterns(grid: &Grid) -> Vec<PatternHits> {
    let mut groups = vec![
        PatternHits { label: "Invoice series numbers", hits: Vec::new() },
        PatternHits { label: "Date patterns", hits: Vec::new() },
        PatternHits { label: "Label fields", hits: Vec::new() },
        PatternHits { label: "GST invoice references", hits: Vec::new() },
    ];

    for (i, row) in grid.rows().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            let text = cell.trim();
            if text.is_empty() {
                continue;
            }
            let upper = text.to_uppercase();
            let checks = [
                INVOICE_SERIES.is_match(text),
                LOOSE_DATE.is_match(text),
                LABEL_COLON.is_match(text),
                upper.contains("GST") && upper.contains("INVOICE"),
            ];
            for (group, hit) in groups.iter_mut().zip(checks) {
                if hit {
                    group.hits.push((i, j, text.to_string()));
                }
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_patterns() {
        let grid = Grid::from_rows(vec![
            vec!["TAX INVOICE (GST)", "", "SSH-2024-101"],
            vec!["Name  :ACME", "01-07-2024", "2024-07-01 00:00:00"],
        ]);

        let groups = find_patterns(&grid);
        let counts: Vec<usize> = groups.iter().map(|g| g.hits.len()).collect();
        assert_eq!(counts, vec![1, 1, 1, 1]);
        assert_eq!(groups[0].hits[0], (0, 2, "SSH-2024-101".to_string()));
        assert_eq!(groups[1].hits[0].2, "01-07-2024");
        assert_eq!(groups[2].hits[0].2, "Name  :ACME");
    }
}
