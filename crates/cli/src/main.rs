//! # rowsift-cli
//!
//! Command-line front-end for the rowsift pipeline: ingest spreadsheet
//! files, apply filter/search/sort/pagination, print a page, and
//! optionally re-export the filtered view.

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use rowsift_engine::{CategoryTable, Page, Pipeline, SourceFile};
use rowsift_sheet::{HeaderPolicy, ReadOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// rowsift - filter, search, sort and re-export messy spreadsheets
#[derive(Parser)]
#[command(name = "rowsift")]
#[command(author, version, about = "Normalize and query messy spreadsheet files", long_about = None)]
struct Cli {
    /// Spreadsheet files to ingest (xlsx, xls or csv), merged in argument order
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Keep only records where this field is present and applicable
    #[arg(short = 'c', long = "category")]
    category: Option<String>,

    /// Free-text search across all fields (case-insensitive)
    #[arg(short = 's', long = "search", default_value = "")]
    search: String,

    /// Sort by this field (ascending unless --desc)
    #[arg(long = "sort")]
    sort: Option<String>,

    /// Sort descending
    #[arg(long = "desc", requires = "sort")]
    desc: bool,

    /// Page to print (1-based, clamped to the available range)
    #[arg(short = 'p', long = "page", default_value_t = 1)]
    page: usize,

    /// Records per page
    #[arg(long = "page-size", default_value_t = 25)]
    page_size: usize,

    /// Skip the canonical-category enrichment stage
    #[arg(long = "no-classify")]
    no_classify: bool,

    /// Load a custom category table from a JSON file
    #[arg(long = "categories", value_name = "JSON_FILE", conflicts_with = "no_classify")]
    categories: Option<PathBuf>,

    /// Header keywords: pick the first leading row matching one of these
    /// instead of the first non-empty row
    #[arg(long = "header-keywords", value_delimiter = ',', value_name = "WORDS")]
    header_keywords: Vec<String>,

    /// CSV delimiter (auto-detected when omitted)
    #[arg(short = 'd', long = "delimiter")]
    delimiter: Option<char>,

    /// Write the full filtered/sorted view to this file (.xlsx or .csv)
    #[arg(short = 'o', long = "export", value_name = "PATH")]
    export: Option<PathBuf>,

    /// Output format for the printed page
    #[arg(short = 'f', long = "format", default_value = "table")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output format for the printed page.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Pretty table output (default)
    #[default]
    Table,
    /// JSON page object
    Json,
    /// Full filtered view as CSV (ignores pagination)
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
    }

    let mut pipeline = build_pipeline(&cli)?;

    // Ingestion boundary: read every file, collect per-file failures
    let mut files = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        files.push(SourceFile::new(path.display().to_string(), bytes));
    }

    let report = pipeline.ingest_files(&files);
    for failure in &report.errors {
        eprintln!(
            "{} {}: {}",
            "warning:".yellow().bold(),
            failure.file,
            failure.error
        );
    }
    if report.is_total_failure() {
        bail!("no records ingested from {} file(s)", cli.files.len());
    }

    // Query boundary
    pipeline.set_category_filter(cli.category.clone());
    pipeline.set_search_term(cli.search.clone());
    if let Some(field) = &cli.sort {
        pipeline.toggle_sort(field);
        if cli.desc {
            pipeline.toggle_sort(field);
        }
    }
    pipeline.set_page_size(cli.page_size);
    pipeline.set_page_index(cli.page);

    match cli.format {
        OutputFormat::Table => print_table(&pipeline.page()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&pipeline.page())?;
            println!("{json}");
        }
        OutputFormat::Csv => {
            let export = pipeline.export_csv()?;
            print!("{}", String::from_utf8_lossy(&export.bytes));
        }
    }

    // Export boundary
    if let Some(path) = &cli.export {
        let export = match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => pipeline.export_csv()?,
            _ => pipeline.export_xlsx()?,
        };
        std::fs::write(path, &export.bytes)
            .with_context(|| format!("Failed to write export: {}", path.display()))?;
        eprintln!(
            "{} {} ({} bytes)",
            "exported:".green().bold(),
            path.display(),
            export.bytes.len()
        );
    }

    Ok(())
}

/// Build the pipeline from CLI flags.
fn build_pipeline(cli: &Cli) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new();

    if !cli.no_classify {
        let table = match &cli.categories {
            Some(path) => {
                let json = std::fs::read_to_string(path).with_context(|| {
                    format!("Failed to read category table: {}", path.display())
                })?;
                CategoryTable::from_json(&json).with_context(|| {
                    format!("Invalid category table: {}", path.display())
                })?
            }
            None => CategoryTable::default(),
        };
        pipeline = pipeline.with_categories(table);
    }

    if !cli.header_keywords.is_empty() {
        pipeline = pipeline.with_header_policy(HeaderPolicy::keywords(cli.header_keywords.clone()));
    }

    if let Some(delimiter) = cli.delimiter {
        if !delimiter.is_ascii() {
            bail!("delimiter must be an ASCII character");
        }
        pipeline = pipeline.with_read_options(ReadOptions::default().with_delimiter(delimiter as u8));
    }

    Ok(pipeline)
}

/// Maximum printed cell width before truncation.
const MAX_CELL_WIDTH: usize = 40;

/// Print a page as an aligned table with a pagination footer.
fn print_table(page: &Page) {
    // Column union across the page, first-seen order
    let mut columns: Vec<String> = Vec::new();
    for record in &page.records {
        for name in record.field_names() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }

    if columns.is_empty() {
        println!("{}", "no records to display".dimmed());
    } else {
        let mut widths: Vec<usize> = columns.iter().map(|c| c.len().min(MAX_CELL_WIDTH)).collect();
        let rows: Vec<Vec<String>> = page
            .records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(i, column)| {
                        let text = truncate(
                            &record.get(column).map(|c| c.as_str()).unwrap_or_default(),
                        );
                        widths[i] = widths[i].max(text.len());
                        text
                    })
                    .collect()
            })
            .collect();

        let header: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(column, &width)| format!("{:<width$}", truncate(column)))
            .collect();
        println!("{}", header.join("  ").cyan().bold());

        for row in rows {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(text, &width)| format!("{text:<width$}"))
                .collect();
            println!("{}", line.join("  "));
        }
    }

    println!(
        "\n{}",
        format!(
            "page {} of {} ({} record{})",
            page.current_page,
            page.total_pages,
            page.total_count,
            if page.total_count == 1 { "" } else { "s" }
        )
        .dimmed()
    );
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{cut}…")
    }
}
