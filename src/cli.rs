use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::dates;
use crate::source::SourceFormat;

#[derive(Debug, Parser)]
#[command(author, version, about = "Normalize messy sales exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Normalize a sales export into records plus a summary
    Ingest(IngestArgs),
    /// Show the first few normalized records in a formatted table
    Preview(PreviewArgs),
    /// Show aggregate statistics for a sales export
    Summary(SummaryArgs),
    /// Aggregate normalized records into dashboard-style views
    Report(ReportArgs),
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// Input sales export (.csv, .tsv, .xlsx, or .xls; '-' reads CSV from stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Source format (inferred from the file extension when omitted)
    #[arg(long, value_enum)]
    pub format: Option<SourceFormat>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of a delimited input file (defaults to utf-8 with a
    /// windows-1252 fallback)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Output file for the normalized records (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Delimiter to use for CSV output (defaults to the output extension)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Emit records and summary as one JSON document instead of CSV
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input sales export (.csv, .tsv, .xlsx, or .xls; '-' reads CSV from stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Source format (inferred from the file extension when omitted)
    #[arg(long, value_enum)]
    pub format: Option<SourceFormat>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of a delimited input file (defaults to utf-8 with a
    /// windows-1252 fallback)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Number of records to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Input sales export (.csv, .tsv, .xlsx, or .xls; '-' reads CSV from stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Source format (inferred from the file extension when omitted)
    #[arg(long, value_enum)]
    pub format: Option<SourceFormat>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of a delimited input file (defaults to utf-8 with a
    /// windows-1252 fallback)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Emit the summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Input sales export (.csv, .tsv, .xlsx, or .xls; '-' reads CSV from stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Source format (inferred from the file extension when omitted)
    #[arg(long, value_enum)]
    pub format: Option<SourceFormat>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of a delimited input file (defaults to utf-8 with a
    /// windows-1252 fallback)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Aggregate view to compute
    #[arg(long, value_enum)]
    pub view: ReportView,
    /// Keep only records in this category
    #[arg(long)]
    pub category: Option<String>,
    /// Keep only records for this product
    #[arg(long)]
    pub product: Option<String>,
    /// Keep only records dated on or after this date
    #[arg(long = "date-from", value_parser = parse_filter_date)]
    pub date_from: Option<NaiveDate>,
    /// Keep only records dated on or before this date
    #[arg(long = "date-to", value_parser = parse_filter_date)]
    pub date_to: Option<NaiveDate>,
    /// Maximum rows for the top views (defaults to 15 products, 10 customers)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Emit the view as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum ReportView {
    Monthly,
    Categories,
    TopProducts,
    TopCustomers,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

/// Filter dates accept the same formats as the ingested data, so a bound
/// can be written `25/12/2024` as easily as `2024-12-25`.
pub fn parse_filter_date(value: &str) -> Result<NaiveDate, String> {
    dates::normalize_date(value)
        .ok_or_else(|| format!("Unrecognized date '{value}' (try 2024-12-25 or 25/12/2024)"))
}
