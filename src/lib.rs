pub mod amount;
pub mod category;
pub mod cli;
pub mod columns;
pub mod dates;
pub mod error;
pub mod header;
pub mod ingest;
pub mod io_utils;
pub mod record;
pub mod report;
pub mod source;
pub mod summary;
pub mod table;

use std::{env, io::Write, path::Path, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};
use serde::Serialize;

use crate::cli::{Cli, Commands, IngestArgs, PreviewArgs, ReportArgs, ReportView, SummaryArgs};
use crate::ingest::Ingestion;
use crate::report::RecordFilter;
use crate::source::SourceFormat;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sales_ingest", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Ingest(args) => handle_ingest(&args),
        Commands::Preview(args) => handle_preview(&args),
        Commands::Summary(args) => handle_summary(&args),
        Commands::Report(args) => handle_report(&args),
    }
}

fn handle_ingest(args: &IngestArgs) -> Result<()> {
    let ingestion = load_ingestion(
        &args.input,
        args.format,
        args.delimiter,
        args.input_encoding.as_deref(),
    )?;

    if args.json {
        let mut writer = io_utils::open_output_writer(args.output.as_deref())?;
        serde_json::to_writer_pretty(&mut writer, &ingestion)
            .context("Serializing ingestion result to JSON")?;
        writeln!(writer)?;
        writer.flush().context("Flushing output")?;
    } else {
        let input_delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
        let delimiter = io_utils::resolve_output_delimiter(
            args.output.as_deref(),
            args.output_delimiter,
            input_delimiter,
        );
        let mut writer = io_utils::open_csv_writer(args.output.as_deref(), delimiter)?;
        writer
            .write_record(record::CSV_HEADER)
            .context("Writing output header")?;
        for record in &ingestion.records {
            writer
                .write_record(record.to_csv_row())
                .context("Writing output row")?;
        }
        writer.flush().context("Flushing output")?;
    }

    let summary = &ingestion.summary;
    info!(
        "Summary: {} record(s) totalling {}, dates {} to {}",
        summary.record_count, summary.total_amount, summary.date_from, summary.date_to
    );
    Ok(())
}

fn handle_preview(args: &PreviewArgs) -> Result<()> {
    let ingestion = load_ingestion(
        &args.input,
        args.format,
        args.delimiter,
        args.input_encoding.as_deref(),
    )?;
    let rows: Vec<Vec<String>> = ingestion
        .records
        .iter()
        .take(args.rows)
        .map(|record| record.to_csv_row())
        .collect();
    let shown = rows.len();
    print_view(&record::CSV_HEADER, rows);
    info!(
        "Previewed {} of {} record(s)",
        shown,
        ingestion.records.len()
    );
    Ok(())
}

fn handle_summary(args: &SummaryArgs) -> Result<()> {
    let ingestion = load_ingestion(
        &args.input,
        args.format,
        args.delimiter,
        args.input_encoding.as_deref(),
    )?;
    if args.json {
        print_json(&ingestion.summary)?;
    } else {
        print_view(&["statistic", "value"], ingestion.summary.render_rows());
    }
    Ok(())
}

fn handle_report(args: &ReportArgs) -> Result<()> {
    let ingestion = load_ingestion(
        &args.input,
        args.format,
        args.delimiter,
        args.input_encoding.as_deref(),
    )?;
    let filter = RecordFilter {
        category: args.category.clone(),
        product: args.product.clone(),
        date_from: args.date_from,
        date_to: args.date_to,
    };

    match args.view {
        ReportView::Monthly => {
            let rows = report::monthly_totals(&ingestion.records, &filter);
            if args.json {
                print_json(&rows)?;
            } else {
                print_view(
                    &["month", "amount"],
                    rows.iter().map(|r| r.render_row()).collect(),
                );
            }
        }
        ReportView::Categories => {
            let rows = report::category_breakdown(&ingestion.records, &filter);
            if args.json {
                print_json(&rows)?;
            } else {
                print_view(
                    &["category", "amount", "count", "pct"],
                    rows.iter().map(|r| r.render_row()).collect(),
                );
            }
        }
        ReportView::TopProducts => {
            let limit = args.limit.unwrap_or(report::DEFAULT_PRODUCT_LIMIT);
            let rows = report::top_products(&ingestion.records, &filter, limit);
            if args.json {
                print_json(&rows)?;
            } else {
                print_view(
                    &["product", "category", "amount", "qty", "invoices", "pct"],
                    rows.iter().map(|r| r.render_row()).collect(),
                );
            }
        }
        ReportView::TopCustomers => {
            let limit = args.limit.unwrap_or(report::DEFAULT_CUSTOMER_LIMIT);
            let rows = report::top_customers(&ingestion.records, &filter, limit);
            if args.json {
                print_json(&rows)?;
            } else {
                print_view(
                    &["customer", "amount", "invoices", "products", "pct"],
                    rows.iter().map(|r| r.render_row()).collect(),
                );
            }
        }
    }
    Ok(())
}

/// Resolves the encoding label and runs the pipeline. Pipeline failures pass
/// through untouched so the diagnostic text the error carries (found
/// columns, accepted synonyms) reaches the user verbatim.
fn load_ingestion(
    input: &Path,
    format: Option<SourceFormat>,
    delimiter: Option<u8>,
    encoding_label: Option<&str>,
) -> Result<Ingestion> {
    let encoding = io_utils::resolve_encoding(encoding_label)?;
    info!("Ingesting '{}'", input.display());
    let ingestion = ingest::ingest_path(input, format, delimiter, encoding)?;
    info!(
        "Ingested {} record(s) from '{}'",
        ingestion.summary.record_count,
        input.display()
    );
    Ok(ingestion)
}

fn print_view(headers: &[&str], rows: Vec<Vec<String>>) {
    let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    table::print_table(&headers, &rows);
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Serializing output to JSON")?;
    println!("{rendered}");
    Ok(())
}
