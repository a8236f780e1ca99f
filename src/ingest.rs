//! Pipeline orchestration: header detection, column resolution, and the
//! per-row build/filter/accumulate pass.
//!
//! Ingestion is all-or-nothing at the file level. Cell problems are absorbed
//! by the normalizers; the only file-level failures are an unreadable
//! source, a missing amount column, and an empty result after the
//! positive-amount gate.

use std::path::Path;

use encoding_rs::Encoding;
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::columns::{self, ColumnMap};
use crate::error::Result;
use crate::header::detect_header_row;
use crate::record::{self, NormalizedRecord};
use crate::source::{self, SourceFormat};
use crate::summary::{IngestionSummary, SummaryAccumulator};

/// The full result of ingesting one source: the record sequence and the
/// summary computed over exactly that sequence.
#[derive(Debug, Clone, Serialize)]
pub struct Ingestion {
    pub records: Vec<NormalizedRecord>,
    pub summary: IngestionSummary,
}

/// Reads and ingests one file. `format` falls back to the file extension,
/// `delimiter` to comma (tab for `.tsv`), `encoding` to UTF-8 with a
/// Windows-1252 retry per cell.
pub fn ingest_path(
    path: &Path,
    format: Option<SourceFormat>,
    delimiter: Option<u8>,
    encoding: Option<&'static Encoding>,
) -> Result<Ingestion> {
    let rows = source::load_rows(path, format, delimiter, encoding)?;
    ingest_rows(rows)
}

/// Ingests already-materialized raw rows. The first pass over the leading
/// rows picks the header; the buffered rows are then spliced instead of
/// re-reading the source.
pub fn ingest_rows(rows: Vec<Vec<String>>) -> Result<Ingestion> {
    let header_index = detect_header_row(&rows);
    debug!("using row {header_index} as header");

    let header = rows.get(header_index).cloned().unwrap_or_default();
    let column_map = columns::resolve_columns(&header)?;
    debug!("resolved columns: {column_map:?}");

    let mut records = Vec::new();
    let mut accumulator = SummaryAccumulator::new();
    for row in rows.iter().skip(header_index + 1) {
        if source::is_blank_row(row) {
            continue;
        }
        let amount = record::row_amount(row, &column_map);
        if amount <= Decimal::ZERO {
            continue;
        }
        let record = record::build_record(row, &column_map, amount);
        accumulator.ingest(&record);
        records.push(record);
    }

    if records.is_empty() {
        return Err(crate::error::IngestError::NoQualifyingRows);
    }

    debug!("accepted {} of {} data rows", records.len(), rows.len().saturating_sub(header_index + 1));
    Ok(Ingestion {
        records,
        summary: accumulator.finish(),
    })
}

/// Exposed for callers that resolve columns without running the full
/// pipeline, such as schema diagnostics in front of an ingest.
pub fn resolve_header(rows: &[Vec<String>]) -> Result<(usize, ColumnMap)> {
    let header_index = detect_header_row(rows);
    let header = rows.get(header_index).cloned().unwrap_or_default();
    let column_map = columns::resolve_columns(&header)?;
    Ok((header_index, column_map))
}
