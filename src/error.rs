//! Error types for sales export ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// File-level failures that abort an ingestion run.
///
/// Cell-level anomalies (unparseable dates, quantities, prices, currency
/// noise) never appear here; the normalizers absorb them with documented
/// defaults. An `IngestError` means the whole file was rejected and no
/// records were produced.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The source could not be opened or parsed as tabular data at all.
    #[error("could not read sales data from {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// No column in the detected header row matched an amount synonym.
    #[error(
        "could not detect an amount column; found columns: {}; accepted names include: {}",
        format_labels(found),
        accepted.join(", ")
    )]
    MissingAmountColumn {
        accepted: Vec<String>,
        found: Vec<String>,
    },

    /// Every data row was excluded by the positive-amount gate.
    #[error(
        "no rows with a positive amount value after parsing; check that the amount column contains numeric sales figures"
    )]
    NoQualifyingRows,
}

fn format_labels(labels: &[String]) -> String {
    if labels.is_empty() {
        "(none)".to_string()
    } else {
        labels.join(", ")
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
