//! Raw row materialization for sales exports.
//!
//! Every supported source (delimited text, Excel workbooks) is read fully
//! into `Vec<Vec<String>>` before any interpretation happens, so header
//! detection and record building operate on one uniform shape regardless of
//! where the bytes came from. Cells are trimmed and BOM-stripped here;
//! nothing else is normalized at this stage.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use clap::ValueEnum;
use encoding_rs::{Encoding, WINDOWS_1252};

use crate::error::{IngestError, Result};
use crate::io_utils;

/// Physical format of a sales export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum SourceFormat {
    Csv,
    Xlsx,
    Xls,
}

impl SourceFormat {
    /// Infers the format from the file extension. Returns `None` for
    /// unrecognized extensions so callers can require an explicit format.
    pub fn from_path(path: &Path) -> Option<SourceFormat> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Some(SourceFormat::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => Some(SourceFormat::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => Some(SourceFormat::Xlsx),
            Some(ext) if ext.eq_ignore_ascii_case("xls") => Some(SourceFormat::Xls),
            _ => None,
        }
    }
}

/// Reads the whole source into trimmed string cells.
///
/// `format` falls back to extension inference; `delimiter` and `encoding`
/// apply to delimited text only. With no explicit encoding, cells are
/// decoded as UTF-8 with a Windows-1252 retry per field, which accepts the
/// Latin-1-era exports some accounting tools still produce.
pub fn load_rows(
    path: &Path,
    format: Option<SourceFormat>,
    delimiter: Option<u8>,
    encoding: Option<&'static Encoding>,
) -> Result<Vec<Vec<String>>> {
    let format = format
        .or_else(|| SourceFormat::from_path(path))
        .ok_or_else(|| IngestError::Read {
            path: path.to_path_buf(),
            message: "unrecognized file extension; expected .csv, .tsv, .xlsx, or .xls, or an explicit format".to_string(),
        })?;
    let rows = match format {
        SourceFormat::Csv => read_delimited_rows(path, delimiter, encoding)?,
        SourceFormat::Xlsx | SourceFormat::Xls => read_workbook_rows(path)?,
    };
    if rows.is_empty() {
        return Err(IngestError::Read {
            path: path.to_path_buf(),
            message: "file contains no rows".to_string(),
        });
    }
    Ok(rows)
}

fn read_delimited_rows(
    path: &Path,
    delimiter: Option<u8>,
    encoding: Option<&'static Encoding>,
) -> Result<Vec<Vec<String>>> {
    let read_error = |message: String| IngestError::Read {
        path: path.to_path_buf(),
        message,
    };
    let delimiter = io_utils::resolve_input_delimiter(path, delimiter);
    let mut reader = io_utils::open_flexible_csv_reader(path, delimiter)
        .map_err(|err| read_error(format!("{err:#}")))?;

    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record =
            record.map_err(|err| read_error(format!("row {}: {err}", row_idx + 1)))?;
        let mut cells = Vec::with_capacity(record.len());
        for field in record.iter() {
            let text = decode_field(field, encoding)
                .map_err(|message| read_error(format!("row {}: {message}", row_idx + 1)))?;
            cells.push(trim_cell(&text));
        }
        rows.push(cells);
    }
    Ok(rows)
}

fn decode_field(
    bytes: &[u8],
    encoding: Option<&'static Encoding>,
) -> std::result::Result<String, String> {
    match encoding {
        Some(encoding) => {
            io_utils::decode_bytes(bytes, encoding).map_err(|err| err.to_string())
        }
        None => match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_string()),
            Err(_) => {
                let (text, _, _) = WINDOWS_1252.decode(bytes);
                Ok(text.into_owned())
            }
        },
    }
}

fn read_workbook_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let read_error = |message: String| IngestError::Read {
        path: path.to_path_buf(),
        message,
    };
    let mut workbook = open_workbook_auto(path).map_err(|err| read_error(err.to_string()))?;
    let sheet_names = workbook.sheet_names().to_owned();
    let first_sheet = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| read_error("workbook contains no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|err| read_error(err.to_string()))?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(|cell| trim_cell(&cell_to_string(cell))).collect())
        .collect();
    Ok(rows)
}

/// Renders a workbook cell the way it would appear in a CSV export. Whole
/// floats lose the trailing `.0` so spreadsheet date serials come through as
/// plain digit runs, matching what the date normalizer expects.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Bool(b) => b.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        // Time-of-day fractions are dropped so the day serial feeds the
        // date normalizer's serial rule.
        Data::DateTime(dt) => (dt.as_f64().trunc() as i64).to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

fn trim_cell(value: &str) -> String {
    value.trim_matches('\u{feff}').trim().to_string()
}

/// True for cells that carry no value: empty text or one of the sentinel
/// markers exporters use for missing data.
pub fn is_missing_cell(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }
    matches!(
        trimmed.to_lowercase().as_str(),
        "na" | "n/a" | "null" | "none" | "nan" | "nat" | "-"
    )
}

/// True when every cell in the row is missing; such rows are dropped before
/// record building.
pub fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| is_missing_cell(cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_inference_covers_supported_extensions() {
        assert_eq!(
            SourceFormat::from_path(&PathBuf::from("sales.CSV")),
            Some(SourceFormat::Csv)
        );
        assert_eq!(
            SourceFormat::from_path(&PathBuf::from("sales.tsv")),
            Some(SourceFormat::Csv)
        );
        assert_eq!(
            SourceFormat::from_path(&PathBuf::from("sales.xlsx")),
            Some(SourceFormat::Xlsx)
        );
        assert_eq!(
            SourceFormat::from_path(&PathBuf::from("ledger.xls")),
            Some(SourceFormat::Xls)
        );
        assert_eq!(SourceFormat::from_path(&PathBuf::from("sales.pdf")), None);
        assert_eq!(SourceFormat::from_path(&PathBuf::from("noext")), None);
    }

    #[test]
    fn whole_floats_render_without_fraction() {
        assert_eq!(cell_to_string(&Data::Float(45295.0)), "45295");
        assert_eq!(cell_to_string(&Data::Float(1234.5)), "1234.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(
            cell_to_string(&Data::String("Ponni Rice".to_string())),
            "Ponni Rice"
        );
    }

    #[test]
    fn trim_cell_strips_bom_and_whitespace() {
        assert_eq!(trim_cell("\u{feff}Date "), "Date");
        assert_eq!(trim_cell("  Amount"), "Amount");
    }

    #[test]
    fn missing_cell_markers_are_recognized() {
        for marker in ["", "  ", "NA", "n/a", "NULL", "None", "nan", "NaT", "-"] {
            assert!(is_missing_cell(marker), "expected missing: {marker:?}");
        }
        assert!(!is_missing_cell("0"));
        assert!(!is_missing_cell("Urad Dal"));
    }

    #[test]
    fn blank_rows_require_every_cell_missing() {
        let blank = vec!["".to_string(), "-".to_string(), "NA".to_string()];
        let partial = vec!["".to_string(), "Honey".to_string()];
        assert!(is_blank_row(&blank));
        assert!(!is_blank_row(&partial));
    }

    #[test]
    fn utf8_fields_decode_without_explicit_encoding() {
        assert_eq!(decode_field("Caf\u{e9}".as_bytes(), None).unwrap(), "Café");
    }

    #[test]
    fn latin1_bytes_fall_back_to_windows_1252() {
        // 0xE9 is 'é' in Windows-1252 but invalid UTF-8 on its own.
        let bytes = [b'C', b'a', b'f', 0xE9];
        assert_eq!(decode_field(&bytes, None).unwrap(), "Café");
    }
}
