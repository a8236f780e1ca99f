//! Per-row normalization into the output record shape.
//!
//! Cell-level problems never fail a row: text fields fall back to defaults,
//! numeric fields fall back to zero, dates fall back to unknown. The only
//! thing that removes a row is the positive-amount gate applied by the
//! pipeline before `build_record` runs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::amount::{normalize_amount, normalize_price, normalize_quantity};
use crate::category;
use crate::columns::ColumnMap;
use crate::dates::{month_key, normalize_date};
use crate::source::is_missing_cell;

/// Placeholder party name for rows with no recognizable customer.
pub const UNKNOWN_PARTY: &str = "Unknown";

const PARTY_NAME_MAX_CHARS: usize = 255;
const INVOICE_NO_MAX_CHARS: usize = 50;
const PRODUCT_MAX_CHARS: usize = 500;
const UNIT_MAX_CHARS: usize = 20;

/// Column labels for records written as CSV, in output order.
pub const CSV_HEADER: [&str; 10] = [
    "sale_date",
    "month_key",
    "party_name",
    "invoice_no",
    "product",
    "category",
    "quantity",
    "unit",
    "price_per_unit",
    "amount",
];

/// One normalized sales row. Immutable once built; ownership passes to the
/// caller as a plain value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub sale_date: Option<NaiveDate>,
    pub month_key: String,
    pub party_name: String,
    pub invoice_no: String,
    pub product: String,
    pub category: String,
    pub quantity: Decimal,
    pub unit: String,
    pub price_per_unit: Decimal,
    pub amount: Decimal,
}

impl NormalizedRecord {
    /// Renders the record as one CSV row matching [`CSV_HEADER`]. Unknown
    /// dates render as an empty field; known dates render ISO 8601.
    pub fn to_csv_row(&self) -> Vec<String> {
        vec![
            self.sale_date.map(|d| d.to_string()).unwrap_or_default(),
            self.month_key.clone(),
            self.party_name.clone(),
            self.invoice_no.clone(),
            self.product.clone(),
            self.category.clone(),
            self.quantity.to_string(),
            self.unit.clone(),
            self.price_per_unit.to_string(),
            self.amount.to_string(),
        ]
    }
}

/// Normalized amount for a raw row. The pipeline gates on this value before
/// paying for a full record build.
pub fn row_amount(row: &[String], columns: &ColumnMap) -> Decimal {
    normalize_amount(cell(row, Some(columns.amount)))
}

/// Builds one record from a raw data row using the resolved column map.
/// `amount` is the already-normalized value the inclusion gate accepted.
pub fn build_record(row: &[String], columns: &ColumnMap, amount: Decimal) -> NormalizedRecord {
    let sale_date = normalize_date(cell(row, columns.date));
    let product = clean_text(cell(row, columns.product), PRODUCT_MAX_CHARS, "");
    let category = resolve_category(&product, cell(row, columns.category_hint));
    NormalizedRecord {
        month_key: month_key(sale_date.as_ref()),
        sale_date,
        party_name: clean_text(cell(row, columns.party_name), PARTY_NAME_MAX_CHARS, UNKNOWN_PARTY),
        invoice_no: clean_text(cell(row, columns.invoice_no), INVOICE_NO_MAX_CHARS, ""),
        product,
        category,
        quantity: normalize_quantity(cell(row, columns.quantity)),
        unit: clean_text(cell(row, columns.unit), UNIT_MAX_CHARS, ""),
        price_per_unit: normalize_price(cell(row, columns.price_per_unit)),
        amount,
    }
}

fn cell(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|i| row.get(i))
        .map(String::as_str)
        .unwrap_or("")
}

/// Trims, drops missing-value sentinels in favor of `default`, and caps the
/// result at `max_chars` characters.
fn clean_text(raw: &str, max_chars: usize, default: &str) -> String {
    if is_missing_cell(raw) {
        return default.to_string();
    }
    raw.trim().chars().take(max_chars).collect()
}

/// Classification from product text wins; a source-supplied category hint is
/// consulted only when the classifier falls through to `Other` and the hint
/// names one of the fixed category labels.
fn resolve_category(product: &str, hint: &str) -> String {
    let classified = category::classify(product);
    if classified == category::OTHER {
        if let Some(label) = category::canonical_label(hint) {
            return label.to_string();
        }
    }
    classified.to_string()
}
