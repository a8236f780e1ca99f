//! Single-pass aggregate statistics over the normalized record stream.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::dates::display_date;
use crate::record::{NormalizedRecord, UNKNOWN_PARTY};

/// Rendered stand-in for the date range when no row carried a parseable date.
pub const NO_DATE: &str = "N/A";

/// Aggregate statistics for one ingested file. `total_amount` is the exact
/// decimal sum over the returned records, and every count covers that same
/// record set, never a superset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestionSummary {
    pub total_amount: Decimal,
    pub record_count: usize,
    pub unique_customers: usize,
    pub unique_products: usize,
    pub unique_invoices: usize,
    pub date_from: String,
    pub date_to: String,
}

impl IngestionSummary {
    /// Label/value rows for two-column table output.
    pub fn render_rows(&self) -> Vec<Vec<String>> {
        vec![
            vec!["total_amount".to_string(), self.total_amount.to_string()],
            vec!["record_count".to_string(), self.record_count.to_string()],
            vec![
                "unique_customers".to_string(),
                self.unique_customers.to_string(),
            ],
            vec![
                "unique_products".to_string(),
                self.unique_products.to_string(),
            ],
            vec![
                "unique_invoices".to_string(),
                self.unique_invoices.to_string(),
            ],
            vec!["date_from".to_string(), self.date_from.clone()],
            vec!["date_to".to_string(), self.date_to.clone()],
        ]
    }
}

/// Folds records into an [`IngestionSummary`] as the pipeline emits them.
#[derive(Debug, Default)]
pub struct SummaryAccumulator {
    total_amount: Decimal,
    record_count: usize,
    customers: HashSet<String>,
    products: HashSet<String>,
    invoices: HashSet<String>,
    date_min: Option<NaiveDate>,
    date_max: Option<NaiveDate>,
}

impl SummaryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorbs one accepted record. Empty and `Unknown` party names stay out
    /// of the customer count; empty products and invoice numbers stay out of
    /// theirs; unknown dates do not move the date range.
    pub fn ingest(&mut self, record: &NormalizedRecord) {
        self.total_amount += record.amount;
        self.record_count += 1;
        if !record.party_name.is_empty() && record.party_name != UNKNOWN_PARTY {
            self.customers.insert(record.party_name.clone());
        }
        if !record.product.is_empty() {
            self.products.insert(record.product.clone());
        }
        if !record.invoice_no.is_empty() {
            self.invoices.insert(record.invoice_no.clone());
        }
        if let Some(date) = record.sale_date {
            self.date_min = Some(self.date_min.map_or(date, |d| d.min(date)));
            self.date_max = Some(self.date_max.map_or(date, |d| d.max(date)));
        }
    }

    pub fn finish(self) -> IngestionSummary {
        IngestionSummary {
            total_amount: self.total_amount,
            record_count: self.record_count,
            unique_customers: self.customers.len(),
            unique_products: self.products.len(),
            unique_invoices: self.invoices.len(),
            date_from: self
                .date_min
                .as_ref()
                .map(display_date)
                .unwrap_or_else(|| NO_DATE.to_string()),
            date_to: self
                .date_max
                .as_ref()
                .map(display_date)
                .unwrap_or_else(|| NO_DATE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::month_key;
    use std::str::FromStr;

    fn record(
        party: &str,
        product: &str,
        invoice: &str,
        amount: &str,
        date: Option<NaiveDate>,
    ) -> NormalizedRecord {
        NormalizedRecord {
            sale_date: date,
            month_key: month_key(date.as_ref()),
            party_name: party.to_string(),
            invoice_no: invoice.to_string(),
            product: product.to_string(),
            category: "Other".to_string(),
            quantity: Decimal::ZERO,
            unit: String::new(),
            price_per_unit: Decimal::ZERO,
            amount: Decimal::from_str(amount).unwrap(),
        }
    }

    fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn totals_are_exact_decimal_sums() {
        let mut acc = SummaryAccumulator::new();
        acc.ingest(&record("A", "Honey", "1", "0.1", None));
        acc.ingest(&record("B", "Honey", "2", "0.2", None));
        let summary = acc.finish();
        assert_eq!(summary.total_amount, Decimal::from_str("0.3").unwrap());
        assert_eq!(summary.record_count, 2);
    }

    #[test]
    fn sentinel_values_stay_out_of_distinct_counts() {
        let mut acc = SummaryAccumulator::new();
        acc.ingest(&record(UNKNOWN_PARTY, "", "", "10", None));
        acc.ingest(&record("", "Honey", "INV-1", "20", None));
        acc.ingest(&record("Kumar", "Honey", "INV-1", "30", None));
        let summary = acc.finish();
        assert_eq!(summary.unique_customers, 1);
        assert_eq!(summary.unique_products, 1);
        assert_eq!(summary.unique_invoices, 1);
        assert_eq!(summary.record_count, 3);
    }

    #[test]
    fn date_range_tracks_known_dates_only() {
        let mut acc = SummaryAccumulator::new();
        acc.ingest(&record("A", "p", "1", "10", day(2024, 6, 15)));
        acc.ingest(&record("B", "p", "2", "10", None));
        acc.ingest(&record("C", "p", "3", "10", day(2024, 1, 3)));
        let summary = acc.finish();
        assert_eq!(summary.date_from, "03-01-2024");
        assert_eq!(summary.date_to, "15-06-2024");
    }

    #[test]
    fn empty_date_range_renders_sentinel() {
        let mut acc = SummaryAccumulator::new();
        acc.ingest(&record("A", "p", "1", "10", None));
        let summary = acc.finish();
        assert_eq!(summary.date_from, NO_DATE);
        assert_eq!(summary.date_to, NO_DATE);
    }

    #[test]
    fn render_rows_covers_every_field_in_order() {
        let summary = SummaryAccumulator::new().finish();
        let rows = summary.render_rows();
        let labels: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(
            labels,
            [
                "total_amount",
                "record_count",
                "unique_customers",
                "unique_products",
                "unique_invoices",
                "date_from",
                "date_to",
            ]
        );
        assert_eq!(rows[0][1], "0");
        assert_eq!(rows[5][1], NO_DATE);
    }
}
