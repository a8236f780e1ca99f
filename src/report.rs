//! In-memory aggregate views over a normalized record sequence.
//!
//! Amounts in rendered rows are rounded to two decimal places and percent
//! shares to one, but every grouping and share is computed over exact
//! decimals first. Ties in the descending-amount views break toward the
//! lexicographically smaller group key so output order is stable.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use itertools::Itertools;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::dates::UNKNOWN_MONTH_KEY;
use crate::record::NormalizedRecord;

pub const DEFAULT_PRODUCT_LIMIT: usize = 15;
pub const DEFAULT_CUSTOMER_LIMIT: usize = 10;

/// Optional predicates applied to records before aggregation. Date bounds
/// compare against the parsed sale date; rows with an unknown date fail any
/// bound that is set.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub category: Option<String>,
    pub product: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl RecordFilter {
    fn accepts(&self, record: &NormalizedRecord) -> bool {
        if let Some(category) = &self.category {
            if record.category != *category {
                return false;
            }
        }
        if let Some(product) = &self.product {
            if record.product != *product {
                return false;
            }
        }
        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(date) = record.sale_date else {
                return false;
            };
            if self.date_from.is_some_and(|from| date < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| date > to) {
                return false;
            }
        }
        true
    }

    /// The same filter reduced to its date bounds. The category and product
    /// share baselines are computed against this wider set.
    fn date_bounds_only(&self) -> RecordFilter {
        RecordFilter {
            category: None,
            product: None,
            date_from: self.date_from,
            date_to: self.date_to,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRow {
    pub month: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub amount: Decimal,
    pub count: usize,
    pub pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRow {
    pub product: String,
    pub category: String,
    pub amount: Decimal,
    pub qty: Decimal,
    pub invoices: usize,
    pub pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRow {
    pub customer: String,
    pub amount: Decimal,
    pub invoices: usize,
    pub products: usize,
    pub pct: Decimal,
}

impl MonthlyRow {
    pub fn render_row(&self) -> Vec<String> {
        vec![self.month.clone(), self.amount.to_string()]
    }
}

impl CategoryRow {
    pub fn render_row(&self) -> Vec<String> {
        vec![
            self.category.clone(),
            self.amount.to_string(),
            self.count.to_string(),
            self.pct.to_string(),
        ]
    }
}

impl ProductRow {
    pub fn render_row(&self) -> Vec<String> {
        vec![
            self.product.clone(),
            self.category.clone(),
            self.amount.to_string(),
            self.qty.to_string(),
            self.invoices.to_string(),
            self.pct.to_string(),
        ]
    }
}

impl CustomerRow {
    pub fn render_row(&self) -> Vec<String> {
        vec![
            self.customer.clone(),
            self.amount.to_string(),
            self.invoices.to_string(),
            self.products.to_string(),
            self.pct.to_string(),
        ]
    }
}

/// Amount totals per calendar month, ascending. Rows whose date never
/// parsed carry the `Unknown` month key and are left out.
pub fn monthly_totals(records: &[NormalizedRecord], filter: &RecordFilter) -> Vec<MonthlyRow> {
    let mut months: BTreeMap<&str, Decimal> = BTreeMap::new();
    for record in records.iter().filter(|r| filter.accepts(r)) {
        if record.month_key == UNKNOWN_MONTH_KEY {
            continue;
        }
        *months.entry(record.month_key.as_str()).or_default() += record.amount;
    }
    months
        .into_iter()
        .map(|(month, amount)| MonthlyRow {
            month: month.to_string(),
            amount: amount.round_dp(2),
        })
        .collect()
}

/// Amount, row count, and percent share per category, descending by amount.
/// Only the filter's date bounds apply here; the category and product
/// predicates are ignored so the breakdown always shows the whole mix.
pub fn category_breakdown(
    records: &[NormalizedRecord],
    filter: &RecordFilter,
) -> Vec<CategoryRow> {
    let date_filter = filter.date_bounds_only();
    let mut groups: HashMap<&str, (Decimal, usize)> = HashMap::new();
    for record in records.iter().filter(|r| date_filter.accepts(r)) {
        let entry = groups.entry(record.category.as_str()).or_default();
        entry.0 += record.amount;
        entry.1 += 1;
    }

    let grand = non_zero(groups.values().map(|(amount, _)| *amount).sum());
    groups
        .into_iter()
        .sorted_by(|(cat_a, (amt_a, _)), (cat_b, (amt_b, _))| {
            amt_b.cmp(amt_a).then_with(|| cat_a.cmp(cat_b))
        })
        .map(|(category, (amount, count))| CategoryRow {
            category: category.to_string(),
            amount: amount.round_dp(2),
            count,
            pct: percent(amount, grand),
        })
        .collect()
}

/// The `limit` largest (product, category) groups by amount. Percent shares
/// are taken against the date-bounded total rather than the fully filtered
/// one, so a category- or product-filtered view still reports each
/// product's share of the period.
pub fn top_products(
    records: &[NormalizedRecord],
    filter: &RecordFilter,
    limit: usize,
) -> Vec<ProductRow> {
    #[derive(Default)]
    struct Group<'a> {
        amount: Decimal,
        qty: Decimal,
        invoices: HashSet<&'a str>,
    }

    let mut groups: HashMap<(&str, &str), Group> = HashMap::new();
    for record in records.iter().filter(|r| filter.accepts(r)) {
        let group = groups
            .entry((record.product.as_str(), record.category.as_str()))
            .or_default();
        group.amount += record.amount;
        group.qty += record.quantity;
        group.invoices.insert(record.invoice_no.as_str());
    }

    let date_filter = filter.date_bounds_only();
    let grand = non_zero(
        records
            .iter()
            .filter(|r| date_filter.accepts(r))
            .map(|r| r.amount)
            .sum(),
    );
    groups
        .into_iter()
        .sorted_by(|a, b| b.1.amount.cmp(&a.1.amount).then_with(|| a.0.cmp(&b.0)))
        .take(limit)
        .map(|((product, category), group)| ProductRow {
            product: product.to_string(),
            category: category.to_string(),
            amount: group.amount.round_dp(2),
            qty: group.qty.round_dp(2),
            invoices: group.invoices.len(),
            pct: percent(group.amount, grand),
        })
        .collect()
}

/// The `limit` largest parties by amount, with distinct invoice and product
/// counts. The `Unknown` party is a group like any other.
pub fn top_customers(
    records: &[NormalizedRecord],
    filter: &RecordFilter,
    limit: usize,
) -> Vec<CustomerRow> {
    #[derive(Default)]
    struct Group<'a> {
        amount: Decimal,
        invoices: HashSet<&'a str>,
        products: HashSet<&'a str>,
    }

    let mut groups: HashMap<&str, Group> = HashMap::new();
    let mut grand = Decimal::ZERO;
    for record in records.iter().filter(|r| filter.accepts(r)) {
        let group = groups.entry(record.party_name.as_str()).or_default();
        group.amount += record.amount;
        group.invoices.insert(record.invoice_no.as_str());
        group.products.insert(record.product.as_str());
        grand += record.amount;
    }

    let grand = non_zero(grand);
    groups
        .into_iter()
        .sorted_by(|a, b| b.1.amount.cmp(&a.1.amount).then_with(|| a.0.cmp(&b.0)))
        .take(limit)
        .map(|(customer, group)| CustomerRow {
            customer: customer.to_string(),
            amount: group.amount.round_dp(2),
            invoices: group.invoices.len(),
            products: group.products.len(),
            pct: percent(group.amount, grand),
        })
        .collect()
}

fn percent(amount: Decimal, grand: Decimal) -> Decimal {
    (amount / grand * Decimal::ONE_HUNDRED).round_dp(1)
}

fn non_zero(total: Decimal) -> Decimal {
    if total == Decimal::ZERO {
        Decimal::ONE
    } else {
        total
    }
}
