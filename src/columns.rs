//! Canonical field resolution over loosely-named source columns.
//!
//! Exports label the same data dozens of ways ("Bill No.", "Inv No",
//! "Invoice Number"). Each canonical field carries an ordered synonym list;
//! the first synonym present among the header labels claims that column.
//! Matching is case-insensitive on trimmed labels with trailing periods
//! dropped, so "Bill No." and "bill no" are the same label. Only `amount`
//! is mandatory.

use crate::error::{IngestError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Date,
    PartyName,
    InvoiceNo,
    Product,
    CategoryHint,
    Quantity,
    Unit,
    PricePerUnit,
    Amount,
}

struct AliasSpec {
    field: CanonicalField,
    aliases: &'static [&'static str],
}

const ALIAS_SPECS: &[AliasSpec] = &[
    AliasSpec {
        field: CanonicalField::Date,
        aliases: &[
            "date",
            "sale date",
            "invoice date",
            "transaction date",
            "dt",
            "trans_date",
            "sale_date",
            "bill date",
            "order date",
        ],
    },
    AliasSpec {
        field: CanonicalField::PartyName,
        aliases: &[
            "party name",
            "party",
            "customer",
            "customer name",
            "buyer",
            "client",
            "party_name",
            "client name",
            "sold to",
        ],
    },
    AliasSpec {
        field: CanonicalField::InvoiceNo,
        aliases: &[
            "invoice no",
            "invoice no.",
            "invoice",
            "inv no",
            "inv_no",
            "invoice_no",
            "bill no",
            "bill_no",
            "receipt no",
            "order no",
            "invoice number",
            "bill number",
        ],
    },
    AliasSpec {
        field: CanonicalField::Product,
        aliases: &[
            "product",
            "item",
            "product name",
            "description",
            "item name",
            "goods",
            "item description",
            "product description",
            "particulars",
            "name",
            "service",
            "service name",
        ],
    },
    AliasSpec {
        field: CanonicalField::CategoryHint,
        aliases: &[
            "category",
            "product category",
            "item category",
            "product group",
            "group",
            "category name",
        ],
    },
    AliasSpec {
        field: CanonicalField::Quantity,
        aliases: &[
            "quantity",
            "qty",
            "units",
            "quantity sold",
            "no of units",
            "nos",
            "pcs",
            "pieces",
        ],
    },
    AliasSpec {
        field: CanonicalField::Unit,
        aliases: &["unit", "uom", "unit of measure", "measure", "unit name"],
    },
    AliasSpec {
        field: CanonicalField::PricePerUnit,
        aliases: &[
            "price per unit",
            "price/unit",
            "price / unit",
            "unit price",
            "price",
            "rate",
            "mrp",
            "price_per_unit",
            "selling price",
            "sp",
            "cost",
            "cost price",
        ],
    },
    AliasSpec {
        field: CanonicalField::Amount,
        aliases: &[
            "amount",
            "total",
            "total amount",
            "value",
            "net amount",
            "sales amount",
            "net",
            "net_amount",
            "total_amount",
            "sale amount",
            "gross amount",
            "taxable amount",
            "line total",
            "subtotal",
            "sub total",
            "invoice amount",
            "bill amount",
        ],
    },
];

/// Resolved column indexes for one source table. `amount` is always bound;
/// everything else may be absent and is defaulted downstream.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pub date: Option<usize>,
    pub party_name: Option<usize>,
    pub invoice_no: Option<usize>,
    pub product: Option<usize>,
    pub category_hint: Option<usize>,
    pub quantity: Option<usize>,
    pub unit: Option<usize>,
    pub price_per_unit: Option<usize>,
    pub amount: usize,
}

/// Maps header labels onto canonical fields.
///
/// For each field the synonym list is walked in priority order and the
/// first synonym found among the labels wins; if the same label appears in
/// two columns the leftmost one is used. Fails only when no amount synonym
/// matches, reporting both the labels seen and the synonyms accepted.
pub fn resolve_columns(header: &[String]) -> Result<ColumnMap> {
    let labels: Vec<String> = header.iter().map(|label| normalize_label(label)).collect();
    let find = |field: CanonicalField| -> Option<usize> {
        let spec = ALIAS_SPECS.iter().find(|spec| spec.field == field)?;
        spec.aliases
            .iter()
            .find_map(|alias| labels.iter().position(|label| label == alias))
    };

    let amount = find(CanonicalField::Amount).ok_or_else(|| IngestError::MissingAmountColumn {
        accepted: amount_aliases()
            .iter()
            .map(|alias| alias.to_string())
            .collect(),
        found: header.iter().map(|label| label.trim().to_string()).collect(),
    })?;

    Ok(ColumnMap {
        date: find(CanonicalField::Date),
        party_name: find(CanonicalField::PartyName),
        invoice_no: find(CanonicalField::InvoiceNo),
        product: find(CanonicalField::Product),
        category_hint: find(CanonicalField::CategoryHint),
        quantity: find(CanonicalField::Quantity),
        unit: find(CanonicalField::Unit),
        price_per_unit: find(CanonicalField::PricePerUnit),
        amount,
    })
}

/// Synonyms accepted for the mandatory amount column, in priority order.
pub fn amount_aliases() -> &'static [&'static str] {
    ALIAS_SPECS
        .iter()
        .find(|spec| spec.field == CanonicalField::Amount)
        .map(|spec| spec.aliases)
        .unwrap_or(&[])
}

fn normalize_label(label: &str) -> String {
    label
        .trim()
        .trim_end_matches('.')
        .trim_end()
        .to_lowercase()
}
