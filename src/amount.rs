//! Numeric normalization for money and quantity cells.
//!
//! All three normalizers are total: parse failures collapse to zero so a
//! malformed cell can never reject its row. Exactness is preserved by
//! parsing into `Decimal`; no value passes through binary floating point.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

static CURRENCY_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[₹$€£,\s]").expect("currency noise pattern"));
static PAREN_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*\)").expect("parenthesized span pattern"));
static PRICE_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("price noise pattern"));

/// Parses a currency-formatted amount cell.
///
/// Strips rupee/dollar/euro/pound symbols, thousands separators, and
/// whitespace, then removes any parenthesized annotation such as a tax
/// percentage. Whatever remains must be a plain decimal number; otherwise
/// the result is 0. Negative amounts survive parsing and are excluded
/// later by the positivity gate.
pub fn normalize_amount(raw: &str) -> Decimal {
    let stripped = CURRENCY_NOISE.replace_all(raw, "");
    let stripped = PAREN_SPAN.replace_all(&stripped, "");
    coerce_decimal(stripped.trim()).unwrap_or(Decimal::ZERO)
}

/// Parses a unit-price cell by keeping only digits and decimal points.
/// This also strips any sign, so prices are always non-negative.
pub fn normalize_price(raw: &str) -> Decimal {
    let digits = PRICE_NOISE.replace_all(raw, "");
    coerce_decimal(digits.as_ref()).unwrap_or(Decimal::ZERO)
}

/// Parses a quantity cell as a plain decimal. No currency cleaning is
/// applied; anything that is not a bare number, and any negative value,
/// becomes 0.
pub fn normalize_quantity(raw: &str) -> Decimal {
    let quantity = coerce_decimal(raw.trim()).unwrap_or(Decimal::ZERO);
    if quantity.is_sign_negative() {
        Decimal::ZERO
    } else {
        quantity
    }
}

fn coerce_decimal(token: &str) -> Option<Decimal> {
    if token.is_empty() {
        return None;
    }
    Decimal::from_str(token)
        .ok()
        .or_else(|| Decimal::from_scientific(token).ok())
}
