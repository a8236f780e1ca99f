use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use sales_ingest::amount::{normalize_amount, normalize_price, normalize_quantity};
use sales_ingest::category::classify;
use sales_ingest::dates::{display_date, normalize_date};
use sales_ingest::ingest::ingest_rows;

const CATEGORY_VOCABULARY: &[&str] = &[
    "Jaggery Products",
    "Rice",
    "Oils",
    "Dals & Pulses",
    "Millets",
    "Flours",
    "Coffee",
    "Health Products",
    "Honey",
    "Ghee & Butter",
    "Spices",
    "Coconut",
    "Aval (Poha)",
    "Fresh Produce",
    "Sweets",
    "Pickles",
    "Tea",
    "Other",
];

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..13, 1u32..29).prop_map(|(year, month, day)| {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    })
}

/// Letters that cannot spell a header keyword or a missing-cell marker, so
/// generated cells never shift header detection or blank out.
fn neutral_text_strategy() -> impl Strategy<Value = String> {
    "[bcdfghst ]{0,600}"
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::new();
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

proptest! {
    #[test]
    fn normalizers_accept_arbitrary_text(raw in ".*") {
        let _ = normalize_amount(&raw);
        let _ = normalize_price(&raw);
        let _ = normalize_date(&raw);
        prop_assert!(normalize_quantity(&raw) >= Decimal::ZERO);
    }

    #[test]
    fn currency_decorations_do_not_change_the_amount(
        (rupees, paise) in (0u32..10_000_000, 0u8..100)
    ) {
        let decorated = format!("₹ {}.{paise:02}", group_thousands(rupees));
        let expected = Decimal::new(i64::from(rupees) * 100 + i64::from(paise), 2);
        prop_assert_eq!(normalize_amount(&decorated), expected);
    }

    #[test]
    fn classification_stays_in_the_known_vocabulary(product in "[a-zA-Z0-9 ]{0,40}") {
        prop_assert!(CATEGORY_VOCABULARY.contains(&classify(&product)));
    }

    #[test]
    fn display_dates_reparse_to_the_same_day(date in date_strategy()) {
        let rendered = display_date(&date);
        prop_assert_eq!(normalize_date(&rendered), Some(date));
    }

    #[test]
    fn iso_dates_reparse_to_the_same_day(date in date_strategy()) {
        let rendered = date.format("%Y-%m-%d").to_string();
        prop_assert_eq!(normalize_date(&rendered), Some(date));
    }

    #[test]
    fn product_text_never_exceeds_the_storage_cap(product in neutral_text_strategy()) {
        let table = vec![
            vec!["Item".to_string(), "Amount".to_string()],
            vec![product, "10".to_string()],
        ];
        let ingestion = ingest_rows(table).expect("one qualifying row");
        prop_assert!(ingestion.records[0].product.chars().count() <= 500);
    }
}
