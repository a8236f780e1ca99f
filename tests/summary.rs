mod common;

use assert_cmd::Command;
use common::{TestWorkspace, fixture_path};

#[test]
fn summary_renders_statistics_table() {
    let input = fixture_path("field_sales_export.csv");
    let assert = Command::cargo_bin("sales-ingest")
        .expect("binary exists")
        .args(["summary", "--input", input.to_str().expect("utf8 path")])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let header = stdout.lines().next().expect("header line");
    assert!(header.contains("statistic"));
    assert!(header.contains("value"));

    let row = |label: &str| {
        stdout
            .lines()
            .find(|line| line.starts_with(label))
            .unwrap_or_else(|| panic!("missing row {label}"))
            .to_string()
    };
    assert!(row("total_amount").ends_with("8105.00"));
    assert!(row("record_count").ends_with('7'));
    assert!(row("unique_customers").ends_with('5'));
    assert!(row("unique_products").ends_with('6'));
    assert!(row("unique_invoices").ends_with('6'));
    assert!(row("date_from").ends_with("04-01-2024"));
    assert!(row("date_to").ends_with("08-04-2024"));
}

#[test]
fn summary_json_reports_exact_statistics() {
    let input = fixture_path("clean_sales.csv");
    let assert = Command::cargo_bin("sales-ingest")
        .expect("binary exists")
        .args(["summary", "--input", input.to_str().expect("utf8 path"), "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let summary: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(summary["total_amount"], "3840");
    assert_eq!(summary["record_count"], 3);
    assert_eq!(summary["unique_customers"], 2);
    assert_eq!(summary["unique_products"], 2);
    assert_eq!(summary["unique_invoices"], 3);
    assert_eq!(summary["date_from"], "05-01-2024");
    assert_eq!(summary["date_to"], "02-02-2024");
}

#[test]
fn summary_reports_na_dates_when_no_date_parses() {
    let workspace = TestWorkspace::new();
    let input = workspace.write("undated.csv", "Date,Party,Amount\nsoon,Kumar,100\n");

    let assert = Command::cargo_bin("sales-ingest")
        .expect("binary exists")
        .args(["summary", "--input", input.to_str().expect("utf8 path"), "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let summary: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(summary["record_count"], 1);
    assert_eq!(summary["date_from"], "N/A");
    assert_eq!(summary["date_to"], "N/A");
}
