//! Header row detection for exports that prepend metadata above the real
//! column labels.

/// Vocabulary used to score candidate header rows. A cell counts toward a
/// row's score when it contains any of these as a substring.
const HEADER_KEYWORDS: &[&str] = &[
    "amount", "total", "date", "party", "customer", "invoice", "product", "item", "qty",
    "quantity", "price", "rate",
];

/// Only the leading rows are considered; metadata preambles are short.
const HEADER_SCAN_ROWS: usize = 10;

/// Returns the 0-based index of the most header-like row among the first
/// ten. The first row with the strictly highest keyword score wins; when
/// nothing scores above zero the index defaults to 0, which is correct for
/// well-formed exports.
pub fn detect_header_row(rows: &[Vec<String>]) -> usize {
    let mut best_row = 0usize;
    let mut best_score = 0usize;
    for (idx, row) in rows.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let score = header_score(row);
        if score > best_score {
            best_score = score;
            best_row = idx;
        }
    }
    best_row
}

fn header_score(row: &[String]) -> usize {
    row.iter()
        .filter(|cell| !cell.trim().is_empty())
        .filter(|cell| {
            let lowered = cell.trim().to_lowercase();
            HEADER_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn metadata_preamble_is_skipped() {
        let rows = vec![
            row(&["Kaadu Organics", "", ""]),
            row(&["Generated for: All Users", "", ""]),
            row(&["Date", "Party Name", "Amount"]),
            row(&["01/04/2024", "Green Leaf Stores", "1200"]),
        ];
        assert_eq!(detect_header_row(&rows), 2);
    }

    #[test]
    fn clean_export_keeps_row_zero() {
        let rows = vec![
            row(&["Invoice No", "Date", "Customer", "Amount"]),
            row(&["INV-1", "2024-01-05", "Green Leaf Stores", "800"]),
        ];
        assert_eq!(detect_header_row(&rows), 0);
    }

    #[test]
    fn ties_keep_the_earliest_row() {
        let rows = vec![
            row(&["Date", "Amount"]),
            row(&["Date", "Total"]),
        ];
        assert_eq!(detect_header_row(&rows), 0);
    }

    #[test]
    fn zero_scores_default_to_row_zero() {
        let rows = vec![
            row(&["alpha", "beta"]),
            row(&["gamma", "delta"]),
        ];
        assert_eq!(detect_header_row(&rows), 0);
    }

    #[test]
    fn rows_beyond_the_scan_window_are_ignored() {
        let mut rows = vec![row(&["x", "y"]); 12];
        rows.push(row(&["Date", "Party", "Amount", "Invoice"]));
        assert_eq!(detect_header_row(&rows), 0);
    }

    #[test]
    fn score_counts_cells_not_keyword_occurrences() {
        // "Total Amount" holds two keywords but contributes one cell.
        let single_cell = row(&["Total Amount"]);
        let two_cells = row(&["Qty", "Rate"]);
        assert_eq!(header_score(&single_cell), 1);
        assert_eq!(header_score(&two_cells), 2);
    }
}
