//! A1 notation and cell search helpers.

use serde_json::Value;

/// Column number (1-based) to letters: 1 -> A, 26 -> Z, 27 -> AA.
pub fn column_letters(col: u32) -> String {
    let mut n = col;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Quotes a worksheet title for use in a range. Embedded quotes are doubled.
pub fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Range naming one cell, e.g. `'Sheet1'!C4`.
pub fn a1_cell(sheet_title: &str, row: u32, col: u32) -> String {
    format!(
        "{}!{}{}",
        quote_sheet_title(sheet_title),
        column_letters(col),
        row
    )
}

fn cell_matches(cell: &Value, identifier: &str) -> bool {
    match cell {
        Value::String(text) => text == identifier,
        Value::Number(number) => number.to_string() == identifier,
        _ => false,
    }
}

/// First cell, scanning row by row, whose value equals `identifier`.
///
/// Returns 1-based `(row, col)`.
pub fn locate(values: &[Vec<Value>], identifier: &str) -> Option<(u32, u32)> {
    values.iter().enumerate().find_map(|(r, row)| {
        row.iter()
            .position(|cell| cell_matches(cell, identifier))
            .map(|c| (r as u32 + 1, c as u32 + 1))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_columns_to_letters() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(3), "C");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(703), "AAA");
    }

    #[test]
    fn builds_quoted_cell_ranges() {
        assert_eq!(a1_cell("Sheet1", 4, 3), "'Sheet1'!C4");
        assert_eq!(a1_cell("Bob's list", 1, 28), "'Bob''s list'!AB1");
    }

    #[test]
    fn locates_first_exact_match_row_major() {
        let values: Vec<Vec<Value>> = vec![
            vec![json!("name"), json!("Email 1")],
            vec![json!("Alice"), json!("")],
            vec![json!("x"), json!("alice"), json!("alice")],
            vec![json!("alice")],
        ];
        assert_eq!(locate(&values, "alice"), Some((3, 2)));
        assert_eq!(locate(&values, "Alice"), Some((2, 1)));
        assert_eq!(locate(&values, "ali"), None);
    }

    #[test]
    fn matches_numeric_cells_by_text() {
        let values = vec![vec![json!(""), json!(42)]];
        assert_eq!(locate(&values, "42"), Some((1, 2)));
    }
}
