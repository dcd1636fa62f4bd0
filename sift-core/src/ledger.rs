//! The persistent ledger: a header row plus rows of cells, kept in the
//! column order of the file it was read from.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::{Error, Result};

/// Names of the ledger columns the engine reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSchema {
    /// Confirmed category; a ledger without it is rejected
    pub category_column: String,
    /// Counterparty, the join key for historical lookups
    pub counterparty_column: String,
    pub date_column: String,
    pub amount_column: String,
    pub source_column: String,
}

impl Default for LedgerSchema {
    fn default() -> Self {
        Self {
            category_column: "additional detail".to_string(),
            counterparty_column: "business name".to_string(),
            date_column: "date".to_string(),
            amount_column: "amount".to_string(),
            source_column: "name".to_string(),
        }
    }
}

impl LedgerSchema {
    /// Column names in the order new columns are appended to a ledger.
    pub fn columns(&self) -> [&str; 5] {
        [
            self.date_column.as_str(),
            self.counterparty_column.as_str(),
            self.amount_column.as_str(),
            self.source_column.as_str(),
            self.category_column.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ledger {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Ledger {
    /// Build a ledger, padding every row to the header width. A row wider
    /// than the header widens the header with `Unnamed: N` columns, so no
    /// cell is ever dropped.
    pub fn from_rows(mut columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let widest = rows.iter().map(Vec::len).max().unwrap_or(0);
        for idx in columns.len()..widest {
            columns.push(format!("Unnamed: {idx}"));
        }
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like [`Ledger::column_index`], but a missing column is a hard error.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| Error::MissingHeaderField {
            field: name.to_string(),
        })
    }

    pub fn value(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row)?.get(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> Ledger {
        Ledger::from_rows(
            vec!["business name".into(), "additional detail".into()],
            vec![
                vec![Cell::from("Cafe Aroma"), Cell::from("food")],
                vec![Cell::from("Paz")],
            ],
        )
    }

    #[test]
    fn test_rows_are_padded_to_header_width() {
        let l = ledger();
        assert_eq!(l.len(), 2);
        assert_eq!(l.rows[1].len(), 2);
        assert_eq!(l.value(1, 1), Some(&Cell::Empty));
    }

    #[test]
    fn test_wide_rows_widen_the_header() {
        let l = Ledger::from_rows(
            vec!["business name".into(), "additional detail".into()],
            vec![
                vec![Cell::from("Cafe Aroma"), Cell::from("food")],
                vec![Cell::from("Paz"), Cell::from("vehicle"), Cell::from("note kept by user")],
            ],
        );
        assert_eq!(l.columns, vec!["business name", "additional detail", "Unnamed: 2"]);
        assert_eq!(l.value(1, 2), Some(&Cell::from("note kept by user")));
        assert_eq!(l.value(0, 2), Some(&Cell::Empty));
    }

    #[test]
    fn test_require_column() {
        let l = ledger();
        assert_eq!(l.require_column("additional detail").unwrap(), 1);
        let err = l.require_column("category").unwrap_err();
        assert!(matches!(err, Error::MissingHeaderField { ref field } if field == "category"));
    }

    #[test]
    fn test_column_match_is_exact() {
        let l = ledger();
        assert_eq!(l.column_index("Additional Detail"), None);
    }

    #[test]
    fn test_schema_fills_missing_fields_with_defaults() {
        let schema: LedgerSchema =
            serde_json::from_str(r#"{"category_column": "category"}"#).unwrap();
        assert_eq!(schema.category_column, "category");
        assert_eq!(schema.counterparty_column, "business name");
    }
}
