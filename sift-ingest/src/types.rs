use serde::{Deserialize, Serialize};
use sift_core::{Cell, Result};
use thiserror::Error;

/// A headerless grid of cells exactly as read from one uploaded file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawImport {
    /// File name the grid came from (for reports)
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl RawImport {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Convenience for tests and fixtures: every non-empty string becomes text.
    pub fn from_text_rows(name: impl Into<String>, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|s| Cell::from(*s)).collect())
            .collect();
        Self::new(name, rows)
    }
}

/// Per-file conditions that yield zero records without failing the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ImportIssue {
    #[error("no header row containing the date marker")]
    NoHeaderFound,

    #[error("only {found} non-blank columns, at least 3 required")]
    InsufficientColumns { found: usize },

    #[error("no valid data rows after cleaning")]
    EmptyAfterCleaning,
}

/// How the date, counterparty and amount columns are picked out of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnStrategy {
    /// First column is the date, second the counterparty, last the amount.
    /// Columns in between are ignored.
    #[default]
    Positional,
    /// Match the header row's labels, falling back to the positional column
    /// for any role whose label is not found.
    HeaderLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Text that identifies the header row (the date column's label)
    pub date_marker: String,
    /// chrono formats tried, in order, for dates stored as text
    pub date_formats: Vec<String>,
    pub column_strategy: ColumnStrategy,
    pub counterparty_labels: Vec<String>,
    pub amount_labels: Vec<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            date_marker: "Date".to_string(),
            date_formats: ["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y", "%d/%m/%y"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            column_strategy: ColumnStrategy::Positional,
            counterparty_labels: ["business name", "merchant", "merchant name", "description", "payee"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            amount_labels: ["amount", "charge amount", "billed amount", "debit", "total"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ImportOptions {
    pub fn validate(&self) -> Result<()> {
        if self.date_marker.trim().is_empty() {
            return Err(sift_core::Error::Config("import.date_marker must not be blank".to_string()));
        }
        if self.date_formats.is_empty() {
            return Err(sift_core::Error::Config("import.date_formats must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_rows_maps_blanks_to_empty() {
        let raw = RawImport::from_text_rows("t.csv", &[&["Date", ""], &["x", "y"]]);
        assert_eq!(raw.rows[0][1], Cell::Empty);
        assert_eq!(raw.rows[1][0], Cell::Text("x".into()));
    }

    #[test]
    fn test_default_options_validate() {
        assert!(ImportOptions::default().validate().is_ok());
        let blank = ImportOptions {
            date_marker: " ".into(),
            ..ImportOptions::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_issue_messages() {
        assert_eq!(
            ImportIssue::InsufficientColumns { found: 2 }.to_string(),
            "only 2 non-blank columns, at least 3 required"
        );
    }
}
