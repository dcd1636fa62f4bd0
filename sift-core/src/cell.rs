//! Spreadsheet cell values and the coercions applied to them during
//! normalization.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single cell of a tabular import, as read from the source file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
}

impl Cell {
    /// Empty cells and whitespace-only text both count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// String coercion used for substring matching and counterparty text.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::Bool(b) => b.to_string(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<NaiveDate> for Cell {
    fn from(d: NaiveDate) -> Self {
        Cell::Date(d)
    }
}

/// Whole numbers print without a trailing `.0` so that account numbers and
/// integer amounts read back the way they were typed.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Trimmed counterparty text, or `None` when it is one character or shorter.
pub fn coerce_counterparty(cell: &Cell) -> Option<String> {
    let text = cell.as_text();
    let text = text.trim();
    if text.chars().count() > 1 {
        Some(text.to_string())
    } else {
        None
    }
}

/// Numeric value of an amount cell. Text is accepted when it parses as a
/// finite number once thousands separators are removed.
pub fn coerce_amount(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => {
            let cleaned = s.trim().replace(',', "");
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Calendar date of a date cell. Text is tried against each format in order;
/// a trailing time component (`2024-01-15 00:00:00`, `2024-01-15T08:30`) is
/// ignored.
pub fn coerce_date(cell: &Cell, formats: &[String]) -> Option<NaiveDate> {
    match cell {
        Cell::Date(d) => Some(*d),
        Cell::Text(s) => {
            let text = s.trim();
            if text.is_empty() {
                return None;
            }
            parse_with_formats(text, formats).or_else(|| {
                let head = text.split([' ', 'T']).next()?;
                if head == text {
                    return None;
                }
                parse_with_formats(head, formats)
            })
        }
        _ => None,
    }
}

fn parse_with_formats(text: &str, formats: &[String]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}
