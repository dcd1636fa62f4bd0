//! Transaction record types flowing through normalization, suggestion and review

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A transaction that survived normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub date: NaiveDate,
    /// Merchant/business name, trimmed, always longer than one character
    pub counterparty: String,
    /// Signed amount as it appeared in the export
    pub amount: f64,
    /// Account-family shorthand stamped by the source tagger
    pub source: Option<String>,
}

impl NormalizedRecord {
    pub fn new(date: NaiveDate, counterparty: impl Into<String>, amount: f64) -> Self {
        Self {
            date,
            counterparty: counterparty.into(),
            amount,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A record carrying the engine's suggestion and the reviewer's decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewedRecord {
    pub record: NormalizedRecord,
    pub suggested_category: String,
    pub confirmed_category: Option<String>,
}

impl ReviewedRecord {
    pub fn new(record: NormalizedRecord, suggested_category: impl Into<String>) -> Self {
        Self {
            record,
            suggested_category: suggested_category.into(),
            confirmed_category: None,
        }
    }

    /// The reviewer's category when present and non-blank, else the suggestion.
    pub fn effective_category(&self) -> &str {
        match self.confirmed_category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => &self.suggested_category,
        }
    }
}
