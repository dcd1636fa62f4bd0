//! Category Suggester: history first, then keyword rules, then the catch-all.

use serde::Serialize;
use sift_core::{NormalizedRecord, ReviewedRecord};
use tracing::debug;

use crate::category_rules::{FALLBACK_CATEGORY, KeywordRuleSet};
use crate::history::HistoryIndex;

/// Which tier produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionOrigin {
    History,
    Keyword,
    Fallback,
}

impl SuggestionOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionOrigin::History => "history",
            SuggestionOrigin::Keyword => "keyword",
            SuggestionOrigin::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for SuggestionOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub category: String,
    pub origin: SuggestionOrigin,
}

pub struct Suggester<'a> {
    history: &'a HistoryIndex,
    rules: &'a KeywordRuleSet,
}

impl<'a> Suggester<'a> {
    pub fn new(history: &'a HistoryIndex, rules: &'a KeywordRuleSet) -> Self {
        Self { history, rules }
    }

    /// Always returns exactly one non-empty category.
    pub fn suggest(&self, counterparty: &str) -> Suggestion {
        let name = counterparty.trim();

        if let Some(category) = self.history.get(name) {
            return Suggestion {
                category: category.to_string(),
                origin: SuggestionOrigin::History,
            };
        }

        if let Some(category) = self.rules.first_match(name) {
            return Suggestion {
                category: category.to_string(),
                origin: SuggestionOrigin::Keyword,
            };
        }

        Suggestion {
            category: FALLBACK_CATEGORY.to_string(),
            origin: SuggestionOrigin::Fallback,
        }
    }

    /// Attach a suggestion to every record, leaving the reviewer's category empty.
    pub fn suggest_all(&self, records: Vec<NormalizedRecord>) -> Vec<ReviewedRecord> {
        records
            .into_iter()
            .map(|record| {
                let suggestion = self.suggest(&record.counterparty);
                debug!(
                    counterparty = %record.counterparty,
                    category = %suggestion.category,
                    origin = ?suggestion.origin,
                    "suggested"
                );
                ReviewedRecord::new(record, suggestion.category)
            })
            .collect()
    }
}
