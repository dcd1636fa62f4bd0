//! History Index: counterparty → most frequent confirmed category in the ledger.
//!
//! Built once per session. Ties go to the category seen first in ledger
//! row order.

use std::collections::HashMap;

use sift_core::{Ledger, LedgerSchema, Result};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryIndex {
    categories: HashMap<String, String>,
}

/// Per-counterparty tally: category → (count, first row seen).
#[derive(Default)]
struct Tally {
    counts: HashMap<String, (usize, usize)>,
}

impl Tally {
    fn add(&mut self, category: &str, row: usize) {
        let entry = self.counts.entry(category.to_string()).or_insert((0, row));
        entry.0 += 1;
    }

    fn mode(self) -> Option<String> {
        self.counts
            .into_iter()
            .max_by(|(_, (ca, fa)), (_, (cb, fb))| ca.cmp(cb).then(fb.cmp(fa)))
            .map(|(category, _)| category)
    }
}

impl HistoryIndex {
    /// Build the index from a ledger. A ledger without the category column is
    /// rejected; one without the counterparty column yields an empty index.
    pub fn build(ledger: &Ledger, schema: &LedgerSchema) -> Result<Self> {
        let category_col = ledger.require_column(&schema.category_column)?;
        let Some(counterparty_col) = ledger.column_index(&schema.counterparty_column) else {
            warn!(
                column = %schema.counterparty_column,
                "ledger has no counterparty column, history lookups disabled"
            );
            return Ok(Self::default());
        };

        let mut tallies: HashMap<String, Tally> = HashMap::new();
        for (idx, row) in ledger.rows.iter().enumerate() {
            let counterparty = row
                .get(counterparty_col)
                .map(|c| c.as_text().trim().to_string())
                .unwrap_or_default();
            let category = row
                .get(category_col)
                .map(|c| c.as_text().trim().to_string())
                .unwrap_or_default();
            if counterparty.is_empty() || category.is_empty() {
                continue;
            }
            tallies.entry(counterparty).or_default().add(&category, idx);
        }

        let categories: HashMap<String, String> = tallies
            .into_iter()
            .filter_map(|(counterparty, tally)| tally.mode().map(|c| (counterparty, c)))
            .collect();

        info!(
            ledger_rows = ledger.len(),
            counterparties = categories.len(),
            "history index built"
        );
        Ok(Self { categories })
    }

    /// Exact lookup on the trimmed counterparty.
    pub fn get(&self, counterparty: &str) -> Option<&str> {
        self.categories.get(counterparty.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl FromIterator<(String, String)> for HistoryIndex {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            categories: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::{Cell, Error};

    fn ledger(rows: &[(&str, &str)]) -> Ledger {
        Ledger::from_rows(
            vec!["date".into(), "business name".into(), "additional detail".into()],
            rows.iter()
                .map(|(name, cat)| vec![Cell::from("2023-12-01"), Cell::from(*name), Cell::from(*cat)])
                .collect(),
        )
    }

    #[test]
    fn test_most_frequent_category_wins() {
        let l = ledger(&[
            ("Cafe Aroma", "food"),
            ("Cafe Aroma", "travel"),
            ("Cafe Aroma", "travel"),
            ("Paz", "vehicle"),
        ]);
        let index = HistoryIndex::build(&l, &LedgerSchema::default()).unwrap();
        assert_eq!(index.get("Cafe Aroma"), Some("travel"));
        assert_eq!(index.get("Paz"), Some("vehicle"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let l = ledger(&[
            ("Shop", "gifts"),
            ("Shop", "clothing"),
            ("Shop", "clothing"),
            ("Shop", "gifts"),
        ]);
        let index = HistoryIndex::build(&l, &LedgerSchema::default()).unwrap();
        assert_eq!(index.get("Shop"), Some("gifts"));
    }

    #[test]
    fn test_blank_categories_are_ignored() {
        let l = ledger(&[("Shop", ""), ("Shop", "  "), ("Other", ""), ("Shop", "home")]);
        let index = HistoryIndex::build(&l, &LedgerSchema::default()).unwrap();
        assert_eq!(index.get("Shop"), Some("home"));
        assert_eq!(index.get("Other"), None);
    }

    #[test]
    fn test_counterparty_is_trimmed() {
        let l = ledger(&[("  Cafe Aroma ", "food")]);
        let index = HistoryIndex::build(&l, &LedgerSchema::default()).unwrap();
        assert_eq!(index.get("Cafe Aroma"), Some("food"));
        assert_eq!(index.get(" Cafe Aroma"), Some("food"));
        assert_eq!(index.get("cafe aroma"), None);
    }

    #[test]
    fn test_missing_category_column_is_fatal() {
        let l = Ledger::from_rows(vec!["business name".into()], vec![vec![Cell::from("Paz")]]);
        let err = HistoryIndex::build(&l, &LedgerSchema::default()).unwrap_err();
        assert!(matches!(err, Error::MissingHeaderField { .. }));
    }

    #[test]
    fn test_missing_counterparty_column_gives_empty_index() {
        let l = Ledger::from_rows(
            vec!["additional detail".into()],
            vec![vec![Cell::from("food")]],
        );
        let index = HistoryIndex::build(&l, &LedgerSchema::default()).unwrap();
        assert!(index.is_empty());
    }
}
