//! Merge Stage: reviewed records become ledger rows appended after the
//! existing ones.

use sift_core::{Cell, Ledger, LedgerSchema, ReviewedRecord};
use tracing::info;

/// Index of `name`, appending it as a new (blank) column when absent.
fn ensure_column(ledger: &mut Ledger, name: &str) -> usize {
    if let Some(idx) = ledger.column_index(name) {
        return idx;
    }
    ledger.columns.push(name.to_string());
    for row in &mut ledger.rows {
        row.push(Cell::Empty);
    }
    ledger.columns.len() - 1
}

/// Append `reviewed` to a copy of `ledger`. Existing rows keep their order
/// and values; an empty `reviewed` returns the ledger unchanged.
pub fn merge_into_ledger(ledger: &Ledger, reviewed: &[ReviewedRecord], schema: &LedgerSchema) -> Ledger {
    let mut merged = ledger.clone();
    if reviewed.is_empty() {
        return merged;
    }

    let date = ensure_column(&mut merged, &schema.date_column);
    let counterparty = ensure_column(&mut merged, &schema.counterparty_column);
    let amount = ensure_column(&mut merged, &schema.amount_column);
    let source = ensure_column(&mut merged, &schema.source_column);
    let category = ensure_column(&mut merged, &schema.category_column);
    let width = merged.columns.len();

    let mut overridden = 0;
    for item in reviewed {
        let record = &item.record;
        let mut row = vec![Cell::Empty; width];
        row[date] = Cell::Date(record.date);
        row[counterparty] = Cell::Text(record.counterparty.clone());
        row[amount] = Cell::Number(record.amount);
        row[source] = record
            .source
            .as_deref()
            .map(Cell::from)
            .unwrap_or_default();
        row[category] = Cell::from(item.effective_category());
        if item.effective_category() != item.suggested_category {
            overridden += 1;
        }
        merged.rows.push(row);
    }

    info!(
        existing = ledger.len(),
        appended = reviewed.len(),
        overridden,
        "records merged into ledger"
    );
    merged
}
