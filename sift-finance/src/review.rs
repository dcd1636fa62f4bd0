//! Review sheet: the hand-off to the human reviewer and back.
//!
//! Columns: date, counterparty, amount, suggested_category, category, source.
//! The reviewer fills `category` to override a suggestion, may delete rows,
//! and may add rows of their own.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sift_core::{
    Cell, Error, NormalizedRecord, Result, ReviewedRecord, coerce_amount, coerce_counterparty,
    coerce_date,
};
use tracing::info;

use crate::category_rules::FALLBACK_CATEGORY;

#[derive(Debug, Serialize, Deserialize)]
struct ReviewRow {
    date: String,
    counterparty: String,
    amount: String,
    #[serde(default)]
    suggested_category: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    source: String,
}

impl From<&ReviewedRecord> for ReviewRow {
    fn from(item: &ReviewedRecord) -> Self {
        Self {
            date: item.record.date.format("%Y-%m-%d").to_string(),
            counterparty: item.record.counterparty.clone(),
            amount: Cell::Number(item.record.amount).as_text(),
            suggested_category: item.suggested_category.clone(),
            category: item.confirmed_category.clone().unwrap_or_default(),
            source: item.record.source.clone().unwrap_or_default(),
        }
    }
}

pub fn write_review_sheet(path: &Path, items: &[ReviewedRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for item in items {
        wtr.serialize(ReviewRow::from(item))?;
    }
    wtr.flush()?;
    info!(file = %path.display(), rows = items.len(), "review sheet written");
    Ok(())
}

/// Read a reviewed sheet back. `date_formats` are tried after ISO dates.
/// A row whose date, amount or counterparty cannot be read is an error:
/// the reviewer has to fix it before merging.
pub fn read_review_sheet(path: &Path, date_formats: &[String]) -> Result<Vec<ReviewedRecord>> {
    let mut formats = vec!["%Y-%m-%d".to_string()];
    formats.extend(date_formats.iter().cloned());

    let mut rdr = csv::Reader::from_path(path)?;
    let mut items = Vec::new();
    for (idx, result) in rdr.deserialize::<ReviewRow>().enumerate() {
        // header is line 1
        let line = idx + 2;
        let row = result?;

        let date = coerce_date(&Cell::from(row.date.as_str()), &formats).ok_or_else(|| {
            Error::InvalidReviewRow {
                row: line,
                reason: format!("invalid date '{}'", row.date),
            }
        })?;
        let amount = coerce_amount(&Cell::from(row.amount.as_str())).ok_or_else(|| {
            Error::InvalidReviewRow {
                row: line,
                reason: format!("invalid amount '{}'", row.amount),
            }
        })?;
        let counterparty = coerce_counterparty(&Cell::from(row.counterparty.as_str()))
            .ok_or_else(|| Error::InvalidReviewRow {
                row: line,
                reason: format!("invalid counterparty '{}'", row.counterparty),
            })?;

        let mut record = NormalizedRecord::new(date, counterparty, amount);
        let source = row.source.trim();
        if !source.is_empty() {
            record = record.with_source(source);
        }

        let suggested = match row.suggested_category.trim() {
            "" => FALLBACK_CATEGORY,
            s => s,
        };
        let confirmed = Some(row.category.trim().to_string()).filter(|c| !c.is_empty());

        items.push(ReviewedRecord {
            record,
            suggested_category: suggested.to_string(),
            confirmed_category: confirmed,
        });
    }

    info!(file = %path.display(), rows = items.len(), "review sheet read");
    Ok(items)
}
