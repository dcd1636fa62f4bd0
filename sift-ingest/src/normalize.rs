//! Record Normalizer
//!
//! Everything below the header row is data. Blank rows and blank columns
//! are dropped, three roles (date, counterparty, amount) are assigned to
//! columns, and each row either coerces cleanly into a record or is
//! dropped silently.

use sift_core::{Cell, NormalizedRecord, coerce_amount, coerce_counterparty, coerce_date};
use tracing::debug;

use crate::header::locate_header;
use crate::types::{ColumnStrategy, ImportIssue, ImportOptions, RawImport};

/// Records recovered from one import, plus how many data rows were dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Normalized {
    pub records: Vec<NormalizedRecord>,
    pub dropped_rows: usize,
}

/// Sheet column index for each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    date: usize,
    counterparty: usize,
    amount: usize,
}

/// Normalize the rows that follow `header_row`.
pub fn normalize_records(
    raw: &RawImport,
    header_row: usize,
    opts: &ImportOptions,
) -> Result<Normalized, ImportIssue> {
    let Some(header) = raw.rows.get(header_row) else {
        return Err(ImportIssue::NoHeaderFound);
    };

    let data: Vec<&Vec<Cell>> = raw.rows[header_row + 1..]
        .iter()
        .filter(|row| !row.iter().all(Cell::is_blank))
        .collect();
    if data.is_empty() {
        return Err(ImportIssue::EmptyAfterCleaning);
    }

    let width = data.iter().map(|row| row.len()).max().unwrap_or(0);
    let columns: Vec<usize> = (0..width)
        .filter(|&col| {
            data.iter()
                .any(|row| row.get(col).is_some_and(|cell| !cell.is_blank()))
        })
        .collect();
    if columns.len() < 3 {
        return Err(ImportIssue::InsufficientColumns {
            found: columns.len(),
        });
    }

    let map = match opts.column_strategy {
        ColumnStrategy::Positional => positional(&columns),
        ColumnStrategy::HeaderLabels => by_header_labels(header, &columns, opts),
    };
    debug!(file = %raw.name, ?map, "column roles assigned");

    let mut out = Normalized::default();
    for row in data {
        let cell = |idx: usize| row.get(idx).unwrap_or(&Cell::Empty);

        let Some(counterparty) = coerce_counterparty(cell(map.counterparty)) else {
            out.dropped_rows += 1;
            continue;
        };
        let Some(amount) = coerce_amount(cell(map.amount)) else {
            out.dropped_rows += 1;
            continue;
        };
        let Some(date) = coerce_date(cell(map.date), &opts.date_formats) else {
            out.dropped_rows += 1;
            continue;
        };

        out.records.push(NormalizedRecord::new(date, counterparty, amount));
    }

    debug!(
        file = %raw.name,
        kept = out.records.len(),
        dropped = out.dropped_rows,
        "rows normalized"
    );

    if out.records.is_empty() {
        return Err(ImportIssue::EmptyAfterCleaning);
    }
    Ok(out)
}

/// Locate the header and normalize in one step. Any per-file issue yields
/// an empty record set.
pub fn clean_and_prepare(raw: &RawImport, opts: &ImportOptions) -> Vec<NormalizedRecord> {
    locate_header(raw, &opts.date_marker)
        .and_then(|header| normalize_records(raw, header, opts).ok())
        .map(|n| n.records)
        .unwrap_or_default()
}

fn positional(columns: &[usize]) -> ColumnMap {
    ColumnMap {
        date: columns[0],
        counterparty: columns[1],
        amount: columns[columns.len() - 1],
    }
}

fn label_key(text: &str) -> String {
    text.trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn by_header_labels(header: &[Cell], columns: &[usize], opts: &ImportOptions) -> ColumnMap {
    let fallback = positional(columns);
    let labels: Vec<(usize, String)> = columns
        .iter()
        .map(|&col| {
            let text = header.get(col).map(Cell::as_text).unwrap_or_default();
            (col, label_key(&text))
        })
        .collect();

    let marker = label_key(&opts.date_marker);
    let date = labels
        .iter()
        .find(|(_, label)| label.contains(&marker))
        .map(|(col, _)| *col);

    let find_alias = |aliases: &[String]| {
        aliases.iter().find_map(|alias| {
            let alias = label_key(alias);
            labels
                .iter()
                .find(|(_, label)| !label.is_empty() && *label == alias)
                .map(|(col, _)| *col)
        })
    };

    let map = ColumnMap {
        date: date.unwrap_or(fallback.date),
        counterparty: find_alias(opts.counterparty_labels.as_slice()).unwrap_or(fallback.counterparty),
        amount: find_alias(opts.amount_labels.as_slice()).unwrap_or(fallback.amount),
    };

    if map.date == map.counterparty || map.date == map.amount || map.counterparty == map.amount {
        debug!(?map, "header labels map two roles to one column, using positions");
        return fallback;
    }
    map
}
