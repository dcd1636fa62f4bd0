//! Header Locator
//!
//! Bank exports carry an arbitrary preamble (account holder, period,
//! totals) above the real table. The header is the first row where any
//! cell mentions the date column's label.

use tracing::debug;

use crate::types::RawImport;

/// Index of the first row with a cell containing `marker`, or `None` when
/// the import has no usable header.
pub fn locate_header(raw: &RawImport, marker: &str) -> Option<usize> {
    let found = raw
        .rows
        .iter()
        .position(|row| row.iter().any(|cell| cell.as_text().contains(marker)));

    match found {
        Some(idx) => debug!(file = %raw.name, row = idx, "header row located"),
        None => debug!(file = %raw.name, marker, "no header row"),
    }
    found
}
