//! Reading the ledger from a spreadsheet and writing the merged ledger back out.

use std::path::Path;

use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, XlsxError};
use sift_core::{Cell, Error, Ledger, Result};
use sift_ingest::read_grid;
use tracing::info;

/// Read a ledger whose first non-blank row is the header. Every row after
/// the header is kept as is, blank rows included.
pub fn read_ledger(path: &Path) -> Result<Ledger> {
    let mut rows = read_grid(path)?
        .into_iter()
        .skip_while(|row| row.iter().all(Cell::is_blank));

    let columns: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(Cell::as_text).collect())
        .unwrap_or_default();
    let ledger = Ledger::from_rows(columns, rows.collect());

    info!(
        file = %path.display(),
        rows = ledger.len(),
        columns = ledger.columns.len(),
        "ledger loaded"
    );
    Ok(ledger)
}

/// Write the ledger in the format named by the file extension: `.xlsx`
/// or `.csv`.
pub fn write_ledger(ledger: &Ledger, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "xlsx" => write_ledger_xlsx(ledger, path),
        "csv" => write_ledger_csv(ledger, path),
        _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Write the ledger as CSV: header first, one row per record.
pub fn write_ledger_csv(ledger: &Ledger, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&ledger.columns)?;
    for row in &ledger.rows {
        wtr.write_record(row.iter().map(Cell::as_text))?;
    }
    wtr.flush()?;
    info!(file = %path.display(), rows = ledger.len(), "ledger written");
    Ok(())
}

fn xlsx_error(path: &Path, e: XlsxError) -> Error {
    Error::Spreadsheet(format!("write {}: {e}", path.display()))
}

/// Write the ledger as a single-sheet workbook. Numbers stay numeric and
/// dates are real date cells; empty cells are left unwritten.
pub fn write_ledger_xlsx(ledger: &Ledger, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let sheet = workbook.add_worksheet();

    for (col, name) in ledger.columns.iter().enumerate() {
        let col = u16::try_from(col)
            .map_err(|_| Error::Spreadsheet(format!("{} has too many columns", path.display())))?;
        sheet
            .write_string(0, col, name.as_str())
            .map_err(|e| xlsx_error(path, e))?;
    }

    for (idx, row) in ledger.rows.iter().enumerate() {
        let r = u32::try_from(idx + 1)
            .map_err(|_| Error::Spreadsheet(format!("{} has too many rows", path.display())))?;
        for (col, cell) in row.iter().enumerate() {
            let c = u16::try_from(col).map_err(|_| {
                Error::Spreadsheet(format!("{} has too many columns", path.display()))
            })?;
            let written = match cell {
                Cell::Empty => continue,
                Cell::Text(s) => sheet.write_string(r, c, s.as_str()),
                Cell::Number(n) => sheet.write_number(r, c, *n),
                Cell::Bool(b) => sheet.write_boolean(r, c, *b),
                Cell::Date(d) => {
                    let (Ok(year), Ok(month), Ok(day)) = (
                        u16::try_from(d.year()),
                        u8::try_from(d.month()),
                        u8::try_from(d.day()),
                    ) else {
                        return Err(Error::Spreadsheet(format!("date {d} out of range")));
                    };
                    let dt = ExcelDateTime::from_ymd(year, month, day)
                        .map_err(|e| xlsx_error(path, e))?;
                    sheet.write_datetime_with_format(r, c, &dt, &date_format)
                }
            };
            written.map_err(|e| xlsx_error(path, e))?;
        }
    }

    workbook.save(path).map_err(|e| xlsx_error(path, e))?;
    info!(file = %path.display(), rows = ledger.len(), "ledger written");
    Ok(())
}
