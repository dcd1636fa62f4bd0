use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use chrono::{Duration, NaiveDate};
use sift_core::{Cell, Error, Result};
use tracing::debug;

/// Excel serial day 0 in the 1900 date system (accounts for the 1900 leap-year bug).
fn excel_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    excel_epoch()?.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Convert one calamine cell into a [`Cell`].
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => serial_to_date(dt.as_f64())
            .map(Cell::Date)
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Read the first worksheet. Row and column indexes match the sheet: any
/// leading empty rows/columns calamine trims are restored as blanks.
pub fn read_first_sheet(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| Error::Spreadsheet(format!("open {}: {e}", path.display())))?;
    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::Spreadsheet(format!("{} has no worksheets", path.display())))?;

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| Error::Spreadsheet(format!("read sheet '{first_sheet}': {e}")))?;

    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    for row in range.rows() {
        let mut cells = vec![Cell::Empty; col_offset];
        cells.extend(row.iter().map(cell_from_data));
        rows.push(cells);
    }

    debug!(file = %path.display(), sheet = %first_sheet, rows = rows.len(), "worksheet read");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(cell_from_data(&Data::String("  ".into())), Cell::Empty);
        assert_eq!(cell_from_data(&Data::String("Shell".into())), Cell::Text("Shell".into()));
        assert_eq!(cell_from_data(&Data::Int(12)), Cell::Number(12.0));
        assert_eq!(cell_from_data(&Data::Float(-3.5)), Cell::Number(-3.5));
        assert_eq!(
            cell_from_data(&Data::DateTimeIso("2024-01-15T00:00:00".into())),
            Cell::Text("2024-01-15T00:00:00".into())
        );
    }

    #[test]
    fn test_serial_dates() {
        assert_eq!(serial_to_date(45306.0), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(serial_to_date(45306.75), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(serial_to_date(-1.0), None);
    }

    #[test]
    fn test_first_sheet_keeps_sheet_positions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let date_format = rust_xlsxwriter::Format::new().set_num_format("dd/mm/yyyy");
        let sheet = workbook.add_worksheet();
        // data starts at B3
        sheet.write_string(2, 1, "Date").unwrap();
        sheet.write_string(2, 2, "Business").unwrap();
        sheet.write_string(2, 3, "Amount").unwrap();
        let day = rust_xlsxwriter::ExcelDateTime::from_ymd(2024, 1, 15).unwrap();
        sheet.write_datetime_with_format(3, 1, &day, &date_format).unwrap();
        sheet.write_string(3, 2, "Cafe Aroma").unwrap();
        sheet.write_number(3, 3, 24.5).unwrap();
        workbook.add_worksheet().write_string(0, 0, "ignored").unwrap();
        workbook.save(&path).unwrap();

        let rows = read_first_sheet(&path).unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows[0].is_empty() && rows[1].is_empty());
        assert_eq!(rows[2][0], Cell::Empty);
        assert_eq!(rows[2][1], Cell::Text("Date".into()));
        assert_eq!(rows[3][1], Cell::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()));
        assert_eq!(rows[3][2], Cell::Text("Cafe Aroma".into()));
        assert_eq!(rows[3][3], Cell::Number(24.5));
    }

    #[test]
    fn test_missing_workbook_is_spreadsheet_error() {
        let err = read_first_sheet(Path::new("/nonexistent/ledger.xlsx")).unwrap_err();
        assert!(matches!(err, Error::Spreadsheet(_)));
    }
}
