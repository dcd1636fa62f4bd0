//! File readers producing headerless cell grids.
//!
//! Workbooks (xlsx/xlsm/xls/ods) go through calamine, delimited text
//! through the csv crate.

pub mod delimited;
pub mod workbook;

use std::path::Path;

use sift_core::{Cell, Error, Result};

use crate::types::RawImport;

/// Read every row of the first sheet (or the whole CSV) as cells.
pub fn read_grid(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => workbook::read_first_sheet(path),
        "csv" => delimited::read_csv_grid(path),
        _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
    }
}

pub fn read_raw_import(path: &Path) -> Result<RawImport> {
    let rows = read_grid(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(RawImport::new(name, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = read_grid(Path::new("statement.pdf")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_raw_import_from_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Oz Cal March.CSV");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "Card 1234,,").unwrap();
        writeln!(f, "Date,Business,Amount").unwrap();
        writeln!(f, "2024-03-01,Cafe Aroma,18.5").unwrap();
        drop(f);

        let raw = read_raw_import(&path).unwrap();
        assert_eq!(raw.name, "Oz Cal March.CSV");
        assert_eq!(raw.rows.len(), 3);
        assert_eq!(raw.rows[0][1], Cell::Empty);
        assert_eq!(raw.rows[2][1], Cell::Text("Cafe Aroma".into()));
    }
}
