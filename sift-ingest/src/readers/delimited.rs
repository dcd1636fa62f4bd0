use std::path::Path;

use sift_core::{Cell, Result};

fn to_cell(field: &str) -> Cell {
    let text = field.trim_start_matches('\u{feff}');
    if text.trim().is_empty() {
        Cell::Empty
    } else {
        Cell::Text(text.to_string())
    }
}

/// Read a CSV without assuming a header row. Rows may have different widths.
pub fn read_csv_grid(path: &Path) -> Result<Vec<Vec<Cell>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(to_cell).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flexible_rows_and_bom() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\u{feff}Date,Business\n2024-01-15,\"Paz, Haifa\",12\n").unwrap();

        let rows = read_csv_grid(file.path()).unwrap();
        assert_eq!(rows[0][0], Cell::Text("Date".into()));
        assert_eq!(rows[1].len(), 3);
        assert_eq!(rows[1][1], Cell::Text("Paz, Haifa".into()));
    }
}
