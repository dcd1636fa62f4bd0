//! Per-file pipeline: locate header, normalize, tag source. Files are
//! processed independently; one bad file never aborts the batch.

use serde::Serialize;
use sift_core::{NormalizedRecord, SourceAccount};
use tracing::{info, warn};

use crate::header::locate_header;
use crate::normalize::normalize_records;
use crate::tagger::tag_source;
use crate::types::{ImportIssue, ImportOptions, RawImport};

/// What happened to one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub name: String,
    pub source: String,
    pub header_row: Option<usize>,
    pub records: usize,
    pub dropped_rows: usize,
    pub issue: Option<ImportIssue>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// All records, grouped by upload order then row order
    pub records: Vec<NormalizedRecord>,
    pub reports: Vec<FileReport>,
}

impl BatchOutcome {
    pub fn files_with_issues(&self) -> impl Iterator<Item = &FileReport> {
        self.reports.iter().filter(|r| r.issue.is_some())
    }
}

/// Uploaded files waiting to be ingested, in upload order.
#[derive(Debug, Clone, Default)]
pub struct ImportBatch {
    files: Vec<(SourceAccount, RawImport)>,
}

impl ImportBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: SourceAccount, raw: RawImport) {
        self.files.push((source, raw));
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn run(&self, opts: &ImportOptions) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for (source, raw) in &self.files {
            let (records, report) = ingest_file(source, raw, opts);
            outcome.records.extend(records);
            outcome.reports.push(report);
        }
        info!(
            files = outcome.reports.len(),
            records = outcome.records.len(),
            "import batch complete"
        );
        outcome
    }
}

/// Run one file through the pipeline.
pub fn ingest_file(
    source: &SourceAccount,
    raw: &RawImport,
    opts: &ImportOptions,
) -> (Vec<NormalizedRecord>, FileReport) {
    let mut report = FileReport {
        name: raw.name.clone(),
        source: source.label.clone(),
        header_row: None,
        records: 0,
        dropped_rows: 0,
        issue: None,
    };

    let Some(header_row) = locate_header(raw, &opts.date_marker) else {
        warn!(file = %raw.name, source = %source.label, "no header row found, skipping file");
        report.issue = Some(ImportIssue::NoHeaderFound);
        return (Vec::new(), report);
    };
    report.header_row = Some(header_row);

    match normalize_records(raw, header_row, opts) {
        Ok(normalized) => {
            let records = tag_source(normalized.records, source);
            report.records = records.len();
            report.dropped_rows = normalized.dropped_rows;
            info!(
                file = %raw.name,
                source = %source.label,
                records = report.records,
                dropped = report.dropped_rows,
                "file normalized"
            );
            (records, report)
        }
        Err(issue) => {
            warn!(file = %raw.name, source = %source.label, %issue, "no valid data in file");
            report.issue = Some(issue);
            (Vec::new(), report)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(name: &str, rows: &[(&str, &str, &str)]) -> RawImport {
        let mut grid: Vec<Vec<&str>> = vec![vec!["Report", "", ""], vec!["Date", "Business", "Amount"]];
        grid.extend(rows.iter().map(|(d, b, a)| vec![*d, *b, *a]));
        let refs: Vec<&[&str]> = grid.iter().map(|r| r.as_slice()).collect();
        RawImport::from_text_rows(name, &refs)
    }

    #[test]
    fn test_batch_keeps_upload_then_row_order() {
        let mut batch = ImportBatch::new();
        batch.push(
            SourceAccount::new("Oz Cal"),
            statement("a.xlsx", &[("2024-01-01", "Cafe One", "1"), ("2024-01-02", "Cafe Two", "2")]),
        );
        batch.push(
            SourceAccount::new("Bar Bank"),
            statement("b.xlsx", &[("2024-01-03", "Water", "3")]),
        );

        let outcome = batch.run(&ImportOptions::default());
        let seen: Vec<_> = outcome
            .records
            .iter()
            .map(|r| (r.counterparty.as_str(), r.source.as_deref().unwrap()))
            .collect();
        assert_eq!(
            seen,
            vec![("Cafe One", "Oz"), ("Cafe Two", "Oz"), ("Water", "Bar")]
        );
        assert_eq!(outcome.files_with_issues().count(), 0);
    }

    #[test]
    fn test_bad_file_does_not_abort_batch() {
        let mut batch = ImportBatch::new();
        batch.push(
            SourceAccount::new("Oz Bank"),
            RawImport::from_text_rows("junk.xlsx", &[&["nothing", "here"]]),
        );
        batch.push(
            SourceAccount::new("Bar Visa"),
            statement("good.xlsx", &[("2024-01-03", "Pizza Place", "30")]),
        );

        let outcome = batch.run(&ImportOptions::default());
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.reports[0].issue, Some(ImportIssue::NoHeaderFound));
        assert_eq!(outcome.reports[1].header_row, Some(1));
        assert_eq!(outcome.reports[1].records, 1);
    }

    #[test]
    fn test_report_counts_dropped_rows() {
        let raw = statement(
            "mixed.xlsx",
            &[("2024-01-01", "Shell", "10"), ("2024-01-02", "Shell", "oops")],
        );
        let (records, report) = ingest_file(&SourceAccount::new("Oz Cal"), &raw, &ImportOptions::default());
        assert_eq!(records.len(), 1);
        assert_eq!(report.dropped_rows, 1);
        assert_eq!(report.issue, None);
    }
}
