//! The suggest → review → merge session, driven from files on disk.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use sift_core::{NormalizedRecord, ReviewedRecord, SourceAccount};
use sift_finance::{
    HistoryIndex, KeywordRuleSet, Suggester, SuggestionOrigin, merge_into_ledger, read_ledger,
    read_review_sheet, write_ledger, write_review_sheet,
};
use sift_ingest::{ImportBatch, ImportIssue, locate_header, normalize_records, read_raw_import};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::Config;

/// One `--import LABEL=FILE` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    pub label: String,
    pub path: PathBuf,
}

pub fn parse_import_spec(arg: &str) -> Result<ImportSpec> {
    let Some((label, path)) = arg.split_once('=') else {
        bail!("expected LABEL=FILE, got '{arg}'");
    };
    let (label, path) = (label.trim(), path.trim());
    if label.is_empty() || path.is_empty() {
        bail!("expected LABEL=FILE, got '{arg}'");
    }
    Ok(ImportSpec {
        label: label.to_string(),
        path: PathBuf::from(path),
    })
}

fn has_extension(path: &Path, exts: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| exts.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

fn ensure_csv_output(path: &Path) -> Result<()> {
    if !has_extension(path, &["csv"]) {
        bail!("review sheet is written as CSV; use a .csv path (got {})", path.display());
    }
    Ok(())
}

fn ensure_ledger_output(path: &Path) -> Result<()> {
    if !has_extension(path, &["xlsx", "csv"]) {
        bail!("merged ledger is written as .xlsx or .csv (got {})", path.display());
    }
    Ok(())
}

/// Default merged-ledger path: a workbook ledger comes back out as a
/// workbook, anything else as CSV.
pub fn default_merge_output(ledger_path: &Path) -> PathBuf {
    if has_extension(ledger_path, &["xlsx", "xlsm", "xlsb", "xls", "ods"]) {
        PathBuf::from("merged-ledger.xlsx")
    } else {
        PathBuf::from("merged-ledger.csv")
    }
}

pub fn suggest(cfg: &Config, ledger_path: &Path, imports: &[String], out: &Path) -> Result<()> {
    ensure_csv_output(out)?;

    let specs = imports
        .iter()
        .map(|arg| parse_import_spec(arg))
        .collect::<Result<Vec<_>>>()?;
    let sources = specs
        .iter()
        .map(|spec| cfg.sources.resolve(&spec.label))
        .collect::<sift_core::Result<Vec<SourceAccount>>>()
        .with_context(|| format!("known sources: {}", cfg.sources.labels.join(", ")))?;

    let ledger = read_ledger(ledger_path)
        .with_context(|| format!("reading ledger {}", ledger_path.display()))?;
    let history = HistoryIndex::build(&ledger, &cfg.ledger)
        .with_context(|| format!("ledger {} rejected", ledger_path.display()))?;
    println!(
        "Ledger loaded: {} rows, {} columns, {} known businesses",
        ledger.len(),
        ledger.columns.len(),
        history.len()
    );

    let mut batch = ImportBatch::new();
    for (spec, source) in specs.iter().zip(sources) {
        match read_raw_import(&spec.path) {
            Ok(raw) => batch.push(source, raw),
            Err(e) => {
                warn!(file = %spec.path.display(), error = %e, "could not read file, skipping");
                println!("{} ({}): could not read file: {e}", spec.path.display(), spec.label);
            }
        }
    }

    let outcome = batch.run(&cfg.import);
    println!();
    for report in &outcome.reports {
        match &report.issue {
            None => println!(
                "{} ({}): {} records, {} rows dropped",
                report.name, report.source, report.records, report.dropped_rows
            ),
            Some(issue) => println!(
                "{} ({}): no valid data found in file ({issue})",
                report.name, report.source
            ),
        }
    }

    if outcome.records.is_empty() {
        println!("\nNo valid records in any file; nothing to review.");
        return Ok(());
    }

    let rules = KeywordRuleSet::default();
    let suggester = Suggester::new(&history, &rules);
    let reviewed = suggester.suggest_all(outcome.records);
    let tally = tally_origins(&suggester, &reviewed);
    write_review_sheet(out, &reviewed).with_context(|| format!("writing {}", out.display()))?;

    println!("\nSuggested categories for {} records:", reviewed.len());
    for (origin, count) in &tally {
        println!("  {origin}: {count}");
    }
    println!("\nReview sheet: {}", out.display());
    println!("Fill the 'category' column to override a suggestion, then run:");
    println!(
        "  sift merge --ledger {} --review {}",
        ledger_path.display(),
        out.display()
    );
    Ok(())
}

/// Count how many suggestions each tier produced.
fn tally_origins(
    suggester: &Suggester<'_>,
    reviewed: &[ReviewedRecord],
) -> BTreeMap<SuggestionOrigin, usize> {
    let mut tally = BTreeMap::new();
    for item in reviewed {
        let origin = suggester.suggest(&item.record.counterparty).origin;
        *tally.entry(origin).or_insert(0) += 1;
    }
    tally
}

pub fn merge(cfg: &Config, ledger_path: &Path, review_path: &Path, out: &Path) -> Result<()> {
    ensure_ledger_output(out)?;

    let ledger = read_ledger(ledger_path)
        .with_context(|| format!("reading ledger {}", ledger_path.display()))?;
    ledger
        .require_column(&cfg.ledger.category_column)
        .with_context(|| format!("ledger {} rejected", ledger_path.display()))?;

    let reviewed = read_review_sheet(review_path, &cfg.import.date_formats)
        .with_context(|| format!("reading review sheet {}", review_path.display()))?;
    let overridden = reviewed
        .iter()
        .filter(|r| r.confirmed_category.is_some())
        .count();

    let merged = merge_into_ledger(&ledger, &reviewed, &cfg.ledger);
    write_ledger(&merged, out).with_context(|| format!("writing {}", out.display()))?;

    println!(
        "Merged {} records ({} with reviewer categories) into {} existing rows",
        reviewed.len(),
        overridden,
        ledger.len()
    );
    println!("Wrote {} ({} rows)", out.display(), merged.len());
    Ok(())
}

#[derive(Debug, Serialize)]
struct InspectReport {
    file: String,
    header_row: Option<usize>,
    dropped_rows: usize,
    issue: Option<ImportIssue>,
    records: Vec<NormalizedRecord>,
}

pub fn inspect(cfg: &Config, path: &Path, json: bool) -> Result<()> {
    let raw = read_raw_import(path).with_context(|| format!("reading {}", path.display()))?;

    let mut report = InspectReport {
        file: raw.name.clone(),
        header_row: locate_header(&raw, &cfg.import.date_marker),
        dropped_rows: 0,
        issue: None,
        records: Vec::new(),
    };
    match report.header_row {
        None => report.issue = Some(ImportIssue::NoHeaderFound),
        Some(header) => match normalize_records(&raw, header, &cfg.import) {
            Ok(normalized) => {
                report.dropped_rows = normalized.dropped_rows;
                report.records = normalized.records;
            }
            Err(issue) => report.issue = Some(issue),
        },
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("File: {} ({} rows)", report.file, raw.rows.len());
    match report.header_row {
        Some(idx) => println!("Header row: {idx}"),
        None => println!("Header row: not found (marker '{}')", cfg.import.date_marker),
    }
    if let Some(issue) = &report.issue {
        println!("No valid data: {issue}");
        return Ok(());
    }
    println!(
        "Records: {} (dropped rows: {})\n",
        report.records.len(),
        report.dropped_rows
    );
    for r in &report.records {
        println!("{}  {:<40} {:>12.2}", r.date, r.counterparty, r.amount);
    }
    Ok(())
}

pub fn list_sources(cfg: &Config) {
    for account in cfg.sources.accounts() {
        println!("{:<20} -> {}", account.label, account.shorthand());
    }
}
