//! sift-ingest: turns loosely structured spreadsheet exports into
//! normalized, source-tagged transaction records.

pub mod batch;
pub mod header;
pub mod normalize;
pub mod readers;
pub mod tagger;
pub mod types;

pub use batch::{BatchOutcome, FileReport, ImportBatch, ingest_file};
pub use header::locate_header;
pub use normalize::{Normalized, clean_and_prepare, normalize_records};
pub use readers::{read_grid, read_raw_import};
pub use tagger::tag_source;
pub use types::{ColumnStrategy, ImportIssue, ImportOptions, RawImport};
