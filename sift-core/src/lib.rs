//! sift-core: shared data model for the transaction normalization and
//! category-suggestion engine.

pub mod cell;
pub mod error;
pub mod ledger;
pub mod record;
pub mod source;

pub use cell::{Cell, coerce_amount, coerce_counterparty, coerce_date};
pub use error::{Error, Result};
pub use ledger::{Ledger, LedgerSchema};
pub use record::{NormalizedRecord, ReviewedRecord};
pub use source::{SourceAccount, SourceCatalog};
