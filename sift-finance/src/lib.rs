//! sift-finance: history index, keyword rules, category suggester, merge
//! stage, and the ledger / review sheet files around them.

pub mod category_rules;
pub mod history;
pub mod ledger_io;
pub mod merge;
pub mod review;
pub mod suggest;

pub use category_rules::{FALLBACK_CATEGORY, KeywordRule, KeywordRuleSet};
pub use history::HistoryIndex;
pub use ledger_io::{read_ledger, write_ledger, write_ledger_csv, write_ledger_xlsx};
pub use merge::merge_into_ledger;
pub use review::{read_review_sheet, write_review_sheet};
pub use suggest::{Suggester, Suggestion, SuggestionOrigin};
