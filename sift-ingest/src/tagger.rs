//! Source Tagger: stamps records with the account family they came from.

use sift_core::{NormalizedRecord, SourceAccount};

pub fn tag_source(records: Vec<NormalizedRecord>, source: &SourceAccount) -> Vec<NormalizedRecord> {
    let tag = source.shorthand();
    records
        .into_iter()
        .map(|record| record.with_source(tag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_every_record_gets_shorthand() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let records = vec![
            NormalizedRecord::new(d, "Shell", 10.0),
            NormalizedRecord::new(d, "Paz", 20.0).with_source("stale"),
        ];
        let tagged = tag_source(records, &SourceAccount::new("Bar Visa"));
        assert!(tagged.iter().all(|r| r.source.as_deref() == Some("Bar")));
        assert_eq!(tagged[1].counterparty, "Paz");
    }
}
