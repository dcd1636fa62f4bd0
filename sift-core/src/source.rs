//! Account/source identities that transaction imports are tagged with.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One account/provider combination, e.g. "Oz Isracard".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceAccount {
    pub label: String,
}

impl SourceAccount {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }

    /// Account-family identifier: the first whitespace-delimited token.
    pub fn shorthand(&self) -> &str {
        self.label.split_whitespace().next().unwrap_or("")
    }
}

/// The closed set of source labels an import may be tagged with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCatalog {
    pub labels: Vec<String>,
}

impl Default for SourceCatalog {
    fn default() -> Self {
        Self {
            labels: ["Oz Isracard", "Oz Cal", "Oz Bank", "Bar Visa", "Bar Bank"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SourceCatalog {
    /// Reject an empty catalog, blank labels and duplicates.
    pub fn validate(&self) -> Result<()> {
        if self.labels.is_empty() {
            return Err(Error::Config("no source labels configured".to_string()));
        }
        for (i, label) in self.labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(Error::Config(format!("source label #{} is blank", i + 1)));
            }
            if self.labels[..i].iter().any(|l| l.trim() == label.trim()) {
                return Err(Error::Config(format!("duplicate source label '{label}'")));
            }
        }
        Ok(())
    }

    /// Look up a label (whitespace-trimmed, exact match).
    pub fn resolve(&self, label: &str) -> Result<SourceAccount> {
        let wanted = label.trim();
        self.labels
            .iter()
            .find(|l| l.trim() == wanted)
            .map(|l| SourceAccount::new(l.trim()))
            .ok_or_else(|| Error::UnknownSource(label.to_string()))
    }

    pub fn accounts(&self) -> impl Iterator<Item = SourceAccount> + '_ {
        self.labels.iter().map(|l| SourceAccount::new(l.trim()))
    }
}
