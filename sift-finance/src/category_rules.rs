//! Keyword fallback rules for counterparties with no categorization history.
//!
//! Rules are ordered data: the first rule with a trigger contained in the
//! lower-cased counterparty wins.

/// Category used when neither history nor any keyword rule applies.
pub const FALLBACK_CATEGORY: &str = "miscellaneous";

const DEFAULT_RULES: &[(&str, &[&str])] = &[
    ("food", &["cafe", "restaurant", "pizza", "bakery"]),
    ("travel", &["hotel", "hungary", "europe", "netherlands", "terminal", "gate"]),
    ("clothing", &["renoir", "apparel", "castro", "fashion", "clothing"]),
    ("vehicle", &["paz", "fuel", "ten", "sonol"]),
    ("digital-payment", &["bit"]),
    ("utilities/bills", &["yes", "account", "municipal-tax", "water", "gas"]),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub category: String,
    /// Lower-case substrings
    pub triggers: Vec<String>,
}

impl KeywordRule {
    pub fn new(category: impl Into<String>, triggers: &[&str]) -> Self {
        Self {
            category: category.into(),
            triggers: triggers.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// `text` must already be lower-cased.
    pub fn matches(&self, text: &str) -> bool {
        self.triggers.iter().any(|t| text.contains(t.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRuleSet {
    rules: Vec<KeywordRule>,
}

impl Default for KeywordRuleSet {
    fn default() -> Self {
        Self::new(
            DEFAULT_RULES
                .iter()
                .map(|(category, triggers)| KeywordRule::new(*category, triggers))
                .collect(),
        )
    }
}

impl KeywordRuleSet {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// Category of the first matching rule (case-insensitive).
    pub fn first_match(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lower))
            .map(|rule| rule.category.as_str())
    }
}
