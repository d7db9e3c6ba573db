//! Variant selection
//!
//! Each block type has an ordered list of `(conditions, variant)` entries; the first entry
//! whose conditions all match wins. An entry without conditions always matches.

use crate::record::Record;
use crate::rules::{Condition, ConditionEvaluator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_VARIANT: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRule {
    #[serde(default)]
    pub when: Vec<Condition>,
    pub variant: String,
}

/// Ordered variant rules per block type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantTable {
    by_type: BTreeMap<String, Vec<VariantRule>>,
}

impl VariantTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, block_type: &str, rules: Vec<VariantRule>) {
        self.by_type.insert(block_type.to_string(), rules);
    }

    pub fn rules(&self, block_type: &str) -> &[VariantRule] {
        self.by_type.get(block_type).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Variant of the first matching entry; `"default"` when none match or the type is unknown
    pub fn select_best_variant(&self, block_type: &str, record: &Record) -> String {
        let evaluator = ConditionEvaluator::new();
        self.rules(block_type)
            .iter()
            .find(|rule| rule.when.iter().all(|c| evaluator.evaluate(c, record)))
            .map(|rule| rule.variant.clone())
            .unwrap_or_else(|| DEFAULT_VARIANT.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Operator;
    use serde_json::json;

    fn table() -> VariantTable {
        let mut table = VariantTable::new();
        table.set(
            "hero",
            vec![
                VariantRule {
                    when: vec![Condition::new("is24x7", Operator::Equals, json!(true), 50)],
                    variant: "split-content".to_string(),
                },
                VariantRule {
                    when: vec![],
                    variant: "minimal-centered".to_string(),
                },
            ],
        );
        table.set(
            "gallery",
            vec![VariantRule {
                when: vec![Condition::new(
                    "portfolioImages.length",
                    Operator::GreaterThan,
                    json!(10),
                    50,
                )],
                variant: "masonry-flow".to_string(),
            }],
        );
        table
    }

    #[test]
    fn test_first_match_wins() {
        let record = Record::new(json!({ "is24x7": true }));
        assert_eq!(table().select_best_variant("hero", &record), "split-content");
    }

    #[test]
    fn test_unconditional_entry_is_fallback() {
        let record = Record::new(json!({}));
        assert_eq!(table().select_best_variant("hero", &record), "minimal-centered");
    }

    #[test]
    fn test_no_match_or_unknown_type_is_default() {
        let record = Record::new(json!({ "portfolioImages": [] }));
        assert_eq!(table().select_best_variant("gallery", &record), DEFAULT_VARIANT);
        assert_eq!(table().select_best_variant("pricing", &record), DEFAULT_VARIANT);
    }
}
