//! Rule engine
//!
//! Turns a record into an ordered list of weighted actions. A rule fires only when it has
//! at least one condition and all of them match; its score is the mean condition weight
//! scaled by the rule priority. Output order is by effective weight, descending, with
//! declaration order breaking ties, so identical inputs always yield identical output.

use crate::error::RuleError;
use crate::record::Record;
use crate::rules::{Action, ConditionEvaluator, Rule};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// An action emitted by a firing rule, with its effective weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedAction {
    pub rule_id: String,
    pub action: Action,
    pub weight: f64,
}

/// Owns an ordered rule set
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Rule>,
    evaluator: ConditionEvaluator,
}

impl RuleEngine {
    /// Build an engine from validated rules. Later rules with a duplicate id replace earlier
    /// ones in place.
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Result<Self, RuleError> {
        let mut engine = Self::default();
        for rule in rules {
            rule.validate()?;
            engine.insert(rule);
        }
        engine.evaluator = ConditionEvaluator::for_rules(&engine.rules);
        Ok(engine)
    }

    /// Add or replace a rule
    pub fn add_rule(&mut self, rule: Rule) -> Result<(), RuleError> {
        rule.validate()?;
        self.insert(rule);
        self.evaluator = ConditionEvaluator::for_rules(&self.rules);
        Ok(())
    }

    fn insert(&mut self, rule: Rule) {
        match self.rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn rules_by_category(&self, category: &str) -> Vec<&Rule> {
        self.rules.iter().filter(|r| r.category == category).collect()
    }

    /// Rules carrying any of `tags`
    pub fn rules_by_tags(&self, tags: &[&str]) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|r| tags.iter().any(|t| r.tags.contains(*t)))
            .collect()
    }

    /// Score of a rule against a record; 0.0 when it does not fire
    pub fn score_rule(&self, rule: &Rule, record: &Record) -> f64 {
        if rule.conditions.is_empty() {
            return 0.0;
        }
        let mut weight_sum = 0.0;
        for condition in &rule.conditions {
            if !self.evaluator.evaluate(condition, record) {
                return 0.0;
            }
            weight_sum += f64::from(condition.weight);
        }
        (weight_sum / rule.conditions.len() as f64) * (f64::from(rule.priority) / 100.0)
    }

    /// Score a rule by id
    pub fn rule_score(&self, rule_id: &str, record: &Record) -> Option<f64> {
        self.rule(rule_id).map(|rule| self.score_rule(rule, record))
    }

    fn fires(&self, rule: &Rule, record: &Record) -> bool {
        !rule.conditions.is_empty()
            && rule
                .conditions
                .iter()
                .all(|c| self.evaluator.evaluate(c, record))
    }

    /// Evaluate every rule against `record`
    pub fn evaluate_rules(&self, record: &Record) -> Vec<WeightedAction> {
        let mut emitted = Vec::new();

        for rule in &self.rules {
            if !self.fires(rule, record) {
                continue;
            }
            let score = self.score_rule(rule, record);
            debug!(rule = %rule.id, score, actions = rule.actions.len(), "Rule fired");

            emitted.extend(rule.actions.iter().map(|action| WeightedAction {
                rule_id: rule.id.clone(),
                action: action.clone(),
                weight: score * (f64::from(action.priority) / 100.0),
            }));
        }

        // Vec::sort_by is stable: equal weights keep declaration order.
        emitted.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
        emitted
    }

    /// Serialize the rule set as pretty JSON
    pub fn export_json(&self) -> Result<String, RuleError> {
        serde_json::to_string_pretty(&self.rules).map_err(|e| RuleError::Parse(e.to_string()))
    }

    /// Parse a JSON rule array and add or replace each rule
    pub fn import_json(&mut self, raw: &str) -> Result<usize, RuleError> {
        let rules: Vec<Rule> =
            serde_json::from_str(raw).map_err(|e| RuleError::Parse(e.to_string()))?;
        for rule in &rules {
            rule.validate()?;
        }
        let count = rules.len();
        for rule in rules {
            self.insert(rule);
        }
        self.evaluator = ConditionEvaluator::for_rules(&self.rules);
        Ok(count)
    }
}
