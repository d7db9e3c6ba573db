//! Declarative rules
//!
//! A [`Rule`] pairs an AND-combined list of [`Condition`]s with the [`Action`]s it emits
//! when every condition matches a record. Rules are plain data: they deserialize from
//! JSON or TOML and are validated before they enter a [`RuleEngine`].

pub mod condition;
pub mod engine;

pub use condition::ConditionEvaluator;
pub use engine::{RuleEngine, WeightedAction};

use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Comparison applied by a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Equals,
    Contains,
    Exists,
    GreaterThan,
    LessThan,
    In,
    NotIn,
    Matches,
    /// Any operator name this engine does not know; never matches.
    #[serde(other)]
    Unknown,
}

/// One weighted test against a record field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: Value,
    #[serde(default = "default_weight")]
    pub weight: u8,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: Value, weight: u8) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
            weight,
        }
    }
}

/// What an action changes on the candidate being assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    AddBlock,
    SetVariant,
    SetColor,
    SetLayout,
    SetContent,
    SetPriority,
}

/// Block type an action applies to, or every block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Target {
    #[default]
    All,
    Block(String),
}

impl Target {
    pub fn block(block_type: impl Into<String>) -> Self {
        Target::Block(block_type.into())
    }

    /// Block type for a specific target, `None` for `All`
    pub fn block_type(&self) -> Option<&str> {
        match self {
            Target::All => None,
            Target::Block(t) => Some(t),
        }
    }
}

impl From<String> for Target {
    fn from(raw: String) -> Self {
        if raw == "all" {
            Target::All
        } else {
            Target::Block(raw)
        }
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.to_string()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::All => f.write_str("all"),
            Target::Block(t) => f.write_str(t),
        }
    }
}

/// An effect emitted by a firing rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    #[serde(default)]
    pub target: Target,
    #[serde(default)]
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(default = "default_weight")]
    pub priority: u8,
}

impl Action {
    pub fn new(kind: ActionKind, target: Target, payload: Value, priority: u8) -> Self {
        Self {
            kind,
            target,
            payload,
            position: None,
            priority,
        }
    }

    pub fn at_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

/// A named condition set with the actions it triggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default = "default_weight")]
    pub priority: u8,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

fn default_weight() -> u8 {
    50
}

impl Rule {
    /// Check identifiers and 0..=100 ranges
    pub fn validate(&self) -> Result<(), RuleError> {
        let invalid = |message: String| RuleError::Invalid {
            rule: self.id.clone(),
            message,
        };

        if self.id.trim().is_empty() {
            return Err(invalid("id cannot be empty".to_string()));
        }
        if self.priority > 100 {
            return Err(invalid(format!("priority {} exceeds 100", self.priority)));
        }
        for condition in &self.conditions {
            if condition.field.trim().is_empty() {
                return Err(invalid("condition field cannot be empty".to_string()));
            }
            if condition.weight > 100 {
                return Err(invalid(format!(
                    "condition on '{}' has weight {} above 100",
                    condition.field, condition.weight
                )));
            }
        }
        for action in &self.actions {
            if action.priority > 100 {
                return Err(invalid(format!(
                    "{:?} action has priority {} above 100",
                    action.kind, action.priority
                )));
            }
            if action.kind == ActionKind::AddBlock && action.target == Target::All {
                return Err(invalid("addBlock needs a block type target".to_string()));
            }
        }
        Ok(())
    }
}
