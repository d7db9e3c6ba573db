//! Condition evaluation
//!
//! Evaluates a single [`Condition`] against a [`Record`]. Evaluation never fails: an
//! unknown operator, a malformed pattern or a type mismatch simply does not match.

use crate::record::Record;
use crate::rules::{Condition, Operator, Rule};
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::collections::HashMap;

/// Upper bound on compiled pattern size so a hostile rule cannot exhaust memory
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Evaluates conditions, reusing compiled `matches` patterns where available
#[derive(Debug, Default, Clone)]
pub struct ConditionEvaluator {
    patterns: HashMap<String, Option<Regex>>,
}

impl ConditionEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Precompile every `matches` pattern used by `rules`
    pub fn for_rules<'a>(rules: impl IntoIterator<Item = &'a Rule>) -> Self {
        let mut patterns = HashMap::new();
        for rule in rules {
            for condition in &rule.conditions {
                if condition.operator == Operator::Matches {
                    let source = coerce_to_string(Some(&condition.value));
                    patterns
                        .entry(source.clone())
                        .or_insert_with(|| compile_pattern(&source));
                }
            }
        }
        Self { patterns }
    }

    /// Evaluate one condition. Pure: no state changes, no errors.
    pub fn evaluate(&self, condition: &Condition, record: &Record) -> bool {
        let resolved = record.lookup(&condition.field);
        let resolved = resolved.as_deref();
        let expected = &condition.value;

        match condition.operator {
            Operator::Equals => resolved.is_some_and(|v| strict_equals(v, expected)),
            Operator::Contains => match resolved {
                Some(Value::Array(items)) => items.iter().any(|item| strict_equals(item, expected)),
                other => coerce_to_string(other).contains(&coerce_to_string(Some(expected))),
            },
            Operator::Exists => match resolved {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            },
            Operator::GreaterThan => to_number(resolved) > to_number(Some(expected)),
            Operator::LessThan => to_number(resolved) < to_number(Some(expected)),
            Operator::In | Operator::NotIn => {
                let (Some(value), Value::Array(set)) = (resolved, expected) else {
                    return false;
                };
                let member = set.iter().any(|item| strict_equals(value, item));
                if condition.operator == Operator::In {
                    member
                } else {
                    !member
                }
            }
            Operator::Matches => {
                let Some(value) = resolved else {
                    return false;
                };
                let haystack = coerce_to_string(Some(value));
                let source = coerce_to_string(Some(expected));
                match self.patterns.get(&source) {
                    Some(compiled) => compiled.as_ref().is_some_and(|re| re.is_match(&haystack)),
                    None => compile_pattern(&source).is_some_and(|re| re.is_match(&haystack)),
                }
            }
            Operator::Unknown => false,
        }
    }
}

/// Evaluate a condition without a precompiled pattern cache
pub fn evaluate_condition(condition: &Condition, record: &Record) -> bool {
    ConditionEvaluator::new().evaluate(condition, record)
}

fn compile_pattern(source: &str) -> Option<Regex> {
    RegexBuilder::new(source)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .ok()
}

/// Strict equality: numbers compare by value, everything else structurally
fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => left == right,
    }
}

/// String coercion used by `contains` and `matches`
pub(crate) fn coerce_to_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            // integral floats print without a fraction below 1e21
            Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
            _ => n.to_string(),
        },
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => coerce_to_string(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => "[object Object]".to_string(),
    }
}

/// Numeric coercion; `NaN` for values with no numeric reading
fn to_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Array(_)) | Some(Value::Object(_)) => f64::NAN,
    }
}
