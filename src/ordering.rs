//! Block ordering
//!
//! Resolves a set of block types into a linear order that places every block after its
//! required predecessors. Each pass places the first remaining block (in insertion order)
//! whose predecessors are all placed. A pass that places nothing means a cycle or an
//! unsatisfiable requirement: the rest is appended in insertion order and the result is
//! flagged as partially ordered.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Required predecessors per block type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompatibilityTable {
    requirements: BTreeMap<String, Vec<String>>,
}

impl CompatibilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, block_type: &str, predecessors: &[&str]) -> Self {
        self.set(block_type, predecessors.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn set(&mut self, block_type: &str, predecessors: Vec<String>) {
        self.requirements.insert(block_type.to_string(), predecessors);
    }

    /// Declared predecessors; empty for unknown types
    pub fn requirements(&self, block_type: &str) -> &[String] {
        self.requirements
            .get(block_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `block_type` may follow the already `placed` types
    pub fn is_block_compatible(&self, block_type: &str, placed: &[String]) -> bool {
        self.requirements(block_type)
            .iter()
            .all(|req| placed.iter().any(|p| p == req))
    }
}

/// How predecessors missing from the input set are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredecessorPolicy {
    /// A predecessor absent from the input can never be satisfied
    #[default]
    Strict,
    /// Predecessors absent from the input are ignored
    PresentOnly,
}

/// Result of an ordering run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockOrder {
    pub order: Vec<String>,
    /// Set when the constrained phase stalled and the remainder was appended as given
    pub partially_ordered: bool,
}

/// Orders block types against a compatibility table
#[derive(Debug, Clone)]
pub struct BlockOrderer {
    table: CompatibilityTable,
    policy: PredecessorPolicy,
}

impl BlockOrderer {
    pub fn new(table: CompatibilityTable) -> Self {
        Self {
            table,
            policy: PredecessorPolicy::Strict,
        }
    }

    pub fn with_policy(mut self, policy: PredecessorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn table(&self) -> &CompatibilityTable {
        &self.table
    }

    pub fn order<S: AsRef<str>>(&self, block_types: &[S]) -> BlockOrder {
        let mut seen = HashSet::new();
        let mut remaining: Vec<&str> = block_types
            .iter()
            .map(AsRef::as_ref)
            .filter(|t| seen.insert(*t))
            .collect();
        let present: HashSet<&str> = remaining.iter().copied().collect();

        let mut placed: Vec<String> = Vec::with_capacity(remaining.len());
        while !remaining.is_empty() {
            let next = remaining.iter().position(|candidate| {
                self.table.requirements(candidate).iter().all(|req| {
                    placed.iter().any(|p| p == req)
                        || (self.policy == PredecessorPolicy::PresentOnly
                            && !present.contains(req.as_str()))
                })
            });

            match next {
                Some(index) => placed.push(remaining.remove(index).to_string()),
                None => {
                    debug!(
                        unplaced = ?remaining,
                        "Block ordering stalled, appending remainder in input order"
                    );
                    placed.extend(remaining.drain(..).map(str::to_string));
                    return BlockOrder {
                        order: placed,
                        partially_ordered: true,
                    };
                }
            }
        }

        BlockOrder {
            order: placed,
            partially_ordered: false,
        }
    }
}
