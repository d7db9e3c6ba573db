//! Assembly catalog
//!
//! Immutable tables consulted while assembling candidates: the rule set, the block
//! compatibility table, the base skeleton, archetype patterns, site structures, the variant
//! table, palettes and the theme rotation. A catalog is built once (see
//! [`Catalog::builtin`] and [`Catalog::load`]) and injected into the components that read it.

pub mod builtin;
pub mod loader;

use crate::assembly::{Block, VariantTable};
use crate::error::{CatalogError, RuleError};
use crate::ordering::{BlockOrderer, CompatibilityTable, PredecessorPolicy};
use crate::record::Record;
use crate::rules::{Condition, ConditionEvaluator, Rule, RuleEngine};
use crate::theme::{FontPair, PaletteCatalog, Theme, ThemeRotation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// A block every candidate starts from, included when all `when` conditions match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonBlock {
    pub block_type: String,
    pub variant: String,
    #[serde(default)]
    pub props: Map<String, Value>,
    pub position: usize,
    #[serde(default)]
    pub when: Vec<Condition>,
}

/// A block of an archetype pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternBlock {
    pub block_type: String,
    pub variant: String,
    #[serde(default)]
    pub props: Map<String, Value>,
}

/// Partial theme carried by a pattern; unset parts come from the base theme
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternTheme {
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub fonts: Option<FontPair>,
    #[serde(default)]
    pub spacing: Option<String>,
    #[serde(default)]
    pub border_radius: Option<String>,
}

impl PatternTheme {
    pub fn apply(&self, mut base: Theme, name: &str) -> Theme {
        base.name = name.to_string();
        for (slot, value) in &self.colors {
            base.colors.set(slot, value.clone());
        }
        if let Some(fonts) = &self.fonts {
            base.fonts = fonts.clone();
        }
        if let Some(spacing) = &self.spacing {
            base.spacing = spacing.clone();
        }
        if let Some(radius) = &self.border_radius {
            base.shape_style.border_radius = radius.clone();
        }
        base.mood = None;
        base
    }
}

/// A named archetype: a full block list plus theme, offered when its relevance test passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub name: String,
    pub description: String,
    pub blocks: Vec<PatternBlock>,
    #[serde(default)]
    pub theme: PatternTheme,
    /// AND-combined; an empty list is never relevant
    #[serde(default)]
    pub relevance: Vec<Condition>,
}

impl Pattern {
    pub fn is_relevant(&self, record: &Record, evaluator: &ConditionEvaluator) -> bool {
        !self.relevance.is_empty() && self.relevance.iter().all(|c| evaluator.evaluate(c, record))
    }

    /// Pattern blocks as fresh assembly blocks, in declaration order
    pub fn to_blocks(&self) -> Vec<Block> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, b)| {
                Block::new(&b.block_type, &b.variant, b.props.clone()).with_position(index)
            })
            .collect()
    }
}

/// How a structure treats one of its blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Required,
    Optional,
    /// Dropped when the record has no data for it
    Conditional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureBlock {
    pub block_type: String,
    #[serde(default)]
    pub variant: Option<String>,
    pub requirement: Requirement,
}

/// A tagged site layout used to generate variations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub blocks: Vec<StructureBlock>,
}

/// Every table assembly reads
#[derive(Debug, Clone)]
pub struct Catalog {
    pub rules: Vec<Rule>,
    pub compatibility: CompatibilityTable,
    pub skeleton: Vec<SkeletonBlock>,
    pub patterns: Vec<Pattern>,
    pub structures: Vec<Structure>,
    pub variants: VariantTable,
    pub palettes: PaletteCatalog,
    pub rotation: ThemeRotation,
}

impl Catalog {
    /// The built-in catalog
    pub fn builtin() -> Self {
        Self {
            rules: builtin::rules(),
            compatibility: builtin::compatibility(),
            skeleton: builtin::skeleton(),
            patterns: builtin::patterns(),
            structures: builtin::structures(),
            variants: builtin::variants(),
            palettes: builtin::palettes(),
            rotation: builtin::rotation(),
        }
    }

    /// The built-in catalog extended with the TOML rule files under `rules_dir`
    ///
    /// Loaded rules replace built-in rules with the same id; loaded compatibility entries
    /// replace the built-in entry for that block type.
    pub fn load(rules_dir: Option<&Path>) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin();
        let Some(dir) = rules_dir else {
            return Ok(catalog);
        };

        let loaded = loader::load_rules_dir(dir)?;
        let (rule_count, table_count) = (loaded.rules.len(), loaded.compatibility.len());
        for rule in loaded.rules {
            match catalog.rules.iter_mut().find(|r| r.id == rule.id) {
                Some(existing) => *existing = rule,
                None => catalog.rules.push(rule),
            }
        }
        for (block_type, predecessors) in loaded.compatibility {
            catalog.compatibility.set(&block_type, predecessors);
        }

        info!(
            dir = %dir.display(),
            rules = rule_count,
            compatibility = table_count,
            "Loaded catalog rule files"
        );
        Ok(catalog)
    }

    /// A rule engine over this catalog's rules
    pub fn rule_engine(&self) -> Result<RuleEngine, RuleError> {
        RuleEngine::new(self.rules.iter().cloned())
    }

    /// The orderer assembly uses: this table, ignoring predecessors absent from a candidate
    pub fn orderer(&self) -> BlockOrderer {
        BlockOrderer::new(self.compatibility.clone()).with_policy(PredecessorPolicy::PresentOnly)
    }

    /// Skeleton blocks that apply to `record`, sorted by declared position
    pub fn base_blocks(&self, record: &Record) -> Vec<Block> {
        let evaluator = ConditionEvaluator::new();
        let mut selected: Vec<&SkeletonBlock> = self
            .skeleton
            .iter()
            .filter(|b| b.when.iter().all(|c| evaluator.evaluate(c, record)))
            .collect();
        selected.sort_by_key(|b| b.position);
        selected
            .into_iter()
            .map(|b| {
                Block::new(&b.block_type, &b.variant, b.props.clone()).with_position(b.position)
            })
            .collect()
    }

    /// Patterns relevant to `record`, in catalog order
    pub fn relevant_patterns(&self, record: &Record) -> Vec<&Pattern> {
        let evaluator = ConditionEvaluator::new();
        self.patterns
            .iter()
            .filter(|p| p.is_relevant(record, &evaluator))
            .collect()
    }

    pub fn pattern(&self, id: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    pub fn structure(&self, id: &str) -> Option<&Structure> {
        self.structures.iter().find(|s| s.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
