//! Candidate assembly
//!
//! A [`Candidate`] is one proposed site: ordered [`Block`]s, a [`Theme`], layout and content
//! directives, and derived [`Metadata`]. The [`TemplateAssembler`] builds candidates from a
//! base skeleton, weighted rule actions and pattern blocks.

pub mod assembler;
pub mod entries;
pub mod links;
pub mod placeholders;
pub mod variants;

pub use assembler::{AssemblyInput, TemplateAssembler, ThemeSeed};
pub use entries::{GalleryImage, ServiceEntry, TestimonialEntry};
pub use links::{Link, LinkRegistry};
pub use variants::{VariantRule, VariantTable};

use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A content block within a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub variant: String,
    pub props: Map<String, Value>,
    pub position: usize,
}

impl Block {
    pub fn new(block_type: &str, variant: &str, props: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            block_type: block_type.to_string(),
            variant: variant.to_string(),
            props,
            position: 0,
        }
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Shallow-merge `props` over this block's props
    pub fn merge_props(&mut self, props: &Map<String, Value>) {
        for (key, value) in props {
            self.props.insert(key.clone(), value.clone());
        }
    }
}

/// Three-step rating used by metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

/// Derived quality indicators of a candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub performance: Level,
    pub accessibility_score: u8,
    pub seo_score: u8,
    pub conversion_focus: Level,
}

/// Where a candidate came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Origin {
    /// Skeleton plus rule actions
    Primary,
    /// An archetype pattern
    Pattern(String),
    /// A site structure variation
    Structure(String),
}

/// One proposed site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub origin: Origin,
    pub blocks: Vec<Block>,
    pub theme: Theme,
    pub layout: Map<String, Value>,
    pub content_directives: Map<String, Value>,
    pub links: LinkRegistry,
    pub score: u8,
    pub metadata: Metadata,
    /// Set when block ordering could not satisfy every predecessor
    pub partially_ordered: bool,
}

impl Candidate {
    pub fn block(&self, block_type: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.block_type == block_type)
    }

    pub fn has_block(&self, block_type: &str) -> bool {
        self.block(block_type).is_some()
    }

    pub fn block_types(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.block_type.as_str()).collect()
    }
}
