//! Sitesmith: Rule-Driven Marketing Site Assembly
//!
//! Assembles a marketing-site description (ordered content blocks plus a visual theme) from a
//! business-profile record using declarative rules, block-ordering constraints and candidate
//! scoring, with a two-tier cache for generated content.

pub mod assembly;
pub mod cache;
pub mod catalog;
pub mod color;
pub mod composer;
pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod ordering;
pub mod record;
pub mod rules;
pub mod selection;
pub mod theme;

pub use assembly::{Block, Candidate, TemplateAssembler};
pub use cache::ContentCache;
pub use catalog::Catalog;
pub use composer::Composer;
pub use config::SitesmithConfig;
pub use error::EngineError;
pub use record::Record;
pub use rules::{Rule, RuleEngine};
pub use selection::ScoringSelector;
