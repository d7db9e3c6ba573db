//! End-to-end composition
//!
//! Turns a record into ranked candidates: the primary candidate (skeleton plus rule actions),
//! one candidate per relevant archetype pattern, then structure variations until the
//! requested count is reached.

use crate::assembly::{AssemblyInput, Candidate, Origin, TemplateAssembler, ThemeSeed};
use crate::catalog::{Catalog, Pattern};
use crate::config::{EngineConfig, SitesmithConfig};
use crate::error::EngineError;
use crate::record::Record;
use crate::rules::RuleEngine;
use crate::selection::ScoringSelector;
use chrono::{Datelike, Utc};
use rand::Rng;
use tracing::{debug, info};

pub struct Composer {
    engine: RuleEngine,
    catalog: Catalog,
    assembler: TemplateAssembler,
    selector: ScoringSelector,
    settings: EngineConfig,
}

impl Composer {
    pub fn new(catalog: Catalog, settings: EngineConfig) -> Result<Self, EngineError> {
        let engine = catalog.rule_engine()?;
        let assembler = TemplateAssembler::from_catalog(&catalog);
        let reference_year = settings.reference_year.unwrap_or_else(|| Utc::now().year());
        let selector = ScoringSelector::new(
            catalog.structures.clone(),
            catalog.rotation.clone(),
            reference_year,
        )
        .with_diversify_pool(settings.diversify_pool);

        Ok(Self {
            engine,
            catalog,
            assembler,
            selector,
            settings,
        })
    }

    /// Built-in catalog plus the configured rule files
    pub fn from_config(config: &SitesmithConfig) -> Result<Self, EngineError> {
        let catalog = Catalog::load(config.catalog.rules_dir.as_deref())?;
        Self::new(catalog, config.engine.clone())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn assembler(&self) -> &TemplateAssembler {
        &self.assembler
    }

    pub fn selector(&self) -> &ScoringSelector {
        &self.selector
    }

    /// The primary candidate, scored
    pub fn compose(&self, record: &Record) -> Candidate {
        let actions = self.engine.evaluate_rules(record);
        debug!(actions = actions.len(), "Evaluated rules");

        let mut candidate = self.assembler.assemble(
            AssemblyInput::new(record)
                .base_blocks(self.catalog.base_blocks(record))
                .actions(&actions)
                .theme_seed(ThemeSeed::Palette { mood: None }),
        );
        candidate.score = self.selector.score(&candidate, record);
        candidate
    }

    /// A candidate built from an archetype's blocks and theme, scored
    pub fn pattern_candidate(&self, pattern: &Pattern, record: &Record) -> Candidate {
        let base_theme = self.assembler.palettes().build_theme(record, None);
        let theme = pattern.theme.apply(base_theme, &pattern.name);

        let mut candidate = self.assembler.assemble(
            AssemblyInput::new(record)
                .pattern_blocks(pattern.to_blocks())
                .theme_seed(ThemeSeed::Fixed(theme)),
        );
        candidate.name = pattern.name.clone();
        candidate.description = pattern.description.clone();
        candidate.origin = Origin::Pattern(pattern.id.clone());
        candidate.score = self.selector.score(&candidate, record);
        candidate
    }

    /// Up to `count` candidates sorted by score; ties keep generation order
    pub fn generate<R: Rng + ?Sized>(
        &self,
        record: &Record,
        count: usize,
        rng: &mut R,
    ) -> Vec<Candidate> {
        if count == 0 {
            return Vec::new();
        }

        let mut candidates = vec![self.compose(record)];
        for pattern in self.catalog.relevant_patterns(record) {
            if candidates.len() >= count {
                break;
            }
            candidates.push(self.pattern_candidate(pattern, record));
        }

        let remaining = count.saturating_sub(candidates.len());
        if remaining > 0 {
            candidates.extend(
                self.selector
                    .generate_variations(&self.assembler, record, remaining, rng),
            );
        }

        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        info!(
            business_type = %record.business_type(),
            candidates = candidates.len(),
            top_score = candidates.first().map(|c| c.score).unwrap_or(0),
            "Generated candidates"
        );
        candidates
    }

    /// [`Composer::generate`] with the configured variation count
    pub fn generate_default<R: Rng + ?Sized>(
        &self,
        record: &Record,
        rng: &mut R,
    ) -> Vec<Candidate> {
        self.generate(record, self.settings.variation_count, rng)
    }

    /// Generate, then pick one of the best candidates at random
    pub fn pick<R: Rng + ?Sized>(&self, record: &Record, rng: &mut R) -> Option<Candidate> {
        let candidates = self.generate_default(record, rng);
        self.selector.diversify(&candidates, rng).cloned()
    }
}
