//! Candidate scoring and selection
//!
//! Scores candidates against the record, ranks them, picks a diverse candidate with an
//! injected RNG, and generates structure-based variations with rotated themes.

use crate::assembly::{AssemblyInput, Block, Candidate, Level, Origin, TemplateAssembler, ThemeSeed};
use crate::catalog::{Requirement, Structure};
use crate::record::Record;
use crate::theme::ThemeRotation;
use rand::Rng;
use serde_json::Map;
use std::collections::BTreeSet;
use tracing::debug;

pub const DEFAULT_DIVERSIFY_POOL: usize = 3;

/// Scores, ranks and varies candidates
#[derive(Debug)]
pub struct ScoringSelector {
    structures: Vec<Structure>,
    rotation: ThemeRotation,
    reference_year: i32,
    diversify_pool: usize,
}

impl ScoringSelector {
    pub fn new(structures: Vec<Structure>, rotation: ThemeRotation, reference_year: i32) -> Self {
        Self {
            structures,
            rotation,
            reference_year,
            diversify_pool: DEFAULT_DIVERSIFY_POOL,
        }
    }

    pub fn with_diversify_pool(mut self, pool: usize) -> Self {
        self.diversify_pool = pool.max(1);
        self
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// Record-fit score in 0..=100
    pub fn score(&self, candidate: &Candidate, record: &Record) -> u8 {
        let mut score = 50.0;

        let business_type = record.business_type();
        if !business_type.is_empty() && candidate.category == business_type {
            score += 10.0;
        }

        score += f64::from(candidate.metadata.seo_score) * 0.2;
        score += f64::from(candidate.metadata.accessibility_score) * 0.1;

        if candidate.metadata.conversion_focus == Level::High {
            score += 15.0;
        }
        if candidate.metadata.performance == Level::High {
            score += 10.0;
        }

        for (block_type, flag) in [
            ("gallery", "hasGallery"),
            ("testimonials", "hasTestimonials"),
            ("pricing", "hasPricing"),
        ] {
            if record.flag(flag) && candidate.has_block(block_type) {
                score += 10.0;
            }
        }

        score.clamp(0.0, 100.0).round() as u8
    }

    /// The `n` highest-scoring candidates; equal scores keep their input order
    pub fn select_top_n(&self, candidates: &[Candidate], n: usize) -> Vec<Candidate> {
        let mut ranked: Vec<&Candidate> = candidates.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.into_iter().take(n).cloned().collect()
    }

    /// Uniform pick among the top-scoring candidates
    pub fn diversify<'a, R: Rng + ?Sized>(
        &self,
        candidates: &'a [Candidate],
        rng: &mut R,
    ) -> Option<&'a Candidate> {
        let mut ranked: Vec<&Candidate> = candidates.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(self.diversify_pool);
        if ranked.is_empty() {
            return None;
        }
        let pick = rng.random_range(0..ranked.len());
        Some(ranked[pick])
    }

    /// Structure fit: tag matches against record characteristics, less missing required data
    pub fn score_structure(&self, structure: &Structure, record: &Record) -> i32 {
        let characteristics = record.characteristics(self.reference_year);
        let availability = record.availability();

        let mut score: i32 = structure
            .tags
            .iter()
            .filter(|tag| characteristics.contains(&tag.as_str()))
            .map(|_| 20)
            .sum();

        for block in &structure.blocks {
            if block.requirement != Requirement::Required {
                continue;
            }
            score -= match block.block_type.as_str() {
                "pricing" if !availability.has_pricing => 10,
                "gallery" if !availability.has_gallery => 10,
                "testimonials" if !availability.has_testimonials => 5,
                _ => 0,
            };
        }
        score
    }

    /// Pick uniformly among the best structures not in `used`, then add the pick to `used`
    ///
    /// `used` is cleared first when it already holds every structure.
    pub fn pick_structure<R: Rng + ?Sized>(
        &self,
        record: &Record,
        used: &mut BTreeSet<String>,
        rng: &mut R,
    ) -> Option<Structure> {
        if self.structures.iter().all(|s| used.contains(&s.id)) {
            used.clear();
        }

        let mut ranked: Vec<(i32, &Structure)> = self
            .structures
            .iter()
            .filter(|s| !used.contains(&s.id))
            .map(|s| (self.score_structure(s, record), s))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ranked.truncate(self.diversify_pool);
        if ranked.is_empty() {
            return None;
        }

        let (score, structure) = ranked[rng.random_range(0..ranked.len())];
        used.insert(structure.id.clone());
        debug!(structure = %structure.id, score, "Picked site structure");
        Some(structure.clone())
    }

    /// Structure blocks the record can fill; duplicate types keep the first declaration
    pub fn structure_blocks(
        &self,
        structure: &Structure,
        assembler: &TemplateAssembler,
        record: &Record,
    ) -> Vec<Block> {
        let availability = record.availability();
        let mut seen = BTreeSet::new();
        structure
            .blocks
            .iter()
            .filter(|b| {
                b.requirement != Requirement::Conditional || availability.supports(&b.block_type)
            })
            .filter(|b| seen.insert(b.block_type.clone()))
            .enumerate()
            .map(|(position, b)| {
                let variant = b
                    .variant
                    .clone()
                    .unwrap_or_else(|| assembler.select_best_variant(&b.block_type, record));
                Block::new(&b.block_type, &variant, Map::new()).with_position(position)
            })
            .collect()
    }

    /// `count` scored variations, each on a freshly picked structure and rotated theme
    ///
    /// Structures are not repeated within one call until all of them have been used.
    pub fn generate_variations<R: Rng + ?Sized>(
        &self,
        assembler: &TemplateAssembler,
        record: &Record,
        count: usize,
        rng: &mut R,
    ) -> Vec<Candidate> {
        let mut variations = Vec::with_capacity(count);
        let mut used = BTreeSet::new();
        for index in 0..count {
            let Some(structure) = self.pick_structure(record, &mut used, rng) else {
                break;
            };
            let theme = self.rotation.theme_for_index(index, record);
            let blocks = self.structure_blocks(&structure, assembler, record);

            let mut candidate = assembler.assemble(
                AssemblyInput::new(record)
                    .base_blocks(blocks)
                    .theme_seed(ThemeSeed::Fixed(theme)),
            );
            candidate.name = structure.name.clone();
            candidate.description = structure.description.clone();
            candidate.origin = Origin::Structure(structure.id.clone());
            candidate.score = self.score(&candidate, record);
            variations.push(candidate);
        }
        variations
    }
}
