//! Integration tests for candidate composition, scoring and content filling

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use sitesmith::assembly::{Level, Origin};
use sitesmith::cache::ContentCache;
use sitesmith::catalog::Catalog;
use sitesmith::config::{CacheConfig, ContentConfig, EngineConfig};
use sitesmith::content::{ContentWriter, GeneratedText, SemanticRequest, TextGenerator};
use sitesmith::error::GenerationError;
use sitesmith::theme::ThemeColors;
use sitesmith::{Composer, Record, ScoringSelector};
use std::sync::Arc;

fn composer() -> Composer {
    let settings = EngineConfig {
        reference_year: Some(2025),
        ..EngineConfig::default()
    };
    Composer::new(Catalog::builtin(), settings).unwrap()
}

fn selector() -> ScoringSelector {
    let catalog = Catalog::builtin();
    ScoringSelector::new(catalog.structures.clone(), catalog.rotation.clone(), 2025)
}

fn electrician() -> Record {
    Record::new(json!({
        "businessName": "Volt Services",
        "businessType": "electricien",
        "stylePreference": "modern",
        "yearEstablished": 2001,
        "hasTestimonials": true,
        "testimonials": [{ "author": "Marie", "text": "Rapide et propre" }],
        "services": ["Dépannage", "Domotique", "Mise aux normes"],
        "serviceAreas": ["Bordeaux", "Mérignac"]
    }))
}

/// High conversion focus is worth 15 points, all else equal
#[test]
fn test_high_conversion_ranks_fifteen_points_higher() {
    let record = electrician();
    let base = composer().compose(&record);

    let mut medium = base.clone();
    medium.metadata.conversion_focus = Level::Medium;
    let mut high = base;
    high.metadata.conversion_focus = Level::High;

    let selector = selector();
    let medium_score = i32::from(selector.score(&medium, &record));
    let high_score = i32::from(selector.score(&high, &record));
    assert!(
        high_score - medium_score >= 15 || high_score == 100,
        "high {high_score} vs medium {medium_score}"
    );
}

/// Near-black text on white earns the full text contrast points
#[test]
fn test_accessibility_text_contrast_points() {
    let readable = ThemeColors {
        text: "#000000".to_string(),
        background: "#FFFFFF".to_string(),
        primary: "#FFFFFF".to_string(),
        secondary: "#FFFFFF".to_string(),
        accent: "#FFFFFF".to_string(),
        ..ThemeColors::default()
    };
    assert_eq!(readable.accessibility_score(), 30);

    let faint = ThemeColors {
        text: "#999999".to_string(),
        ..readable
    };
    assert_eq!(faint.accessibility_score(), 0);
}

/// Rules shape the primary candidate and positions follow block order
#[test]
fn test_compose_end_to_end() {
    let candidate = composer().compose(&electrician());

    assert_eq!(candidate.origin, Origin::Primary);
    assert_eq!(candidate.category, "electricien");
    assert!(candidate.has_block("testimonials"));
    assert_eq!(candidate.theme.colors.primary, "#8B5CF6");
    assert_eq!(
        candidate.content_directives.get("tone"),
        Some(&json!("technical"))
    );
    for (index, block) in candidate.blocks.iter().enumerate() {
        assert_eq!(block.position, index);
    }
    assert_eq!(candidate.block_types().first(), Some(&"header"));
    assert!(candidate.score <= 100);
}

/// Seeded generation is reproducible
#[test]
fn test_generation_is_reproducible_with_a_seed() {
    let composer = composer();
    let record = electrician();

    let first: Vec<(Origin, u8)> = composer
        .generate(&record, 5, &mut StdRng::seed_from_u64(42))
        .into_iter()
        .map(|c| (c.origin, c.score))
        .collect();
    let second: Vec<(Origin, u8)> = composer
        .generate(&record, 5, &mut StdRng::seed_from_u64(42))
        .into_iter()
        .map(|c| (c.origin, c.score))
        .collect();

    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
}

struct Echo;

#[async_trait]
impl TextGenerator for Echo {
    async fn generate(
        &self,
        request: &SemanticRequest,
        _record: &Record,
    ) -> Result<GeneratedText, GenerationError> {
        Ok(GeneratedText {
            text: format!("{} pour {}", request.slot, request.business_name),
            cost: 0.01,
        })
    }

    fn provider_name(&self) -> &str {
        "echo"
    }
}

/// Generated text lands in the candidate and in the cache
#[tokio::test]
async fn test_fill_candidate_with_generated_text() {
    let record = electrician();
    let mut candidate = composer().compose(&record);

    let cache = Arc::new(ContentCache::in_memory(CacheConfig::default()));
    let writer = ContentWriter::new(Arc::new(Echo), cache.clone(), &ContentConfig::default());

    let written = writer.fill_candidate(&mut candidate, &record).await;
    assert!(written > 0);

    // resolved placeholders are left alone
    let hero = candidate.block("hero").unwrap();
    assert_eq!(hero.props["title"], json!("Votre electricien de confiance"));

    let services = candidate.block("services").unwrap();
    assert_eq!(services.props["intro"], json!("services-intro pour Volt Services"));
    assert!(cache.stats().total_entries > 0);
}
