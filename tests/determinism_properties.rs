//! Property-based tests for evaluation determinism and ordering guarantees

use proptest::prelude::*;
use serde_json::json;
use sitesmith::catalog::{builtin, Catalog};
use sitesmith::ordering::{BlockOrderer, PredecessorPolicy};
use sitesmith::Record;

const BLOCK_TYPES: [&str; 10] = [
    "header",
    "hero",
    "services",
    "features",
    "gallery",
    "testimonials",
    "pricing",
    "cta",
    "contact",
    "footer",
];

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        any::<bool>(),
        1950i32..2030,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::sample::select(vec![
            "plombier",
            "electricien",
            "peintre",
            "serrurier",
            "chauffagiste",
        ]),
    )
        .prop_map(|(is24x7, year, testimonials, gallery, pricing, business_type)| {
            Record::new(json!({
                "businessType": business_type,
                "is24x7": is24x7,
                "yearEstablished": year,
                "hasTestimonials": testimonials,
                "hasGallery": gallery,
                "hasPricing": pricing
            }))
        })
}

/// Test that evaluating the same record twice yields the same weighted actions
#[test]
fn test_rule_evaluation_is_deterministic() {
    let engine = Catalog::builtin().rule_engine().unwrap();
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&record_strategy(), |record| {
            let first = engine.evaluate_rules(&record);
            let second = engine.evaluate_rules(&record);
            prop_assert_eq!(first.len(), second.len());
            for (a, b) in first.iter().zip(&second) {
                prop_assert_eq!(&a.rule_id, &b.rule_id);
                prop_assert_eq!(&a.action, &b.action);
                prop_assert_eq!(a.weight, b.weight);
            }
            Ok(())
        })
        .unwrap();
}

/// Test that rule scores stay within [0, 100]
#[test]
fn test_rule_scores_are_bounded() {
    let engine = Catalog::builtin().rule_engine().unwrap();
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&record_strategy(), |record| {
            for rule in engine.rules() {
                let score = engine.score_rule(rule, &record);
                prop_assert!((0.0..=100.0).contains(&score));
            }
            Ok(())
        })
        .unwrap();
}

proptest! {
    /// Any subset of the built-in block types in any order is fully ordered with predecessors first
    #[test]
    fn ordering_respects_predecessors(
        blocks in prop::sample::subsequence(BLOCK_TYPES.to_vec(), 0..=BLOCK_TYPES.len())
            .prop_shuffle()
    ) {
        let table = builtin::compatibility();
        let orderer = BlockOrderer::new(table.clone()).with_policy(PredecessorPolicy::PresentOnly);
        let result = orderer.order(&blocks);

        prop_assert!(!result.partially_ordered);
        prop_assert_eq!(result.order.len(), blocks.len());
        for (index, block_type) in result.order.iter().enumerate() {
            for requirement in table.requirements(block_type) {
                if let Some(before) = result.order.iter().position(|t| t == requirement) {
                    prop_assert!(before < index);
                }
            }
        }
    }

    /// Ordering the same input twice gives the same order
    #[test]
    fn ordering_is_deterministic(
        blocks in prop::collection::vec(prop::sample::select(BLOCK_TYPES.to_vec()), 0..16)
    ) {
        let orderer = Catalog::builtin().orderer();
        prop_assert_eq!(orderer.order(&blocks), orderer.order(&blocks));
    }
}
