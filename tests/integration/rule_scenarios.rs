//! Integration tests for rule evaluation against the built-in rule set

use serde_json::json;
use sitesmith::catalog::Catalog;
use sitesmith::rules::{ActionKind, RuleEngine, Target};
use sitesmith::Record;

fn engine() -> RuleEngine {
    Catalog::builtin().rule_engine().unwrap()
}

/// A round-the-clock business gets an urgent call to action
#[test]
fn test_urgency_service_adds_urgent_cta() {
    let engine = engine();
    let record = Record::new(json!({ "is24x7": true }));

    let actions = engine.evaluate_rules(&record);
    let cta = actions
        .iter()
        .find(|a| {
            a.rule_id == "urgency-service"
                && a.action.kind == ActionKind::AddBlock
                && a.action.target == Target::block("cta")
        })
        .expect("urgency-service should add a CTA");

    assert!(cta.action.payload["variant"]
        .as_str()
        .unwrap()
        .contains("urgent"));
    assert!(cta.weight > 0.0);
}

/// Both conditions hold: (80 + 20) / 2 * 0.8
#[test]
fn test_established_business_score() {
    let engine = engine();
    let record = Record::new(json!({ "yearEstablished": 2005, "hasTestimonials": true }));

    let score = engine.rule_score("established-business", &record).unwrap();
    assert!((score - 40.0).abs() < 1e-9);

    let emitted = engine
        .evaluate_rules(&record)
        .into_iter()
        .filter(|a| a.rule_id == "established-business")
        .count();
    assert_eq!(emitted, 3);
}

/// A recent business does not satisfy the year condition
#[test]
fn test_recent_business_does_not_fire() {
    let engine = engine();
    let record = Record::new(json!({ "yearEstablished": 2015, "hasTestimonials": true }));

    assert_eq!(engine.rule_score("established-business", &record), Some(0.0));
    assert!(engine
        .evaluate_rules(&record)
        .iter()
        .all(|a| a.rule_id != "established-business"));
}

/// Weighted actions come out heaviest first
#[test]
fn test_actions_sorted_by_weight() {
    let engine = engine();
    let record = Record::new(json!({
        "is24x7": true,
        "yearEstablished": 1998,
        "hasTestimonials": true,
        "hasPricing": true
    }));

    let actions = engine.evaluate_rules(&record);
    assert!(actions.len() > 3);
    assert!(actions.windows(2).all(|w| w[0].weight >= w[1].weight));
}

/// An empty record fires nothing
#[test]
fn test_empty_record_fires_nothing() {
    assert!(engine().evaluate_rules(&Record::new(json!({}))).is_empty());
}

/// Exported rules import back into an empty engine
#[test]
fn test_rules_export_and_import() {
    let source = engine();
    let exported = source.export_json().unwrap();

    let mut target = RuleEngine::new(Vec::new()).unwrap();
    let imported = target.import_json(&exported).unwrap();
    assert_eq!(imported, source.rules().len());
    assert!(target.rule("urgency-service").is_some());
}
