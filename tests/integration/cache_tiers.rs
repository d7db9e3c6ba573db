//! Integration tests for the two-tier content cache

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use sitesmith::cache::{
    ContentCache, EntryMetadata, ManualClock, MemoryDurableTier, SimilarityQuery,
};
use sitesmith::config::CacheConfig;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::TempDir;

fn manual_cache(budget: u64) -> (ContentCache, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()));
    let config = CacheConfig {
        resident_budget_bytes: budget,
        ..CacheConfig::default()
    };
    let cache = ContentCache::new(config, Box::new(MemoryDurableTier::new()), clock.clone());
    (cache, clock)
}

/// Put then get returns the stored payload
#[test]
fn test_round_trip() {
    let (cache, _) = manual_cache(1024);
    let payload = json!({ "title": "Plombier à Lyon", "sections": { "intro": "Bonjour" } });
    cache
        .put("plombier-lyon", payload.clone(), EntryMetadata::new("template", 0.02))
        .unwrap();

    assert_eq!(cache.get("plombier-lyon"), Some(payload));
    assert_eq!(cache.get("electricien-paris"), None);
}

/// With room for two entries, the least recently read one leaves the resident tier
#[test]
fn test_lru_with_two_entry_budget() {
    // each payload serializes to 10 bytes
    let (cache, clock) = manual_cache(20);
    cache.put("a", json!("aaaaaaaa"), EntryMetadata::default()).unwrap();
    clock.advance(Duration::seconds(1));
    cache.put("b", json!("bbbbbbbb"), EntryMetadata::default()).unwrap();
    clock.advance(Duration::seconds(1));
    assert!(cache.get("a").is_some());
    clock.advance(Duration::seconds(1));
    cache.put("c", json!("cccccccc"), EntryMetadata::default()).unwrap();

    let stats = cache.stats();
    assert_eq!(stats.total_entries, 2);
    let resident: Vec<&str> = stats.top_accessed.iter().map(|k| k.key.as_str()).collect();
    assert!(resident.contains(&"a"));
    assert!(resident.contains(&"c"));
    assert!(!resident.contains(&"b"));

    // still served from the durable tier
    assert_eq!(cache.get("b"), Some(json!("bbbbbbbb")));
}

/// Entries survive closing and reopening the sled-backed cache
#[test]
fn test_sled_persistence_across_reopen() {
    let dir = TempDir::new().unwrap();
    let config = CacheConfig {
        durable_path: Some(dir.path().join("content")),
        ..CacheConfig::default()
    };

    {
        let cache = ContentCache::open(config.clone()).unwrap();
        cache
            .put(
                "couvreur-nantes",
                json!({ "title": "Couvreur à Nantes" }),
                EntryMetadata::new("template", 0.0),
            )
            .unwrap();
        cache.flush().unwrap();
    }

    let reopened = ContentCache::open(config).unwrap();
    assert_eq!(reopened.stats().total_entries, 0);
    assert_eq!(
        reopened.get("couvreur-nantes"),
        Some(json!({ "title": "Couvreur à Nantes" }))
    );

    let cancel = AtomicBool::new(false);
    assert_eq!(reopened.warm(10, &cancel), 1);
    assert_eq!(reopened.stats().total_entries, 1);
}

/// Old entries are pruned from both tiers
#[test]
fn test_prune_by_age() {
    let (cache, clock) = manual_cache(1024);
    cache.put("old", json!("old"), EntryMetadata::default()).unwrap();
    clock.advance(Duration::hours(30));
    cache.put("fresh", json!("fresh"), EntryMetadata::default()).unwrap();

    assert_eq!(cache.prune(24), 1);
    assert_eq!(cache.get("old"), None);
    assert!(cache.get("fresh").is_some());
}

/// Preloaded patterns are found by accent-insensitive similarity
#[test]
fn test_preload_and_find_similar() {
    let (cache, _) = manual_cache(1024 * 1024);
    let cancel = AtomicBool::new(false);
    let services = vec!["plombier".to_string()];
    let cities = vec!["Lyon".to_string(), "Évry".to_string()];
    let stored = cache
        .preload_common_patterns(&services, &cities, &cancel)
        .unwrap();
    assert_eq!(stored, 5);

    let query = SimilarityQuery {
        service: Some("Plombier".to_string()),
        city: Some("evry".to_string()),
        kind: None,
    };
    let similar = cache.find_similar(&query, 5);
    assert!(!similar.is_empty());
    assert_eq!(similar[0].key, "template-plombier-Évry");
    assert!(similar.windows(2).all(|w| w[0].score >= w[1].score));
}

/// The exported report is valid JSON on disk
#[test]
fn test_export_report() {
    let (cache, _) = manual_cache(1024);
    cache.put("k", json!("v"), EntryMetadata::new("template", 0.1)).unwrap();
    cache.get("k");

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.json");
    cache.export_report(&path).unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(report.is_object());
}
