//! Two-tier content cache
//!
//! A byte-bounded resident tier in front of a [`DurableTier`]. Entries are addressed by the
//! blake3 fingerprint of their key. Resident inserts and evictions are serialized by one
//! mutex; durable I/O happens outside it. Durable failures are logged and never surface to
//! readers: a failed read is a miss and a failed write is skipped.

pub mod clock;
pub mod durable;
pub mod entry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use durable::{DurableTier, MemoryDurableTier, SledDurableTier};
pub use entry::{fingerprint, CacheEntry, EntryMetadata};

use crate::config::CacheConfig;
use crate::error::CacheError;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;

pub const TEMPLATE_PROVIDER: &str = "template";

#[derive(Debug, Default)]
struct Resident {
    entries: BTreeMap<String, CacheEntry>,
    bytes: u64,
}

impl Resident {
    fn remove(&mut self, fingerprint: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(fingerprint)?;
        self.bytes = self.bytes.saturating_sub(entry.size_bytes);
        Some(entry)
    }

    /// Least recently accessed entry; ties go to the smaller fingerprint
    fn evict_lru(&mut self) -> Option<CacheEntry> {
        let victim = self
            .entries
            .values()
            .min_by(|a, b| {
                a.last_accessed
                    .cmp(&b.last_accessed)
                    .then_with(|| a.fingerprint.cmp(&b.fingerprint))
            })
            .map(|e| e.fingerprint.clone())?;
        self.remove(&victim)
    }

    /// Insert within `budget`, evicting as needed; an entry larger than the budget is refused
    fn insert(&mut self, entry: CacheEntry, budget: u64) -> bool {
        if entry.size_bytes > budget {
            return false;
        }
        self.remove(&entry.fingerprint);
        while self.bytes + entry.size_bytes > budget {
            match self.evict_lru() {
                Some(evicted) => debug!(key = %evicted.key, "Evicted from resident tier"),
                None => break,
            }
        }
        self.bytes += entry.size_bytes;
        self.entries.insert(entry.fingerprint.clone(), entry);
        true
    }
}

/// How often one key was read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyAccess {
    pub key: String,
    pub count: u64,
}

/// Resident-tier statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_entries: usize,
    pub total_bytes: u64,
    pub total_cost_saved: f64,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub providers: BTreeMap<String, usize>,
    pub top_accessed: Vec<KeyAccess>,
}

/// What a similarity lookup is looking for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimilarityQuery {
    pub service: Option<String>,
    pub city: Option<String>,
    pub kind: Option<String>,
}

/// A resident entry ranked by similarity
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarEntry {
    pub key: String,
    pub score: u32,
    pub payload: Value,
}

/// Lowercase with accents removed
fn fold(text: &str) -> String {
    text.nfkd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .to_lowercase()
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, UNITS[unit])
}

/// Resident tier plus durable tier, safe to share across threads
pub struct ContentCache {
    resident: Mutex<Resident>,
    durable: Box<dyn DurableTier>,
    hits: AtomicU64,
    misses: AtomicU64,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
}

impl ContentCache {
    pub fn new(config: CacheConfig, durable: Box<dyn DurableTier>, clock: Arc<dyn Clock>) -> Self {
        Self {
            resident: Mutex::new(Resident::default()),
            durable,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            clock,
            config,
        }
    }

    /// A cache over a sled database at the configured (or platform default) path
    pub fn open(config: CacheConfig) -> Result<Self, CacheError> {
        let path = config.resolved_durable_path().ok_or_else(|| {
            CacheError::Durable("No durable cache path could be determined".to_string())
        })?;
        let durable = SledDurableTier::open(&path)?;
        info!(path = %path.display(), "Opened durable content cache");
        Ok(Self::new(config, Box::new(durable), Arc::new(SystemClock)))
    }

    /// A cache whose durable tier lives in memory
    pub fn in_memory(config: CacheConfig) -> Self {
        Self::new(config, Box::new(MemoryDurableTier::new()), Arc::new(SystemClock))
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Payload for `key`, bumping its recency and access count
    pub fn get(&self, key: &str) -> Option<Value> {
        let fingerprint = fingerprint(key);
        let now = self.clock.now();

        {
            let mut resident = self.resident.lock();
            if let Some(entry) = resident.entries.get_mut(&fingerprint) {
                entry.touch(now);
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key, "Cache hit (resident)");
                return Some(entry.payload.clone());
            }
        }

        let entry = match self.durable.touch(&fingerprint, now) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key, "Cache miss");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "Durable cache read failed, treating as miss");
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        let payload = entry.payload.clone();
        if entry.access_count > self.config.promotion_threshold {
            let promoted = self
                .resident
                .lock()
                .insert(entry, self.config.resident_budget_bytes);
            if promoted {
                debug!(key, "Promoted entry to resident tier");
            }
        }
        self.hits.fetch_add(1, Ordering::Relaxed);
        debug!(key, "Cache hit (durable)");
        Some(payload)
    }

    /// Store `payload` under `key` in both tiers
    pub fn put(
        &self,
        key: &str,
        payload: Value,
        metadata: EntryMetadata,
    ) -> Result<(), CacheError> {
        let size = serde_json::to_vec(&payload)
            .map_err(|e| CacheError::Encoding(e.to_string()))?
            .len() as u64;
        let entry = CacheEntry::new(key, payload, size, metadata, self.clock.now());

        if size <= self.config.resident_budget_bytes {
            self.resident
                .lock()
                .insert(entry.clone(), self.config.resident_budget_bytes);
        }

        if let Err(e) = self.durable.put(&entry) {
            warn!(key, error = %e, "Durable cache write failed");
        }
        debug!(key, size, provider = %entry.provider, "Cached content");
        Ok(())
    }

    /// Evict the least recently accessed resident entry, returning its key
    pub fn evict(&self) -> Option<String> {
        self.resident.lock().evict_lru().map(|e| e.key)
    }

    /// Remove entries of both tiers not accessed within `max_age_hours`
    ///
    /// Returns the number of distinct keys removed.
    pub fn prune(&self, max_age_hours: u64) -> usize {
        let now = self.clock.now();
        let cutoff = i64::try_from(max_age_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|age| now.checked_sub_signed(age))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut removed = BTreeSet::new();

        {
            let mut resident = self.resident.lock();
            let stale: Vec<String> = resident
                .entries
                .values()
                .filter(|e| e.last_accessed < cutoff)
                .map(|e| e.fingerprint.clone())
                .collect();
            for fingerprint in stale {
                if let Some(entry) = resident.remove(&fingerprint) {
                    removed.insert(entry.key);
                }
            }
        }

        match self.durable.remove_older_than(cutoff) {
            Ok(keys) => removed.extend(keys),
            Err(e) => warn!(error = %e, "Failed to prune durable cache"),
        }

        info!(pruned = removed.len(), max_age_hours, "Pruned cache entries");
        removed.len()
    }

    /// Prune with the configured default age
    pub fn prune_default(&self) -> usize {
        self.prune(self.config.prune_default_hours)
    }

    pub fn stats(&self) -> CacheStats {
        let resident = self.resident.lock();
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);

        let mut providers = BTreeMap::new();
        let mut total_cost_saved = 0.0;
        let mut accesses = Vec::with_capacity(resident.entries.len());
        for entry in resident.entries.values() {
            *providers.entry(entry.provider.clone()).or_insert(0) += 1;
            if entry.access_count > 1 {
                total_cost_saved += entry.source_cost * (entry.access_count - 1) as f64;
            }
            accesses.push(KeyAccess {
                key: entry.key.clone(),
                count: entry.access_count,
            });
        }
        accesses.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
        accesses.truncate(self.config.top_accessed);

        let lookups = hits + misses;
        CacheStats {
            total_entries: resident.entries.len(),
            total_bytes: resident.bytes,
            total_cost_saved,
            hits,
            misses,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
            providers,
            top_accessed: accesses,
        }
    }

    /// Resident entries whose key mentions the query terms, best first
    pub fn find_similar(&self, query: &SimilarityQuery, limit: usize) -> Vec<SimilarEntry> {
        let terms = [
            (query.service.as_deref(), 2),
            (query.city.as_deref(), 1),
            (query.kind.as_deref(), 1),
        ]
        .map(|(term, points)| (term.map(fold).filter(|t| !t.is_empty()), points));

        let resident = self.resident.lock();
        let mut matches: Vec<SimilarEntry> = resident
            .entries
            .values()
            .filter_map(|entry| {
                let key = fold(&entry.key);
                let score: u32 = terms
                    .iter()
                    .filter(|(term, _)| term.as_deref().is_some_and(|t| key.contains(t)))
                    .map(|(_, points)| *points)
                    .sum();
                (score > 0).then(|| SimilarEntry {
                    key: entry.key.clone(),
                    score,
                    payload: entry.payload.clone(),
                })
            })
            .collect();
        drop(resident);

        matches.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.key.cmp(&b.key)));
        matches.truncate(limit);
        matches
    }

    /// Drop every entry of both tiers and reset the hit counters
    pub fn clear(&self) {
        {
            let mut resident = self.resident.lock();
            resident.entries.clear();
            resident.bytes = 0;
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        if let Err(e) = self.durable.clear() {
            warn!(error = %e, "Failed to clear durable cache");
        }
        info!("Cache cleared");
    }

    /// Load the most recently accessed durable entries into the resident tier
    ///
    /// Stops at the first entry that no longer fits, after `limit` entries, or when `cancel`
    /// is set. Returns the number of entries loaded.
    pub fn warm(&self, limit: usize, cancel: &AtomicBool) -> usize {
        let recent = match self.durable.recent(limit) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Failed to read durable cache for warming");
                return 0;
            }
        };

        let budget = self.config.resident_budget_bytes;
        let mut loaded = 0;
        let mut resident = self.resident.lock();
        for entry in recent {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            if resident.entries.contains_key(&entry.fingerprint) {
                continue;
            }
            if resident.bytes + entry.size_bytes > budget {
                break;
            }
            resident.bytes += entry.size_bytes;
            resident.entries.insert(entry.fingerprint.clone(), entry);
            loaded += 1;
        }
        drop(resident);

        info!(loaded, "Warmed resident cache");
        loaded
    }

    /// Store every `(key, payload, metadata)` item until `cancel` is set
    pub fn preload<I>(&self, items: I, cancel: &AtomicBool) -> Result<usize, CacheError>
    where
        I: IntoIterator<Item = (String, Value, EntryMetadata)>,
    {
        let mut stored = 0;
        for (key, payload, metadata) in items {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            self.put(&key, payload, metadata)?;
            stored += 1;
        }
        info!(stored, "Preloaded cache entries");
        Ok(stored)
    }

    /// Preload service, city and service-in-city templates
    ///
    /// Combinations use the first five services and the first ten cities.
    pub fn preload_common_patterns(
        &self,
        services: &[String],
        cities: &[String],
        cancel: &AtomicBool,
    ) -> Result<usize, CacheError> {
        let mut items = Vec::new();
        for service in services {
            items.push((format!("template-service-{}", service), service_template(service)));
        }
        for city in cities {
            items.push((format!("template-city-{}", city), city_template(city)));
        }
        for service in services.iter().take(5) {
            for city in cities.iter().take(10) {
                items.push((
                    format!("template-{}-{}", service, city),
                    service_city_template(service, city),
                ));
            }
        }

        let template = EntryMetadata::new(TEMPLATE_PROVIDER, 0.0);
        self.preload(
            items
                .into_iter()
                .map(|(key, payload)| (key, payload, template.clone())),
            cancel,
        )
    }

    /// JSON report of the resident tier
    pub fn report(&self) -> Value {
        let stats = self.stats();
        let entries: Vec<Value> = {
            let resident = self.resident.lock();
            resident
                .entries
                .values()
                .map(|e| {
                    json!({
                        "key": e.key,
                        "provider": e.provider,
                        "size": e.size_bytes,
                        "cost": e.source_cost,
                        "accessCount": e.access_count,
                        "createdAt": e.created_at.to_rfc3339(),
                        "lastAccessed": e.last_accessed.to_rfc3339(),
                    })
                })
                .collect()
        };

        let most_used_provider = stats
            .providers
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| "none".to_string());

        json!({
            "summary": {
                "totalEntries": entries.len(),
                "totalSize": format_size(stats.total_bytes),
                "totalCostSaved": format!("${:.2}", stats.total_cost_saved),
                "averageHitRate": format!("{:.1}%", stats.hit_rate * 100.0),
                "mostUsedProvider": most_used_provider,
            },
            "stats": stats,
            "entries": entries,
        })
    }

    /// Flush the durable tier
    pub fn flush(&self) -> Result<(), CacheError> {
        self.durable.flush()
    }

    /// Write [`ContentCache::report`] to `path` as pretty JSON
    pub fn export_report(&self, path: &Path) -> Result<(), CacheError> {
        let report = serde_json::to_string_pretty(&self.report())
            .map_err(|e| CacheError::Encoding(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, report)?;
        info!(path = %path.display(), "Exported cache report");
        Ok(())
    }
}

fn service_template(service: &str) -> Value {
    json!({
        "title": format!("{} - Services professionnels", service),
        "sections": {
            "intro": format!(
                "Découvrez nos services de {} de qualité professionnelle...",
                service
            ),
            "benefits": format!("Pourquoi choisir nos services de {}...", service),
            "process": format!("Notre processus pour {}...", service),
        }
    })
}

fn city_template(city: &str) -> Value {
    json!({
        "title": format!("Services à {}", city),
        "sections": {
            "intro": format!("Nous intervenons à {} et ses environs...", city),
            "services": format!("Tous nos services disponibles à {}...", city),
            "contact": format!("Contactez-nous pour une intervention à {}...", city),
        }
    })
}

fn service_city_template(service: &str, city: &str) -> Value {
    json!({
        "title": format!("{} à {}", service, city),
        "sections": {
            "intro": format!("Votre expert en {} à {}...", service, city),
            "expertise": format!("Notre expertise en {} dans la région de {}...", service, city),
            "testimonials": format!("Ce que disent nos clients à {}...", city),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with(budget: u64) -> (ContentCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let config = CacheConfig {
            resident_budget_bytes: budget,
            ..CacheConfig::default()
        };
        let cache = ContentCache::new(config, Box::new(MemoryDurableTier::new()), clock.clone());
        (cache, clock)
    }

    fn payload(n: usize) -> Value {
        // serializes to exactly n + 2 bytes
        Value::String("x".repeat(n))
    }

    #[test]
    fn test_put_then_get_counts_accesses() {
        let (cache, _) = cache_with(1024);
        cache.put("hero", json!({ "title": "Bonjour" }), EntryMetadata::default()).unwrap();
        assert_eq!(cache.get("hero"), Some(json!({ "title": "Bonjour" })));
        assert_eq!(cache.get("hero"), Some(json!({ "title": "Bonjour" })));
        assert_eq!(cache.get("absent"), None);

        let stats = cache.stats();
        assert_eq!(stats.top_accessed[0].count, 3);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_lru_eviction_under_budget() {
        let (cache, clock) = cache_with(20);
        cache.put("a", payload(8), EntryMetadata::default()).unwrap();
        clock.advance(Duration::seconds(1));
        cache.put("b", payload(8), EntryMetadata::default()).unwrap();
        clock.advance(Duration::seconds(1));
        cache.get("a");
        clock.advance(Duration::seconds(1));
        cache.put("c", payload(8), EntryMetadata::default()).unwrap();

        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.total_bytes, 20);
        let keys: Vec<_> = stats.top_accessed.iter().map(|k| k.key.as_str()).collect();
        assert!(keys.contains(&"a"));
        assert!(keys.contains(&"c"));
    }

    #[test]
    fn test_oversized_entry_skips_resident_tier() {
        let (cache, _) = cache_with(10);
        cache.put("big", payload(50), EntryMetadata::default()).unwrap();
        assert_eq!(cache.stats().total_entries, 0);
        assert_eq!(cache.get("big"), Some(payload(50)));
    }

    #[test]
    fn test_durable_hits_promote_after_threshold() {
        let (cache, _) = cache_with(1024);
        cache.put("k", payload(4), EntryMetadata::default()).unwrap();
        assert_eq!(cache.evict().as_deref(), Some("k"));
        assert_eq!(cache.stats().total_entries, 0);

        // count goes 1 -> 2, 3, 4, 5 without promotion, then 6 promotes
        for _ in 0..4 {
            assert!(cache.get("k").is_some());
            assert_eq!(cache.stats().total_entries, 0);
        }
        assert!(cache.get("k").is_some());
        assert_eq!(cache.stats().total_entries, 1);
        assert_eq!(cache.stats().top_accessed[0].count, 6);
    }

    fn concurrent_durable_gets(durable: Box<dyn DurableTier>) -> u64 {
        // a zero budget keeps every read on the durable tier
        let config = CacheConfig {
            resident_budget_bytes: 0,
            ..CacheConfig::default()
        };
        let cache = ContentCache::new(config, durable, Arc::new(SystemClock));
        cache.put("k", payload(4), EntryMetadata::default()).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..200 {
                        assert!(cache.get("k").is_some());
                    }
                });
            }
        });

        assert_eq!(cache.stats().hits, 1600);
        cache
            .durable
            .get(&fingerprint("k"))
            .unwrap()
            .unwrap()
            .access_count
    }

    #[test]
    fn test_concurrent_gets_count_every_access() {
        assert_eq!(concurrent_durable_gets(Box::new(MemoryDurableTier::new())), 1601);
        assert_eq!(
            concurrent_durable_gets(Box::new(SledDurableTier::temporary().unwrap())),
            1601
        );
    }

    #[test]
    fn test_evict_breaks_ties_by_fingerprint() {
        let (cache, _) = cache_with(1024);
        cache.put("one", payload(1), EntryMetadata::default()).unwrap();
        cache.put("two", payload(1), EntryMetadata::default()).unwrap();
        let expected = if fingerprint("one") < fingerprint("two") { "one" } else { "two" };
        assert_eq!(cache.evict().as_deref(), Some(expected));
    }

    #[test]
    fn test_prune_counts_distinct_keys() {
        let (cache, clock) = cache_with(1024);
        cache.put("old", payload(2), EntryMetadata::default()).unwrap();
        clock.advance(Duration::hours(30));
        cache.put("new", payload(2), EntryMetadata::default()).unwrap();

        assert_eq!(cache.prune(24), 1);
        assert_eq!(cache.get("old"), None);
        assert!(cache.get("new").is_some());
    }

    #[test]
    fn test_stats_cost_saved_and_providers() {
        let (cache, _) = cache_with(1024);
        cache.put("a", payload(1), EntryMetadata::new("mistral", 0.5)).unwrap();
        cache.put("b", payload(1), EntryMetadata::new("mistral", 1.0)).unwrap();
        cache.put("c", payload(1), EntryMetadata::new(TEMPLATE_PROVIDER, 0.0)).unwrap();
        cache.get("a");
        cache.get("a");

        let stats = cache.stats();
        assert!((stats.total_cost_saved - 1.0).abs() < 1e-9);
        assert_eq!(stats.providers["mistral"], 2);
        assert_eq!(stats.providers[TEMPLATE_PROVIDER], 1);
        assert_eq!(stats.top_accessed[0].key, "a");
    }

    #[test]
    fn test_empty_stats() {
        let (cache, _) = cache_with(1024);
        let stats = cache.stats();
        assert_eq!(stats.hit_rate, 0.0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_find_similar_ignores_case_and_accents() {
        let (cache, _) = cache_with(4096);
        cache.put("template-Plomberie-Évry", payload(1), EntryMetadata::default()).unwrap();
        cache.put("template-city-evry", payload(1), EntryMetadata::default()).unwrap();
        cache.put("template-service-Plomberie", payload(1), EntryMetadata::default()).unwrap();
        cache.put("unrelated", payload(1), EntryMetadata::default()).unwrap();

        let query = SimilarityQuery {
            service: Some("plomberie".to_string()),
            city: Some("EVRY".to_string()),
            kind: None,
        };
        let found = cache.find_similar(&query, 10);
        let keys: Vec<_> = found.iter().map(|m| (m.key.as_str(), m.score)).collect();
        assert_eq!(
            keys,
            vec![
                ("template-Plomberie-Évry", 3),
                ("template-service-Plomberie", 2),
                ("template-city-evry", 1),
            ]
        );
        assert_eq!(cache.find_similar(&query, 1).len(), 1);
    }

    #[test]
    fn test_durable_failures_degrade() {
        let durable = MemoryDurableTier::new();
        durable.set_failing(true);
        let cache = ContentCache::new(
            CacheConfig::default(),
            Box::new(durable),
            Arc::new(SystemClock),
        );
        cache.put("k", payload(1), EntryMetadata::default()).unwrap();
        assert!(cache.get("k").is_some());
        assert_eq!(cache.get("other"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_clear_resets_everything() {
        let (cache, _) = cache_with(1024);
        cache.put("k", payload(1), EntryMetadata::default()).unwrap();
        cache.get("k");
        cache.clear();
        assert_eq!(cache.stats().total_entries, 0);
        assert_eq!(cache.stats().hits, 0);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_warm_loads_recent_within_budget() {
        let (cache, clock) = cache_with(25);
        for key in ["a", "b", "c"] {
            cache.put(key, payload(8), EntryMetadata::default()).unwrap();
            clock.advance(Duration::seconds(1));
        }
        while cache.evict().is_some() {}

        let loaded = cache.warm(10, &AtomicBool::new(false));
        assert_eq!(loaded, 2);
        let keys: Vec<_> = cache.stats().top_accessed.into_iter().map(|k| k.key).collect();
        assert!(keys.contains(&"c".to_string()));
        assert!(keys.contains(&"b".to_string()));

        while cache.evict().is_some() {}
        assert_eq!(cache.warm(10, &AtomicBool::new(true)), 0);
    }

    #[test]
    fn test_preload_common_patterns() {
        let (cache, _) = cache_with(1024 * 1024);
        let services: Vec<String> = (0..6).map(|i| format!("s{}", i)).collect();
        let cities: Vec<String> = (0..12).map(|i| format!("c{}", i)).collect();
        let stored = cache
            .preload_common_patterns(&services, &cities, &AtomicBool::new(false))
            .unwrap();
        assert_eq!(stored, 6 + 12 + 5 * 10);
        assert_eq!(cache.stats().providers[TEMPLATE_PROVIDER], stored);
        let combo = cache.get("template-s0-c0").unwrap();
        assert_eq!(combo["title"], json!("s0 à c0"));
    }

    #[test]
    fn test_preload_stops_when_cancelled() {
        let (cache, _) = cache_with(1024);
        let items = vec![("k".to_string(), payload(1), EntryMetadata::default())];
        assert_eq!(cache.preload(items, &AtomicBool::new(true)).unwrap(), 0);
    }

    #[test]
    fn test_report_summary() {
        let (cache, _) = cache_with(4096);
        cache.put("a", payload(1), EntryMetadata::new("mistral", 2.0)).unwrap();
        cache.get("a");
        let report = cache.report();
        assert_eq!(report["summary"]["totalCostSaved"], json!("$2.00"));
        assert_eq!(report["summary"]["averageHitRate"], json!("100.0%"));
        assert_eq!(report["summary"]["mostUsedProvider"], json!("mistral"));
        assert_eq!(report["summary"]["totalSize"], json!("3.00 B"));
        assert_eq!(report["entries"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512.00 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }
}
