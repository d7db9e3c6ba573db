//! Cache entry types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const UNKNOWN_PROVIDER: &str = "unknown";

/// Fingerprint of a cache key: lowercase hex blake3
pub fn fingerprint(key: &str) -> String {
    blake3::hash(key.as_bytes()).to_hex().to_string()
}

/// Who produced a payload and what it cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    pub provider: String,
    pub cost: f64,
}

impl EntryMetadata {
    pub fn new(provider: impl Into<String>, cost: f64) -> Self {
        Self {
            provider: provider.into(),
            cost,
        }
    }
}

impl Default for EntryMetadata {
    fn default() -> Self {
        Self::new(UNKNOWN_PROVIDER, 0.0)
    }
}

/// A cached payload with its access bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub key: String,
    pub fingerprint: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub access_count: u64,
    pub size_bytes: u64,
    pub provider: String,
    pub source_cost: f64,
}

impl CacheEntry {
    /// A fresh entry, counted as accessed once
    pub fn new(
        key: &str,
        payload: Value,
        size_bytes: u64,
        metadata: EntryMetadata,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.to_string(),
            fingerprint: fingerprint(key),
            payload,
            created_at: now,
            last_accessed: now,
            access_count: 1,
            size_bytes,
            provider: metadata.provider,
            source_cost: metadata.cost,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_accessed = now;
        self.access_count += 1;
    }
}
