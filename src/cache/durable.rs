//! Durable cache tier
//!
//! Entries are keyed by fingerprint. The sled implementation stores a bincode record whose
//! payload is carried as JSON text.

use crate::cache::entry::CacheEntry;
use crate::error::CacheError;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Storage behind the resident tier
pub trait DurableTier: Send + Sync {
    fn get(&self, fingerprint: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Insert or replace the entry under its fingerprint
    fn put(&self, entry: &CacheEntry) -> Result<(), CacheError>;

    fn remove(&self, fingerprint: &str) -> Result<bool, CacheError>;

    /// Atomically record one access, returning the updated entry
    ///
    /// Concurrent calls for the same fingerprint must each be counted.
    fn touch(
        &self,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<CacheEntry>, CacheError>;

    fn entries(&self) -> Result<Vec<CacheEntry>, CacheError>;

    fn clear(&self) -> Result<(), CacheError>;

    /// Remove entries last accessed before `cutoff`, returning their keys
    fn remove_older_than(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>, CacheError> {
        let mut removed = Vec::new();
        for entry in self.entries()? {
            if entry.last_accessed < cutoff && self.remove(&entry.fingerprint)? {
                removed.push(entry.key);
            }
        }
        Ok(removed)
    }

    /// Up to `limit` entries, most recently accessed first
    fn recent(&self, limit: usize) -> Result<Vec<CacheEntry>, CacheError> {
        let mut entries = self.entries()?;
        entries.sort_by(|a, b| {
            b.last_accessed
                .cmp(&a.last_accessed)
                .then_with(|| a.fingerprint.cmp(&b.fingerprint))
        });
        entries.truncate(limit);
        Ok(entries)
    }

    fn len(&self) -> Result<usize, CacheError> {
        Ok(self.entries()?.len())
    }

    /// Make earlier writes durable
    fn flush(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

fn durable_error(context: &str, err: impl std::fmt::Display) -> CacheError {
    CacheError::Durable(format!("{}: {}", context, err))
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    key: String,
    fingerprint: String,
    payload_json: String,
    created_at_ms: i64,
    last_accessed_ms: i64,
    access_count: u64,
    size_bytes: u64,
    provider: String,
    source_cost: f64,
}

impl StoredEntry {
    fn from_entry(entry: &CacheEntry) -> Result<Self, CacheError> {
        Ok(Self {
            key: entry.key.clone(),
            fingerprint: entry.fingerprint.clone(),
            payload_json: serde_json::to_string(&entry.payload)
                .map_err(|e| CacheError::Encoding(e.to_string()))?,
            created_at_ms: entry.created_at.timestamp_millis(),
            last_accessed_ms: entry.last_accessed.timestamp_millis(),
            access_count: entry.access_count,
            size_bytes: entry.size_bytes,
            provider: entry.provider.clone(),
            source_cost: entry.source_cost,
        })
    }

    fn into_entry(self) -> Result<CacheEntry, CacheError> {
        let timestamp = |ms: i64| {
            DateTime::<Utc>::from_timestamp_millis(ms)
                .ok_or_else(|| CacheError::Encoding(format!("Invalid timestamp {}", ms)))
        };
        Ok(CacheEntry {
            payload: serde_json::from_str(&self.payload_json)
                .map_err(|e| CacheError::Encoding(e.to_string()))?,
            created_at: timestamp(self.created_at_ms)?,
            last_accessed: timestamp(self.last_accessed_ms)?,
            key: self.key,
            fingerprint: self.fingerprint,
            access_count: self.access_count,
            size_bytes: self.size_bytes,
            provider: self.provider,
            source_cost: self.source_cost,
        })
    }
}

/// Sled-backed durable tier
pub struct SledDurableTier {
    db: sled::Db,
}

impl SledDurableTier {
    /// Open (or create) the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CacheError> {
        let db = sled::open(path).map_err(|e| {
            CacheError::IoError(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Failed to open sled database: {}", e),
            ))
        })?;
        Ok(Self { db })
    }

    /// A throwaway database that is removed on drop
    pub fn temporary() -> Result<Self, CacheError> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| durable_error("Failed to open temporary database", e))?;
        Ok(Self { db })
    }

    fn encode(entry: &CacheEntry) -> Result<Vec<u8>, CacheError> {
        bincode::serialize(&StoredEntry::from_entry(entry)?)
            .map_err(|e| CacheError::Encoding(format!("Failed to serialize cache entry: {}", e)))
    }

    fn decode(bytes: &[u8]) -> Result<CacheEntry, CacheError> {
        let stored: StoredEntry = bincode::deserialize(bytes).map_err(|e| {
            CacheError::Encoding(format!("Failed to deserialize cache entry: {}", e))
        })?;
        stored.into_entry()
    }
}

impl DurableTier for SledDurableTier {
    fn get(&self, fingerprint: &str) -> Result<Option<CacheEntry>, CacheError> {
        match self
            .db
            .get(fingerprint.as_bytes())
            .map_err(|e| durable_error("Failed to get cache entry", e))?
        {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        let value = Self::encode(entry)?;
        self.db
            .insert(entry.fingerprint.as_bytes(), value)
            .map_err(|e| durable_error("Failed to put cache entry", e))?;
        Ok(())
    }

    fn remove(&self, fingerprint: &str) -> Result<bool, CacheError> {
        let removed = self
            .db
            .remove(fingerprint.as_bytes())
            .map_err(|e| durable_error("Failed to remove cache entry", e))?;
        Ok(removed.is_some())
    }

    fn touch(
        &self,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<CacheEntry>, CacheError> {
        // The closure may run more than once under contention; keep the last outcome only.
        let mut failure = None;
        let updated = self
            .db
            .update_and_fetch(fingerprint.as_bytes(), |current| {
                failure = None;
                let bytes = current?;
                let touched = Self::decode(bytes).and_then(|mut entry| {
                    entry.touch(now);
                    Self::encode(&entry)
                });
                match touched {
                    Ok(encoded) => Some(encoded),
                    Err(e) => {
                        failure = Some(e);
                        Some(bytes.to_vec())
                    }
                }
            })
            .map_err(|e| durable_error("Failed to update cache entry", e))?;

        if let Some(e) = failure {
            return Err(e);
        }
        updated.map(|bytes| Self::decode(&bytes)).transpose()
    }

    fn entries(&self) -> Result<Vec<CacheEntry>, CacheError> {
        let mut entries = Vec::new();
        for item in self.db.iter() {
            let (_, value) = item.map_err(|e| durable_error("Failed to iterate cache", e))?;
            entries.push(Self::decode(&value)?);
        }
        Ok(entries)
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.db
            .clear()
            .map_err(|e| durable_error("Failed to clear cache", e))?;
        Ok(())
    }

    fn len(&self) -> Result<usize, CacheError> {
        Ok(self.db.len())
    }

    fn flush(&self) -> Result<(), CacheError> {
        self.db
            .flush()
            .map_err(|e| durable_error("Failed to flush cache", e))?;
        Ok(())
    }
}

/// In-process durable tier, mainly for tests and ephemeral runs
#[derive(Debug, Default)]
pub struct MemoryDurableTier {
    entries: Mutex<BTreeMap<String, CacheEntry>>,
    failing: AtomicBool,
}

impl MemoryDurableTier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call fail until reset
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CacheError::Durable("memory tier is failing".to_string()))
        } else {
            Ok(())
        }
    }
}

impl DurableTier for MemoryDurableTier {
    fn get(&self, fingerprint: &str) -> Result<Option<CacheEntry>, CacheError> {
        self.check()?;
        Ok(self.entries.lock().get(fingerprint).cloned())
    }

    fn put(&self, entry: &CacheEntry) -> Result<(), CacheError> {
        self.check()?;
        self.entries
            .lock()
            .insert(entry.fingerprint.clone(), entry.clone());
        Ok(())
    }

    fn remove(&self, fingerprint: &str) -> Result<bool, CacheError> {
        self.check()?;
        Ok(self.entries.lock().remove(fingerprint).is_some())
    }

    fn touch(
        &self,
        fingerprint: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<CacheEntry>, CacheError> {
        self.check()?;
        let mut entries = self.entries.lock();
        Ok(entries.get_mut(fingerprint).map(|entry| {
            entry.touch(now);
            entry.clone()
        }))
    }

    fn entries(&self) -> Result<Vec<CacheEntry>, CacheError> {
        self.check()?;
        Ok(self.entries.lock().values().cloned().collect())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.check()?;
        self.entries.lock().clear();
        Ok(())
    }
}
