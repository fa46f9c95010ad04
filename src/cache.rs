//! Two-tier signature cache.
//!
//! Signatures live in a bounded in-memory map. When a [`DurableStore`] is
//! supplied and passes the construction probe, the most recently used subset
//! is mirrored to the slot named [`CACHE_NAME`] after every mutation and
//! reloaded when the next cache is built on the same store. Any durable
//! failure switches the cache to memory-only for the rest of its life.

use crate::store::{DurableStore, StoreError};
use crate::types::{CacheStats, CachedSignature};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Durable slot holding the persisted signatures.
pub const CACHE_NAME: &str = "mockup_signature_cache";

const PROBE_SUFFIX: &str = "__probe";
const DEFAULT_MEMORY_CAPACITY: usize = 1000;
const DEFAULT_STORAGE_CAPACITY: usize = 100;
// Persisted timestamps further ahead of the local clock than this are corrupt.
const MAX_FUTURE_SKEW_MS: u64 = 60 * 60 * 1000;

/// Capacity settings for the signature cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Maximum entries kept in memory (default: 1000).
    pub memory_capacity: usize,
    /// Maximum entries mirrored to the durable store (default: 100). Clamped
    /// to `memory_capacity`.
    pub storage_capacity: usize,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
            storage_capacity: DEFAULT_STORAGE_CAPACITY,
        }
    }
}

struct CacheState {
    entries: HashMap<String, CachedSignature>,
    durable_enabled: bool,
    last_timestamp: u64,
}

impl CacheState {
    // Wall-clock milliseconds, bumped so no two accesses share a timestamp.
    fn next_timestamp(&mut self) -> u64 {
        let timestamp = now_millis().max(self.last_timestamp.saturating_add(1));

        self.last_timestamp = timestamp;
        timestamp
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .values()
            .min_by(|a, b| {
                a.last_access_timestamp
                    .cmp(&b.last_access_timestamp)
                    .then_with(|| a.key.cmp(&b.key))
            })
            .map(|entry| entry.key.clone());

        if let Some(key) = oldest {
            debug!(target: "mockup_sdk", key = %key, "evicting signature");
            self.entries.remove(&key);
        }
    }

    fn most_recent(&self, limit: usize) -> Vec<CachedSignature> {
        let mut entries: Vec<_> = self.entries.values().cloned().collect();

        sort_newest_first(&mut entries);
        entries.truncate(limit);
        entries
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn sort_newest_first(entries: &mut [CachedSignature]) {
    entries.sort_by(|a, b| {
        b.last_access_timestamp
            .cmp(&a.last_access_timestamp)
            .then_with(|| a.key.cmp(&b.key))
    });
}

/// Bounded cache from canonical signable URL to signature.
pub struct SignatureCache {
    state: Mutex<CacheState>,
    store: Option<Arc<dyn DurableStore>>,
    memory_capacity: usize,
    storage_capacity: usize,
}

impl SignatureCache {
    /// Create a memory-only cache.
    pub fn new(options: CacheOptions) -> Self {
        let memory_capacity = options.memory_capacity.max(1);

        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                durable_enabled: false,
                last_timestamp: 0,
            }),
            store: None,
            memory_capacity,
            storage_capacity: options.storage_capacity.min(memory_capacity),
        }
    }

    /// Create a cache mirrored to `store`.
    ///
    /// The store is probed once with a reversible write; if the probe fails
    /// or the persisted slot cannot be parsed or validated, the cache runs
    /// memory-only.
    pub fn with_store(options: CacheOptions, store: Arc<dyn DurableStore>) -> Self {
        let mut cache = Self::new(options);

        let loaded = probe(store.as_ref())
            .and_then(|()| load(store.as_ref(), cache.storage_capacity));

        match loaded {
            Ok(entries) => {
                let state = cache.state.get_mut();

                debug!(target: "mockup_sdk", count = entries.len(), "loaded persisted signatures");
                for entry in entries {
                    state.last_timestamp = state.last_timestamp.max(entry.last_access_timestamp);
                    state.entries.entry(entry.key.clone()).or_insert(entry);
                }
                state.durable_enabled = true;
            }
            Err(e) => {
                warn!(target: "mockup_sdk", error = %e, "durable signature cache unavailable, using memory only");
            }
        }

        cache.store = Some(store);
        cache
    }

    /// Look up a signature, refreshing its recency on a hit.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut state = self.state.lock();

        if !state.entries.contains_key(key) {
            return None;
        }

        let timestamp = state.next_timestamp();
        let signature = state.entries.get_mut(key).map(|entry| {
            entry.last_access_timestamp = timestamp;
            entry.signature.clone()
        });

        self.persist(&mut state);
        signature
    }

    /// Insert or replace a signature, evicting the least recently used entry
    /// when a new key would exceed the memory capacity.
    pub fn set(&self, key: impl Into<String>, signature: impl Into<String>) {
        let key = key.into();
        let mut state = self.state.lock();

        if !state.entries.contains_key(&key) && state.entries.len() >= self.memory_capacity {
            state.evict_oldest();
        }

        let last_access_timestamp = state.next_timestamp();
        state.entries.insert(
            key.clone(),
            CachedSignature {
                key,
                signature: signature.into(),
                last_access_timestamp,
            },
        );

        self.persist(&mut state);
    }

    /// Drop every entry, including the persisted subset.
    pub fn clear(&self) {
        let mut state = self.state.lock();

        state.entries.clear();
        if let (true, Some(store)) = (state.durable_enabled, &self.store) {
            if let Err(e) = store.remove_item(CACHE_NAME) {
                warn!(target: "mockup_sdk", error = %e, "failed to clear durable signature cache, using memory only");
                state.durable_enabled = false;
            }
        }
    }

    /// Current size, capacities and timestamp range.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let timestamps = state.entries.values().map(|e| e.last_access_timestamp);

        CacheStats {
            size: state.entries.len(),
            memory_capacity: self.memory_capacity,
            durable_enabled: state.durable_enabled,
            storage_capacity: self.storage_capacity,
            oldest_timestamp: timestamps.clone().min(),
            newest_timestamp: timestamps.max(),
        }
    }

    fn persist(&self, state: &mut CacheState) {
        let store = match (&self.store, state.durable_enabled) {
            (Some(store), true) => store,
            _ => return,
        };

        let subset = state.most_recent(self.storage_capacity);
        let written = serde_json::to_string(&subset)
            .map_err(|e| StoreError::Serialization {
                message: e.to_string(),
            })
            .and_then(|payload| store.set_item(CACHE_NAME, &payload));

        if let Err(e) = written {
            warn!(target: "mockup_sdk", error = %e, "failed to persist signatures, using memory only");
            state.durable_enabled = false;
        }
    }
}

impl fmt::Debug for SignatureCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();

        f.debug_struct("SignatureCache")
            .field("size", &stats.size)
            .field("memory_capacity", &self.memory_capacity)
            .field("storage_capacity", &self.storage_capacity)
            .field("durable_enabled", &stats.durable_enabled)
            .finish()
    }
}

fn probe(store: &dyn DurableStore) -> Result<(), StoreError> {
    let name = format!("{CACHE_NAME}{PROBE_SUFFIX}");

    store.set_item(&name, "probe")?;
    store.remove_item(&name)
}

fn load(store: &dyn DurableStore, limit: usize) -> Result<Vec<CachedSignature>, StoreError> {
    let Some(raw) = store.get_item(CACHE_NAME)? else {
        return Ok(Vec::new());
    };

    let mut entries: Vec<CachedSignature> =
        serde_json::from_str(&raw).map_err(|e| StoreError::Serialization {
            message: format!("Failed to parse {CACHE_NAME}: {e}"),
        })?;

    validate_entries(&entries, now_millis().saturating_add(MAX_FUTURE_SKEW_MS))?;
    sort_newest_first(&mut entries);
    entries.truncate(limit);

    Ok(entries)
}

fn validate_entries(entries: &[CachedSignature], latest: u64) -> Result<(), StoreError> {
    let mut seen: HashMap<&str, &str> = HashMap::with_capacity(entries.len());

    for entry in entries {
        let invalid = |reason: &str| StoreError::Serialization {
            message: format!("Invalid {CACHE_NAME} entry {:?}: {reason}", entry.key),
        };

        if entry.key.is_empty() || entry.signature.is_empty() {
            return Err(invalid("empty key or signature"));
        }
        if entry.last_access_timestamp > latest {
            return Err(invalid("timestamp is in the future"));
        }
        if let Some(previous) = seen.insert(entry.key.as_str(), entry.signature.as_str()) {
            if previous != entry.signature {
                return Err(invalid("conflicting signatures"));
            }
        }
    }

    Ok(())
}
