//! In-Process Store Module
//!
//! Engine implementation backed by a process-local map of expiring entries.
//! All check-then-act sequences (lock acquisition, conditional delete) run
//! under a single write guard, which serializes them for the whole process.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::engine::stats::{CacheStats, StatsSnapshot};
use crate::engine::{
    cache_key, effective_lock_ms, effective_ttl_ms, lock_key, ExpiringEntry, CACHE_NS,
};
use crate::models::requests::validate_key;

// == Memory Store ==
/// Process-local cache store with TTL expiration and lock records.
///
/// Cheap to clone; clones share the same underlying map, so the reaper task
/// and every caller see one key space.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    /// Namespaced key -> entry; shared across tasks
    entries: Arc<RwLock<HashMap<String, ExpiringEntry>>>,
    /// Hit/miss counters
    stats: Arc<CacheStats>,
    /// TTL substituted when a caller passes none
    default_ttl_ms: u64,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store with the given default TTL in milliseconds.
    pub fn new(default_ttl_ms: u64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(CacheStats::new()),
            default_ttl_ms,
        }
    }

    // == Put ==
    /// Stores a value with optional TTL, overwriting unconditionally.
    ///
    /// A `null` value is a no-op: the cache never stores an absence marker.
    /// A missing or zero TTL falls back to the store default. Empty and
    /// oversized keys are rejected as a logged no-op, the same outcome the
    /// remote store gets from the daemon's wire validation.
    pub async fn put(&self, key: &str, value: Value, ttl_ms: Option<u64>) {
        if value.is_null() {
            return;
        }
        if let Some(reason) = validate_key(key) {
            warn!("put rejected for '{}': {}", key, reason);
            return;
        }
        let ttl = effective_ttl_ms(ttl_ms, self.default_ttl_ms);
        let entry = ExpiringEntry::new(value, ttl);
        self.entries.write().await.insert(cache_key(key), entry);
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expiration is checked lazily at read time: a dead entry reads as
    /// absent immediately, while its physical removal is left to the reaper.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        match entries.get(&cache_key(key)) {
            Some(entry) if !entry.is_expired() => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Unconditional delete; absent keys are fine.
    pub async fn remove(&self, key: &str) {
        self.entries.write().await.remove(&cache_key(key));
    }

    /// Compare-and-delete in the cache namespace.
    ///
    /// Removes the entry only if it is alive and its value equals
    /// `expected`; otherwise leaves it untouched. Returns whether a delete
    /// occurred.
    pub async fn remove_if(&self, key: &str, expected: &Value) -> bool {
        self.conditional_remove(&cache_key(key), expected).await
    }

    /// Deletes every entry in the cache namespace. Lock records survive.
    pub async fn remove_all(&self) {
        self.entries
            .write()
            .await
            .retain(|key, _| !key.starts_with(CACHE_NS));
    }

    // == Update Expiration ==
    /// Moves a live entry's expiry to `ttl_ms` from now without touching its
    /// creation timestamp. No-op if the key is absent or already dead.
    pub async fn update_expiration(&self, key: &str, ttl_ms: u64) {
        let ttl = effective_ttl_ms(Some(ttl_ms), self.default_ttl_ms);
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(&cache_key(key)) {
            if !entry.is_expired() {
                entry.set_expiry_from_now(ttl);
            }
        }
    }

    // == Exists / TTL ==
    /// Returns whether a live entry exists for the key.
    pub async fn check_exists(&self, key: &str) -> bool {
        let entries = self.entries.read().await;
        matches!(entries.get(&cache_key(key)), Some(entry) if !entry.is_expired())
    }

    /// Remaining TTL in whole seconds, or -1 if absent/dead.
    pub async fn expire_seconds(&self, key: &str) -> i64 {
        let entries = self.entries.read().await;
        match entries.get(&cache_key(key)) {
            Some(entry) if !entry.is_expired() => entry.remaining_secs() as i64,
            _ => -1,
        }
    }

    // == Scan ==
    /// Live logical keys in the cache namespace starting with `prefix`.
    pub async fn scan_prefix(&self, prefix: &str) -> Vec<String> {
        let entries = self.entries.read().await;
        entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .filter_map(|(key, _)| key.strip_prefix(CACHE_NS))
            .filter(|logical| logical.starts_with(prefix))
            .map(String::from)
            .collect()
    }

    // == Lock Acquire ==
    /// Attempts to create a lock record for the key.
    ///
    /// The whole check-then-insert runs under one write guard, so two
    /// concurrent acquirers can never both succeed. Returns the ownership
    /// token on success, `None` while another holder's record is alive.
    pub async fn acquire(&self, key: &str, auto_release_secs: u64) -> Option<String> {
        let mut entries = self.entries.write().await;
        let lock_ns_key = lock_key(key);
        if let Some(existing) = entries.get(&lock_ns_key) {
            if !existing.is_expired() {
                return None;
            }
        }
        let token = Uuid::new_v4().to_string();
        let ttl = effective_lock_ms(auto_release_secs);
        entries.insert(lock_ns_key, ExpiringEntry::new(Value::String(token.clone()), ttl));
        Some(token)
    }

    // == Lock Release ==
    /// Compare-and-delete of a lock record by its ownership token.
    ///
    /// A stale or foreign token fails the match and leaves the current
    /// holder's record intact. Returns whether a delete occurred.
    pub async fn release(&self, key: &str, token: &str) -> bool {
        self.conditional_remove(&lock_key(key), &Value::String(token.to_string()))
            .await
    }

    // == Reap ==
    /// Physically removes every dead entry across both namespaces.
    ///
    /// Returns the number of entries removed.
    pub async fn reap(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Stats ==
    /// Snapshot of hit/miss counters and entry count.
    pub async fn stats(&self) -> StatsSnapshot {
        let total = self.entries.read().await.len();
        self.stats.snapshot(total)
    }

    /// Current number of entries, dead ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Shared conditional delete: remove only if alive and value matches.
    async fn conditional_remove(&self, ns_key: &str, expected: &Value) -> bool {
        let mut entries = self.entries.write().await;
        match entries.get(ns_key) {
            Some(entry) if !entry.is_expired() && entry.value == *expected => {
                entries.remove(ns_key);
                true
            }
            _ => false,
        }
    }
}
