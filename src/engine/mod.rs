//! Engine Module
//!
//! The cache contract and its two interchangeable implementations: an
//! in-process store and a client for a shared remote store. Callers hold a
//! `CacheEngine` and never see which variant backs it except through
//! latency/durability differences.

mod entry;
mod lock;
mod memory;
mod remote;
mod stats;


use std::str::FromStr;

use serde_json::Value;

use crate::error::CacheError;

pub use entry::ExpiringEntry;
pub use lock::LockHandle;
pub use memory::MemoryStore;
pub use remote::RemoteStore;
pub use stats::{CacheStats, StatsSnapshot};

// == Public Constants ==
/// Namespace prefix for ordinary cached values
pub const CACHE_NS: &str = "cache:";

/// Namespace prefix for lock records
pub const LOCK_NS: &str = "lock:";

/// TTL substituted when a caller stores a value without one: 30 minutes
pub const DEFAULT_TTL_MS: u64 = 30 * 60 * 1000;

/// Lock lease substituted for a missing/zero auto-release: 120 seconds
pub const DEFAULT_LOCK_SECS: u64 = 120;

// == Key Namespacing ==
pub(crate) fn cache_key(key: &str) -> String {
    format!("{CACHE_NS}{key}")
}

pub(crate) fn lock_key(key: &str) -> String {
    format!("{LOCK_NS}{key}")
}

/// A missing or zero TTL always becomes the default, never "forever".
pub(crate) fn effective_ttl_ms(ttl_ms: Option<u64>, default_ttl_ms: u64) -> u64 {
    match ttl_ms {
        Some(ttl) if ttl > 0 => ttl,
        _ => default_ttl_ms,
    }
}

/// Lock lease in milliseconds, with the 120s default substituted for zero.
pub(crate) fn effective_lock_ms(auto_release_secs: u64) -> u64 {
    let secs = if auto_release_secs > 0 {
        auto_release_secs
    } else {
        DEFAULT_LOCK_SECS
    };
    secs * 1000
}

// == Engine Kind ==
/// The closed set of engine implementations, selected by configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    InProcess,
    Remote,
}

impl FromStr for EngineKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_process" | "memory" => Ok(EngineKind::InProcess),
            "remote" => Ok(EngineKind::Remote),
            other => Err(CacheError::Misconfigured(format!(
                "unknown engine kind '{other}'"
            ))),
        }
    }
}

// == Cache Engine ==
/// A pluggable cache engine.
///
/// Both variants honor the same contract: lazy expiration on `get`,
/// unconditional overwrite on `put`, `null` never cached, atomic
/// compare-and-delete, single-attempt non-blocking locks.
#[derive(Debug, Clone)]
pub enum CacheEngine {
    InProcess(MemoryStore),
    Remote(RemoteStore),
}

impl CacheEngine {
    /// Stores a value with optional TTL in milliseconds (default 30 min).
    ///
    /// Keys are opaque UTF-8, non-empty and at most 256 bytes; an invalid
    /// key is a logged no-op on either engine.
    pub async fn put(&self, key: &str, value: Value, ttl_ms: Option<u64>) {
        match self {
            CacheEngine::InProcess(store) => store.put(key, value, ttl_ms).await,
            CacheEngine::Remote(store) => store.put(key, value, ttl_ms).await,
        }
    }

    /// Retrieves a live value, `None` on absent/dead/unreachable.
    pub async fn get(&self, key: &str) -> Option<Value> {
        match self {
            CacheEngine::InProcess(store) => store.get(key).await,
            CacheEngine::Remote(store) => store.get(key).await,
        }
    }

    /// Unconditional delete.
    pub async fn remove(&self, key: &str) {
        match self {
            CacheEngine::InProcess(store) => store.remove(key).await,
            CacheEngine::Remote(store) => store.remove(key).await,
        }
    }

    /// Atomic compare-and-delete; returns whether a delete occurred.
    pub async fn remove_if(&self, key: &str, expected: &Value) -> bool {
        match self {
            CacheEngine::InProcess(store) => store.remove_if(key, expected).await,
            CacheEngine::Remote(store) => store.remove_if(key, expected).await,
        }
    }

    /// Deletes every entry in the cache namespace.
    pub async fn remove_all(&self) {
        match self {
            CacheEngine::InProcess(store) => store.remove_all().await,
            CacheEngine::Remote(store) => store.remove_all().await,
        }
    }

    /// Moves a live entry's expiry to `ttl_ms` from now.
    pub async fn update_expiration(&self, key: &str, ttl_ms: u64) {
        match self {
            CacheEngine::InProcess(store) => store.update_expiration(key, ttl_ms).await,
            CacheEngine::Remote(store) => store.update_expiration(key, ttl_ms).await,
        }
    }

    /// Equivalent to `get(key).is_some()` without cloning the value.
    pub async fn check_exists(&self, key: &str) -> bool {
        match self {
            CacheEngine::InProcess(store) => store.check_exists(key).await,
            CacheEngine::Remote(store) => store.check_exists(key).await,
        }
    }

    /// Live logical keys starting with `prefix`.
    pub async fn scan_prefix(&self, prefix: &str) -> Vec<String> {
        match self {
            CacheEngine::InProcess(store) => store.scan_prefix(prefix).await,
            CacheEngine::Remote(store) => store.scan_prefix(prefix).await,
        }
    }

    /// Remaining TTL in whole seconds, -1 if absent/dead.
    pub async fn expire_seconds(&self, key: &str) -> i64 {
        match self {
            CacheEngine::InProcess(store) => store.expire_seconds(key).await,
            CacheEngine::Remote(store) => store.expire_seconds(key).await,
        }
    }

    // == Lock ==
    /// Single non-blocking lock attempt.
    ///
    /// Returns a handle owning a fresh token on success, `None` while
    /// another holder's record is alive. Retry/backoff policy belongs to
    /// the caller. `auto_release_secs` 0 becomes the 120s default.
    pub async fn lock(&self, key: &str, auto_release_secs: u64) -> Option<LockHandle> {
        let token = match self {
            CacheEngine::InProcess(store) => store.acquire(key, auto_release_secs).await,
            CacheEngine::Remote(store) => store.acquire(key, auto_release_secs).await,
        }?;
        // Engine clones share their underlying store
        Some(LockHandle::new(self.clone(), key, token))
    }

    /// Token-matched lock release; used by `LockHandle`.
    pub(crate) async fn release_lock(&self, key: &str, token: &str) -> bool {
        match self {
            CacheEngine::InProcess(store) => store.release(key, token).await,
            CacheEngine::Remote(store) => store.release(key, token).await,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_engine_kind_from_str() {
        assert_eq!("in_process".parse::<EngineKind>().unwrap(), EngineKind::InProcess);
        assert_eq!("memory".parse::<EngineKind>().unwrap(), EngineKind::InProcess);
        assert_eq!("remote".parse::<EngineKind>().unwrap(), EngineKind::Remote);
        assert!("redis".parse::<EngineKind>().is_err());
    }

    #[test]
    fn test_effective_ttl_substitution() {
        assert_eq!(effective_ttl_ms(None, DEFAULT_TTL_MS), DEFAULT_TTL_MS);
        assert_eq!(effective_ttl_ms(Some(0), DEFAULT_TTL_MS), DEFAULT_TTL_MS);
        assert_eq!(effective_ttl_ms(Some(1500), DEFAULT_TTL_MS), 1500);
    }

    #[test]
    fn test_effective_lock_lease() {
        assert_eq!(effective_lock_ms(0), DEFAULT_LOCK_SECS * 1000);
        assert_eq!(effective_lock_ms(5), 5000);
    }

    #[test]
    fn test_namespaces_disjoint() {
        assert_ne!(cache_key("job:1"), lock_key("job:1"));
        assert!(cache_key("a").starts_with(CACHE_NS));
        assert!(lock_key("a").starts_with(LOCK_NS));
    }

    #[tokio::test]
    async fn test_engine_dispatch_in_process() {
        let engine = CacheEngine::InProcess(MemoryStore::new(DEFAULT_TTL_MS));

        engine.put("k", json!("v"), None).await;
        assert_eq!(engine.get("k").await, Some(json!("v")));
        assert!(engine.check_exists("k").await);
        engine.remove("k").await;
        assert!(!engine.check_exists("k").await);
    }

    #[tokio::test]
    async fn test_engine_lock_roundtrip() {
        let engine = CacheEngine::InProcess(MemoryStore::new(DEFAULT_TTL_MS));

        let handle = engine.lock("job:1", 5).await.expect("first lock succeeds");
        assert!(engine.lock("job:1", 5).await.is_none());

        handle.release().await;
        assert!(engine.lock("job:1", 5).await.is_some());
    }
}
