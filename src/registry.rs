//! Engine Registry Module
//!
//! Process-wide lookup resolving an engine kind to its singleton instance.
//! The registry is an explicitly constructed value that callers pass around,
//! not implicit static state; each kind is bound lazily, exactly once, and
//! lives until process exit.

use std::sync::{Arc, OnceLock};

use crate::config::Config;
use crate::engine::{CacheEngine, EngineKind, MemoryStore, RemoteStore};
use crate::error::{CacheError, Result};
use crate::tasks::spawn_reaper;

// == Cache Registry ==
/// Lazily binds and hands out one engine per kind.
///
/// The only fatal error path in the crate lives here: asking for an engine
/// whose wiring is missing (remote without a URL) is a configuration bug,
/// not a runtime condition, and returns `Err`.
#[derive(Debug)]
pub struct CacheRegistry {
    config: Config,
    in_process: OnceLock<Arc<CacheEngine>>,
    remote: OnceLock<Arc<CacheEngine>>,
}

impl CacheRegistry {
    /// Creates a registry; no engine is built until first requested.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            in_process: OnceLock::new(),
            remote: OnceLock::new(),
        }
    }

    // == Lookup ==
    /// Resolves the singleton engine for a kind, building it on first call.
    ///
    /// Building the in-process engine also spawns its reaper task, which
    /// runs for the rest of the process lifetime. Must be called from
    /// within a tokio runtime.
    pub fn engine(&self, kind: EngineKind) -> Result<Arc<CacheEngine>> {
        match kind {
            EngineKind::InProcess => {
                let engine = self.in_process.get_or_init(|| {
                    let store = MemoryStore::new(self.config.default_ttl_ms);
                    spawn_reaper(store.clone(), self.config.reap_interval_ms);
                    Arc::new(CacheEngine::InProcess(store))
                });
                Ok(engine.clone())
            }
            EngineKind::Remote => {
                if let Some(engine) = self.remote.get() {
                    return Ok(engine.clone());
                }
                let url = self.config.remote_url.as_deref().ok_or_else(|| {
                    CacheError::Misconfigured(
                        "remote engine requested but REMOTE_URL is not set".to_string(),
                    )
                })?;
                let store = RemoteStore::new(url, self.config.remote_timeout_ms)?;
                let engine = Arc::new(CacheEngine::Remote(store));
                // Publish; a racing initializer's copy is dropped and the
                // first published engine wins for everyone.
                Ok(self.remote.get_or_init(|| engine).clone())
            }
        }
    }

    /// The engine for the configured default kind.
    pub fn default_engine(&self) -> Result<Arc<CacheEngine>> {
        self.engine(self.config.default_engine)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_registry_returns_same_in_process_engine() {
        let registry = CacheRegistry::new(Config::default());

        let first = registry.engine(EngineKind::InProcess).unwrap();
        let second = registry.engine(EngineKind::InProcess).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_registry_engines_share_state() {
        let registry = CacheRegistry::new(Config::default());

        let writer = registry.default_engine().unwrap();
        writer.put("shared", json!(1), None).await;

        let reader = registry.engine(EngineKind::InProcess).unwrap();
        assert_eq!(reader.get("shared").await, Some(json!(1)));
    }

    #[tokio::test]
    async fn test_remote_without_url_is_misconfigured() {
        let registry = CacheRegistry::new(Config::default());

        let result = registry.engine(EngineKind::Remote);
        assert!(matches!(result, Err(CacheError::Misconfigured(_))));
    }

    #[tokio::test]
    async fn test_remote_with_url_binds_once() {
        let config = Config {
            remote_url: Some("http://127.0.0.1:7379".to_string()),
            ..Config::default()
        };
        let registry = CacheRegistry::new(config);

        let first = registry.engine(EngineKind::Remote).unwrap();
        let second = registry.engine(EngineKind::Remote).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_default_engine_follows_config() {
        let registry = CacheRegistry::new(Config::default());

        let engine = registry.default_engine().unwrap();
        assert!(matches!(*engine, CacheEngine::InProcess(_)));
    }
}
