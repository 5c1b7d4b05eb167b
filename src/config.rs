//! Configuration Module
//!
//! Handles loading engine and daemon configuration from environment variables.

use std::env;

use tracing::warn;

use crate::engine::{EngineKind, DEFAULT_TTL_MS};

/// Default reaper wake interval in milliseconds
pub const DEFAULT_REAP_INTERVAL_MS: u64 = 900;

/// Engine and daemon configuration.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Engine kind the registry hands out by default
    pub default_engine: EngineKind,
    /// TTL in milliseconds for values stored without one
    pub default_ttl_ms: u64,
    /// Reaper wake interval in milliseconds
    pub reap_interval_ms: u64,
    /// Base URL of the remote backing store, required for the remote engine
    pub remote_url: Option<String>,
    /// Per-request timeout against the remote store in milliseconds
    pub remote_timeout_ms: u64,
    /// HTTP port for the daemon binary
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_ENGINE` - default engine kind, `in_process` or `remote`
    ///   (default: in_process; an unknown value warns and falls back)
    /// - `DEFAULT_TTL_MS` - value TTL in milliseconds (default: 1800000)
    /// - `REAP_INTERVAL_MS` - reaper interval (default: 900)
    /// - `REMOTE_URL` - remote store base URL (default: unset)
    /// - `REMOTE_TIMEOUT_MS` - remote request timeout (default: 5000)
    /// - `SERVER_PORT` - daemon HTTP port (default: 7379)
    pub fn from_env() -> Self {
        Self {
            default_engine: match env::var("CACHE_ENGINE") {
                Ok(raw) => raw.parse().unwrap_or_else(|err| {
                    warn!("CACHE_ENGINE: {}; falling back to in_process", err);
                    EngineKind::InProcess
                }),
                Err(_) => EngineKind::InProcess,
            },
            default_ttl_ms: env::var("DEFAULT_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_MS),
            reap_interval_ms: env::var("REAP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REAP_INTERVAL_MS),
            remote_url: env::var("REMOTE_URL").ok(),
            remote_timeout_ms: env::var("REMOTE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7379),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_engine: EngineKind::InProcess,
            default_ttl_ms: DEFAULT_TTL_MS,
            reap_interval_ms: DEFAULT_REAP_INTERVAL_MS,
            remote_url: None,
            remote_timeout_ms: 5000,
            server_port: 7379,
        }
    }
}
