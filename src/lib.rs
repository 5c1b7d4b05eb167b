//! lockcache - pluggable caching and distributed locks
//!
//! Provides a `CacheEngine` contract with TTL expiration, a process-local
//! implementation with a background reaper, a remote implementation backed
//! by the `lockcached` daemon, and a token-gated lock primitive on top of
//! both.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod registry;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use engine::{CacheEngine, EngineKind, LockHandle, MemoryStore, RemoteStore};
pub use error::{CacheError, Result};
pub use registry::CacheRegistry;
pub use tasks::spawn_reaper;
