//! API Handlers
//!
//! HTTP request handlers for the backing-store daemon.
//!
//! Each handler delegates to the daemon's `MemoryStore`; the
//! check-then-act handlers (lock acquire, conditional delete) are atomic
//! across client processes because the store runs them under one write
//! guard inside this single process.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::config::Config;
use crate::engine::{MemoryStore, StatsSnapshot};
use crate::error::{CacheError, Result};
use crate::models::{
    AckResponse, AcquireRequest, EntryResponse, ExistsResponse, ExpireRequest, HealthResponse,
    KeysResponse, LockResponse, PutRequest, ReleaseRequest, ReleasedResponse, RemoveIfRequest,
    RemovedResponse, ScanParams, TtlResponse,
};

/// Application state shared across all handlers.
///
/// `MemoryStore` is internally shared, so the state clones axum makes per
/// request all see one key space.
#[derive(Clone)]
pub struct AppState {
    /// The daemon's store
    pub store: MemoryStore,
}

impl AppState {
    /// Creates a new AppState around the given store.
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(MemoryStore::new(config.default_ttl_ms))
    }
}

/// Handler for PUT /entries
pub async fn put_entry(
    State(state): State<AppState>,
    Json(req): Json<PutRequest>,
) -> Result<Json<AckResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.store.put(&req.key, req.value, req.ttl_ms).await;

    Ok(Json(AckResponse::for_key(
        format!("Key '{}' set", req.key),
        req.key,
    )))
}

/// Handler for GET /entries/:key
pub async fn get_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>> {
    match state.store.get(&key).await {
        Some(value) => Ok(Json(EntryResponse { key, value })),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /entries/:key
///
/// Unconditional; deleting an absent key still succeeds.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<AckResponse> {
    state.store.remove(&key).await;
    Json(AckResponse::for_key(format!("Key '{key}' deleted"), key))
}

/// Handler for POST /entries/:key/remove-if
///
/// The atomic compare-and-delete primitive.
pub async fn remove_if_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<RemoveIfRequest>,
) -> Json<RemovedResponse> {
    let removed = state.store.remove_if(&key, &req.expected).await;
    Json(RemovedResponse { removed })
}

/// Handler for DELETE /entries; flushes the cache namespace.
pub async fn flush_entries(State(state): State<AppState>) -> Json<AckResponse> {
    state.store.remove_all().await;
    Json(AckResponse::plain("Cache namespace flushed"))
}

/// Handler for POST /entries/:key/expire
pub async fn expire_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ExpireRequest>,
) -> Json<AckResponse> {
    state.store.update_expiration(&key, req.ttl_ms).await;
    Json(AckResponse::for_key(format!("Key '{key}' expiry updated"), key))
}

/// Handler for GET /entries/:key/exists
pub async fn exists_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ExistsResponse> {
    let exists = state.store.check_exists(&key).await;
    Json(ExistsResponse { exists })
}

/// Handler for GET /entries/:key/ttl
pub async fn ttl_entry(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<TtlResponse> {
    let seconds = state.store.expire_seconds(&key).await;
    Json(TtlResponse { seconds })
}

/// Handler for GET /keys?prefix=
pub async fn scan_keys(
    State(state): State<AppState>,
    Query(params): Query<ScanParams>,
) -> Json<KeysResponse> {
    let keys = state.store.scan_prefix(&params.prefix).await;
    Json(KeysResponse { keys })
}

/// Handler for POST /locks/:key
///
/// The set-if-absent-with-expiry primitive. 409 while another holder's
/// record is alive.
pub async fn acquire_lock(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<AcquireRequest>,
) -> Result<Json<LockResponse>> {
    match state.store.acquire(&key, req.auto_release_secs).await {
        Some(token) => Ok(Json(LockResponse { key, token })),
        None => Err(CacheError::LockContended(key)),
    }
}

/// Handler for DELETE /locks/:key
///
/// Token-matched release; a mismatch reports `released: false` and leaves
/// the current holder's record intact.
pub async fn release_lock(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ReleaseRequest>,
) -> Json<ReleasedResponse> {
    let released = state.store.release(&key, &req.token).await;
    Json(ReleasedResponse { released })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.store.stats().await)
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
