//! Error types for the cache engine and its daemon
//!
//! Provides unified error handling using thiserror.
//!
//! Per-operation failures never reach callers of the engine contract: the
//! stores absorb them into the miss/contention vocabulary. The variants here
//! exist for the registry (misconfiguration is the one fatal condition) and
//! for the daemon's HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found or already dead
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data on the daemon surface
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Another holder's lock record is alive
    #[error("Lock contended: {0}")]
    LockContended(String),

    /// Talking to the remote backing store failed; absorbed at the engine
    /// boundary and surfaced to engine callers as a miss
    #[error("Backend request failed: {0}")]
    Backend(String),

    /// No engine wired for the requested kind; a wiring bug, fatal at startup
    #[error("Engine misconfigured: {0}")]
    Misconfigured(String),
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Backend(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::LockContended(msg) => (StatusCode::CONFLICT, msg.clone()),
            CacheError::Backend(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            CacheError::Misconfigured(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type.
pub type Result<T> = std::result::Result<T, CacheError>;
