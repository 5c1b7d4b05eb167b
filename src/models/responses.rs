//! Response DTOs for the backing-store daemon API
//!
//! Deserialize is derived alongside Serialize because the remote engine
//! client parses these same shapes back off the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body for GET /entries/:key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryResponse {
    /// The requested logical key
    pub key: String,
    /// The stored value
    pub value: Value,
}

/// Response body for PUT /entries and DELETE /entries/:key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    /// Success message
    pub message: String,
    /// The key the operation touched, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl AckResponse {
    pub fn for_key(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    pub fn plain(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key: None,
        }
    }
}

/// Response body for POST /entries/:key/remove-if
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovedResponse {
    /// Whether a delete occurred
    pub removed: bool,
}

/// Response body for GET /entries/:key/exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

/// Response body for GET /entries/:key/ttl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtlResponse {
    /// Remaining whole seconds, -1 if absent or dead
    pub seconds: i64,
}

/// Response body for GET /keys
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysResponse {
    /// Live logical keys matching the prefix
    pub keys: Vec<String>,
}

/// Response body for a successful POST /locks/:key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockResponse {
    /// The locked logical key
    pub key: String,
    /// Ownership token; required to release
    pub token: String,
}

/// Response body for DELETE /locks/:key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleasedResponse {
    /// Whether the token matched and the record was deleted
    pub released: bool,
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
