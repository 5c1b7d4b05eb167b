//! Request DTOs for the backing-store daemon API
//!
//! Shared between the daemon's handlers and the remote engine client, so
//! both sides of the wire agree on the shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum allowed key length in bytes on the wire
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for PUT /entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutRequest {
    /// The logical cache key
    pub key: String,
    /// The value to store; `null` is never cached
    pub value: Value,
    /// Optional TTL in milliseconds (store default if omitted or zero)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_ms: Option<u64>,
}

impl PutRequest {
    /// Validates the request data.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Request body for POST /entries/:key/remove-if
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveIfRequest {
    /// Delete only if the stored value equals this
    pub expected: Value,
}

/// Request body for POST /entries/:key/expire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpireRequest {
    /// New remaining life in milliseconds, measured from now
    pub ttl_ms: u64,
}

/// Request body for POST /locks/:key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquireRequest {
    /// Lease in seconds bounding a crashed holder (120s default for zero)
    #[serde(default)]
    pub auto_release_secs: u64,
}

/// Request body for DELETE /locks/:key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRequest {
    /// Ownership token returned by the acquisition
    pub token: String,
}

/// Query parameters for GET /keys
#[derive(Debug, Clone, Deserialize)]
pub struct ScanParams {
    /// Logical key prefix to match, empty matches everything
    #[serde(default)]
    pub prefix: String,
}

pub(crate) fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {MAX_KEY_LENGTH} bytes"
        ));
    }
    None
}
