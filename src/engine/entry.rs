//! Expiring Entry Module
//!
//! Defines the value wrapper every engine stores: payload plus creation
//! timestamp plus absolute expiry.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Expiring Entry ==
/// A stored value with its creation time and absolute expiry.
///
/// An entry is alive exactly while `now < expires_at`. Dead entries may
/// linger in a store until the reaper sweeps them, but they are never
/// observable through `get`.
#[derive(Debug, Clone)]
pub struct ExpiringEntry {
    /// The stored payload
    pub value: Value,
    /// Creation timestamp (Unix milliseconds); never rewritten
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl ExpiringEntry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl_ms` from now.
    ///
    /// Callers substitute the default TTL before reaching this point, so
    /// `ttl_ms` is always positive here.
    pub fn new(value: Value, ttl_ms: u64) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            created_at: now,
            expires_at: now + ttl_ms,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: expired when the current time is greater than or
    /// equal to the expiry time, so an entry whose TTL has fully elapsed is
    /// immediately dead.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    // == Remaining TTL ==
    /// Returns remaining life in milliseconds, 0 once expired.
    pub fn remaining_ms(&self) -> u64 {
        let now = current_timestamp_ms();
        self.expires_at.saturating_sub(now)
    }

    /// Returns remaining life in whole seconds, 0 once expired.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms() / 1000
    }

    // == Rewrite Expiry ==
    /// Moves the expiry to `ttl_ms` from now.
    ///
    /// `created_at` is preserved; only the remaining life changes.
    pub fn set_expiry_from_now(&mut self, ttl_ms: u64) {
        self.expires_at = current_timestamp_ms() + ttl_ms;
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
