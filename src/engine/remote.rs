//! Remote Store Module
//!
//! Engine implementation backed by a shared `lockcached` daemon. Every
//! operation maps onto one HTTP call; the atomic primitives (lock acquire,
//! conditional delete) are atomic because the daemon serializes them
//! server-side, where every client process is visible.
//!
//! The cache is a performance aid, not a system of record: transport
//! failures are logged and degrade to a miss or contention outcome, they
//! never propagate to the caller.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::warn;

use crate::error::{CacheError, Result};
use crate::models::{
    AcquireRequest, EntryResponse, ExistsResponse, ExpireRequest, KeysResponse, LockResponse,
    PutRequest, ReleaseRequest, ReleasedResponse, RemoveIfRequest, RemovedResponse, TtlResponse,
};

// == Remote Store ==
/// Client for a shared remote backing store.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
}

impl RemoteStore {
    // == Constructor ==
    /// Creates a client for the daemon at `base_url` with a bounded
    /// per-request timeout. A timeout counts as operation failure, never as
    /// lock-held-forever.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|err| CacheError::Misconfigured(format!("http client: {err}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Percent-encodes a logical key for use as a single URL path segment.
    ///
    /// Keys are opaque UTF-8, so `/`, `?`, `#` and whitespace are all valid
    /// key bytes; the daemon decodes the segment back to the raw key.
    fn encode_key(key: &str) -> String {
        utf8_percent_encode(key, NON_ALPHANUMERIC).to_string()
    }

    // == Put ==
    /// Stores a value remotely. `null` is a no-op, like the in-process
    /// store; failures degrade to not caching.
    pub async fn put(&self, key: &str, value: Value, ttl_ms: Option<u64>) {
        if value.is_null() {
            return;
        }
        let body = PutRequest {
            key: key.to_string(),
            value,
            ttl_ms,
        };
        if let Err(err) = self.try_put(&body).await {
            warn!("remote put failed for '{}': {}", key, err);
        }
    }

    async fn try_put(&self, body: &PutRequest) -> Result<()> {
        self.client
            .put(self.url("/entries"))
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    // == Get ==
    /// Retrieves a value; absent, dead and unreachable all read as `None`.
    pub async fn get(&self, key: &str) -> Option<Value> {
        match self.try_get(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!("remote get failed for '{}': {}", key, err);
                None
            }
        }
    }

    async fn try_get(&self, key: &str) -> Result<Option<Value>> {
        let resp = self
            .client
            .get(self.url(&format!("/entries/{}", Self::encode_key(key))))
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let entry: EntryResponse = resp.error_for_status()?.json().await?;
        Ok(Some(entry.value))
    }

    // == Remove ==
    pub async fn remove(&self, key: &str) {
        let result = async {
            self.client
                .delete(self.url(&format!("/entries/{}", Self::encode_key(key))))
                .send()
                .await?
                .error_for_status()?;
            Ok::<_, CacheError>(())
        }
        .await;
        if let Err(err) = result {
            warn!("remote remove failed for '{}': {}", key, err);
        }
    }

    /// Compare-and-delete, executed as one atomic operation by the daemon.
    pub async fn remove_if(&self, key: &str, expected: &Value) -> bool {
        let result = async {
            let resp: RemovedResponse = self
                .client
                .post(self.url(&format!("/entries/{}/remove-if", Self::encode_key(key))))
                .json(&RemoveIfRequest {
                    expected: expected.clone(),
                })
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            Ok::<_, CacheError>(resp.removed)
        }
        .await;
        match result {
            Ok(removed) => removed,
            Err(err) => {
                warn!("remote remove-if failed for '{}': {}", key, err);
                false
            }
        }
    }

    /// Flushes the daemon's cache namespace.
    pub async fn remove_all(&self) {
        let result = async {
            self.client
                .delete(self.url("/entries"))
                .send()
                .await?
                .error_for_status()?;
            Ok::<_, CacheError>(())
        }
        .await;
        if let Err(err) = result {
            warn!("remote remove-all failed: {}", err);
        }
    }

    // == Update Expiration ==
    pub async fn update_expiration(&self, key: &str, ttl_ms: u64) {
        let result = async {
            self.client
                .post(self.url(&format!("/entries/{}/expire", Self::encode_key(key))))
                .json(&ExpireRequest { ttl_ms })
                .send()
                .await?
                .error_for_status()?;
            Ok::<_, CacheError>(())
        }
        .await;
        if let Err(err) = result {
            warn!("remote expire failed for '{}': {}", key, err);
        }
    }

    // == Exists / TTL ==
    pub async fn check_exists(&self, key: &str) -> bool {
        let result = async {
            let resp: ExistsResponse = self
                .client
                .get(self.url(&format!("/entries/{}/exists", Self::encode_key(key))))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            Ok::<_, CacheError>(resp.exists)
        }
        .await;
        match result {
            Ok(exists) => exists,
            Err(err) => {
                warn!("remote exists failed for '{}': {}", key, err);
                false
            }
        }
    }

    pub async fn expire_seconds(&self, key: &str) -> i64 {
        let result = async {
            let resp: TtlResponse = self
                .client
                .get(self.url(&format!("/entries/{}/ttl", Self::encode_key(key))))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            Ok::<_, CacheError>(resp.seconds)
        }
        .await;
        match result {
            Ok(seconds) => seconds,
            Err(err) => {
                warn!("remote ttl failed for '{}': {}", key, err);
                -1
            }
        }
    }

    // == Scan ==
    pub async fn scan_prefix(&self, prefix: &str) -> Vec<String> {
        let result = async {
            let resp: KeysResponse = self
                .client
                .get(self.url("/keys"))
                .query(&[("prefix", prefix)])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            Ok::<_, CacheError>(resp.keys)
        }
        .await;
        match result {
            Ok(keys) => keys,
            Err(err) => {
                warn!("remote scan failed for '{}': {}", prefix, err);
                Vec::new()
            }
        }
    }

    // == Lock Acquire ==
    /// Set-if-absent-with-expiry, serialized by the daemon across every
    /// client process. 409 means another holder is active. Transport
    /// failure reads as contention.
    pub async fn acquire(&self, key: &str, auto_release_secs: u64) -> Option<String> {
        match self.try_acquire(key, auto_release_secs).await {
            Ok(token) => token,
            Err(err) => {
                warn!("remote lock failed for '{}': {}", key, err);
                None
            }
        }
    }

    async fn try_acquire(&self, key: &str, auto_release_secs: u64) -> Result<Option<String>> {
        let resp = self
            .client
            .post(self.url(&format!("/locks/{}", Self::encode_key(key))))
            .json(&AcquireRequest { auto_release_secs })
            .send()
            .await?;
        if resp.status() == StatusCode::CONFLICT {
            return Ok(None);
        }
        let lock: LockResponse = resp.error_for_status()?.json().await?;
        Ok(Some(lock.token))
    }

    // == Lock Release ==
    /// Token-matched delete, atomic server-side. On failure the record is
    /// left to auto-expire, so a lost release never deadlocks the key.
    pub async fn release(&self, key: &str, token: &str) -> bool {
        let result = async {
            let resp: ReleasedResponse = self
                .client
                .delete(self.url(&format!("/locks/{}", Self::encode_key(key))))
                .json(&ReleaseRequest {
                    token: token.to_string(),
                })
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            Ok::<_, CacheError>(resp.released)
        }
        .await;
        match result {
            Ok(released) => released,
            Err(err) => {
                warn!("remote unlock failed for '{}': {}", key, err);
                false
            }
        }
    }
}
