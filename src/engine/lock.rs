//! Lock Handle Module
//!
//! The capability returned by a successful lock acquisition.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::engine::CacheEngine;

// == Lock Handle ==
/// Proof of a held lock: the key plus the ownership token the engine stored.
///
/// Its only operation is [`release`](LockHandle::release), which must run on
/// every exit path of the critical section. Release is idempotent; a handle
/// dropped without releasing leaves the record to auto-expire and logs a
/// warning. Locks are not re-entrant: a second `lock()` on the same key
/// while held is an independent attempt and fails.
pub struct LockHandle {
    engine: CacheEngine,
    key: String,
    token: String,
    released: AtomicBool,
}

impl LockHandle {
    pub(crate) fn new(engine: CacheEngine, key: &str, token: String) -> Self {
        Self {
            engine,
            key: key.to_string(),
            token,
            released: AtomicBool::new(false),
        }
    }

    /// The logical key this lock guards.
    pub fn key(&self) -> &str {
        &self.key
    }

    #[cfg(test)]
    pub(crate) fn token(&self) -> &str {
        &self.token
    }

    // == Release ==
    /// Releases the lock via token-matched compare-and-delete.
    ///
    /// Safe to call more than once. A failed match (the lease expired and
    /// someone else re-acquired) is a success-no-op; the new holder's record
    /// is never touched.
    pub async fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        let released = self.engine.release_lock(&self.key, &self.token).await;
        if !released {
            debug!(
                "lock '{}' was already gone at release; lease expired or re-acquired",
                self.key
            );
        }
    }
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        if !self.released.load(Ordering::SeqCst) {
            warn!(
                "lock '{}' dropped without release; record will auto-expire",
                self.key
            );
        }
    }
}

impl std::fmt::Debug for LockHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token kept out of logs
        f.debug_struct("LockHandle")
            .field("key", &self.key)
            .field("released", &self.released.load(Ordering::SeqCst))
            .finish()
    }
}
