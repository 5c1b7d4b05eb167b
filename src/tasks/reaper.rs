//! Reaper Task
//!
//! Background task that physically removes dead entries. Liveness is
//! already enforced lazily at read time; the reaper only reclaims the
//! memory dead entries hold.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::MemoryStore;

/// Spawns the recurring reaper for a store.
///
/// The task loops for the lifetime of the process: sleep for the interval,
/// sweep every dead entry across both namespaces, repeat. A sweep never
/// aborts the loop. The returned handle is only used by the daemon to stop
/// the task at graceful shutdown; the library never aborts it.
///
/// # Example
/// ```ignore
/// let store = MemoryStore::new(DEFAULT_TTL_MS);
/// let reaper_handle = spawn_reaper(store.clone(), 900);
/// // Later, during daemon shutdown:
/// reaper_handle.abort();
/// ```
pub fn spawn_reaper(store: MemoryStore, interval_ms: u64) -> JoinHandle<()> {
    let interval = Duration::from_millis(interval_ms);

    tokio::spawn(async move {
        info!("Starting reaper task with interval of {} ms", interval_ms);

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.reap().await;

            if removed > 0 {
                info!("Reaper: removed {} dead entries", removed);
            } else {
                debug!("Reaper: no dead entries found");
            }
        }
    })
}
