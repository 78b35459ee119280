//! Entity Expiry Task
//!
//! Background task that removes feed entities when their TTL elapses.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::feed::FeedStore;

/// Spawns a background task that expires feed entities on time.
///
/// The task sleeps until the earliest pending deadline, or until the store
/// reports a change that may have moved it, then takes the write lock and
/// fires every due timer. With nothing scheduled it waits for the next change.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let feed = Arc::new(RwLock::new(FeedStore::new(Duration::from_secs(300))));
/// let expiry_handle = spawn_expiry_task(feed.clone());
/// // Later, during shutdown:
/// expiry_handle.abort();
/// ```
pub fn spawn_expiry_task(feed: Arc<RwLock<FeedStore>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut changes = feed.read().await.subscribe();
        info!("Starting entity expiry task");

        loop {
            let deadline = feed.read().await.next_deadline();

            let still_open = match deadline {
                Some(deadline) => {
                    tokio::select! {
                        _ = tokio::time::sleep_until(deadline) => true,
                        changed = changes.changed() => changed.is_ok(),
                    }
                }
                None => changes.changed().await.is_ok(),
            };
            if !still_open {
                debug!("Feed store dropped, stopping expiry task");
                break;
            }

            let expired = feed.write().await.expire_due(Instant::now());
            changes.borrow_and_update();

            if expired > 0 {
                info!(expired, "Expired feed entities removed");
            }
        }
    })
}
