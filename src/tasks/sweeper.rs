//! Expiration Sweeper
//!
//! Background task that periodically refreshes every collection, removing
//! expired objects under a bounded number of concurrent, time-limited sweeps.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::storage::{Collection, Store};

/// Tick interval used when the configured one is zero.
const MIN_INTERVAL: Duration = Duration::from_millis(100);

/// Spawns the background sweeper for `store`.
///
/// Every `refresh_time` seconds the sweeper snapshots the registered
/// collections and spawns one refresh per collection. At most
/// `max_refreshes` refreshes run at once; queuing further collections waits
/// for a permit. Each refresh is limited to `refresh_timeout` seconds, after
/// which it is cancelled and its permit released.
///
/// A zero `refresh_time` falls back to [`MIN_INTERVAL`] and a zero
/// `max_refreshes` to a single permit.
///
/// Ticks that fall behind are not skipped: the next tick's sweeps simply
/// queue for permits.
///
/// # Returns
/// A JoinHandle for the scheduler loop, to be aborted during shutdown.
pub fn spawn_sweeper(store: Arc<Store>) -> JoinHandle<()> {
    let config = store.config();

    let mut interval = config.refresh_interval();
    if interval.is_zero() {
        warn!("refresh_time is 0, sweeping every {:?}", MIN_INTERVAL);
        interval = MIN_INTERVAL;
    }
    let max_refreshes = config.max_refreshes.max(1);
    if config.max_refreshes == 0 {
        warn!("max_refreshes is 0, sweeping one collection at a time");
    }
    let task_timeout = config.refresh_task_timeout();
    let permits = Arc::new(Semaphore::new(max_refreshes));

    tokio::spawn(async move {
        info!(
            "Starting expiration sweeper: interval={:?}, task_timeout={:?}, max_refreshes={}",
            interval, task_timeout, max_refreshes
        );

        let mut ticker = tokio::time::interval(interval);
        // Skip the first tick (which fires immediately)
        ticker.tick().await;

        loop {
            ticker.tick().await;

            for collection in store.collections_snapshot().await {
                let permit = match permits.clone().acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };
                tokio::spawn(sweep_collection(collection, task_timeout, permit));
            }
        }
    })
}

/// Refreshes one collection, holding `permit` until the refresh finishes or
/// `task_timeout` elapses.
async fn sweep_collection(
    collection: Arc<Collection>,
    task_timeout: Duration,
    permit: OwnedSemaphorePermit,
) {
    let cancel = CancellationToken::new();
    let mut refresh = tokio::spawn({
        let collection = collection.clone();
        let cancel = cancel.clone();
        async move { collection.refresh(&cancel).await }
    });

    match tokio::time::timeout(task_timeout, &mut refresh).await {
        Ok(Ok(removed)) if removed > 0 => {
            info!(
                "Sweep of '{}': removed {} expired objects",
                collection.name(),
                removed
            );
        }
        Ok(Ok(_)) => {
            debug!("Sweep of '{}': no expired objects found", collection.name());
        }
        Ok(Err(e)) => {
            warn!("Sweep of '{}' failed: {}", collection.name(), e);
        }
        Err(_) => {
            cancel.cancel();
            warn!(
                "Sweep of '{}' timed out after {:?}, cancelled",
                collection.name(),
                task_timeout
            );
        }
    }

    drop(permit);
}
