//! Periodic removal of stale instance records.
//!
//! Lookups already ignore stale records, so compaction only bounds memory.

use std::sync::Arc;
use std::time::Duration;

use marquee_discovery::InMemoryRegistry;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Run [`InMemoryRegistry::compact`] every `interval` until `cancel` fires.
pub fn spawn_compaction(
    registry: Arc<InMemoryRegistry>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let removed = registry.compact();
                    if removed > 0 {
                        tracing::info!(removed, "registry compaction");
                    }
                }
            }
        }
        tracing::debug!("registry compaction stopped");
    })
}
