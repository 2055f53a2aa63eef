//! Periodic liveness reporting for one registered instance.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::{InstanceInfo, Registry, RegistryError, ThrottledLog};

pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

const WARN_WINDOW: Duration = Duration::from_secs(30);

/// Background task calling [`Registry::report_healthy_state`] every interval
/// until cancelled.
///
/// Report failures are logged (throttled) and never end the loop. When the
/// registry answers [`RegistryError::NotRegistered`], e.g. after a registry
/// restart, the reporter registers the instance again.
///
/// Dropping the reporter cancels the task without waiting for it.
#[derive(Debug)]
pub struct HeartbeatReporter {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl HeartbeatReporter {
    /// Spawn the reporting task. The first report is sent immediately.
    ///
    /// `cancel` may be a child of a wider shutdown token; cancelling either
    /// one stops the task.
    #[must_use]
    pub fn spawn(
        registry: Arc<dyn Registry>,
        instance: InstanceInfo,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let span = tracing::info_span!(
            "heartbeat",
            service = %instance.service,
            instance_id = %instance.id,
        );
        let handle = tokio::spawn(
            run(registry, instance, interval, cancel.clone()).instrument(span),
        );
        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Cancel the task and wait until it has exited. Returns promptly even
    /// if a report is in flight.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "heartbeat task ended abnormally");
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for HeartbeatReporter {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    registry: Arc<dyn Registry>,
    instance: InstanceInfo,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let throttle = ThrottledLog::new(WARN_WINDOW);
    let id = instance.id.as_str();

    tracing::debug!(?interval, "heartbeat started");

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            r = registry.report_healthy_state(id, &instance.service) => r,
        };

        match outcome {
            Ok(()) => throttle.reset(),
            Err(RegistryError::NotRegistered { .. }) => {
                tracing::warn!("registry lost this instance, registering again");
                let registered = tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    r = registry.register(id, &instance.service, &instance.address) => r,
                };
                if let Err(e) = registered {
                    tracing::warn!(error = %e, "re-registration failed");
                }
            }
            Err(e) => {
                if let Some(suppressed) = throttle.permit() {
                    tracing::warn!(error = %e, suppressed, "failed to report healthy state");
                }
            }
        }
    }

    tracing::debug!("heartbeat stopped");
}
