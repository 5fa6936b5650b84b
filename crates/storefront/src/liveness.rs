//! Record store liveness monitor.
//!
//! A background task probes the store's health endpoint on a fixed interval.
//! The latest [`StoreStatus`] lives in a `watch` channel owned by the
//! monitor; handlers read it and subscribers are notified on every change.
//!
//! Each check:
//! - is skipped when another check is still in flight
//! - sets the status to `checking` while it runs
//! - gives up after the configured timeout, marking the store down and
//!   dropping the pending probe

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use amotos_core::StoreStatus;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::pocketbase::{HealthResponse, PocketBaseClient, StoreError};

/// Something that can report store health.
pub trait HealthProbe: Send + Sync + 'static {
    fn probe(&self) -> impl Future<Output = Result<HealthResponse, StoreError>> + Send;
}

impl HealthProbe for PocketBaseClient {
    async fn probe(&self) -> Result<HealthResponse, StoreError> {
        self.health().await
    }
}

/// Shared handle to the store status. Cheap to clone.
#[derive(Clone)]
pub struct LivenessMonitor {
    inner: Arc<LivenessInner>,
}

struct LivenessInner {
    status: watch::Sender<StoreStatus>,
    in_flight: AtomicBool,
    timeout: Duration,
}

/// Clears the in-flight flag when dropped, including when the check future
/// itself is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl LivenessMonitor {
    /// A monitor in the `checking` state whose probes time out after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let (status, _) = watch::channel(StoreStatus::Checking);
        Self {
            inner: Arc::new(LivenessInner {
                status,
                in_flight: AtomicBool::new(false),
                timeout,
            }),
        }
    }

    /// The current status.
    #[must_use]
    pub fn status(&self) -> StoreStatus {
        *self.inner.status.borrow()
    }

    /// Receive every status change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StoreStatus> {
        self.inner.status.subscribe()
    }

    /// Run one check. Returns `None` without probing if a check is already
    /// running, otherwise the new status.
    pub async fn check<P: HealthProbe>(&self, probe: &P) -> Option<StoreStatus> {
        let Some(_guard) = InFlightGuard::acquire(&self.inner.in_flight) else {
            tracing::debug!("Store check already in flight, skipping");
            return None;
        };

        let before = self.inner.status.send_replace(StoreStatus::Checking);

        let status = match tokio::time::timeout(self.inner.timeout, probe.probe()).await {
            Ok(Ok(health)) if health.is_healthy() => StoreStatus::Up,
            Ok(Ok(health)) => {
                tracing::warn!(
                    code = health.code,
                    message = %health.message,
                    "Record store reported unhealthy"
                );
                StoreStatus::Down
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Record store health probe failed");
                StoreStatus::Down
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = u64::try_from(self.inner.timeout.as_millis()).unwrap_or(u64::MAX),
                    "Record store health probe timed out"
                );
                StoreStatus::Down
            }
        };

        if status != before && before != StoreStatus::Checking {
            tracing::info!(from = %before, to = %status, "Record store status changed");
        }
        self.inner.status.send_replace(status);
        Some(status)
    }

    /// Probe immediately, then every `interval`, until the task is aborted.
    /// Ticks that fall while a check is running are skipped.
    pub fn spawn<P: HealthProbe>(&self, probe: P, interval: Duration) -> JoinHandle<()> {
        let monitor = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                monitor.check(&probe).await;
            }
        })
    }
}
