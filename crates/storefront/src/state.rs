//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::liveness::LivenessMonitor;
use crate::pocketbase::{PocketBaseClient, StoreError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the store client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: PocketBaseClient,
    liveness: LivenessMonitor,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StoreError> {
        let store = PocketBaseClient::new(&config.pocketbase)?;
        let liveness = LivenessMonitor::new(config.liveness.timeout);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                liveness,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the record store client.
    #[must_use]
    pub fn store(&self) -> &PocketBaseClient {
        &self.inner.store
    }

    /// Get a reference to the store liveness monitor.
    #[must_use]
    pub fn liveness(&self) -> &LivenessMonitor {
        &self.inner.liveness
    }

    /// Start probing the store in the background.
    pub fn start_liveness(&self) -> tokio::task::JoinHandle<()> {
        self.inner
            .liveness
            .spawn(self.inner.store.clone(), self.inner.config.liveness.interval)
    }
}
