//! Status enums.

use serde::{Deserialize, Serialize};

/// Reachability of the remote record store, as seen by the liveness monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    /// No result yet, or a probe is currently running.
    #[default]
    Checking,
    /// The last probe reported a healthy store.
    Up,
    /// The last probe failed, timed out or reported an unhealthy store.
    Down,
}

impl std::fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Checking => write!(f, "checking"),
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}
