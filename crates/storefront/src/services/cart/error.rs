//! Cart persistence error types.

use thiserror::Error;

/// Errors that can occur while persisting or loading a cart snapshot.
#[derive(Debug, Error)]
pub enum CartStorageError {
    /// Session store read or write failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The cart could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
