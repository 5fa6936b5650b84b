//! Cart snapshot storage backends.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tower_sessions::Session;

use super::CartStorageError;
use crate::models::session_keys;

/// Where the serialized cart lives between requests. A backend holds exactly
/// one snapshot.
pub trait CartStorage: Send + Sync {
    /// The stored snapshot, or `None` if nothing was stored yet.
    fn load(&self) -> impl Future<Output = Result<Option<String>, CartStorageError>> + Send;

    /// Replace the stored snapshot.
    fn save(&self, snapshot: &str) -> impl Future<Output = Result<(), CartStorageError>> + Send;
}

/// Stores the snapshot in the visitor's session under [`session_keys::CART`].
#[derive(Debug, Clone)]
pub struct SessionCartStorage {
    session: Session,
}

impl SessionCartStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartStorage for SessionCartStorage {
    async fn load(&self) -> Result<Option<String>, CartStorageError> {
        Ok(self.session.get::<String>(session_keys::CART).await?)
    }

    async fn save(&self, snapshot: &str) -> Result<(), CartStorageError> {
        self.session.insert(session_keys::CART, snapshot).await?;
        Ok(())
    }
}

/// Process-local storage. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryCartStorage {
    /// Storage that already holds `snapshot`.
    #[must_use]
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(snapshot.into()))),
        }
    }

    /// The stored snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CartStorage for MemoryCartStorage {
    async fn load(&self) -> Result<Option<String>, CartStorageError> {
        Ok(self.snapshot())
    }

    async fn save(&self, snapshot: &str) -> Result<(), CartStorageError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot.to_string());
        Ok(())
    }
}
